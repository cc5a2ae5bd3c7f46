use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use zr_report_desk::config::AppConfig;
use zr_report_desk::core::controller::DeskController;
use zr_report_desk::tui::app::AppState;

const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let _log_guard = zr_report_desk::core::logging::init_tui();
    log::info!("{} v{} starting", zr_report_desk::NAME, zr_report_desk::VERSION);

    let config = AppConfig::load();
    let (desk_tx, desk_rx) = mpsc::unbounded_channel();

    // Fail before the terminal is taken over so the message stays readable.
    let mut desk = match DeskController::from_config(&config, desk_tx) {
        Ok(desk) => desk,
        Err(e) => {
            log::error!("Start-up failed: {e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match tokio::time::timeout(HEALTH_PROBE_TIMEOUT, desk.api().health()).await {
        Ok(Ok(health)) => log::info!(
            "Report service {} (version {})",
            health.status,
            health.version.as_deref().unwrap_or("unknown")
        ),
        Ok(Err(e)) => log::warn!("Report service health check failed: {e}"),
        Err(_) => log::warn!("Report service health check timed out"),
    }

    desk.start(chrono::Local::now().date_naive());
    let mut app = AppState::new(desk, desk_rx);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms))
        .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        log::error!("Terminal error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    log::info!("Shutting down");
    Ok(())
}
