//! Terminal Front End Tests
//!
//! Key routing through `AppState` and a smoke render on ratatui's test backend.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use wiremock::MockServer;

use crate::core::model::ReportType;
use crate::tests::common::{desk_fixture, mount_devices, next_event, DeskFixture};
use crate::tui::app::AppState;
use crate::tui::events::{AppEvent, Focus};

fn app_from(fixture: DeskFixture) -> (AppState, tempfile::TempDir) {
    let DeskFixture {
        desk,
        rx,
        downloads,
    } = fixture;
    (AppState::new(desk, rx), downloads)
}

fn key(app: &mut AppState, code: KeyCode) {
    app.handle_event(AppEvent::Input(Event::Key(KeyEvent::new(
        code,
        KeyModifiers::NONE,
    ))));
}

fn ctrl(app: &mut AppState, c: char) {
    app.handle_event(AppEvent::Input(Event::Key(KeyEvent::new(
        KeyCode::Char(c),
        KeyModifiers::CONTROL,
    ))));
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[tokio::test]
async fn test_tab_cycles_focus_and_esc_returns_to_list() {
    let server = MockServer::start().await;
    let (mut app, _dir) = app_from(desk_fixture(&server));
    assert_eq!(app.focus, Focus::DeviceList);

    key(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, Focus::ReportType);
    key(&mut app, KeyCode::BackTab);
    key(&mut app, KeyCode::BackTab);
    assert_eq!(app.focus, Focus::DeviceSearch);

    key(&mut app, KeyCode::Esc);
    assert_eq!(app.focus, Focus::DeviceList);
}

#[tokio::test]
async fn test_q_quits_outside_text_fields_only() {
    let server = MockServer::start().await;
    let (mut app, _dir) = app_from(desk_fixture(&server));

    app.focus = Focus::CustomerSearch;
    key(&mut app, KeyCode::Char('q'));
    assert!(app.running);
    assert_eq!(app.desk.customer_query(), "q");

    app.focus = Focus::DeviceList;
    key(&mut app, KeyCode::Char('q'));
    assert!(!app.running);
}

#[tokio::test]
async fn test_ctrl_c_quits_from_text_field() {
    let server = MockServer::start().await;
    let (mut app, _dir) = app_from(desk_fixture(&server));
    app.focus = Focus::StartDate;
    ctrl(&mut app, 'c');
    assert!(!app.running);
}

#[tokio::test]
async fn test_typing_in_search_fields_feeds_both_filters() {
    let server = MockServer::start().await;
    let (mut app, _dir) = app_from(desk_fixture(&server));

    app.focus = Focus::CustomerSearch;
    for c in "华东".chars() {
        key(&mut app, KeyCode::Char(c));
    }
    app.focus = Focus::DeviceSearch;
    key(&mut app, KeyCode::Char('Z'));
    key(&mut app, KeyCode::Char('R'));
    key(&mut app, KeyCode::Backspace);

    assert_eq!(app.desk.customer_query(), "华东");
    assert_eq!(app.desk.device_query(), "Z");
}

#[tokio::test]
async fn test_form_keys_drive_controller() {
    let server = MockServer::start().await;
    let (mut app, _dir) = app_from(desk_fixture(&server));

    app.focus = Focus::ReportType;
    key(&mut app, KeyCode::Right);
    assert_eq!(
        app.desk.form().report_type,
        Some(ReportType::DailyConsumption)
    );
    key(&mut app, KeyCode::Right);
    assert_eq!(
        app.desk.form().report_type,
        Some(ReportType::MonthlyConsumption)
    );
    key(&mut app, KeyCode::Left);
    key(&mut app, KeyCode::Left);
    assert_eq!(app.desk.form().report_type, None);

    app.focus = Focus::StartDate;
    for c in "2024-05-01".chars() {
        key(&mut app, KeyCode::Char(c));
    }
    assert_eq!(app.desk.form().start_date, "2024-05-01");
    assert_eq!(app.report_form.start_date(), "2024-05-01");
    assert_eq!(app.report_form.end_date(), "");
}

#[tokio::test]
async fn test_ctrl_g_validates_from_any_field() {
    let server = MockServer::start().await;
    let (mut app, _dir) = app_from(desk_fixture(&server));
    app.focus = Focus::CustomerSearch;

    ctrl(&mut app, 'g');

    assert_eq!(app.desk.status().text(), "请选择报表类型。");
    assert!(app.desk.trigger_enabled());
}

#[tokio::test]
async fn test_list_keys_toggle_selection() {
    let server = MockServer::start().await;
    mount_devices(&server).await;
    let mut fixture = desk_fixture(&server);
    fixture.desk.search_now();
    let loaded = next_event(&mut fixture.rx).await;
    let (mut app, _dir) = app_from(fixture);
    app.handle_event(AppEvent::Desk(loaded));
    assert_eq!(app.desk.selection().total(), 3);

    // Cursor starts on the select-all row.
    key(&mut app, KeyCode::Char(' '));
    assert_eq!(app.desk.selection().selected_count(), 3);

    key(&mut app, KeyCode::Down);
    assert_eq!(app.device_list.cursor(), 1);
    key(&mut app, KeyCode::Char(' '));
    assert!(!app.desk.selection().is_selected("ZR-01"));
    assert_eq!(app.desk.selection().count_label(), "(已选 2 台)");

    key(&mut app, KeyCode::Char('a'));
    assert_eq!(app.desk.selection().selected_count(), 3);
}

#[tokio::test]
async fn test_render_smoke() {
    let server = MockServer::start().await;
    let (mut app, _dir) = app_from(desk_fixture(&server));
    app.focus = Focus::ReportType;
    ctrl(&mut app, 'g');

    for width in [120, 60] {
        let mut terminal = Terminal::new(TestBackend::new(width, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("[ ]"));
        assert!(text.contains("Ctrl+G") || width < 80);
    }
}
