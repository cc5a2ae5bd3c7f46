use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{AppEvent, Focus};
use super::layout::DeskLayout;
use super::theme;
use super::views::device_list::DeviceListView;
use super::views::report_form::ReportFormView;
use super::widgets::input_buffer::InputBuffer;
use crate::core::controller::{DeskController, DeskEvent};

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Field holding keyboard focus.
    pub focus: Focus,
    /// All desk logic; the views only project it.
    pub desk: DeskController,
    customer_input: InputBuffer,
    device_input: InputBuffer,
    pub device_list: DeviceListView,
    pub report_form: ReportFormView,
    /// Receiver for background work results.
    desk_rx: mpsc::UnboundedReceiver<DeskEvent>,
    tick: usize,
}

impl AppState {
    pub fn new(desk: DeskController, desk_rx: mpsc::UnboundedReceiver<DeskEvent>) -> Self {
        let mut report_form = ReportFormView::new();
        report_form.sync_from(&desk);
        Self {
            running: true,
            focus: Focus::DeviceList,
            customer_input: InputBuffer::with_text(desk.customer_query()),
            device_input: InputBuffer::with_text(desk.device_query()),
            desk,
            device_list: DeviceListView::new(),
            report_form,
            desk_rx,
            tick: 0,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.handle_event(AppEvent::Tick);
                }
                Some(event) = self.desk_rx.recv() => {
                    self.handle_event(AppEvent::Desk(event));
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.tick = self.tick.wrapping_add(1),
            AppEvent::Desk(event) => {
                self.desk.handle(event);
                self.device_list.clamp(self.desk.selection().total());
            }
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_key(key);
            }
            AppEvent::Input(_) => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                self.running = false;
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('g')) => {
                self.desk.generate();
                return;
            }
            (_, KeyCode::Tab) => {
                self.focus = self.focus.next();
                return;
            }
            (_, KeyCode::BackTab) => {
                self.focus = self.focus.prev();
                return;
            }
            (_, KeyCode::Esc) => {
                self.focus = Focus::DeviceList;
                return;
            }
            (_, KeyCode::Char('q')) if !self.focus.is_text_input() => {
                self.running = false;
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::CustomerSearch | Focus::DeviceSearch => self.handle_search_key(key.code),
            Focus::DeviceList => {
                self.device_list.handle_key(key.code, &mut self.desk);
            }
            focus => {
                self.report_form.handle_key(focus, key.code, &mut self.desk);
            }
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        if code == KeyCode::Enter {
            self.desk.search_now();
            return;
        }
        let buf = if self.focus == Focus::CustomerSearch {
            &mut self.customer_input
        } else {
            &mut self.device_input
        };
        if buf.handle_key(code) {
            self.desk
                .set_search_input(self.customer_input.text(), self.device_input.text());
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let layout = DeskLayout::compute(frame.area());

        self.render_header(frame, layout.header);
        self.render_search(frame, layout.customer_search, Focus::CustomerSearch, &self.customer_input);
        self.render_search(frame, layout.device_search, Focus::DeviceSearch, &self.device_input);
        self.device_list.render(
            frame,
            layout.device_list,
            &self.desk,
            self.focus == Focus::DeviceList,
            self.tick,
        );
        self.report_form
            .render(frame, layout.form, &self.desk, self.focus);
        self.render_status(frame, layout.status);
        self.render_hints(frame, layout.hints);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header = Line::from(vec![
            Span::styled(" 报表中心 ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(self.desk.api().base_url().to_string(), theme::muted()),
            Span::raw(" │ "),
            Span::styled(self.focus.label(), theme::title()),
        ]);
        frame.render_widget(Paragraph::new(header), area);
    }

    fn render_search(&self, frame: &mut Frame, area: Rect, field: Focus, buf: &InputBuffer) {
        let focused = self.focus == field;
        let block = theme::panel(field.label(), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut text = buf.text().to_string();
        if focused {
            text.insert(buf.cursor_position(), '_');
        }
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme::TEXT))),
            inner,
        );
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = theme::panel("状态", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(message) = self.desk.status().current() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    message.text.clone(),
                    theme::status(message.tone),
                )),
                inner,
            );
        }
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let hints = Line::from(vec![
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":切换 "),
            Span::styled("Space", theme::key_hint()),
            Span::raw(":勾选 "),
            Span::styled("a", theme::key_hint()),
            Span::raw(":全选 "),
            Span::styled("r", theme::key_hint()),
            Span::raw(":刷新 "),
            Span::styled("←/→", theme::key_hint()),
            Span::raw(":报表类型 "),
            Span::styled("Ctrl+G", theme::key_hint()),
            Span::raw(":生成 "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":退出"),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }
}
