//! Report type, date range and the generate button.

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::core::controller::{DeskController, ReportPhase};
use crate::core::model::ReportType;
use crate::tui::events::Focus;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

#[derive(Debug, Default)]
pub struct ReportFormView {
    start_date: InputBuffer,
    end_date: InputBuffer,
}

impl ReportFormView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull the date fields from the controller (after start-up defaults).
    pub fn sync_from(&mut self, desk: &DeskController) {
        self.start_date.set_text(&desk.form().start_date);
        self.end_date.set_text(&desk.form().end_date);
    }

    pub fn start_date(&self) -> &str {
        self.start_date.text()
    }

    pub fn end_date(&self) -> &str {
        self.end_date.text()
    }

    /// Route a key for one of the form's fields. Returns true if consumed.
    pub fn handle_key(&mut self, focus: Focus, code: KeyCode, desk: &mut DeskController) -> bool {
        match focus {
            Focus::ReportType => match code {
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                    desk.set_report_type(ReportType::cycle_next(desk.form().report_type));
                    true
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    desk.set_report_type(ReportType::cycle_prev(desk.form().report_type));
                    true
                }
                _ => false,
            },
            Focus::StartDate => {
                if self.start_date.handle_key(code) {
                    desk.set_start_date(self.start_date.text());
                }
                matches!(
                    code,
                    KeyCode::Char(_)
                        | KeyCode::Backspace
                        | KeyCode::Delete
                        | KeyCode::Left
                        | KeyCode::Right
                        | KeyCode::Home
                        | KeyCode::End
                )
            }
            Focus::EndDate => {
                if self.end_date.handle_key(code) {
                    desk.set_end_date(self.end_date.text());
                }
                matches!(
                    code,
                    KeyCode::Char(_)
                        | KeyCode::Backspace
                        | KeyCode::Delete
                        | KeyCode::Left
                        | KeyCode::Right
                        | KeyCode::Home
                        | KeyCode::End
                )
            }
            Focus::Generate => match code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    desk.generate();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, desk: &DeskController, focus: Focus) {
        let form_focused = matches!(
            focus,
            Focus::ReportType | Focus::StartDate | Focus::EndDate | Focus::Generate
        );
        let block = theme::panel("报表", form_focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let type_text = match desk.form().report_type {
            Some(t) => format!("\u{25c2} {} \u{25b8}", t.label()),
            None => "\u{25c2} 请选择报表类型 \u{25b8}".to_string(),
        };

        let enabled = desk.trigger_enabled();
        let button_text = if desk.phase() == ReportPhase::Submitting {
            "[ 生成中... ]"
        } else {
            "[ 生成报表 ]"
        };

        let lines = vec![
            field_line(Focus::ReportType, focus, type_text),
            Line::raw(""),
            input_line(Focus::StartDate, focus, &self.start_date),
            input_line(Focus::EndDate, focus, &self.end_date),
            Line::raw(""),
            Line::from(vec![
                Span::raw("   "),
                Span::styled(button_text, theme::button(enabled, focus == Focus::Generate)),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn label_span(field: Focus, focus: Focus) -> Span<'static> {
    let style = if field == focus {
        theme::cursor_row()
    } else {
        theme::muted()
    };
    Span::styled(format!(" {}: ", field.label()), style)
}

fn field_line(field: Focus, focus: Focus, value: String) -> Line<'static> {
    Line::from(vec![
        label_span(field, focus),
        Span::styled(value, Style::default().fg(theme::TEXT)),
    ])
}

fn input_line(field: Focus, focus: Focus, buf: &InputBuffer) -> Line<'static> {
    let mut value = buf.text().to_string();
    if field == focus {
        value.insert(buf.cursor_position(), '_');
    }
    field_line(field, focus, value)
}
