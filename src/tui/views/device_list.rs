//! Device list with the select-all row.
//!
//! Row 0 is the select-all control, rows 1..=n are devices. The view keeps
//! only the cursor; checked state is read from the controller every frame.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::core::controller::DeskController;
use crate::tui::theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Default)]
pub struct DeviceListView {
    cursor: usize,
}

impl DeviceListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Keep the cursor inside `0..=device_count` after the list changes.
    pub fn clamp(&mut self, device_count: usize) {
        self.cursor = self.cursor.min(device_count);
    }

    pub fn handle_key(&mut self, code: KeyCode, desk: &mut DeskController) -> bool {
        let rows = desk.selection().total() + 1;
        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < rows {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.cursor = rows - 1;
                true
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if self.cursor == 0 {
                    desk.toggle_all();
                } else if let Some(code) = desk
                    .selection()
                    .devices()
                    .get(self.cursor - 1)
                    .map(|d| d.code.clone())
                {
                    desk.toggle_device(&code);
                }
                true
            }
            KeyCode::Char('a') => {
                desk.toggle_all();
                true
            }
            KeyCode::Char('r') => {
                desk.search_now();
                true
            }
            _ => false,
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        desk: &DeskController,
        focused: bool,
        tick: usize,
    ) {
        let selection = desk.selection();

        let mut title = String::from("设备列表");
        if desk.is_loading() {
            title.push_str(&format!(" {} 加载中", SPINNER[tick % SPINNER.len()]));
        }
        let block = theme::panel(&title, focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 {
            return;
        }

        let header = Line::from(vec![
            Span::styled(
                if focused && self.cursor == 0 { " \u{25b8} " } else { "   " },
                Style::default().fg(theme::ACCENT),
            ),
            Span::styled(
                format!("{} 全选 ", theme::select_all_glyph(selection.select_all())),
                row_style(focused && self.cursor == 0),
            ),
            Span::styled(selection.count_label(), theme::muted()),
        ]);
        frame.render_widget(
            Paragraph::new(header),
            Rect::new(inner.x, inner.y, inner.width, 1),
        );

        let list_area = Rect::new(
            inner.x,
            inner.y + 1,
            inner.width,
            inner.height.saturating_sub(1),
        );
        if list_area.height == 0 {
            return;
        }

        if selection.devices().is_empty() {
            let notice = if desk.is_loading() {
                "正在加载设备列表..."
            } else {
                "未找到匹配的设备。"
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(notice, theme::muted())))
                    .alignment(Alignment::Center),
                list_area,
            );
            return;
        }

        // Scroll so the cursor row stays visible.
        let visible = list_area.height as usize;
        let cursor_row = self.cursor.saturating_sub(1);
        let offset = cursor_row.saturating_sub(visible.saturating_sub(1));

        let lines: Vec<Line> = selection
            .devices()
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, device)| {
                let at_cursor = focused && self.cursor == i + 1;
                Line::from(vec![
                    Span::styled(
                        if at_cursor { " \u{25b8} " } else { "   " },
                        Style::default().fg(theme::ACCENT),
                    ),
                    Span::styled(
                        format!(
                            "{} {:<16}",
                            theme::checkbox_glyph(selection.is_selected(&device.code)),
                            device.code
                        ),
                        row_style(at_cursor),
                    ),
                    Span::styled(device.name.clone(), theme::muted()),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), list_area);
    }
}

fn row_style(at_cursor: bool) -> Style {
    if at_cursor {
        theme::cursor_row()
    } else {
        Style::default().fg(theme::TEXT)
    }
}
