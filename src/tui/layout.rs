//! Root layout: header, search row, list + form, status line, key hints.

use ratatui::layout::{Constraint, Layout, Rect};

/// Below this width the form stacks under the device list.
pub const STACK_THRESHOLD: u16 = 90;

/// Computed layout regions for a single frame.
pub struct DeskLayout {
    pub header: Rect,
    pub customer_search: Rect,
    pub device_search: Rect,
    pub device_list: Rect,
    pub form: Rect,
    pub status: Rect,
    pub hints: Rect,
}

impl DeskLayout {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Search inputs
            Constraint::Min(6),    // List + form
            Constraint::Length(3), // Status
            Constraint::Length(1), // Key hints
        ])
        .split(area);

        let search = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let body = if area.width < STACK_THRESHOLD {
            Layout::vertical([Constraint::Min(3), Constraint::Length(9)]).split(rows[2])
        } else {
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(rows[2])
        };

        Self {
            header: rows[0],
            customer_search: search[0],
            device_search: search[1],
            device_list: body[0],
            form: body[1],
            status: rows[3],
            hints: rows[4],
        }
    }
}
