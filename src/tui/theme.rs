//! Colors and styles for the report desk.
//!
//! Views import from here instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::core::selection::SelectAll;
use crate::core::status::StatusTone;

// ── Palette ─────────────────────────────────────────────────────────────────

/// Steel blue: focused borders and the cursor row.
pub const PRIMARY: Color = Color::Rgb(0x34, 0x98, 0xDB);
/// Amber: the generate button.
pub const ACCENT: Color = Color::Rgb(0xF3, 0x9C, 0x12);

/// Base background.
pub const BG_BASE: Color = Color::Rgb(0x14, 0x1A, 0x21);

/// Primary text.
pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
/// Secondary labels.
pub const TEXT_MUTED: Color = Color::Rgb(0x85, 0x8F, 0x99);
/// Disabled items, faint hints.
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x58, 0x60);

/// Error status.
pub const ERROR: Color = Color::Rgb(0xE7, 0x4C, 0x3C);
/// Success status.
pub const SUCCESS: Color = Color::Rgb(0x2E, 0xCC, 0x71);

// ── Style helpers ───────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Row under the list cursor.
pub fn cursor_row() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Generate button, enabled or greyed out.
pub fn button(enabled: bool, focused: bool) -> Style {
    match (enabled, focused) {
        (false, _) => Style::default().fg(TEXT_DIM),
        (true, true) => Style::default()
            .fg(BG_BASE)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(ACCENT),
    }
}

pub fn status(tone: StatusTone) -> Style {
    match tone {
        StatusTone::Success => Style::default().fg(SUCCESS),
        StatusTone::Error => Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
    }
}

/// Checkbox glyph for the select-all control.
pub fn select_all_glyph(state: SelectAll) -> &'static str {
    match state {
        SelectAll::Unchecked => "[ ]",
        SelectAll::Indeterminate => "[-]",
        SelectAll::Checked => "[x]",
    }
}

pub fn checkbox_glyph(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block, highlighted when it holds input focus.
pub fn panel(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(if focused {
            border_focused()
        } else {
            border_default()
        })
}
