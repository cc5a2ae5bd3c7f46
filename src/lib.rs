/// ZR Report Desk - device report generation from the terminal
///
/// Core library: device directory search with debouncing, multi-select,
/// report form validation and the report request/download lifecycle,
/// plus the ratatui front end that projects it.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
