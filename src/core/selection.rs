//! Checked-device bookkeeping for the currently rendered device list.

use std::collections::HashSet;

use super::model::Device;

/// Visual state of the "select all" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAll {
    Unchecked,
    Indeterminate,
    Checked,
}

impl SelectAll {
    /// Derive the control state from a selected/total pair.
    pub fn from_counts(selected: usize, total: usize) -> Self {
        if total > 0 && selected == total {
            Self::Checked
        } else if selected > 0 {
            Self::Indeterminate
        } else {
            Self::Unchecked
        }
    }

    pub fn is_checked(self) -> bool {
        self == Self::Checked
    }

    pub fn is_indeterminate(self) -> bool {
        self == Self::Indeterminate
    }
}

/// The rendered device list together with the set of checked codes.
///
/// Both are replaced wholesale by [`SelectionState::replace`]; a code is only
/// ever selected while its device is rendered.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    devices: Vec<Device>,
    selected: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a fresh device list. Selection never survives a refresh.
    pub fn replace(&mut self, devices: Vec<Device>) {
        self.devices = devices;
        self.selected.clear();
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn total(&self) -> usize {
        self.devices.len()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.contains(code)
    }

    /// Set one device's membership. Unknown codes are ignored.
    pub fn set(&mut self, code: &str, checked: bool) {
        if !self.devices.iter().any(|d| d.code == code) {
            return;
        }
        if checked {
            self.selected.insert(code.to_string());
        } else {
            self.selected.remove(code);
        }
    }

    /// Flip one device's membership. Returns the new value, or `None` for an
    /// unknown code.
    pub fn toggle(&mut self, code: &str) -> Option<bool> {
        if !self.devices.iter().any(|d| d.code == code) {
            return None;
        }
        let now = !self.selected.contains(code);
        self.set(code, now);
        Some(now)
    }

    /// Apply the select-all control's new value to every rendered device.
    pub fn set_all(&mut self, checked: bool) {
        if checked {
            self.selected = self.devices.iter().map(|d| d.code.clone()).collect();
        } else {
            self.selected.clear();
        }
    }

    /// What activating the select-all control does: anything short of fully
    /// checked becomes fully checked, fully checked becomes empty.
    pub fn toggle_all(&mut self) -> SelectAll {
        let next = !self.select_all().is_checked();
        self.set_all(next);
        self.select_all()
    }

    pub fn select_all(&self) -> SelectAll {
        SelectAll::from_counts(self.selected_count(), self.total())
    }

    /// `(已选 N 台)`
    pub fn count_label(&self) -> String {
        format!("(已选 {} 台)", self.selected_count())
    }

    /// Selected codes in rendered order.
    pub fn selected_codes(&self) -> Vec<String> {
        self.devices
            .iter()
            .filter(|d| self.selected.contains(&d.code))
            .map(|d| d.code.clone())
            .collect()
    }
}
