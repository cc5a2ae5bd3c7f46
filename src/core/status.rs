//! The single status line shown to the operator.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub tone: StatusTone,
}

/// Holds the currently displayed message, nothing else.
#[derive(Debug, Clone, Default)]
pub struct StatusNotifier {
    current: Option<StatusMessage>,
}

impl StatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.set(text, StatusTone::Success);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set(text, StatusTone::Error);
    }

    fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        let text = text.into();
        match tone {
            StatusTone::Success => log::info!("status: {text}"),
            StatusTone::Error => log::warn!("status: {text}"),
        }
        self.current = Some(StatusMessage { text, tone });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    pub fn text(&self) -> &str {
        self.current.as_ref().map(|m| m.text.as_str()).unwrap_or("")
    }
}
