use iced::Color;

use crate::error::CaptureError;

/// How a status message is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
}

impl StatusKind {
    pub fn color(self) -> Color {
        match self {
            StatusKind::Info => Color::from_rgb(0.55, 0.75, 1.0),
            StatusKind::Success => Color::from_rgb(0.4, 0.85, 0.5),
            StatusKind::Warning => Color::from_rgb(1.0, 0.75, 0.3),
        }
    }
}

/// Message shown to the user after each action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Success, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Warning, text: text.into() }
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }
}

impl From<&CaptureError> for Status {
    /// Every core error is a user-correctable problem; show it as a warning
    fn from(err: &CaptureError) -> Self {
        Status::warning(format!("⚠️  {}", err))
    }
}
