/// Shared data structures for the capture workflow
///
/// These types flow between the registry, the capture store and the UI.

use chrono::NaiveDate;
use std::fmt;

use crate::error::{CaptureError, Result};

/// Date format used for the daily folders and archive names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date as the folder name of its partition (e.g. "2024-01-01")
pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A registered mouse number (e.g. "001")
///
/// Always trimmed and non-empty, and never spans more than one line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Parse user input into an identifier
    ///
    /// Blank input is reported as `Duplicate`, the same rejection the
    /// registry gives for a number that is already taken.
    pub fn new(raw: &str) -> Result<Self> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(CaptureError::Duplicate(String::new()));
        }
        if token.contains(['\n', '\r']) {
            return Err(CaptureError::InvalidIdentifier(token.to_string()));
        }
        Ok(Identifier(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which ear a photograph shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, in display order
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Token used in stored file names
    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Position of this side in per-side arrays
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("Left ear"),
            Side::Right => f.write_str("Right ear"),
        }
    }
}

/// All photographs of one mouse on one day
///
/// There is no explicit "create": the session's folder appears the first
/// time a photograph is saved for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSession {
    pub date: NaiveDate,
    pub identifier: Identifier,
}

impl CaptureSession {
    pub fn new(date: NaiveDate, identifier: Identifier) -> Self {
        Self { date, identifier }
    }

    /// File name of the photograph for `side` (e.g. "001_left.jpg")
    pub fn file_name(&self, side: Side) -> String {
        format!("{}_{}.jpg", self.identifier, side.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_trimmed() {
        let id = Identifier::new("  001 ").unwrap();
        assert_eq!(id.as_str(), "001");
    }

    #[test]
    fn test_blank_identifier_is_rejected_as_duplicate() {
        assert!(matches!(Identifier::new("   "), Err(CaptureError::Duplicate(_))));
        assert!(matches!(Identifier::new(""), Err(CaptureError::Duplicate(_))));
    }

    #[test]
    fn test_multiline_identifier_is_invalid() {
        assert!(matches!(
            Identifier::new("001\n002"),
            Err(CaptureError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_session_file_names() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let session = CaptureSession::new(date, Identifier::new("001").unwrap());
        assert_eq!(session.file_name(Side::Left), "001_left.jpg");
        assert_eq!(session.file_name(Side::Right), "001_right.jpg");
        assert_eq!(date_label(date), "2024-01-01");
    }
}
