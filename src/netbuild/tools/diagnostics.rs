//! Advisory findings collected while building and validating the model.

use std::fmt;

use tracing::warn;

use crate::netbuild::tools::ingest::Sheet;

/// What the generator did about a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// The offending row or value was discarded.
    NotUsed,
    /// A default value was substituted.
    AutoCreated,
    /// The value was corrected in place.
    AutoCorrected,
    /// The value is still rendered; the output may be wrong.
    WarningGenerated,
}

impl fmt::Display for ErrorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorAction::NotUsed => "Not used",
            ErrorAction::AutoCreated => "Auto-created",
            ErrorAction::AutoCorrected => "Auto corrected",
            ErrorAction::WarningGenerated => "Warning generated",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub location: Sheet,
    pub device: Option<String>,
    pub row: Option<usize>,
    pub message: String,
    pub value: String,
    pub action: ErrorAction,
}

impl ErrorEntry {
    pub fn new(location: Sheet, message: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            location,
            device: None,
            row: None,
            message: message.into(),
            value: value.into(),
            action: ErrorAction::NotUsed,
        }
    }

    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    pub fn row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn action(mut self, action: ErrorAction) -> Self {
        self.action = action;
        self
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(row) = self.row {
            write!(f, "Row ({row}): ")?;
        }
        if let Some(device) = &self.device {
            write!(f, "[{device}] ")?;
        }
        write!(f, "{} '{}' ({})", self.message, self.value, self.action)
    }
}

/// Append-only list of findings for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorLog {
    entries: Vec<ErrorEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ErrorEntry) {
        warn!(location = %entry.location, "{entry}");
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    /// Entries recorded against one sheet, in insertion order.
    pub fn for_location(&self, location: Sheet) -> impl Iterator<Item = &ErrorEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.location == location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
