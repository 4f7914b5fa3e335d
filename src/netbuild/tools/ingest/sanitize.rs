//! Drops rows that are missing required cells or are commented out.

use std::fmt;

use tracing::{debug, info, instrument};

use super::{Record, RecordSet, Sheet};

/// A cell containing this character disables its whole row.
pub const DISABLED_MARKER: char = '$';

/// A device name containing this character comments out its row.
pub const DEVICE_COMMENT_MARKER: char = '!';

const DEVICE_COLUMN: &str = "Device Name";

/// Columns that must be populated for a row of `sheet` to be used.
pub fn required_columns(sheet: Sheet) -> &'static [&'static str] {
    match sheet {
        Sheet::Variables => &["Variable", "Variable Value"],
        Sheet::ConfigTemplates => &[],
        Sheet::Profiles => &["Device Name", "Template or Variable"],
        Sheet::Vlans => &["Device Name", "VLAN No"],
        Sheet::Vrf => &["Device Name", "VRF"],
        Sheet::Interfaces => &["Device Name", "Interface"],
        Sheet::PortChannels => &[
            "Device Name",
            "Interface",
            "Port-Channel Group",
            "Port-Channel Mode (active/on/etc)",
            "Port-Channel Type (layer2 or layer3)",
            "Port-Channel Members (separated by commas)",
        ],
        Sheet::StaticRoutes => &["Device Name", "Route (x.x.x.x/x)", "Next Hop"],
        Sheet::PrefixList => &[
            "Device Name",
            "Prefix-List Name",
            "Prefix-List Sequence No",
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Empty,
    Disabled,
}

/// A row removed by the sanitizer, kept for the ignored-rows log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredRow {
    pub sheet: String,
    pub row: usize,
    pub field: String,
    pub reason: IgnoreReason,
}

impl fmt::Display for IgnoredRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            IgnoreReason::Empty => write!(
                f,
                "[{}]-row:{} has empty cell value for column: {}  (IGNORED)",
                self.sheet, self.row, self.field
            ),
            IgnoreReason::Disabled => write!(
                f,
                "[{}]-row:{} column: {} is commented out  (IGNORED)",
                self.sheet, self.row, self.field
            ),
        }
    }
}

/// Applies one filter per required column, in column order. A row dropped
/// by an earlier column is never examined again, so each removed row is
/// logged exactly once, against the first column it failed.
#[instrument(level = "debug", skip_all)]
pub fn sanitize(records: &mut RecordSet) -> Vec<IgnoredRow> {
    let mut ignored = Vec::new();

    for sheet in Sheet::ALL {
        let Some(rows) = records.get_mut(sheet.name()) else {
            continue;
        };
        for column in required_columns(sheet) {
            rows.retain(|record| match check(record, column) {
                Some(reason) => {
                    let entry = IgnoredRow {
                        sheet: record.sheet.clone(),
                        row: record.row,
                        field: column.to_string(),
                        reason,
                    };
                    debug!(%entry, "row ignored");
                    ignored.push(entry);
                    false
                }
                None => true,
            });
        }
    }

    info!(ignored_count = ignored.len(), "required columns checked");
    ignored
}

fn check(record: &Record, column: &str) -> Option<IgnoreReason> {
    match record.get(column) {
        None => Some(IgnoreReason::Empty),
        Some(value) if value.is_blank() => Some(IgnoreReason::Empty),
        Some(value) => {
            let text = value.to_text();
            let commented = column == DEVICE_COLUMN && text.contains(DEVICE_COMMENT_MARKER);
            (commented || text.contains(DISABLED_MARKER)).then_some(IgnoreReason::Disabled)
        }
    }
}

/// Renders the ignored-rows log.
pub fn format_ignored(ignored: &[IgnoredRow]) -> String {
    let mut text = String::new();
    for entry in ignored {
        text.push_str(&entry.to_string());
        text.push('\n');
    }
    text
}
