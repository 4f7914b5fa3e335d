//! Human-readable error report.

use crate::netbuild::tools::diagnostics::ErrorLog;
use crate::netbuild::tools::ingest::Sheet;

const RULE: &str = "===========================";

/// Printed instead of any banner when the log is empty.
pub const NO_ERRORS: &str = "No errors detected during configuration build.";

/// Groups entries by sheet, sheets in [`Sheet::ALL`] order and entries in
/// the order they were logged. Sheets without entries get no banner.
pub fn format_report(log: &ErrorLog) -> String {
    if log.is_empty() {
        return format!("{NO_ERRORS}\n");
    }

    let mut text = String::new();
    for sheet in Sheet::ALL {
        let mut entries = log.for_location(sheet).peekable();
        if entries.peek().is_none() {
            continue;
        }
        text.push_str(&format!("{RULE}\nWorksheet: [{sheet}]\n{RULE}\n"));
        for entry in entries {
            text.push_str(&format!("{entry}\n"));
        }
        text.push('\n');
    }
    text
}
