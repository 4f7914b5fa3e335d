use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::netbuild::tools::build::build_model;
use crate::netbuild::tools::diagnostics::ErrorLog;
use crate::netbuild::tools::error::{Result, ToolError};
use crate::netbuild::tools::ingest::sanitize::{IgnoredRow, format_ignored, sanitize};
use crate::netbuild::tools::ingest::{SheetTable, ingest};
use crate::netbuild::tools::io::excel_read;
use crate::netbuild::tools::io::output::{ERRORS_FILE, IGNORED_FILE, OutputSink};
use crate::netbuild::tools::render::render_device;
use crate::netbuild::tools::report::format_report;
use crate::netbuild::tools::validate::validate;

/// Everything one run produces, before it is written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Rendered configuration per device name.
    pub configs: BTreeMap<String, String>,
    pub error_report: String,
    pub ignored_report: String,
    pub errors: ErrorLog,
    pub ignored: Vec<IgnoredRow>,
}

/// Counts reported back to the caller after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub devices: usize,
    pub errors: usize,
    pub ignored: usize,
}

/// Ingests, sanitizes, builds, validates, and renders in memory.
#[instrument(level = "info", skip_all, fields(sheet_count = tables.len()))]
pub fn generate(tables: &[SheetTable]) -> Generated {
    let mut records = ingest(tables);
    let ignored = sanitize(&mut records);

    let mut errors = ErrorLog::new();
    let model = build_model(&records, &mut errors);
    validate(&model, &mut errors);

    let configs: BTreeMap<String, String> = model
        .devices
        .values()
        .map(|device| (device.name.clone(), render_device(device, &model.library)))
        .collect();
    info!(
        device_count = configs.len(),
        error_count = errors.len(),
        ignored_count = ignored.len(),
        "configurations rendered"
    );

    Generated {
        error_report: format_report(&errors),
        ignored_report: format_ignored(&ignored),
        configs,
        errors,
        ignored,
    }
}

/// Reads a workbook and writes every device configuration plus both
/// reports to `sink`.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn run(input: &Path, sink: &mut impl OutputSink) -> Result<Summary> {
    if !input.exists() {
        return Err(ToolError::MissingInput(input.to_path_buf()));
    }

    let tables = excel_read::read_workbook(input)?;
    info!(sheet_count = tables.len(), "read worksheets from workbook");
    let generated = generate(&tables);

    for (device, text) in &generated.configs {
        sink.write_device(device, text)?;
        debug!(%device, "device configuration written");
    }
    sink.write_report(ERRORS_FILE, &generated.error_report)?;
    sink.write_report(IGNORED_FILE, &generated.ignored_report)?;

    Ok(Summary {
        devices: generated.configs.len(),
        errors: generated.errors.len(),
        ignored: generated.ignored.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbuild::tools::io::output::MemorySink;

    #[test]
    fn missing_workbook_is_fatal() {
        let mut sink = MemorySink::default();
        let result = run(Path::new("/definitely/not/here.xlsx"), &mut sink);

        assert!(matches!(result, Err(ToolError::MissingInput(_))));
        assert!(sink.devices.is_empty());
        assert!(sink.reports.is_empty());
    }

    #[test]
    fn ignored_rows_never_reach_the_model() {
        let tables = vec![
            SheetTable::new("vlans", &["Device Name", "VLAN No", "VLAN Name"])
                .with_row(["SW1", "10", "users"])
                .with_row(["SW1", "$20", "parked"])
                .with_row(["SW2", "", "nothing"]),
        ];

        let generated = generate(&tables);

        assert_eq!(generated.configs.keys().collect::<Vec<_>>(), vec!["SW1"]);
        assert!(!generated.configs["SW1"].contains("vlan 20"));
        assert_eq!(generated.ignored.len(), 2);
        assert_eq!(
            generated.ignored_report,
            "[vlans]-row:3 column: VLAN No is commented out  (IGNORED)\n\
             [vlans]-row:4 has empty cell value for column: VLAN No  (IGNORED)\n"
        );
        assert!(generated.errors.is_empty());
    }
}
