//! Variables, config templates, and profile assignments.

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};
use tracing::debug;

use super::{claim_device, decode};
use crate::netbuild::tools::diagnostics::{ErrorAction, ErrorEntry, ErrorLog};
use crate::netbuild::tools::ingest::rows::{ProfileRow, TemplateRow, VariableRow};
use crate::netbuild::tools::ingest::{Record, Sheet};
use crate::netbuild::tools::model::{Library, NetworkModel, Position, ProfileRef};

/// Variable names containing this character are ignored.
pub const VARIABLE_SKIP_MARKER: char = '+';

static TEMPLATE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Config Template: \[(.*?)\]").expect("template heading pattern is valid")
});

static VARIABLE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("variable reference pattern is valid"));

pub fn build_variables(records: &[Record], model: &mut NetworkModel, log: &mut ErrorLog) {
    for record in records {
        let Some(row) = decode::<VariableRow>(Sheet::Variables, record, log) else {
            continue;
        };
        let name = row.name.trim().to_string();
        if name.contains(VARIABLE_SKIP_MARKER) {
            debug!(variable = %name, "variable skipped");
            continue;
        }
        if model.library.variables.contains_key(&name) {
            log.push(
                ErrorEntry::new(Sheet::Variables, "Variable already exists", name)
                    .row(record.row),
            );
            continue;
        }
        debug!(variable = %name, "variable added");
        model.library.variables.insert(name, row.value);
    }
}

/// Collects templates and resolves their `[variable]` references once.
pub fn build_templates(records: &[Record], model: &mut NetworkModel, log: &mut ErrorLog) {
    let mut current: Option<String> = None;

    for record in records {
        let Some(row) = decode::<TemplateRow>(Sheet::ConfigTemplates, record, log) else {
            continue;
        };
        let line = row.line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(caps) = TEMPLATE_HEADING.captures(line) {
            let name = caps[1].trim().to_string();
            if model.library.templates.contains_key(&name) {
                log.push(
                    ErrorEntry::new(Sheet::ConfigTemplates, "Config template already exists", name)
                        .row(record.row),
                );
                current = None;
            } else {
                debug!(template = %name, "config template started");
                model.library.templates.insert(name.clone(), Vec::new());
                current = Some(name);
            }
            continue;
        }

        let Some(name) = &current else {
            debug!(row = record.row, "line outside any config template discarded");
            continue;
        };
        let resolved = substitute(name, line, record.row, &model.library, log);
        if let Some(lines) = model.library.templates.get_mut(name) {
            lines.push(resolved);
        }
    }
}

/// Replaces each `[name]` with the variable's value. Brackets are removed
/// from the whole line as soon as one reference resolved, even if another
/// did not; the unresolved ones are reported.
fn substitute(
    template: &str,
    line: &str,
    row: usize,
    library: &Library,
    log: &mut ErrorLog,
) -> String {
    let mut resolved_any = false;
    let mut missing = Vec::new();

    let substituted = VARIABLE_REFERENCE.replace_all(line, |caps: &Captures<'_>| {
        match library.variable(&caps[1]) {
            Some(value) => {
                resolved_any = true;
                format!("[{value}]")
            }
            None => {
                missing.push(caps[1].to_string());
                caps[0].to_string()
            }
        }
    });

    let mut output = substituted.into_owned();
    if resolved_any {
        output = output.replace(['[', ']'], "");
    }

    for variable in missing {
        log.push(
            ErrorEntry::new(
                Sheet::ConfigTemplates,
                format!("Config template '{template}' referenced embedded variable which does not exist"),
                variable,
            )
            .row(row)
            .action(ErrorAction::WarningGenerated),
        );
    }
    output
}

pub fn build_profiles(records: &[Record], model: &mut NetworkModel, log: &mut ErrorLog) {
    for record in records {
        let Some(row) = decode::<ProfileRow>(Sheet::Profiles, record, log) else {
            continue;
        };
        let Some(device) = claim_device(Sheet::Profiles, &row.device, record.row, model, log) else {
            continue;
        };

        let position = match parse_position(&row.position) {
            Some(position) => position,
            None => {
                log.push(
                    ErrorEntry::new(Sheet::Profiles, "Unknown profile position", row.position)
                        .device(device.as_str())
                        .row(record.row)
                        .action(ErrorAction::AutoCorrected),
                );
                Position::Start
            }
        };

        model.device_mut(&device).profiles.push(ProfileRef {
            reference: row.reference.trim().to_string(),
            position,
            row: record.row,
        });
    }
}

/// Blank defaults to `Start`.
fn parse_position(text: &str) -> Option<Position> {
    let value = text.trim().to_ascii_lowercase();
    if value.is_empty() || value.contains("start") {
        Some(Position::Start)
    } else if value.contains("end") {
        Some(Position::End)
    } else {
        None
    }
}
