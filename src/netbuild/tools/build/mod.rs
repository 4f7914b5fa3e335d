//! Entity builders.
//!
//! Each builder folds the sanitized records of one sheet into the
//! [`NetworkModel`]. Builders never fail: anything unusable becomes an
//! [`ErrorEntry`] and the row or value is skipped. Order matters: variables
//! feed template substitution, and port-channels stamp interfaces that the
//! interfaces sheet created.

pub mod interfaces;
pub mod library;
pub mod network;

use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use crate::netbuild::tools::diagnostics::{ErrorAction, ErrorEntry, ErrorLog};
use crate::netbuild::tools::ingest::{Record, RecordSet, Sheet};
use crate::netbuild::tools::model::NetworkModel;

/// Runs every builder in dependency order.
#[instrument(level = "info", skip_all)]
pub fn build_model(records: &RecordSet, log: &mut ErrorLog) -> NetworkModel {
    let mut model = NetworkModel::new();

    library::build_variables(records.records(Sheet::Variables), &mut model, log);
    library::build_templates(records.records(Sheet::ConfigTemplates), &mut model, log);
    library::build_profiles(records.records(Sheet::Profiles), &mut model, log);
    network::build_vlans(records.records(Sheet::Vlans), &mut model, log);
    network::build_vrfs(records.records(Sheet::Vrf), &mut model, log);
    interfaces::build_interfaces(records.records(Sheet::Interfaces), &mut model, log);
    network::build_static_routes(records.records(Sheet::StaticRoutes), &mut model, log);
    network::build_prefix_lists(records.records(Sheet::PrefixList), &mut model, log);
    interfaces::build_port_channels(records.records(Sheet::PortChannels), &mut model, log);

    info!(
        device_count = model.devices.len(),
        variable_count = model.library.variables.len(),
        template_count = model.library.templates.len(),
        "network model built"
    );
    model
}

/// Decodes a record into its typed row, logging rows that cannot be read.
fn decode<T: DeserializeOwned>(sheet: Sheet, record: &Record, log: &mut ErrorLog) -> Option<T> {
    match record.decode() {
        Ok(row) => Some(row),
        Err(error) => {
            log.push(
                ErrorEntry::new(sheet, "Row could not be read", error.to_string()).row(record.row),
            );
            None
        }
    }
}

/// Trims a device name and registers the device, logging the correction
/// when whitespace surrounded it. The device exists from here on even if
/// the rest of its row turns out to be unusable.
fn claim_device(
    sheet: Sheet,
    raw: &str,
    row: usize,
    model: &mut NetworkModel,
    log: &mut ErrorLog,
) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    model.device_mut(trimmed);
    if trimmed != raw {
        log.push(
            ErrorEntry::new(sheet, "Empty character in name", raw)
                .device(trimmed)
                .row(row)
                .action(ErrorAction::AutoCorrected),
        );
    }
    Some(trimmed.to_string())
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
