//! Interfaces and port-channel post-processing.

use std::collections::BTreeSet;

use tracing::debug;

use super::{claim_device, decode, non_blank};
use crate::netbuild::tools::diagnostics::{ErrorAction, ErrorEntry, ErrorLog};
use crate::netbuild::tools::ingest::rows::{InterfaceRow, PortChannelRow};
use crate::netbuild::tools::ingest::{Record, Sheet};
use crate::netbuild::tools::model::interface::{normalize_name, parse_enabled};
use crate::netbuild::tools::model::{
    ChannelMembership, Interface, InterfaceAddress, Layer, NetworkModel, TrunkVlans,
};

/// Overwrites `target` only when the cell has a value.
fn merge(target: &mut Option<String>, text: &str) {
    if let Some(value) = non_blank(text) {
        *target = Some(value);
    }
}

/// Speed and duplex settings that leave the port negotiating.
const AUTO_SETTING: &str = "auto";
const DEFAULT_MTU: &str = "1500";

/// Like [`merge`], but a value equal to the platform default is dropped so
/// the rendered configuration carries no redundant line.
fn merge_unless_default(target: &mut Option<String>, text: &str, is_default: fn(&str) -> bool) {
    if !is_default(text.trim()) {
        merge(target, text);
    }
}

fn is_auto(value: &str) -> bool {
    value.to_ascii_lowercase().contains(AUTO_SETTING)
}

fn is_default_mtu(value: &str) -> bool {
    value == DEFAULT_MTU
}

/// Creates interfaces on first sight; later rows for the same interface
/// only fill in the cells they populate.
pub fn build_interfaces(records: &[Record], model: &mut NetworkModel, log: &mut ErrorLog) {
    for record in records {
        let Some(row) = decode::<InterfaceRow>(Sheet::Interfaces, record, log) else {
            continue;
        };
        let Some(device) =
            claim_device(Sheet::Interfaces, &row.device, record.row, model, log)
        else {
            continue;
        };
        let name = normalize_name(&row.interface);
        if name.is_empty() {
            continue;
        }

        let interface = model
            .device_mut(&device)
            .interfaces
            .entry(name.clone())
            .or_insert_with(|| Interface::new(name.as_str(), record.row));

        merge(&mut interface.description, &row.description);
        merge_unless_default(&mut interface.mtu, &row.mtu, is_default_mtu);
        merge_unless_default(&mut interface.speed, &row.speed, is_auto);
        merge_unless_default(&mut interface.duplex, &row.duplex, is_auto);
        merge(&mut interface.vrf, &row.vrf);
        merge(&mut interface.data_vlan, &row.data_vlan);
        merge(&mut interface.voice_vlan, &row.voice_vlan);
        merge(&mut interface.native_vlan, &row.native_vlan);
        merge(&mut interface.variable1, &row.variable1);
        merge(&mut interface.variable2, &row.variable2);
        if let Some(enabled) = parse_enabled(&row.enabled) {
            interface.enabled = Some(enabled);
        }
        if let Some(address) = non_blank(&row.ip_address) {
            interface.address = Some(InterfaceAddress::new(address));
        }
        if let Some(spec) = non_blank(&row.trunk_vlans) {
            let trunk = TrunkVlans::new(&spec);
            for token in &trunk.expansion.malformed {
                log.push(
                    ErrorEntry::new(Sheet::Interfaces, "Invalid VLAN in trunk list", token.as_str())
                        .device(device.as_str())
                        .row(record.row)
                        .action(ErrorAction::WarningGenerated),
                );
            }
            interface.trunk = Some(trunk);
        }

        debug!(%device, interface = %name, "interface updated");
    }
}

/// Stamps port-channel parents and members onto the interface map,
/// creating any interface the interfaces sheet did not declare.
pub fn build_port_channels(records: &[Record], model: &mut NetworkModel, log: &mut ErrorLog) {
    let rows: Vec<(usize, String, PortChannelRow)> = records
        .iter()
        .filter_map(|record| {
            let row = decode::<PortChannelRow>(Sheet::PortChannels, record, log)?;
            let device =
                claim_device(Sheet::PortChannels, &row.device, record.row, model, log)?;
            Some((record.row, device, row))
        })
        .collect();

    let parents: BTreeSet<(String, String)> = rows
        .iter()
        .map(|(_, device, row)| (device.clone(), normalize_name(&row.interface)))
        .collect();
    let mut seen = BTreeSet::new();

    for (row_number, device, row) in rows {
        let parent = normalize_name(&row.interface);
        if !seen.insert((device.clone(), parent.clone())) {
            log.push(
                ErrorEntry::new(Sheet::PortChannels, "Port-channel already defined", parent)
                    .device(device)
                    .row(row_number),
            );
            continue;
        }
        let Some(layer) = Layer::parse(&row.layer) else {
            log.push(
                ErrorEntry::new(Sheet::PortChannels, "Invalid port-channel type", row.layer)
                    .device(device)
                    .row(row_number),
            );
            continue;
        };
        let group = row.group.trim().to_string();
        let mode = row.mode.trim().to_string();

        let interfaces = &mut model.device_mut(&device).interfaces;
        let mut accepted = Vec::new();

        for token in row.members.split(',').map(str::trim) {
            if token.is_empty() {
                log.push(
                    ErrorEntry::new(Sheet::PortChannels, "Empty port-channel member", row.members.as_str())
                        .device(device.as_str())
                        .row(row_number),
                );
                continue;
            }
            let member = normalize_name(token);
            if member == parent || parents.contains(&(device.clone(), member.clone())) {
                log.push(
                    ErrorEntry::new(Sheet::PortChannels, "Member is a port-channel itself", member)
                        .device(device.as_str())
                        .row(row_number),
                );
                continue;
            }
            let owner = interfaces
                .get(&member)
                .and_then(|existing| existing.channel.as_ref())
                .map(|channel| channel.parent.clone());
            if owner.as_ref().is_some_and(|owner| *owner != parent) {
                log.push(
                    ErrorEntry::new(
                        Sheet::PortChannels,
                        "Member already belongs to another port-channel",
                        member,
                    )
                    .device(device.as_str())
                    .row(row_number),
                );
                continue;
            }

            let interface = interfaces
                .entry(member.clone())
                .or_insert_with(|| Interface::new(member.as_str(), row_number));
            interface.channel = Some(ChannelMembership {
                group: group.clone(),
                mode: mode.clone(),
                parent: parent.clone(),
            });
            interface.layer = Some(layer);
            if interface.enabled.is_none() {
                interface.enabled = Some(true);
            }
            if !accepted.contains(&member) {
                accepted.push(member);
            }
        }

        let interface = interfaces
            .entry(parent.clone())
            .or_insert_with(|| Interface::new(parent.as_str(), row_number));
        if interface.layer.is_none() {
            interface.layer = Some(layer);
        }
        if interface.enabled.is_none() {
            interface.enabled = parse_enabled(&row.enabled);
        }
        if let Some(description) = non_blank(&row.description) {
            if interface.description.is_none() {
                interface.description = Some(description);
            } else if interface.description.as_deref() != Some(description.as_str()) {
                log.push(
                    ErrorEntry::new(
                        Sheet::PortChannels,
                        "Port-channel description conflicts with interfaces sheet",
                        description,
                    )
                    .device(device.as_str())
                    .row(row_number)
                    .action(ErrorAction::WarningGenerated),
                );
            }
        }
        for member in accepted {
            if !interface.members.contains(&member) {
                interface.members.push(member);
            }
        }

        debug!(%device, port_channel = %parent, members = interface.members.len(), "port-channel built");
    }
}
