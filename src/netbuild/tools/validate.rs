//! Cross-reference checks over the built model.
//!
//! Validation is advisory. Every finding lands in the [`ErrorLog`] and the
//! model is left untouched; the renderer decides what a finding means for
//! the output (dangling VLAN and VRF references are still emitted, invalid
//! addresses are dropped).

use std::collections::BTreeSet;

use tracing::{info, instrument};

use crate::netbuild::tools::diagnostics::{ErrorAction, ErrorEntry, ErrorLog};
use crate::netbuild::tools::ingest::Sheet;
use crate::netbuild::tools::model::{Device, Interface, Library, NetworkModel};

/// Runs a full pass over every device. Never stops early.
#[instrument(level = "info", skip_all)]
pub fn validate(model: &NetworkModel, log: &mut ErrorLog) {
    let before = log.len();

    for device in model.devices.values() {
        for interface in device.interfaces.values() {
            validate_interface(device, interface, &model.library, log);
        }
        validate_vrfs(device, &model.library, log);
        validate_routes(device, log);
        validate_prefix_lists(device, log);
        validate_profiles(device, &model.library, log);
    }

    info!(finding_count = log.len() - before, "cross-references validated");
}

fn validate_interface(device: &Device, interface: &Interface, library: &Library, log: &mut ErrorLog) {
    let report = |message: &str, value: &str, action: ErrorAction| {
        ErrorEntry::new(Sheet::Interfaces, message, value)
            .device(device.name.as_str())
            .row(interface.row)
            .action(action)
    };

    let vlan_refs = [
        ("Data VLAN does not exist", &interface.data_vlan),
        ("Voice VLAN does not exist", &interface.voice_vlan),
        ("Native VLAN does not exist", &interface.native_vlan),
    ];
    for (message, reference) in vlan_refs {
        if let Some(vlan) = reference {
            if !device.has_vlan(vlan) {
                log.push(report(message, vlan, ErrorAction::WarningGenerated));
            }
        }
    }

    if let Some(vrf) = &interface.vrf {
        if !device.has_vrf(vrf) {
            log.push(report("VRF does not exist", vrf, ErrorAction::WarningGenerated));
        }
    }

    if let Some(address) = &interface.address {
        if address.parsed.is_none() {
            log.push(report("Invalid IP syntax", &address.raw, ErrorAction::NotUsed));
        } else if address.host().is_none() {
            log.push(report("Host/subnet mismatch", &address.raw, ErrorAction::NotUsed));
        }
    }

    if let Some(trunk) = &interface.trunk {
        let missing: BTreeSet<u16> = trunk
            .expansion
            .members
            .iter()
            .copied()
            .filter(|id| !device.vlans.contains_key(id))
            .collect();
        if !missing.is_empty() {
            let listed: Vec<String> = missing.iter().map(u16::to_string).collect();
            log.push(report(
                "Trunk allowed VLANs do not exist",
                &listed.join(","),
                ErrorAction::WarningGenerated,
            ));
        }
        if interface.data_vlan.is_some() || interface.voice_vlan.is_some() {
            log.push(report(
                "Trunk port also has an access or voice VLAN",
                &interface.name,
                ErrorAction::WarningGenerated,
            ));
        }
    }

    if interface.is_routed_port() && interface.is_switch_port() {
        log.push(report(
            "Interface is both a routed port and a switch port",
            &interface.name,
            ErrorAction::WarningGenerated,
        ));
    }

    for variable in [&interface.variable1, &interface.variable2].into_iter().flatten() {
        if !library.contains(variable) {
            log.push(report("Variable does not exist", variable, ErrorAction::NotUsed));
        }
    }
}

fn validate_vrfs(device: &Device, library: &Library, log: &mut ErrorLog) {
    for vrf in device.vrfs.values() {
        if !vrf.is_configurable() {
            log.push(
                ErrorEntry::new(Sheet::Vrf, "VRF has no RD defined", vrf.name.as_str())
                    .device(device.name.as_str())
                    .row(vrf.row),
            );
            continue;
        }
        if let Some(variable) = &vrf.variable {
            if !library.contains(variable) {
                log.push(
                    ErrorEntry::new(Sheet::Vrf, "Variable does not exist", variable.as_str())
                        .device(device.name.as_str())
                        .row(vrf.row),
                );
            }
        }
    }
}

fn validate_routes(device: &Device, log: &mut ErrorLog) {
    for route in device.routes.values() {
        if route.network.is_none() {
            log.push(
                ErrorEntry::new(
                    Sheet::StaticRoutes,
                    "Invalid route destination",
                    route.destination.as_str(),
                )
                .device(device.name.as_str())
                .row(route.row),
            );
            continue;
        }
        if let Some(vrf) = &route.vrf {
            if !device.has_vrf(vrf) {
                log.push(
                    ErrorEntry::new(Sheet::StaticRoutes, "VRF does not exist", vrf.as_str())
                        .device(device.name.as_str())
                        .row(route.row)
                        .action(ErrorAction::WarningGenerated),
                );
            }
        }
    }
}

fn validate_prefix_lists(device: &Device, log: &mut ErrorLog) {
    for list in device.prefix_lists.values() {
        for entry in list.entries.values().filter(|entry| !entry.is_valid()) {
            log.push(
                ErrorEntry::new(
                    Sheet::PrefixList,
                    "Prefix-list entry incomplete",
                    format!("{} seq {}", list.name, entry.sequence),
                )
                .device(device.name.as_str())
                .row(entry.row),
            );
        }
    }
}

fn validate_profiles(device: &Device, library: &Library, log: &mut ErrorLog) {
    for profile in &device.profiles {
        if !library.contains(&profile.reference) {
            log.push(
                ErrorEntry::new(
                    Sheet::Profiles,
                    "Template or variable does not exist",
                    profile.reference.as_str(),
                )
                .device(device.name.as_str())
                .row(profile.row),
            );
        }
    }
}
