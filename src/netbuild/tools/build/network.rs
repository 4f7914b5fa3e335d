//! VLANs, VRFs, static routes, and prefix-lists.

use tracing::debug;

use super::{claim_device, decode, non_blank};
use crate::netbuild::tools::diagnostics::{ErrorAction, ErrorEntry, ErrorLog};
use crate::netbuild::tools::ingest::rows::{PrefixListRow, StaticRouteRow, VlanRow, VrfRow};
use crate::netbuild::tools::ingest::{Record, Sheet};
use crate::netbuild::tools::model::{
    AUTO_VLAN_NAME, NetworkModel, PrefixAction, PrefixEntry, PrefixList, StaticRoute, Vlan, Vrf,
};
use crate::netbuild::tools::net;

pub fn build_vlans(records: &[Record], model: &mut NetworkModel, log: &mut ErrorLog) {
    for record in records {
        let Some(row) = decode::<VlanRow>(Sheet::Vlans, record, log) else {
            continue;
        };
        let Some(device) = claim_device(Sheet::Vlans, &row.device, record.row, model, log) else {
            continue;
        };
        let Some(id) = net::parse_vlan_id(&row.number) else {
            log.push(
                ErrorEntry::new(Sheet::Vlans, "Invalid VLAN number", row.number)
                    .device(device)
                    .row(record.row),
            );
            continue;
        };

        let vlans = &mut model.device_mut(&device).vlans;
        if vlans.contains_key(&id) {
            log.push(
                ErrorEntry::new(Sheet::Vlans, "VLAN already exists", id.to_string())
                    .device(device)
                    .row(record.row),
            );
            continue;
        }

        let name = match non_blank(&row.name) {
            Some(name) => name,
            None => {
                log.push(
                    ErrorEntry::new(Sheet::Vlans, "VLAN name is not defined", id.to_string())
                        .device(device.as_str())
                        .row(record.row)
                        .action(ErrorAction::AutoCreated),
                );
                AUTO_VLAN_NAME.to_string()
            }
        };
        debug!(%device, vlan = id, "vlan added");
        vlans.insert(
            id,
            Vlan {
                name,
                row: record.row,
            },
        );
    }
}

pub fn build_vrfs(records: &[Record], model: &mut NetworkModel, log: &mut ErrorLog) {
    for record in records {
        let Some(row) = decode::<VrfRow>(Sheet::Vrf, record, log) else {
            continue;
        };
        let Some(device) = claim_device(Sheet::Vrf, &row.device, record.row, model, log) else {
            continue;
        };
        let name = row.name.trim().to_string();

        let vrfs = &mut model.device_mut(&device).vrfs;
        if vrfs.contains_key(&name) {
            log.push(
                ErrorEntry::new(Sheet::Vrf, "VRF already exists", name)
                    .device(device)
                    .row(record.row),
            );
            continue;
        }

        debug!(%device, vrf = %name, "vrf added");
        vrfs.insert(
            name.clone(),
            Vrf {
                name,
                row: record.row,
                rd: non_blank(&row.rd),
                import_targets: net::split_list(&row.import_targets),
                export_targets: net::split_list(&row.export_targets),
                variable: non_blank(&row.variable),
            },
        );
    }
}

pub fn build_static_routes(records: &[Record], model: &mut NetworkModel, log: &mut ErrorLog) {
    for record in records {
        let Some(row) = decode::<StaticRouteRow>(Sheet::StaticRoutes, record, log) else {
            continue;
        };
        let Some(device) =
            claim_device(Sheet::StaticRoutes, &row.device, record.row, model, log)
        else {
            continue;
        };
        let destination = row.destination.trim().to_string();

        if model
            .device(&device)
            .is_some_and(|existing| existing.routes.contains_key(&destination))
        {
            log.push(
                ErrorEntry::new(Sheet::StaticRoutes, "Route already exists", destination)
                    .device(device)
                    .row(record.row),
            );
            continue;
        }

        let name = non_blank(&row.name).map(|name| {
            if name.chars().any(char::is_whitespace) {
                log.push(
                    ErrorEntry::new(Sheet::StaticRoutes, "Space found in route name", name.as_str())
                        .device(device.as_str())
                        .row(record.row)
                        .action(ErrorAction::AutoCorrected),
                );
                name.chars().filter(|ch| !ch.is_whitespace()).collect()
            } else {
                name
            }
        });

        debug!(%device, route = %destination, "static route added");
        model.device_mut(&device).routes.insert(
            destination.clone(),
            StaticRoute {
                network: net::parse_cidr(&destination),
                destination,
                row: record.row,
                vrf: non_blank(&row.vrf),
                next_hop: row.next_hop.trim().to_string(),
                name,
            },
        );
    }
}

pub fn build_prefix_lists(records: &[Record], model: &mut NetworkModel, log: &mut ErrorLog) {
    for record in records {
        let Some(row) = decode::<PrefixListRow>(Sheet::PrefixList, record, log) else {
            continue;
        };
        let Some(device) =
            claim_device(Sheet::PrefixList, &row.device, record.row, model, log)
        else {
            continue;
        };
        let name = row.name.trim().to_string();
        let Ok(sequence) = row.sequence.trim().parse::<u32>() else {
            log.push(
                ErrorEntry::new(Sheet::PrefixList, "Invalid prefix-list sequence", row.sequence)
                    .device(device)
                    .row(record.row),
            );
            continue;
        };

        let action = match non_blank(&row.action) {
            None => None,
            Some(text) => {
                let parsed = PrefixAction::parse(&text);
                if parsed.is_none() {
                    log.push(
                        ErrorEntry::new(Sheet::PrefixList, "Invalid prefix-list action", text)
                            .device(device.as_str())
                            .row(record.row),
                    );
                }
                parsed
            }
        };

        let list = model
            .device_mut(&device)
            .prefix_lists
            .entry(name.clone())
            .or_insert_with(|| PrefixList::new(name.as_str()));
        if list.entries.contains_key(&sequence) {
            log.push(
                ErrorEntry::new(
                    Sheet::PrefixList,
                    "Duplicate prefix-list sequence",
                    format!("{name} seq {sequence}"),
                )
                .device(device)
                .row(record.row),
            );
            continue;
        }

        debug!(%device, prefix_list = %name, sequence, "prefix-list entry added");
        list.entries.insert(
            sequence,
            PrefixEntry {
                sequence,
                row: record.row,
                action,
                entry: non_blank(&row.entry),
            },
        );
    }
}
