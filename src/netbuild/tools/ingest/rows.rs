//! Typed rows, one per sheet.
//!
//! The serde attributes are the column mapping table: renaming a header in
//! the workbook only touches the attribute here, never the builders.

use serde::Deserialize;

/// Older workbook headers and the header they stand for, per sheet.
const LEGACY_COLUMNS: &[(&str, &str, &str)] = &[
    ("vrf", "Import RT  (separated by commas)", "Import RT (separated by commas)"),
    ("vrf", "Export RT  (separated by commas)", "Export RT (separated by commas)"),
    ("vrf", "Profile", "Variable"),
];

/// Maps a legacy header on `sheet` to its current name.
pub fn canonical_column<'a>(sheet: &str, header: &'a str) -> &'a str {
    LEGACY_COLUMNS
        .iter()
        .find(|(legacy_sheet, legacy, _)| *legacy_sheet == sheet && *legacy == header)
        .map_or(header, |(_, _, current)| current)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VariableRow {
    #[serde(rename = "Variable")]
    pub name: String,
    #[serde(rename = "Variable Value")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TemplateRow {
    #[serde(rename = "Enter config templates below this line:")]
    pub line: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileRow {
    #[serde(rename = "Device Name")]
    pub device: String,
    #[serde(rename = "Template or Variable")]
    pub reference: String,
    #[serde(rename = "Position (Default: Start)")]
    pub position: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VlanRow {
    #[serde(rename = "Device Name")]
    pub device: String,
    #[serde(rename = "VLAN No")]
    pub number: String,
    #[serde(rename = "VLAN Name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VrfRow {
    #[serde(rename = "Device Name")]
    pub device: String,
    #[serde(rename = "VRF")]
    pub name: String,
    #[serde(rename = "RD")]
    pub rd: String,
    #[serde(rename = "Import RT (separated by commas)")]
    pub import_targets: String,
    #[serde(rename = "Export RT (separated by commas)")]
    pub export_targets: String,
    #[serde(rename = "Variable")]
    pub variable: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterfaceRow {
    #[serde(rename = "Device Name")]
    pub device: String,
    #[serde(rename = "Interface")]
    pub interface: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Interface Enabled (yes/no)")]
    pub enabled: String,
    #[serde(rename = "MTU")]
    pub mtu: String,
    #[serde(rename = "Speed")]
    pub speed: String,
    #[serde(rename = "Duplex")]
    pub duplex: String,
    #[serde(rename = "VRF (leave blank if global)")]
    pub vrf: String,
    #[serde(rename = "IP Address (x.x.x.x/x)")]
    pub ip_address: String,
    #[serde(rename = "Data VLAN")]
    pub data_vlan: String,
    #[serde(rename = "Voice VLAN")]
    pub voice_vlan: String,
    #[serde(rename = "Trunk Allowed VLANs (separated by commas)")]
    pub trunk_vlans: String,
    #[serde(rename = "Trunk Native VLAN")]
    pub native_vlan: String,
    #[serde(rename = "Variable 1")]
    pub variable1: String,
    #[serde(rename = "Variable 2")]
    pub variable2: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StaticRouteRow {
    #[serde(rename = "Device Name")]
    pub device: String,
    #[serde(rename = "VRF (leave blank if global)")]
    pub vrf: String,
    #[serde(rename = "Route (x.x.x.x/x)")]
    pub destination: String,
    #[serde(rename = "Next Hop")]
    pub next_hop: String,
    #[serde(rename = "Route Name (no spaces)")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrefixListRow {
    #[serde(rename = "Device Name")]
    pub device: String,
    #[serde(rename = "Prefix-List Name")]
    pub name: String,
    #[serde(rename = "Prefix-List Sequence No")]
    pub sequence: String,
    #[serde(rename = "Prefix-List Action (permit/deny)")]
    pub action: String,
    #[serde(rename = "Prefix-List Entry")]
    pub entry: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PortChannelRow {
    #[serde(rename = "Device Name")]
    pub device: String,
    #[serde(rename = "Interface")]
    pub interface: String,
    #[serde(rename = "Interface Enabled (yes/no)")]
    pub enabled: String,
    #[serde(rename = "Port-Channel Group")]
    pub group: String,
    #[serde(rename = "Port-Channel Mode (active/on/etc)")]
    pub mode: String,
    #[serde(rename = "Port-Channel Type (layer2 or layer3)")]
    pub layer: String,
    #[serde(rename = "Port-Channel Members (separated by commas)")]
    pub members: String,
    #[serde(rename = "Description")]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbuild::tools::ingest::{CellValue, Record};

    #[test]
    fn legacy_route_target_headers_are_accepted() {
        let record = Record::new(
            "vrf",
            2,
            vec![
                ("Device Name".to_string(), CellValue::from("PE1")),
                ("VRF".to_string(), CellValue::from("CUST")),
                (
                    "Import RT  (separated by commas)".to_string(),
                    CellValue::from("65000:1"),
                ),
                ("Profile".to_string(), CellValue::from("vrf-extra")),
            ],
        );

        let row: VrfRow = record.decode().expect("row decoded");

        assert_eq!(row.import_targets, "65000:1");
        assert_eq!(row.variable, "vrf-extra");
        assert_eq!(row.rd, "");
    }

    #[test]
    fn first_of_two_columns_for_one_field_wins() {
        let record = Record::new(
            "vrf",
            2,
            vec![
                ("Device Name".to_string(), CellValue::from("PE1")),
                ("VRF".to_string(), CellValue::from("CUST")),
                ("Variable".to_string(), CellValue::from("vrf-current")),
                ("Profile".to_string(), CellValue::from("vrf-legacy")),
                (
                    "Export RT (separated by commas)".to_string(),
                    CellValue::from("65000:2"),
                ),
                (
                    "Export RT  (separated by commas)".to_string(),
                    CellValue::from("65000:9"),
                ),
            ],
        );

        let row: VrfRow = record.decode().expect("row decoded");

        assert_eq!(row.variable, "vrf-current");
        assert_eq!(row.export_targets, "65000:2");
    }

    #[test]
    fn legacy_headers_only_apply_to_their_sheet() {
        assert_eq!(canonical_column("vrf", "Profile"), "Variable");
        assert_eq!(canonical_column("profiles", "Profile"), "Profile");
        assert_eq!(canonical_column("vrf", "RD"), "RD");
    }

    #[test]
    fn numeric_cells_decode_as_text() {
        let record = Record::new(
            "vlans",
            2,
            vec![
                ("Device Name".to_string(), CellValue::from("SW1")),
                ("VLAN No".to_string(), CellValue::Integer(10)),
                ("Unrelated".to_string(), CellValue::Bool(true)),
            ],
        );

        let row: VlanRow = record.decode().expect("row decoded");

        assert_eq!(row.number, "10");
        assert_eq!(row.name, "");
    }
}
