use netbuild_tools::diagnostics::ErrorAction;
use netbuild_tools::ingest::{Sheet, SheetTable};
use netbuild_tools::pipeline::{Generated, generate};
use pretty_assertions::assert_eq;

fn vlans(rows: &[[&str; 3]]) -> SheetTable {
    rows.iter().fold(
        SheetTable::new("vlans", &["Device Name", "VLAN No", "VLAN Name"]),
        |table, row| table.with_row(*row),
    )
}

fn interfaces(rows: &[[&str; 5]]) -> SheetTable {
    rows.iter().fold(
        SheetTable::new(
            "interfaces",
            &[
                "Device Name",
                "Interface",
                "Interface Enabled (yes/no)",
                "IP Address (x.x.x.x/x)",
                "Data VLAN",
            ],
        ),
        |table, row| table.with_row(*row),
    )
}

fn routes(rows: &[[&str; 3]]) -> SheetTable {
    rows.iter().fold(
        SheetTable::new(
            "static routes",
            &["Device Name", "Route (x.x.x.x/x)", "Next Hop"],
        ),
        |table, row| table.with_row(*row),
    )
}

fn messages(generated: &Generated) -> Vec<&str> {
    generated
        .errors
        .entries()
        .iter()
        .map(|entry| entry.message.as_str())
        .collect()
}

#[test]
fn access_port_on_existing_vlan_is_clean() {
    let generated = generate(&[
        vlans(&[["SW1", "10", "data"]]),
        interfaces(&[["SW1", "Gi1/0/1", "", "", "10"]]),
    ]);

    let config = &generated.configs["SW1"];
    assert!(config.contains("interface Gi1/0/1\n  switchport\n"));
    assert!(config.contains("  switchport access vlan 10\n"));
    assert!(generated.errors.is_empty());
}

#[test]
fn routed_switch_port_logs_one_interfaces_error_and_renders_both_halves() {
    let generated = generate(&[
        vlans(&[["SW1", "10", "data"]]),
        interfaces(&[["SW1", "Gi1/0/1", "yes", "10.0.0.1/24", "10"]]),
    ]);

    assert_eq!(generated.errors.len(), 1);
    assert_eq!(generated.errors.entries()[0].location, Sheet::Interfaces);
    let config = &generated.configs["SW1"];
    assert!(config.contains("interface Gi1/0/1\n  switchport\n  no switchport\n"));
    assert!(config.contains("  ip address 10.0.0.1 255.255.255.0\n"));
    assert!(config.contains("  switchport access vlan 10\n"));
    assert!(generated.error_report.contains("Worksheet: [interfaces]"));
}

#[test]
fn static_route_renders_network_and_mask() {
    let generated = generate(&[routes(&[["R1", "10.0.0.0/24", "10.0.0.1"]])]);

    assert!(
        generated.configs["R1"].contains("\nip route 10.0.0.0 255.255.255.0 10.0.0.1\n")
    );
    assert!(generated.errors.is_empty());
}

#[test]
fn route_destination_uses_the_network_address() {
    let generated = generate(&[routes(&[["R1", "192.168.7.77/20", "192.168.0.1"]])]);

    assert!(
        generated.configs["R1"].contains("ip route 192.168.0.0 255.255.240.0 192.168.0.1\n")
    );
}

#[test]
fn unparsable_route_yields_no_line_and_one_error() {
    let generated = generate(&[routes(&[["R1", "10.0.0/24", "10.0.0.1"]])]);

    assert!(!generated.configs["R1"].contains("ip route"));
    assert_eq!(messages(&generated), vec!["Invalid route destination"]);
}

#[test]
fn vrf_without_rd_is_cancelled_with_one_error() {
    let generated = generate(&[SheetTable::new(
        "vrf",
        &[
            "Device Name",
            "VRF",
            "RD",
            "Import RT (separated by commas)",
            "Export RT (separated by commas)",
            "Variable",
        ],
    )
    .with_row(["PE1", "CUST", "", "65000:1", "65000:2", "cust-extra"])]);

    let config = &generated.configs["PE1"];
    assert!(config.contains("ip vrf CUST\n  !- config cancelled, no RD defined\n!\n"));
    assert!(!config.contains("route-target"));
    assert_eq!(generated.errors.len(), 1);
    assert_eq!(generated.errors.entries()[0].location, Sheet::Vrf);
}

#[test]
fn duplicate_vlan_keeps_first_name() {
    let generated = generate(&[vlans(&[["SW1", "10", "data"], ["SW1", "10", "voice"]])]);

    assert!(generated.configs["SW1"].contains("vlan 10\n  name data\n!\n"));
    assert!(!generated.configs["SW1"].contains("voice"));
    assert_eq!(messages(&generated), vec!["VLAN already exists"]);
}

#[test]
fn device_names_are_trimmed_into_one_device() {
    let generated = generate(&[
        vlans(&[[" SW1", "10", "data"]]),
        interfaces(&[["SW1 ", "gi1/0/1", "", "", "10"]]),
        routes(&[["SW1", "0.0.0.0/0", "10.0.0.1"]]),
    ]);

    assert_eq!(generated.configs.keys().collect::<Vec<_>>(), vec!["SW1"]);
    assert!(generated.configs["SW1"].contains("interface Gi1/0/1\n"));
    let corrections: Vec<_> = generated
        .errors
        .entries()
        .iter()
        .map(|entry| (entry.message.as_str(), entry.action))
        .collect();
    assert_eq!(
        corrections,
        vec![
            ("Empty character in name", ErrorAction::AutoCorrected),
            ("Empty character in name", ErrorAction::AutoCorrected),
        ]
    );
}

#[test]
fn device_with_only_unusable_rows_still_gets_a_config() {
    let generated = generate(&[vlans(&[["SW9", "abc", "users"]])]);

    let config = &generated.configs["SW9"];
    assert!(config.starts_with(
        "****************************************\n! Device configuration for SW9\n"
    ));
    assert!(!config.contains("vlan "));
    assert_eq!(messages(&generated), vec!["Invalid VLAN number"]);
}

#[test]
fn blank_and_commented_device_names_are_ignored() {
    let generated = generate(&[vlans(&[
        ["   ", "10", "users"],
        ["!SW2", "20", "voice"],
        ["SW1", "30", "guest"],
    ])]);

    assert_eq!(generated.configs.keys().collect::<Vec<_>>(), vec!["SW1"]);
    assert_eq!(
        generated.ignored_report,
        "[vlans]-row:2 has empty cell value for column: Device Name  (IGNORED)\n\
         [vlans]-row:3 column: Device Name is commented out  (IGNORED)\n"
    );
    assert!(generated.errors.is_empty());
}

fn full_workbook() -> Vec<SheetTable> {
    vec![
        SheetTable::new("Instructions", &["Read me"]).with_row(["Device Name is required"]),
        SheetTable::new("variables", &["Variable", "Variable Value"])
            .with_row(["ntp", "ntp server 10.0.0.1"]),
        SheetTable::new("config-templates", &["Enter config templates below this line:"])
            .with_row(["Config Template: [base]"])
            .with_row(["service timestamps debug datetime msec"])
            .with_row(["[ntp]"]),
        SheetTable::new("profiles", &["Device Name", "Template or Variable"])
            .with_row(["SW1", "base"]),
        vlans(&[["SW1", "10", "users"]]),
        SheetTable::new(
            "interfaces",
            &[
                "Device Name",
                "Interface",
                "Description",
                "Interface Enabled (yes/no)",
                "Data VLAN",
            ],
        )
        .with_row(["SW1", "Gi1/0/1", "desk", "yes", "10"]),
    ]
}

#[test]
fn full_device_renders_in_section_order() {
    let generated = generate(&full_workbook());

    let expected = "\
****************************************
! Device configuration for SW1
****************************************
!
!----------------------------------------
! Global configuration (Start)
!----------------------------------------
! [base]:
service timestamps debug datetime msec
ntp server 10.0.0.1
!
!----------------------------------------
! VLAN configuration
!----------------------------------------
vlan 10
  name users
!
!----------------------------------------
! Interface configuration (Physical)
!----------------------------------------
interface Gi1/0/1
  switchport
  description desk
  switchport access vlan 10
  no shutdown
!
";
    assert_eq!(generated.configs["SW1"], expected);
    assert_eq!(
        generated.error_report,
        "No errors detected during configuration build.\n"
    );
    assert!(generated.ignored.is_empty());
}

#[test]
fn repeated_runs_are_byte_identical() {
    let first = generate(&full_workbook());
    let second = generate(&full_workbook());

    assert_eq!(first, second);
}
