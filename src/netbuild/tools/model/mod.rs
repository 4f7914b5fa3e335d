//! In-memory network model shared by the builders, the validator, and the
//! renderer. One [`NetworkModel`] exists per run and is passed explicitly to
//! each stage.

pub mod interface;

use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

pub use interface::{
    ChannelMembership, Interface, InterfaceAddress, Layer, Makeup, TrunkVlans,
};

use crate::netbuild::tools::net;

/// Name given to VLANs declared without one.
pub const AUTO_VLAN_NAME: &str = "auto-created";

/// Everything the generator knows after building.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkModel {
    /// Devices keyed by trimmed name.
    pub devices: BTreeMap<String, Device>,
    /// Global variables and config templates.
    pub library: Library,
}

impl NetworkModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the device, creating it on first reference.
    pub fn device_mut(&mut self, name: &str) -> &mut Device {
        self.devices
            .entry(name.to_string())
            .or_insert_with(|| Device::new(name))
    }

    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.get(name)
    }
}

/// A switch or router that receives one configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub name: String,
    pub interfaces: BTreeMap<String, Interface>,
    pub vlans: BTreeMap<u16, Vlan>,
    pub vrfs: BTreeMap<String, Vrf>,
    /// Static routes keyed by destination as typed in the workbook.
    pub routes: BTreeMap<String, StaticRoute>,
    pub prefix_lists: BTreeMap<String, PrefixList>,
    /// Profile references in workbook order.
    pub profiles: Vec<ProfileRef>,
}

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interfaces: BTreeMap::new(),
            vlans: BTreeMap::new(),
            vrfs: BTreeMap::new(),
            routes: BTreeMap::new(),
            prefix_lists: BTreeMap::new(),
            profiles: Vec::new(),
        }
    }

    /// Checks a VLAN reference as typed in an interface column.
    pub fn has_vlan(&self, reference: &str) -> bool {
        net::parse_vlan_id(reference).is_some_and(|id| self.vlans.contains_key(&id))
    }

    pub fn has_vrf(&self, name: &str) -> bool {
        self.vrfs.contains_key(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vlan {
    pub name: String,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vrf {
    pub name: String,
    pub row: usize,
    pub rd: Option<String>,
    pub import_targets: Vec<String>,
    pub export_targets: Vec<String>,
    /// Variable or template appended to the VRF block.
    pub variable: Option<String>,
}

impl Vrf {
    /// A VRF without a route distinguisher cannot be configured.
    pub fn is_configurable(&self) -> bool {
        self.rd.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoute {
    /// Destination as typed, also the map key.
    pub destination: String,
    pub row: usize,
    /// Parsed destination; `None` when the text is not a valid CIDR.
    pub network: Option<Ipv4Net>,
    pub vrf: Option<String>,
    pub next_hop: String,
    pub name: Option<String>,
}

impl StaticRoute {
    pub fn network_and_mask(&self) -> Option<(Ipv4Addr, Ipv4Addr)> {
        self.network.as_ref().map(net::network_and_mask)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixAction {
    Permit,
    Deny,
}

impl PrefixAction {
    pub fn parse(text: &str) -> Option<PrefixAction> {
        match text.trim().to_ascii_lowercase().as_str() {
            "permit" => Some(PrefixAction::Permit),
            "deny" => Some(PrefixAction::Deny),
            _ => None,
        }
    }
}

impl fmt::Display for PrefixAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrefixAction::Permit => "permit",
            PrefixAction::Deny => "deny",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixList {
    pub name: String,
    pub entries: BTreeMap<u32, PrefixEntry>,
}

impl PrefixList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixEntry {
    pub sequence: u32,
    pub row: usize,
    pub action: Option<PrefixAction>,
    pub entry: Option<String>,
}

impl PrefixEntry {
    /// Entries missing an action or a match are not rendered.
    pub fn is_valid(&self) -> bool {
        self.action.is_some() && self.entry.is_some()
    }
}

/// Which global pass a profile is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Start,
    End,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Position::Start => "Start",
            Position::End => "End",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRef {
    pub reference: String,
    pub position: Position,
    pub row: usize,
}

/// Global variables and config templates, shared by every device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub variables: BTreeMap<String, String>,
    pub templates: BTreeMap<String, Vec<String>>,
}

/// Text a reference resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snippet<'a> {
    Template(&'a [String]),
    Variable(&'a str),
}

impl Library {
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Resolves a reference, preferring templates over variables.
    pub fn resolve(&self, name: &str) -> Option<Snippet<'_>> {
        if let Some(lines) = self.templates.get(name) {
            return Some(Snippet::Template(lines));
        }
        self.variable(name).map(Snippet::Variable)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

impl Snippet<'_> {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Snippet::Template(lines) => lines.iter().map(String::as_str).collect(),
            Snippet::Variable(value) => vec![*value],
        }
    }
}
