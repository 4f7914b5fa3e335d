use std::fmt;

use ipnet::Ipv4Net;

use crate::netbuild::tools::net::{self, VlanExpansion};

/// Name fragments that mark aggregate, tunnel, loopback and SVI interfaces.
pub const LOGICAL_MARKERS: [&str; 4] = ["Po", "Tu", "Lo", "Vl"];

/// Whether an interface is a physical port or a logical construct. Decided
/// from the name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Makeup {
    Physical,
    Logical,
}

impl Makeup {
    pub fn of(interface: &str) -> Makeup {
        if LOGICAL_MARKERS.iter().any(|marker| interface.contains(marker)) {
            Makeup::Logical
        } else {
            Makeup::Physical
        }
    }
}

impl fmt::Display for Makeup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Makeup::Physical => "Physical",
            Makeup::Logical => "Logical",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Layer2,
    Layer3,
}

impl Layer {
    /// Accepts `layer2`/`layer3` in any case, spaces ignored.
    pub fn parse(text: &str) -> Option<Layer> {
        let compact: String = text
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "layer2" | "l2" => Some(Layer::Layer2),
            "layer3" | "l3" => Some(Layer::Layer3),
            _ => None,
        }
    }
}

/// Upper-cases the first character of an interface name so that `gi1/0/1`
/// and `Gi1/0/1` address the same port.
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// An interface address as typed, plus its parsed form when it is valid CIDR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub raw: String,
    pub parsed: Option<Ipv4Net>,
}

impl InterfaceAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = net::parse_cidr(&raw);
        Self { raw, parsed }
    }

    /// The address when it is a usable host of its own subnet.
    pub fn host(&self) -> Option<&Ipv4Net> {
        self.parsed.as_ref().filter(|net| net::is_usable_host(net))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrunkVlans {
    /// Allowed list as rendered, tokens trimmed and comma joined.
    pub spec: String,
    pub expansion: VlanExpansion,
}

impl TrunkVlans {
    pub fn new(raw: &str) -> Self {
        Self {
            spec: net::split_list(raw).join(","),
            expansion: net::expand_vlan_list(raw),
        }
    }
}

/// Port-channel membership stamped onto a member interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMembership {
    pub group: String,
    pub mode: String,
    pub parent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    /// Row that first introduced the interface.
    pub row: usize,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub mtu: Option<String>,
    pub speed: Option<String>,
    pub duplex: Option<String>,
    pub vrf: Option<String>,
    pub address: Option<InterfaceAddress>,
    pub data_vlan: Option<String>,
    pub voice_vlan: Option<String>,
    pub native_vlan: Option<String>,
    pub trunk: Option<TrunkVlans>,
    pub variable1: Option<String>,
    pub variable2: Option<String>,
    /// Port-channel layer, when the interface takes part in one.
    pub layer: Option<Layer>,
    pub channel: Option<ChannelMembership>,
    pub members: Vec<String>,
}

impl Interface {
    pub fn new(name: impl Into<String>, row: usize) -> Self {
        Self {
            name: name.into(),
            row,
            description: None,
            enabled: None,
            mtu: None,
            speed: None,
            duplex: None,
            vrf: None,
            address: None,
            data_vlan: None,
            voice_vlan: None,
            native_vlan: None,
            trunk: None,
            variable1: None,
            variable2: None,
            layer: None,
            channel: None,
            members: Vec::new(),
        }
    }

    pub fn makeup(&self) -> Makeup {
        Makeup::of(&self.name)
    }

    pub fn is_parent(&self) -> bool {
        !self.members.is_empty()
    }

    pub fn is_member(&self) -> bool {
        self.channel.is_some()
    }

    pub fn is_switch_port(&self) -> bool {
        self.data_vlan.is_some()
            || self.voice_vlan.is_some()
            || self.trunk.is_some()
            || self.layer == Some(Layer::Layer2)
    }

    /// Layer 3 port-channels are routed, and so is a physical port whose
    /// address yields a usable host. An address that will not render does
    /// not make the port routed.
    pub fn is_routed_port(&self) -> bool {
        if self.layer == Some(Layer::Layer3) {
            return true;
        }
        self.makeup() == Makeup::Physical
            && self
                .address
                .as_ref()
                .and_then(InterfaceAddress::host)
                .is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled == Some(true)
    }
}

/// Reads the "enabled" column. Blank means not specified.
pub fn parse_enabled(text: &str) -> Option<bool> {
    let value = text.trim().to_ascii_lowercase();
    if value.is_empty() {
        None
    } else {
        Some(value.contains("yes") || value == "no shutdown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn makeup_is_decided_by_name() {
        assert_eq!(Makeup::of("Port-channel1"), Makeup::Logical);
        assert_eq!(Makeup::of("Vlan10"), Makeup::Logical);
        assert_eq!(Makeup::of("Loopback0"), Makeup::Logical);
        assert_eq!(Makeup::of("Tunnel5"), Makeup::Logical);
        assert_eq!(Makeup::of("GigabitEthernet1/0/1"), Makeup::Physical);
        assert_eq!(Makeup::of("Gi1/0/1"), Makeup::Physical);
    }

    #[test]
    fn names_get_a_capital_first_letter() {
        assert_eq!(normalize_name("gi1/0/1"), "Gi1/0/1");
        assert_eq!(normalize_name(" port-channel1 "), "Port-channel1");
        assert_eq!(normalize_name("TenGigabitEthernet1/1"), "TenGigabitEthernet1/1");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn enabled_column_is_truthy_only_for_yes() {
        assert_eq!(parse_enabled("Yes"), Some(true));
        assert_eq!(parse_enabled("no shutdown"), Some(true));
        assert_eq!(parse_enabled("no"), Some(false));
        assert_eq!(parse_enabled(""), None);
    }

    #[test]
    fn svi_with_address_is_not_a_routed_port() {
        let mut svi = Interface::new("Vlan10", 2);
        svi.address = Some(InterfaceAddress::new("10.0.10.1/24"));
        assert!(!svi.is_routed_port());

        let mut port = Interface::new("Gi1/0/1", 3);
        port.address = Some(InterfaceAddress::new("10.0.20.1/30"));
        assert!(port.is_routed_port());
        assert!(!port.is_switch_port());
    }

    #[test]
    fn unusable_address_does_not_make_a_routed_port() {
        let mut port = Interface::new("Gi1/0/2", 2);
        port.address = Some(InterfaceAddress::new("10.0.20.0/30"));
        assert!(!port.is_routed_port());

        port.address = Some(InterfaceAddress::new("10.0.20/30"));
        assert!(!port.is_routed_port());
    }
}
