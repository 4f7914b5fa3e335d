//! Address and VLAN list parsing.

use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnet::Ipv4Net;

pub const MIN_VLAN: u16 = 1;
pub const MAX_VLAN: u16 = 4094;

/// Parses `a.b.c.d/n`. Surrounding whitespace is ignored.
pub fn parse_cidr(text: &str) -> Option<Ipv4Net> {
    Ipv4Net::from_str(text.trim()).ok()
}

/// True when the address part of `net` is a usable host of its own subnet.
/// Point-to-point (/31) and host (/32) prefixes have no reserved addresses.
pub fn is_usable_host(net: &Ipv4Net) -> bool {
    if net.prefix_len() >= 31 {
        return true;
    }
    let addr = net.addr();
    addr != net.network() && addr != net.broadcast()
}

/// Network address and dotted-decimal mask of a CIDR.
pub fn network_and_mask(net: &Ipv4Net) -> (Ipv4Addr, Ipv4Addr) {
    (net.network(), net.netmask())
}

pub fn parse_vlan_id(text: &str) -> Option<u16> {
    text.trim()
        .parse::<u16>()
        .ok()
        .filter(|id| (MIN_VLAN..=MAX_VLAN).contains(id))
}

/// Result of expanding a trunk allowed-VLAN specification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VlanExpansion {
    /// Every VLAN named, ranges expanded in ascending order.
    pub members: Vec<u16>,
    /// Tokens that were neither a VLAN id nor a valid ascending range.
    pub malformed: Vec<String>,
}

/// Expands `10,12-14` into `[10, 12, 13, 14]`.
pub fn expand_vlan_list(spec: &str) -> VlanExpansion {
    let mut expansion = VlanExpansion::default();

    for token in split_list(spec) {
        let compact: String = token.chars().filter(|ch| !ch.is_whitespace()).collect();
        match compact.split_once('-') {
            Some((start, end)) => match (parse_vlan_id(start), parse_vlan_id(end)) {
                (Some(start), Some(end)) if start <= end => {
                    expansion.members.extend(start..=end);
                }
                _ => expansion.malformed.push(compact),
            },
            None => match parse_vlan_id(&compact) {
                Some(id) => expansion.members.push(id),
                None => expansion.malformed.push(compact),
            },
        }
    }

    expansion
}

/// Splits a comma separated cell into trimmed, non-empty tokens.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
