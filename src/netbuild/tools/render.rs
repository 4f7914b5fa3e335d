//! Turns one device of the model into configuration text.
//!
//! Sections always appear in the same order and entities inside a section in
//! ascending key order, so the same model always renders to the same bytes.
//! The renderer reads the model and never changes it.

use crate::netbuild::tools::model::{
    Device, Interface, Layer, Library, Makeup, Position, PrefixList, StaticRoute, Vrf,
};

const BANNER_RULE: &str = "****************************************";
const SECTION_RULE: &str = "!----------------------------------------";
const INDENT: &str = "  ";

/// Accumulates output lines; every block is closed with a `!` line.
#[derive(Debug, Default)]
struct Config {
    lines: Vec<String>,
}

impl Config {
    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    fn sub(&mut self, text: impl AsRef<str>) {
        self.lines.push(format!("{INDENT}{}", text.as_ref()));
    }

    fn close(&mut self) {
        self.line("!");
    }

    /// Heading framed by section rules.
    fn section(&mut self, title: impl AsRef<str>) {
        self.line(SECTION_RULE);
        self.line(format!("! {}", title.as_ref()));
        self.line(SECTION_RULE);
    }

    fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Renders the full configuration of `device`.
pub fn render_device(device: &Device, library: &Library) -> String {
    let mut config = Config::default();

    config.line(BANNER_RULE);
    config.line(format!("! Device configuration for {}", device.name));
    config.line(BANNER_RULE);
    config.close();

    render_global(&mut config, device, library, Position::Start);
    if !device.vrfs.is_empty() {
        config.section("VRF configuration");
    }
    for vrf in device.vrfs.values() {
        render_vrf(&mut config, vrf, library);
    }
    if !device.vlans.is_empty() {
        config.section("VLAN configuration");
    }
    for (id, vlan) in &device.vlans {
        config.line(format!("vlan {id}"));
        config.sub(format!("name {}", vlan.name));
        config.close();
    }
    for makeup in [Makeup::Physical, Makeup::Logical] {
        let mut interfaces = device
            .interfaces
            .values()
            .filter(|interface| interface.makeup() == makeup)
            .peekable();
        if interfaces.peek().is_none() {
            continue;
        }
        config.section(match makeup {
            Makeup::Physical => "Interface configuration (Physical)",
            Makeup::Logical => "Interface configuration (Logical)",
        });
        for interface in interfaces {
            render_interface(&mut config, interface, library);
        }
    }
    if !device.prefix_lists.is_empty() {
        config.section("Prefix-list configuration");
    }
    for list in device.prefix_lists.values() {
        render_prefix_list(&mut config, list);
    }
    render_routes(&mut config, device.routes.values());
    render_global(&mut config, device, library, Position::End);

    config.finish()
}

/// Emits the profiles for one position. Nothing is written when none of
/// them resolve.
fn render_global(config: &mut Config, device: &Device, library: &Library, position: Position) {
    let snippets: Vec<_> = device
        .profiles
        .iter()
        .filter(|profile| profile.position == position)
        .filter_map(|profile| {
            library
                .resolve(&profile.reference)
                .map(|snippet| (profile.reference.as_str(), snippet))
        })
        .collect();
    if snippets.is_empty() {
        return;
    }

    config.section(format!("Global configuration ({position})"));
    for (name, snippet) in snippets {
        config.line(format!("! [{name}]:"));
        for line in snippet.lines() {
            config.line(line);
        }
    }
    config.close();
}

fn render_vrf(config: &mut Config, vrf: &Vrf, library: &Library) {
    config.line(format!("ip vrf {}", vrf.name));
    match &vrf.rd {
        None => config.sub("!- config cancelled, no RD defined"),
        Some(rd) => {
            config.sub(format!("rd {rd}"));
            for target in &vrf.import_targets {
                config.sub(format!("route-target import {target}"));
            }
            for target in &vrf.export_targets {
                config.sub(format!("route-target export {target}"));
            }
            if let Some(snippet) = vrf.variable.as_deref().and_then(|name| library.resolve(name)) {
                for line in snippet.lines() {
                    config.sub(line);
                }
            }
        }
    }
    config.close();
}

fn render_interface(config: &mut Config, interface: &Interface, library: &Library) {
    if interface.is_member() {
        config.line(match interface.layer {
            Some(Layer::Layer3) => "!  Layer 3 PC: create logical first",
            _ => "!  Layer 2 PC: create physical first",
        });
    }
    config.line(format!("interface {}", interface.name));
    if interface.is_parent() {
        config.sub(format!("!- pc members: {}", interface.members.join(", ")));
    }

    if interface.is_switch_port() {
        config.sub("switchport");
    }
    if interface.is_routed_port() {
        config.sub("no switchport");
    }
    if let Some(description) = &interface.description {
        config.sub(format!("description {description}"));
    }
    if let Some(mtu) = &interface.mtu {
        config.sub(format!("mtu {mtu}"));
    }
    if let Some(vrf) = &interface.vrf {
        config.sub(format!("ip vrf forwarding {vrf}"));
    }
    if let Some(host) = interface.address.as_ref().and_then(|address| address.host()) {
        config.sub(format!("ip address {} {}", host.addr(), host.netmask()));
    }
    if let Some(trunk) = &interface.trunk {
        config.sub("switchport mode trunk");
        config.sub(format!("switchport trunk allowed vlan {}", trunk.spec));
    }
    if let Some(native) = &interface.native_vlan {
        config.sub(format!("switchport trunk native vlan {native}"));
    }
    if let Some(vlan) = &interface.data_vlan {
        config.sub(format!("switchport access vlan {vlan}"));
    }
    if let Some(vlan) = &interface.voice_vlan {
        config.sub(format!("switchport voice vlan {vlan}"));
    }
    if let Some(channel) = &interface.channel {
        config.sub(format!("channel-group {} mode {}", channel.group, channel.mode));
    }
    for name in [&interface.variable1, &interface.variable2].into_iter().flatten() {
        if let Some(snippet) = library.resolve(name) {
            for line in snippet.lines() {
                config.sub(line);
            }
        }
    }
    if let Some(speed) = &interface.speed {
        config.sub(format!("speed {speed}"));
    }
    if let Some(duplex) = &interface.duplex {
        config.sub(format!("duplex {duplex}"));
    }
    config.sub(if interface.is_enabled() {
        "no shutdown"
    } else {
        "shutdown"
    });
    config.close();
}

fn render_prefix_list(config: &mut Config, list: &PrefixList) {
    for entry in list.entries.values() {
        match (&entry.action, &entry.entry) {
            (Some(action), Some(text)) => config.line(format!(
                "ip prefix-list {} seq {} {action} {text}",
                list.name, entry.sequence
            )),
            _ => config.line(format!(
                "!-- error in {} seq [{}] entry not generated",
                list.name, entry.sequence
            )),
        }
    }
    config.close();
}

/// Routes whose destination did not parse are left out, and the section is
/// skipped when none is left.
fn render_routes<'a>(config: &mut Config, routes: impl Iterator<Item = &'a StaticRoute>) {
    let lines: Vec<String> = routes.filter_map(route_line).collect();
    if lines.is_empty() {
        return;
    }
    config.section("Static routing configuration");
    for line in lines {
        config.line(line);
    }
    config.close();
}

fn route_line(route: &StaticRoute) -> Option<String> {
    let (network, mask) = route.network_and_mask()?;
    let mut line = String::from("ip route ");
    if let Some(vrf) = &route.vrf {
        line.push_str(&format!("vrf {vrf} "));
    }
    line.push_str(&format!("{network} {mask} {}", route.next_hop));
    if let Some(name) = &route.name {
        line.push_str(&format!(" name {name}"));
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbuild::tools::model::{
        ChannelMembership, InterfaceAddress, PrefixAction, PrefixEntry, ProfileRef, TrunkVlans,
    };
    use crate::netbuild::tools::net;
    use pretty_assertions::assert_eq;

    #[test]
    fn interface_lines_follow_fixed_order() {
        let mut device = Device::new("SW1");
        let mut port = Interface::new("Gi1/0/1", 2);
        port.enabled = Some(true);
        port.description = Some("desk".into());
        port.speed = Some("1000".into());
        port.voice_vlan = Some("20".into());
        port.data_vlan = Some("10".into());
        port.mtu = Some("9000".into());
        device.interfaces.insert(port.name.clone(), port);

        let text = render_device(&device, &Library::default());

        assert_eq!(
            text,
            [
                BANNER_RULE,
                "! Device configuration for SW1",
                BANNER_RULE,
                "!",
                SECTION_RULE,
                "! Interface configuration (Physical)",
                SECTION_RULE,
                "interface Gi1/0/1",
                "  switchport",
                "  description desk",
                "  mtu 9000",
                "  switchport access vlan 10",
                "  switchport voice vlan 20",
                "  speed 1000",
                "  no shutdown",
                "!",
                "",
            ]
            .join("\n")
        );
    }

    #[test]
    fn physical_interfaces_come_before_logical() {
        let mut device = Device::new("R1");
        for name in ["Loopback0", "Vlan10", "Gi0/1"] {
            device
                .interfaces
                .insert(name.to_string(), Interface::new(name, 2));
        }

        let text = render_device(&device, &Library::default());
        let order: Vec<_> = text
            .lines()
            .filter(|line| line.starts_with("interface "))
            .collect();
        assert_eq!(order, vec!["interface Gi0/1", "interface Loopback0", "interface Vlan10"]);
        assert_eq!(text.matches("  shutdown").count(), 3);
        assert!(text.contains(&format!(
            "! Interface configuration (Logical)\n{SECTION_RULE}\ninterface Loopback0\n"
        )));
        assert!(!text.contains("VLAN configuration"));
        assert!(!text.contains("Static routing configuration"));
    }

    #[test]
    fn mismatched_address_is_dropped() {
        let mut device = Device::new("R1");
        let mut good = Interface::new("Gi0/1", 2);
        good.address = Some(InterfaceAddress::new("10.1.1.1/30"));
        let mut bad = Interface::new("Gi0/2", 3);
        bad.address = Some(InterfaceAddress::new("10.1.1.0/30"));
        device.interfaces.insert(good.name.clone(), good);
        device.interfaces.insert(bad.name.clone(), bad);

        let text = render_device(&device, &Library::default());
        assert!(text.contains("  no switchport\n  ip address 10.1.1.1 255.255.255.252\n"));
        assert_eq!(text.matches("ip address").count(), 1);
        assert!(text.contains("interface Gi0/2\n  shutdown\n"));
        assert_eq!(text.matches("no switchport").count(), 1);
    }

    #[test]
    fn routed_switch_port_carries_both_markers() {
        let mut device = Device::new("SW1");
        let mut port = Interface::new("Gi1/0/1", 2);
        port.address = Some(InterfaceAddress::new("10.0.0.1/24"));
        port.data_vlan = Some("10".into());
        device.interfaces.insert(port.name.clone(), port);

        let text = render_device(&device, &Library::default());
        assert!(text.contains(
            "interface Gi1/0/1\n  switchport\n  no switchport\n  ip address 10.0.0.1 255.255.255.0\n"
        ));
        assert!(text.contains("  switchport access vlan 10\n"));
    }

    #[test]
    fn port_channel_parent_and_member_are_annotated() {
        let mut device = Device::new("SW1");
        let mut parent = Interface::new("Port-channel1", 2);
        parent.layer = Some(Layer::Layer2);
        parent.members = vec!["Gi1/0/1".into(), "Gi1/0/2".into()];
        let mut member = Interface::new("Gi1/0/1", 2);
        member.layer = Some(Layer::Layer2);
        member.enabled = Some(true);
        member.channel = Some(ChannelMembership {
            group: "1".into(),
            mode: "active".into(),
            parent: "Port-channel1".into(),
        });
        member.trunk = Some(TrunkVlans::new("10, 20-22"));
        device.interfaces.insert(parent.name.clone(), parent);
        device.interfaces.insert(member.name.clone(), member);

        let text = render_device(&device, &Library::default());
        assert!(text.contains(
            "!  Layer 2 PC: create physical first\n\
             interface Gi1/0/1\n  switchport\n  switchport mode trunk\n\
             \x20 switchport trunk allowed vlan 10,20-22\n  channel-group 1 mode active\n"
        ));
        assert!(text.contains("interface Port-channel1\n  !- pc members: Gi1/0/1, Gi1/0/2\n"));
    }

    #[test]
    fn vrf_without_rd_is_cancelled() {
        let mut device = Device::new("PE1");
        device.vrfs.insert(
            "CUST".into(),
            Vrf {
                name: "CUST".into(),
                row: 2,
                rd: None,
                import_targets: vec!["65000:1".into()],
                export_targets: vec!["65000:1".into()],
                variable: None,
            },
        );

        let text = render_device(&device, &Library::default());
        assert!(text.contains("ip vrf CUST\n  !- config cancelled, no RD defined\n!\n"));
        assert!(!text.contains("route-target"));
    }

    #[test]
    fn routes_and_prefix_lists_render_after_interfaces() {
        let mut device = Device::new("R1");
        device.routes.insert(
            "10.0.0.0/24".into(),
            StaticRoute {
                destination: "10.0.0.0/24".into(),
                row: 2,
                network: net::parse_cidr("10.0.0.0/24"),
                vrf: Some("MGMT".into()),
                next_hop: "10.0.0.1".into(),
                name: Some("mgmt".into()),
            },
        );
        device.routes.insert(
            "bogus".into(),
            StaticRoute {
                destination: "bogus".into(),
                row: 3,
                network: None,
                vrf: None,
                next_hop: "10.0.0.1".into(),
                name: None,
            },
        );
        let mut list = PrefixList::new("DEFAULT");
        for (sequence, action) in [(10, Some(PrefixAction::Permit)), (20, None)] {
            list.entries.insert(
                sequence,
                PrefixEntry {
                    sequence,
                    row: 2,
                    action,
                    entry: Some("0.0.0.0/0".into()),
                },
            );
        }
        device.prefix_lists.insert(list.name.clone(), list);

        let text = render_device(&device, &Library::default());
        assert!(text.ends_with(&format!(
            "! Prefix-list configuration\n{SECTION_RULE}\n\
             ip prefix-list DEFAULT seq 10 permit 0.0.0.0/0\n\
             !-- error in DEFAULT seq [20] entry not generated\n!\n\
             {SECTION_RULE}\n! Static routing configuration\n{SECTION_RULE}\n\
             ip route vrf MGMT 10.0.0.0 255.255.255.0 10.0.0.1 name mgmt\n!\n"
        )));
    }

    #[test]
    fn global_blocks_wrap_the_device() {
        let mut library = Library::default();
        library
            .templates
            .insert("base".into(), vec!["service timestamps".into()]);
        library
            .variables
            .insert("tail".into(), "end-of-config".into());
        let mut device = Device::new("SW1");
        for (reference, position) in [
            ("base", Position::Start),
            ("unknown", Position::Start),
            ("tail", Position::End),
        ] {
            device.profiles.push(ProfileRef {
                reference: reference.into(),
                position,
                row: 2,
            });
        }

        let text = render_device(&device, &library);
        assert!(text.contains(&format!(
            "! Global configuration (Start)\n{SECTION_RULE}\n! [base]:\nservice timestamps\n!\n"
        )));
        assert!(text.ends_with("! [tail]:\nend-of-config\n!\n"));
        assert!(!text.contains("unknown"));
    }
}
