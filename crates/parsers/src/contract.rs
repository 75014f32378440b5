use std::collections::BTreeMap;

use shared::model::{Device, Interface, Trunk, Vlan, VirtualMachine};

/// What one vendor's CLI dialect knows how to ask for and how to read back.
///
/// Parsing methods that accumulate cross-call state (HP's trunk-VLAN buffer,
/// Linux's synthesized bonds) take `&mut self`; everything else is a pure
/// read of the text it is given.
pub trait VendorParser: Send {
    fn name(&self) -> &'static str;

    /// Marker the session driver watches for to know a command has finished.
    fn prompt_marker(&self) -> &'static str;

    /// Commands sent, in order, right after the shell opens (pagination and
    /// screen-width knobs). Empty for vendors that need none.
    fn preparation_commands(&self) -> &'static [&'static str];

    fn lldp_local_cmd(&self) -> Option<&'static str>;
    fn lldp_neighbors_cmd(&self) -> Option<&'static str>;
    fn lldp_neighbors_detail_cmd(&self, port: &str) -> Option<String>;
    fn trunks_list_cmd(&self) -> Option<&'static str>;
    fn vlans_global_cmd(&self) -> Option<&'static str>;
    fn vlans_specific_cmd(&self, vlan: &Vlan) -> Option<String>;
    fn vms_list_cmd(&self) -> Option<&'static str>;

    /// The token plugged into `vlans_specific_cmd`'s `{vlan}` placeholder.
    fn get_vlan_detail_str(&self, vlan: &Vlan) -> String;

    fn parse_device_from_lldp_local_info(&self, text: &str) -> Device;

    /// `&mut self` because Juniper discovers bonded interfaces (parent
    /// interfaces in the neighbor table) here and accumulates them for a
    /// later `parse_trunks` call.
    fn parse_interfaces_from_lldp_remote_info(&mut self, text: &str) -> BTreeMap<String, Interface>;

    /// May mutate `device.interfaces` directly (Linux learns interfaces only
    /// from this step); the returned devices are the discovered neighbors.
    fn parse_devices_from_lldp_remote_info(
        &self,
        device: &mut Device,
        texts: &[String],
    ) -> Vec<Device>;

    /// Empty when this vendor assigns VLANs in a single pass via
    /// `associate_vlans_to_interfaces` instead.
    fn parse_vlans(&self, text: &str) -> BTreeMap<String, Vlan>;

    fn associate_vlans_to_interfaces(
        &mut self,
        interfaces: &mut BTreeMap<String, Interface>,
        text: &str,
    );

    fn associate_vlan_to_interfaces(
        &mut self,
        interfaces: &mut BTreeMap<String, Interface>,
        vlan: &Vlan,
        text: &str,
    );

    fn parse_trunks(
        &mut self,
        interfaces: &mut BTreeMap<String, Interface>,
        text: &str,
    ) -> BTreeMap<String, Trunk>;

    fn parse_vms_list(&self, text: &str) -> Vec<VirtualMachine>;
}

/// Pick a parser from a connection banner. Cisco is recognized but
/// deliberately unsupported: it is distinguished from a truly unknown vendor
/// only by the caller choosing to log it, not by the return value here.
pub fn select_parser(banner: &str) -> Option<Box<dyn VendorParser>> {
    for line in banner.lines() {
        if ["ProCurve", "Hewlett-Packard", "HP"]
            .iter()
            .any(|tok| line.contains(tok))
        {
            return Some(Box::new(super::hp::HpParser::new()));
        }
        if ["Juniper", "JUNOS"].iter().any(|tok| line.contains(tok)) {
            return Some(Box::new(super::juniper::JuniperParser::new()));
        }
        if ["Linux", "Debian", "Ubuntu"]
            .iter()
            .any(|tok| line.contains(tok))
        {
            return Some(Box::new(super::linux::LinuxParser::new()));
        }
        if line.contains("Cisco") {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_hp_on_any_known_token() {
        assert!(select_parser("Welcome\nHP ProCurve Switch 2650\n").is_some());
        assert_eq!(
            select_parser("HP ProCurve Switch 2650").unwrap().name(),
            "hp"
        );
    }

    #[test]
    fn selects_juniper_and_linux() {
        assert_eq!(select_parser("JUNOS 21.2R1").unwrap().name(), "juniper");
        assert_eq!(select_parser("Debian GNU/Linux 12").unwrap().name(), "linux");
    }

    #[test]
    fn cisco_and_unknown_banners_yield_no_parser() {
        assert!(select_parser("Cisco IOS Software").is_none());
        assert!(select_parser("Acme Widget OS").is_none());
    }

    #[test]
    fn selection_is_deterministic() {
        let banner = "JUNOS 21.2R1";
        assert_eq!(
            select_parser(banner).unwrap().name(),
            select_parser(banner).unwrap().name()
        );
    }
}
