use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use shared::model::{Device, Interface, Trunk, Vlan, VlanMode, VlanStatus, VirtualMachine};
use tracing::warn;

use super::common::{col, normalize_mac, split_on_marker_lines};
use super::contract::VendorParser;

static TRUNK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([0-z]{1,3})\s+\|([ -~]{1,33})(.{1,9}) \| ([0-z]{1,5})").unwrap());

/// HP ProCurve's `show` command dialect. Carries cross-call state because
/// VLANs associated with a trunk (`Trk*`) arrive before `show trunks` has
/// told us which physical ports belong to it; they are buffered here and
/// replayed once that mapping is known.
pub struct HpParser {
    buffered_trunk_vlans: HashMap<String, Vec<Vlan>>,
}

impl HpParser {
    pub fn new() -> Self {
        Self {
            buffered_trunk_vlans: HashMap::new(),
        }
    }

    fn parse_local_fields(text: &str) -> Device {
        let mut device = Device::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            if key.contains("Chassis Id") {
                device.mac_address = normalize_mac(value);
            } else if key.contains("System Name") {
                device.system_name = value.to_string();
            } else if key.contains("System Description") {
                device.system_description = value.to_string();
            } else if key.contains("Capabilities Supported") {
                device.supported_capabilities = value.to_string();
            } else if key.contains("Capabilities Enabled") {
                device.enabled_capabilities = value.to_string();
            } else if key.contains("Type") {
                device.ip_address_type = value.to_string();
            } else if key.contains("Address") {
                device.ip_address = value.to_string();
                break;
            }
        }
        device
    }
}

impl Default for HpParser {
    fn default() -> Self {
        Self::new()
    }
}

impl VendorParser for HpParser {
    fn name(&self) -> &'static str {
        "hp"
    }

    fn prompt_marker(&self) -> &'static str {
        "# "
    }

    fn preparation_commands(&self) -> &'static [&'static str] {
        &["\n", "no page\n"]
    }

    fn lldp_local_cmd(&self) -> Option<&'static str> {
        Some("show lldp info local-device\n")
    }

    fn lldp_neighbors_cmd(&self) -> Option<&'static str> {
        Some("show lldp info remote-device\n")
    }

    fn lldp_neighbors_detail_cmd(&self, port: &str) -> Option<String> {
        Some(format!("show lldp info remote-device {port}\n"))
    }

    fn trunks_list_cmd(&self) -> Option<&'static str> {
        Some("show trunks\n")
    }

    fn vlans_global_cmd(&self) -> Option<&'static str> {
        Some("show vlans\n")
    }

    fn vlans_specific_cmd(&self, vlan: &Vlan) -> Option<String> {
        Some(format!("show vlans {}\n", self.get_vlan_detail_str(vlan)))
    }

    fn vms_list_cmd(&self) -> Option<&'static str> {
        None
    }

    fn get_vlan_detail_str(&self, vlan: &Vlan) -> String {
        vlan.identifier.clone()
    }

    fn parse_device_from_lldp_local_info(&self, text: &str) -> Device {
        Self::parse_local_fields(text)
    }

    fn parse_interfaces_from_lldp_remote_info(&mut self, text: &str) -> BTreeMap<String, Interface> {
        let mut interfaces = BTreeMap::new();
        for line in text.lines() {
            if line.len() <= 57 {
                continue;
            }
            if line.as_bytes().get(13) != Some(&b'|') {
                continue;
            }
            let local_port = col(line, 0, Some(11)).trim().to_string();
            if local_port.is_empty() || local_port == "LocalPort" {
                continue;
            }
            let chassis_id = col(line, 13, Some(38)).trim_matches('|').trim().to_string();
            let port_descr = col(line, 47, Some(55)).trim().to_string();
            let remote_system_name = col(line, 57, None).trim().to_string();

            let mut iface = Interface::new(local_port.clone());
            iface.remote_mac_address = (!chassis_id.is_empty()).then(|| normalize_mac(&chassis_id));
            iface.remote_port = (!port_descr.is_empty()).then_some(port_descr);
            iface.remote_system_name = (!remote_system_name.is_empty()).then_some(remote_system_name);
            interfaces.insert(local_port, iface);
        }
        interfaces
    }

    fn parse_devices_from_lldp_remote_info(
        &self,
        _device: &mut Device,
        texts: &[String],
    ) -> Vec<Device> {
        texts
            .iter()
            .flat_map(|text| split_on_marker_lines(text, "#"))
            .map(|block| Self::parse_local_fields(&block))
            .filter(|d| !d.system_name.is_empty() || !d.mac_address.is_empty())
            .collect()
    }

    fn parse_vlans(&self, text: &str) -> BTreeMap<String, Vlan> {
        let mut vlans = BTreeMap::new();
        let mut columns: Option<(usize, usize)> = None;

        for line in text.lines() {
            let Some((name_col, status_col)) = columns else {
                if let (Some(n), Some(s)) = (line.find("Name"), line.find("Status")) {
                    columns = Some((n, s));
                }
                continue;
            };

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.chars().all(|c| matches!(c, '-' | '+')) {
                continue;
            }
            if line.len() < name_col {
                continue;
            }

            let id = col(line, 0, Some(name_col.saturating_sub(1)))
                .trim_matches('|')
                .trim()
                .to_string();
            let name = col(line, name_col, Some(status_col.saturating_sub(1)))
                .trim_matches('|')
                .trim()
                .to_string();
            if id.is_empty() || id.contains(char::is_alphabetic) {
                continue;
            }
            vlans.insert(id.clone(), Vlan::new(id, name));
        }
        vlans
    }

    fn associate_vlans_to_interfaces(
        &mut self,
        _interfaces: &mut BTreeMap<String, Interface>,
        _text: &str,
    ) {
        // HP always returns a non-empty parse_vlans, so the host explorer
        // takes the two-phase path and this single-phase hook is never used.
    }

    fn associate_vlan_to_interfaces(
        &mut self,
        interfaces: &mut BTreeMap<String, Interface>,
        vlan: &Vlan,
        text: &str,
    ) {
        let mut columns: Option<(usize, usize)> = None;

        for line in text.lines() {
            let Some((mode_col, status_col)) = columns else {
                if line.contains("Mode") && line.contains("Unknown VLAN") && line.contains("Status")
                {
                    if let (Some(m), Some(s)) = (line.find("Mode"), line.find("Status")) {
                        columns = Some((m, s));
                    }
                }
                continue;
            };

            let Some(pipe_idx) = line.find('|') else {
                continue;
            };
            let local_port = col(line, 0, Some(pipe_idx)).trim().to_string();
            if local_port.is_empty() {
                continue;
            }

            let mode = VlanMode::from_str(col(line, mode_col, Some(status_col)).trim()).ok();
            let status = VlanStatus::from_str(col(line, status_col, None).trim()).ok();
            let assigned = Vlan {
                identifier: vlan.identifier.clone(),
                name: vlan.name.clone(),
                mode,
                status,
            };

            if let Some(trunk_suffix) = local_port.strip_prefix("Trk") {
                self.buffered_trunk_vlans
                    .entry(format!("Trk{trunk_suffix}"))
                    .or_default()
                    .push(assigned);
            } else if let Some(iface) = interfaces.get_mut(&local_port) {
                iface.add_vlan(assigned);
            }
        }
    }

    fn parse_trunks(
        &mut self,
        interfaces: &mut BTreeMap<String, Interface>,
        text: &str,
    ) -> BTreeMap<String, Trunk> {
        let mut trunks: BTreeMap<String, Trunk> = BTreeMap::new();

        for line in text.lines() {
            let Some(caps) = TRUNK_LINE.captures(line) else {
                continue;
            };
            let port = caps[1].trim().to_string();
            let port_type = caps[3].trim().to_string();
            let group = caps[4].trim().to_string();
            if port.is_empty() || group.is_empty() {
                continue;
            }

            let trunk = trunks
                .entry(group.clone())
                .or_insert_with(|| Trunk::new(group.clone()));
            trunk.r#type = Some(port_type);
            trunk.add_port(port.clone());

            let iface = interfaces
                .entry(port.clone())
                .or_insert_with(|| Interface::new(port.clone()));

            match self.buffered_trunk_vlans.get(&group) {
                Some(buffered) => {
                    for vlan in buffered {
                        iface.add_vlan(vlan.clone());
                    }
                }
                None => warn!(trunk = %group, "trunk has no buffered VLAN assignment to replay"),
            }
        }

        trunks
    }

    fn parse_vms_list(&self, _text: &str) -> Vec<VirtualMachine> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL_INFO: &str = "\
 Chassis Id    : 00:11:22:33:44:55\n\
 System Name   : sw1.example.net\n\
 System Description : HP ProCurve Switch 2650\n\
 System Capabilities Supported : Bridge, Router\n\
 System Capabilities Enabled   : Bridge\n\
 Type          : IPv4\n\
 Address       : 10.0.0.1\n";

    #[test]
    fn parses_local_device_and_stops_at_address() {
        let parser = HpParser::new();
        let device = parser.parse_device_from_lldp_local_info(LOCAL_INFO);
        assert_eq!(device.mac_address, "00 11 22 33 44 55");
        assert_eq!(device.system_name, "sw1.example.net");
        assert_eq!(device.enabled_capabilities, "Bridge");
        assert_eq!(device.ip_address, "10.0.0.1");
    }

    /// Build one fixed-width remote-device row: local_port [0:11], pipe at
    /// byte 13, chassis_id [13:38] (leading pipe included, stripped by the
    /// parser), port_descr [47:55], remote_system_name [57:].
    fn remote_row(local_port: &str, chassis_id: &str, port_descr: &str, sys_name: &str) -> String {
        format!(
            "{:<11}  |{:<24}{:<9}{:<8}  {}",
            local_port, chassis_id, "", port_descr, sys_name
        )
    }

    #[test]
    fn parses_remote_interface_table() {
        let mut parser = HpParser::new();
        let header = remote_row("LocalPort", "ChassisId", "PortDescr", "SysName");
        let row = remote_row("A1", "00:aa:bb:cc:dd:ee", "eth0", "sw2.example.net");
        let text = format!("{header}\n{row}\n");

        let interfaces = parser.parse_interfaces_from_lldp_remote_info(&text);
        assert_eq!(interfaces.len(), 1);
        let iface = &interfaces["A1"];
        assert_eq!(iface.remote_mac_address.as_deref(), Some("00 aa bb cc dd ee"));
        assert_eq!(iface.remote_port.as_deref(), Some("eth0"));
        assert_eq!(iface.remote_system_name.as_deref(), Some("sw2.example.net"));
    }

    #[test]
    fn header_only_remote_table_yields_no_interfaces_or_neighbors() {
        let mut parser = HpParser::new();
        let header = remote_row("LocalPort", "ChassisId", "PortDescr", "SysName");

        let interfaces = parser.parse_interfaces_from_lldp_remote_info(&format!("{header}\n"));
        assert!(interfaces.is_empty());

        let mut device = Device::default();
        let neighbors = parser.parse_devices_from_lldp_remote_info(&mut device, &[format!("{header}\n")]);
        assert!(neighbors.is_empty());
    }

    #[test]
    fn parses_vlan_table_and_two_phase_association() {
        let mut parser = HpParser::new();
        let vlan_table = "VLAN | Name  | Status\n1    | dflt  | Up\n52   | eng   | Up\n";
        let vlans = parser.parse_vlans(vlan_table);
        assert_eq!(vlans.len(), 2);
        assert_eq!(vlans["52"].name, "eng");

        let mut interfaces = BTreeMap::new();
        interfaces.insert("A1".to_string(), Interface::new("A1"));
        let detail = "Port  | Mode    Unknown VLAN  Status\nA1    |Tagged   No            Up\n";
        parser.associate_vlan_to_interfaces(&mut interfaces, &vlans["52"], detail);
        assert_eq!(interfaces["A1"].vlans.len(), 1);
    }

    #[test]
    fn trunk_parsing_replays_buffered_vlans_onto_member_ports() {
        let mut parser = HpParser::new();
        parser.buffered_trunk_vlans.insert(
            "Trk3".to_string(),
            vec![Vlan::new("52", "rch iut sud")],
        );

        let mut interfaces = BTreeMap::new();
        let trunk_line = "       A13      |Tagged              | Trk3";
        let trunks = parser.parse_trunks(&mut interfaces, &format!("{trunk_line}\n"));

        assert!(trunks.contains_key("Trk3"));
        assert!(interfaces["A13"].vlans.contains_key("52"));
    }
}
