use std::collections::BTreeMap;

use shared::model::{Device, Interface, Trunk, Vlan, VlanMode, VlanStatus, VirtualMachine};

use super::common::col;
use super::contract::VendorParser;

const HEADER_LOCAL_PORT: &str = "Local Interface";
const HEADER_PARENT: &str = "Parent Interface";

/// Juniper JUNOS's `show` dialect. Unlike HP, trunks (bonds) are not a
/// separate command: they fall out of the `parent_interface` column in the
/// neighbor table, so they are accumulated here as that table is parsed.
pub struct JuniperParser {
    bonds: BTreeMap<String, Trunk>,
}

impl JuniperParser {
    pub fn new() -> Self {
        Self {
            bonds: BTreeMap::new(),
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
            if key.contains("Chassis") {
                device.mac_address = value.replace(':', " ").trim().to_string();
            } else if key.contains("System name") || key.contains("System Name") {
                device.system_name = value.to_string();
            } else if key.contains("Description") {
                device.system_description = value.to_string();
            } else if key.contains("Capabilities Supported") {
                device.supported_capabilities = value.to_string();
            } else if key.contains("Capabilities Enabled") {
                device.enabled_capabilities = value.to_string();
            } else if key.contains("Address") {
                device.ip_address = value.to_string();
            }
        }
        device
    }
}

impl Default for JuniperParser {
    fn default() -> Self {
        Self::new()
    }
}

impl VendorParser for JuniperParser {
    fn name(&self) -> &'static str {
        "juniper"
    }

    fn prompt_marker(&self) -> &'static str {
        "> "
    }

    fn preparation_commands(&self) -> &'static [&'static str] {
        &["set cli screen-length 0\n", "set cli screen-width 0\n"]
    }

    fn lldp_local_cmd(&self) -> Option<&'static str> {
        Some("show lldp local-information\n")
    }

    fn lldp_neighbors_cmd(&self) -> Option<&'static str> {
        Some("show lldp neighbors\n")
    }

    fn lldp_neighbors_detail_cmd(&self, port: &str) -> Option<String> {
        Some(format!("show lldp neighbors interface {port} detail\n"))
    }

    fn trunks_list_cmd(&self) -> Option<&'static str> {
        None
    }

    fn vlans_global_cmd(&self) -> Option<&'static str> {
        Some("show vlans detail\n")
    }

    fn vlans_specific_cmd(&self, _vlan: &Vlan) -> Option<String> {
        None
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
            if line.len() <= 73 {
                continue;
            }
            let local_port = col(line, 0, Some(18)).trim().to_string();
            if local_port.is_empty() || local_port == HEADER_LOCAL_PORT {
                continue;
            }
            let parent_interface = col(line, 19, Some(38)).trim().to_string();
            let chassis_id = col(line, 39, Some(58)).trim().replace(':', " ");
            let port_info = col(line, 59, Some(71)).trim().to_string();
            let sys_name = col(line, 72, None).trim().to_string();

            let mut iface = Interface::new(local_port.clone());
            iface.remote_mac_address = (!chassis_id.is_empty()).then_some(chassis_id);
            iface.remote_port = (!port_info.is_empty()).then_some(port_info);
            iface.remote_system_name = (!sys_name.is_empty()).then_some(sys_name);

            if !parent_interface.is_empty()
                && parent_interface != "-"
                && parent_interface != HEADER_PARENT
            {
                self.bonds
                    .entry(parent_interface.clone())
                    .or_insert_with(|| Trunk::new(parent_interface.clone()))
                    .add_port(local_port.clone());
            }

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
            .filter_map(|text| {
                let start = text.find("Neighbour Information")?;
                let rest = &text[start..];
                let end = rest[1..].find("Address").map(|i| i + 1).unwrap_or(rest.len());
                Some(Self::parse_local_fields(&rest[..end]))
            })
            .filter(|d| !d.system_name.is_empty() || !d.mac_address.is_empty())
            .collect()
    }

    fn parse_vlans(&self, _text: &str) -> BTreeMap<String, Vlan> {
        BTreeMap::new()
    }

    fn associate_vlans_to_interfaces(
        &mut self,
        interfaces: &mut BTreeMap<String, Interface>,
        text: &str,
    ) {
        let mut current: Option<Vlan> = None;
        let mut mode = VlanMode::Untagged;

        for line in text.lines() {
            if line.contains("VLAN: ") && line.contains("Tag: ") {
                let name = line
                    .split("VLAN: ")
                    .nth(1)
                    .and_then(|rest| rest.split(',').next())
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                let id = line
                    .split("Tag: ")
                    .nth(1)
                    .and_then(|rest| rest.split(|c: char| c == ',' || c.is_whitespace()).next())
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                current = Some(Vlan::new(id, name));
                continue;
            }

            if line.contains("agged interfaces:") {
                mode = if line.contains("Untagged") {
                    VlanMode::Untagged
                } else {
                    VlanMode::Trunk
                };
                continue;
            }

            let Some(vlan) = current.as_ref() else {
                continue;
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let ports: Vec<(String, VlanStatus)> = trimmed
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| {
                    if let Some(stripped) = p.strip_suffix('*') {
                        (stripped.to_string(), VlanStatus::Up)
                    } else {
                        (p.to_string(), VlanStatus::Down)
                    }
                })
                .collect();

            if ports.is_empty() {
                continue;
            }

            for (port, status) in ports {
                let assigned = Vlan {
                    identifier: vlan.identifier.clone(),
                    name: vlan.name.clone(),
                    mode: Some(mode),
                    status: Some(status),
                };
                if let Some(iface) = interfaces.get_mut(&port) {
                    iface.add_vlan(assigned);
                } else if let Some(bond) = self.bonds.get(&port) {
                    for member in bond.ports.clone() {
                        if let Some(iface) = interfaces.get_mut(&member) {
                            iface.add_vlan(assigned.clone());
                        }
                    }
                }
            }
        }
    }

    fn associate_vlan_to_interfaces(
        &mut self,
        _interfaces: &mut BTreeMap<String, Interface>,
        _vlan: &Vlan,
        _text: &str,
    ) {
        // Juniper is single-phase; all association happens in
        // `associate_vlans_to_interfaces`.
    }

    fn parse_trunks(
        &mut self,
        _interfaces: &mut BTreeMap<String, Interface>,
        _text: &str,
    ) -> BTreeMap<String, Trunk> {
        self.bonds.clone()
    }

    fn parse_vms_list(&self, _text: &str) -> Vec<VirtualMachine> {
        Vec::new()
    }
}
