use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use shared::model::{Device, Interface, Trunk, Vlan, VirtualMachine};

use super::common::col;
use super::contract::VendorParser;

static VLAN_SUBINTERFACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-z]+[0-9]*)\.([0-z]+)").unwrap());

/// Linux/lldpd's dialect. There is no vendor shell to speak of: `lldpctl`,
/// `ifconfig` and `virsh` are plain Linux userspace tools, combined through
/// this parser's bookkeeping the way the vendor CLIs combine theirs natively.
///
/// `parse_device_from_lldp_local_info` is an intentional stub: the upstream
/// tool never implemented it, so a Linux host's own MAC is learned only when
/// some other device reports it as an LLDP neighbor.
pub struct LinuxParser {
    bonds: BTreeMap<String, Trunk>,
}

impl LinuxParser {
    pub fn new() -> Self {
        Self {
            bonds: BTreeMap::new(),
        }
    }

    fn parse_block(block: &str) -> (Interface, Device) {
        let mut iface = Interface::default();
        let mut neighbor = Device::default();

        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "Interface" => {
                    iface.local_port = value.split(',').next().unwrap_or_default().trim().to_string();
                }
                "ChassisID" => {
                    let stripped = value.strip_prefix("mac ").unwrap_or(value);
                    let mac = stripped.replace(':', " ").trim().to_string();
                    neighbor.mac_address = mac.clone();
                    iface.remote_mac_address = Some(mac);
                }
                "SysName" => {
                    neighbor.system_name = value.to_string();
                    iface.remote_system_name = Some(value.to_string());
                }
                "SysDescr" => {
                    neighbor.system_description = value.to_string();
                }
                "PortDescr" => {
                    iface.remote_port = Some(value.to_string());
                }
                "Capability" => {
                    if let Some((token, state)) = value.split_once(',') {
                        let token = token.trim();
                        let state = state.trim();
                        append_token(&mut neighbor.supported_capabilities, token);
                        if state == "on" {
                            append_token(&mut neighbor.enabled_capabilities, token);
                        }
                    }
                }
                _ => {}
            }
        }

        (iface, neighbor)
    }
}

fn append_token(field: &mut String, token: &str) {
    if !field.is_empty() {
        field.push_str(", ");
    }
    field.push_str(token);
}

impl Default for LinuxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl VendorParser for LinuxParser {
    fn name(&self) -> &'static str {
        "linux"
    }

    fn prompt_marker(&self) -> &'static str {
        "# "
    }

    fn preparation_commands(&self) -> &'static [&'static str] {
        &[]
    }

    fn lldp_local_cmd(&self) -> Option<&'static str> {
        None
    }

    fn lldp_neighbors_cmd(&self) -> Option<&'static str> {
        Some("lldpctl\n")
    }

    fn lldp_neighbors_detail_cmd(&self, _port: &str) -> Option<String> {
        None
    }

    fn trunks_list_cmd(&self) -> Option<&'static str> {
        None
    }

    fn vlans_global_cmd(&self) -> Option<&'static str> {
        Some("ifconfig\n")
    }

    fn vlans_specific_cmd(&self, vlan: &Vlan) -> Option<String> {
        Some(format!(
            "cat /sys/class/net/{}/bonding/slaves\n",
            self.get_vlan_detail_str(vlan)
        ))
    }

    fn vms_list_cmd(&self) -> Option<&'static str> {
        Some("virsh list --all\n")
    }

    fn get_vlan_detail_str(&self, vlan: &Vlan) -> String {
        // `name` temporarily holds the physical port, not a display name;
        // see `parse_vlans`.
        vlan.name.clone()
    }

    fn parse_device_from_lldp_local_info(&self, _text: &str) -> Device {
        Device::default()
    }

    fn parse_interfaces_from_lldp_remote_info(&mut self, _text: &str) -> BTreeMap<String, Interface> {
        // lldpctl's output isn't a summary table; interfaces are learned in
        // `parse_devices_from_lldp_remote_info` instead.
        BTreeMap::new()
    }

    fn parse_devices_from_lldp_remote_info(
        &self,
        device: &mut Device,
        texts: &[String],
    ) -> Vec<Device> {
        let mut neighbors = Vec::new();

        for text in texts {
            let body: Vec<&str> = text.lines().skip(4).collect();
            let mut block = String::new();
            let mut flush = |block: &mut String, neighbors: &mut Vec<Device>, device: &mut Device| {
                if block.trim().is_empty() {
                    block.clear();
                    return;
                }
                let (iface, neighbor) = Self::parse_block(block);
                if !iface.local_port.is_empty() {
                    device.interfaces.insert(iface.local_port.clone(), iface);
                }
                neighbors.push(neighbor);
                block.clear();
            };

            for line in body {
                if line.trim_start().starts_with("----") {
                    flush(&mut block, &mut neighbors, device);
                    continue;
                }
                block.push_str(line);
                block.push('\n');
            }
            flush(&mut block, &mut neighbors, device);
        }

        neighbors
    }

    fn parse_vlans(&self, text: &str) -> BTreeMap<String, Vlan> {
        let mut vlans = BTreeMap::new();
        for line in text.lines() {
            let Some(caps) = VLAN_SUBINTERFACE.captures(line) else {
                continue;
            };
            let port = caps[1].to_string();
            let vlan_id = caps[2].to_string();
            // `name` temporarily carries the port; see `get_vlan_detail_str`.
            vlans.insert(vlan_id.clone(), Vlan::new(vlan_id, port));
        }
        vlans
    }

    fn associate_vlans_to_interfaces(
        &mut self,
        _interfaces: &mut BTreeMap<String, Interface>,
        _text: &str,
    ) {
        // Linux is two-phase like HP; see `associate_vlan_to_interfaces`.
    }

    fn associate_vlan_to_interfaces(
        &mut self,
        interfaces: &mut BTreeMap<String, Interface>,
        vlan: &Vlan,
        text: &str,
    ) {
        let port = vlan.name.clone();
        let trimmed = text.trim();
        let is_bond_listing = !trimmed.is_empty()
            && !trimmed.contains("No such file")
            && !trimmed.to_lowercase().contains("error");

        if !is_bond_listing {
            if let Some(iface) = interfaces.get_mut(&port) {
                iface.add_vlan(Vlan::new(vlan.identifier.clone(), port.clone()));
            }
            return;
        }

        let mut trunk = Trunk::new(port.clone());
        for slave in trimmed.split_whitespace() {
            trunk.add_port(slave);
            if let Some(iface) = interfaces.get_mut(slave) {
                iface.add_vlan(Vlan::new(vlan.identifier.clone(), port.clone()));
            }
        }
        self.bonds.insert(port, trunk);
    }

    fn parse_trunks(
        &mut self,
        _interfaces: &mut BTreeMap<String, Interface>,
        _text: &str,
    ) -> BTreeMap<String, Trunk> {
        self.bonds.clone()
    }

    fn parse_vms_list(&self, text: &str) -> Vec<VirtualMachine> {
        let mut vms = Vec::new();
        let mut columns: Option<(usize, usize)> = None;

        for line in text.lines() {
            let Some((name_col, state_col)) = columns else {
                let english = (line.find("Name"), line.find("State"));
                let french = (line.find("Nom"), line.find("\u{c9}tat"));
                if let (Some(n), Some(s)) = english {
                    columns = Some((n, s));
                } else if let (Some(n), Some(s)) = french {
                    columns = Some((n, s));
                }
                continue;
            };

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.chars().all(|c| c == '-') || trimmed.ends_with('#') {
                continue;
            }
            if line.len() < name_col {
                continue;
            }

            let identifier = col(line, 0, Some(name_col.saturating_sub(1))).trim().to_string();
            let name = col(line, name_col, Some(state_col.saturating_sub(1))).trim().to_string();
            let state = col(line, state_col, None).trim().to_string();

            let vm = VirtualMachine { identifier, name, state };
            if vm.is_valid() {
                vms.push(vm);
            }
        }

        vms
    }
}
