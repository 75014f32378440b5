use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::status::DeviceStatus;
use super::trunk::Trunk;
use super::virtual_machine::VirtualMachine;
use super::{BRIDGE_CAPABILITY_TOKENS, Interface, KNOWN_VENDOR_TOKENS, LINUX_DESCRIPTION_TOKENS};

/// The unit of discovery. Until a MAC address is learned, a Device's identity is
/// its `system_name`; once learned, `mac_address` is canonical and the device is
/// (re-)keyed by it in the explored-set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub ip_address_type: String,
    pub system_name: String,
    #[serde(default)]
    pub system_description: String,
    #[serde(default)]
    pub supported_capabilities: String,
    #[serde(default)]
    pub enabled_capabilities: String,
    #[serde(default)]
    pub interfaces: BTreeMap<String, Interface>,
    #[serde(default)]
    pub trunks: BTreeMap<String, Trunk>,
    #[serde(default)]
    pub virtual_machines: Vec<VirtualMachine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
}

impl Device {
    pub fn stub(system_name: impl Into<String>) -> Self {
        Self {
            system_name: system_name.into(),
            ..Default::default()
        }
    }

    /// The explored-set key: the MAC once known, otherwise the stub's system name.
    pub fn identity_key(&self) -> &str {
        if self.mac_address.is_empty() {
            &self.system_name
        } else {
            &self.mac_address
        }
    }

    /// A Device is valid for LLDP traversal iff its enabled capabilities include a
    /// bridge token AND its system description names a known vendor/OS.
    pub fn is_valid_for_lldp_traversal(&self) -> bool {
        BRIDGE_CAPABILITY_TOKENS
            .iter()
            .any(|tok| self.enabled_capabilities.contains(tok))
            && KNOWN_VENDOR_TOKENS
                .iter()
                .any(|tok| self.system_description.contains(tok))
    }

    /// A Device is a Linux server iff its system description names a Linux-family OS.
    pub fn is_linux_server(&self) -> bool {
        LINUX_DESCRIPTION_TOKENS
            .iter()
            .any(|tok| self.system_description.contains(tok))
    }

    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge_device(description: &str) -> Device {
        Device {
            system_name: "sw1".to_string(),
            system_description: description.to_string(),
            enabled_capabilities: "Bridge, Router".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn identity_key_prefers_mac() {
        let mut device = Device::stub("sw1");
        assert_eq!(device.identity_key(), "sw1");
        device.mac_address = "00 11 22 33 44 55".to_string();
        assert_eq!(device.identity_key(), "00 11 22 33 44 55");
    }

    #[test]
    fn valid_for_lldp_traversal_requires_bridge_and_known_vendor() {
        assert!(bridge_device("HP ProCurve Switch").is_valid_for_lldp_traversal());
        assert!(bridge_device("JUNOS 21.2R1").is_valid_for_lldp_traversal());

        let mut no_bridge = bridge_device("HP ProCurve Switch");
        no_bridge.enabled_capabilities = "Router".to_string();
        assert!(!no_bridge.is_valid_for_lldp_traversal());

        let unknown_vendor = bridge_device("Acme Widget OS 3.0");
        assert!(!unknown_vendor.is_valid_for_lldp_traversal());
    }

    #[test]
    fn linux_server_detection() {
        assert!(bridge_device("Linux 5.15.0-foo").is_linux_server());
        assert!(bridge_device("Debian GNU/Linux 12").is_linux_server());
        assert!(bridge_device("Ubuntu 22.04").is_linux_server());
        assert!(!bridge_device("JUNOS 21.2R1").is_linux_server());
    }
}
