use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::vlan::Vlan;

/// A physical or logical port on one device.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Interface {
    pub local_port: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_system_name: Option<String>,
    #[serde(default)]
    pub vlans: BTreeMap<String, Vlan>,
}

impl Interface {
    pub fn new(local_port: impl Into<String>) -> Self {
        Self {
            local_port: local_port.into(),
            ..Default::default()
        }
    }

    /// True iff this interface carries a non-empty remote system name, per the
    /// "valid-as-LLDP-interface" predicate.
    pub fn is_valid_lldp_interface(&self) -> bool {
        self.remote_system_name
            .as_deref()
            .is_some_and(|name| !name.is_empty())
    }

    /// Insert a VLAN, keyed by its identifier. Re-inserting the same identifier
    /// overwrites rather than duplicating, so a VLAN's identifier appears at most
    /// once regardless of how many times it is attached during parsing.
    pub fn add_vlan(&mut self, vlan: Vlan) {
        self.vlans.insert(vlan.identifier.clone(), vlan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{VlanMode, VlanStatus};

    #[test]
    fn valid_lldp_interface_requires_nonempty_remote_name() {
        let mut iface = Interface::new("A1");
        assert!(!iface.is_valid_lldp_interface());
        iface.remote_system_name = Some(String::new());
        assert!(!iface.is_valid_lldp_interface());
        iface.remote_system_name = Some("sw2".to_string());
        assert!(iface.is_valid_lldp_interface());
    }

    #[test]
    fn add_vlan_is_idempotent_by_identifier() {
        let mut iface = Interface::new("A13");
        iface.add_vlan(Vlan::new("52", "rch iut sud"));
        iface.add_vlan(
            Vlan::new("52", "rch iut sud").with_mode_status(VlanMode::Tagged, VlanStatus::Up),
        );
        assert_eq!(iface.vlans.len(), 1);
        assert_eq!(iface.vlans["52"].mode, Some(VlanMode::Tagged));
    }
}
