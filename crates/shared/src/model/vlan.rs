use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// 802.1Q tagging discipline of a VLAN on a given interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum VlanMode {
    Tagged,
    Untagged,
    /// Juniper's "access" VLANs are represented with this alias of `Untagged`
    /// at parse time and normalized before being stored.
    Access,
    Trunk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum VlanStatus {
    Up,
    Down,
}

/// A VLAN as attached to one interface.
///
/// `identifier` is the map key wherever a `Vlan` lives (`Interface::vlans`), so two
/// `Vlan`s with the same `identifier` on the same interface are never both stored:
/// inserting is the idempotent "add-vlan" referenced by the invariants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub identifier: String,
    pub name: String,
    pub mode: Option<VlanMode>,
    pub status: Option<VlanStatus>,
}

impl Vlan {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            mode: None,
            status: None,
        }
    }

    pub fn with_mode_status(mut self, mode: VlanMode, status: VlanStatus) -> Self {
        self.mode = Some(mode);
        self.status = Some(status);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_mode_and_status() {
        let vlan = Vlan::new("52", "rch iut sud").with_mode_status(VlanMode::Tagged, VlanStatus::Up);
        assert_eq!(vlan.identifier, "52");
        assert_eq!(vlan.mode, Some(VlanMode::Tagged));
        assert_eq!(vlan.status, Some(VlanStatus::Up));
    }
}
