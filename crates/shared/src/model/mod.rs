mod device;
mod explored_set;
mod interface;
mod status;
mod trunk;
mod virtual_machine;
mod vlan;

pub use device::Device;
pub use explored_set::{new_explored_set, ExploredSet};
pub use interface::Interface;
pub use status::DeviceStatus;
pub use trunk::Trunk;
pub use virtual_machine::VirtualMachine;
pub use vlan::{Vlan, VlanMode, VlanStatus};

/// Vendor/OS tokens recognized in `system_description` during LLDP-validity checks.
pub const KNOWN_VENDOR_TOKENS: &[&str] = &[
    "HP",
    "Hewlett-Packard",
    "ProCurve",
    "Juniper",
    "JUNOS",
    "Linux",
    "Debian",
    "Ubuntu",
];

/// Capability tokens that mark a device as a bridge for LLDP traversal purposes.
pub const BRIDGE_CAPABILITY_TOKENS: &[&str] = &["bridge", "Bridge"];

/// Tokens in `system_description` that mark a device as a Linux host.
pub const LINUX_DESCRIPTION_TOKENS: &[&str] = &["Linux", "Debian", "Ubuntu"];
