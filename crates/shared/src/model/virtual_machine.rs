use serde::{Deserialize, Serialize};

/// A hypervisor-hosted virtual machine observed on a Linux host.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VirtualMachine {
    pub identifier: String,
    pub name: String,
    pub state: String,
}

impl VirtualMachine {
    /// Valid iff `identifier` is present and is neither empty nor the placeholder `-`.
    pub fn is_valid(&self) -> bool {
        !self.identifier.is_empty() && self.identifier != "-" && !self.name.is_empty() && !self.state.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm(identifier: &str) -> VirtualMachine {
        VirtualMachine {
            identifier: identifier.to_string(),
            name: "web01".to_string(),
            state: "running".to_string(),
        }
    }

    #[test]
    fn rejects_empty_and_dash_identifiers() {
        assert!(!vm("").is_valid());
        assert!(!vm("-").is_valid());
        assert!(vm("3").is_valid());
    }
}
