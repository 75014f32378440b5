use serde::{Deserialize, Serialize};

/// A link aggregation group (HP "trunk", Juniper "ae*", Linux "bond*").
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Trunk {
    pub group: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default)]
    pub ports: Vec<String>,
}

impl Trunk {
    pub fn new(group: impl Into<String>) -> Self {
        let group = group.into();
        Self {
            name: group.clone(),
            group,
            r#type: None,
            ports: Vec::new(),
        }
    }

    /// Append a port, unless it is already a member. Each port appears at most
    /// once in `ports` regardless of how many times it is observed.
    pub fn add_port(&mut self, port: impl Into<String>) {
        let port = port.into();
        if !self.ports.iter().any(|p| p == &port) {
            self.ports.push(port);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_port_deduplicates() {
        let mut trunk = Trunk::new("Trk3");
        trunk.add_port("A13");
        trunk.add_port("A14");
        trunk.add_port("A13");
        assert_eq!(trunk.ports, vec!["A13".to_string(), "A14".to_string()]);
    }
}
