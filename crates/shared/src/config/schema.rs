use serde::Deserialize;

use crate::konst::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BYTES_TO_RECEIVE, DEFAULT_SSH_TIMEOUT_SECS};

/// `[Networkmap]` section.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkmapSection {
    /// Must equal `"LLDP"`; validated by the loader, not by serde, so the error
    /// message can name the offending value.
    pub protocol: String,
    pub source_address: String,
    pub output_file: String,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

/// `[SSH]` section.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SshSection {
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    #[serde(default = "default_max_bytes")]
    pub maximum_bytes_to_receive: usize,
    #[serde(default = "default_max_attempts")]
    pub maximum_attempts: u32,
}

fn default_timeout() -> f64 {
    DEFAULT_SSH_TIMEOUT_SECS
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_BYTES_TO_RECEIVE
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for SshSection {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            maximum_bytes_to_receive: default_max_bytes(),
            maximum_attempts: default_max_attempts(),
        }
    }
}

/// One `glob = "profile_name"` entry from `[Auth]`, in file declaration order.
/// An empty `profile` means "explicitly skip this host".
#[derive(Clone, Debug)]
pub struct AuthRule {
    pub hostname_glob: String,
    pub profile: String,
}

/// An `[Auth.<profile>]` credential bundle. Exactly one of
/// `{password}`, `{key}`, `{password, key}` must be set; the loader enforces
/// this since it is not expressible as a plain serde shape without losing the
/// distinction between "absent" and "empty".
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthProfile {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl AuthProfile {
    pub fn is_well_formed(&self) -> bool {
        self.password.is_some() || self.key.is_some()
    }
}

/// The fully parsed configuration file.
#[derive(Clone, Debug)]
pub struct Config {
    pub networkmap: NetworkmapSection,
    pub ssh: SshSection,
    pub auth_rules: Vec<AuthRule>,
    pub auth_profiles: std::collections::HashMap<String, AuthProfile>,
}
