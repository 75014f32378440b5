use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use toml_edit::{DocumentMut, Item};

use super::error::ConfigError;
use super::schema::{AuthProfile, AuthRule, Config, NetworkmapSection, SshSection};
use crate::konst::SUPPORTED_PROTOCOL;

#[derive(Deserialize)]
struct RawSections {
    #[serde(rename = "Networkmap")]
    networkmap: NetworkmapSection,
    #[serde(rename = "SSH", default)]
    ssh: SshSection,
}

/// Load and validate the configuration file at `path`.
///
/// The `[Auth]` table is walked with `toml_edit` rather than plain `serde`
/// deserialization into a `HashMap`, because the hostname-glob rules must be
/// resolved in their on-disk declaration order (see the auth resolver), and a
/// `HashMap` does not preserve that.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let raw: RawSections =
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    if raw.networkmap.protocol != SUPPORTED_PROTOCOL {
        return Err(ConfigError::UnsupportedProtocol(raw.networkmap.protocol));
    }

    let document: DocumentMut = contents
        .parse()
        .map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    let (auth_rules, auth_profiles) = parse_auth_table(&document)?;

    Ok(Config {
        networkmap: raw.networkmap,
        ssh: raw.ssh,
        auth_rules,
        auth_profiles,
    })
}

fn parse_auth_table(
    document: &DocumentMut,
) -> Result<(Vec<AuthRule>, HashMap<String, AuthProfile>), ConfigError> {
    let mut rules = Vec::new();
    let mut profiles = HashMap::new();

    let Some(auth_item) = document.get("Auth") else {
        return Ok((rules, profiles));
    };
    let Some(auth_table) = auth_item.as_table_like() else {
        return Ok((rules, profiles));
    };

    for (key, item) in auth_table.iter() {
        match item {
            Item::Value(value) if value.is_str() => {
                let profile = value.as_str().unwrap_or_default().to_string();
                rules.push(AuthRule {
                    hostname_glob: key.to_string(),
                    profile,
                });
            }
            _ => {
                if let Some(table) = item.as_table_like() {
                    let profile = profile_from_table(key, table)?;
                    profiles.insert(key.to_string(), profile);
                }
            }
        }
    }

    Ok((rules, profiles))
}

fn profile_from_table(
    name: &str,
    table: &dyn toml_edit::TableLike,
) -> Result<AuthProfile, ConfigError> {
    let username = table
        .get("Username")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::MalformedProfile(name.to_string()))?;
    let password = table
        .get("Password")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let key = table
        .get("Key")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let profile = AuthProfile {
        username,
        password,
        key,
    };
    if !profile.is_well_formed() {
        return Err(ConfigError::MalformedProfile(name.to_string()));
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const VALID: &str = r#"
[Networkmap]
Protocol = "LLDP"
SourceAddress = "sw1"
OutputFile = "topology.json"
LogFile = "networkmap.log"

[SSH]
Timeout = 10.0
MaximumBytesToReceive = 65536
MaximumAttempts = 3

[Auth]
"MYGROUP*" = "mygroup"
"noauth*" = ""

[Auth.mygroup]
Username = "admin"
Password = "hunter2"

[Auth.default]
Username = "admin"
Key = "~/.ssh/id_ed25519"
"#;

    #[test]
    fn loads_valid_config_preserving_auth_order() {
        let file = write_temp(VALID);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.networkmap.source_address, "sw1");
        assert_eq!(config.ssh.maximum_attempts, 3);

        assert_eq!(config.auth_rules.len(), 2);
        assert_eq!(config.auth_rules[0].hostname_glob, "MYGROUP*");
        assert_eq!(config.auth_rules[0].profile, "mygroup");
        assert_eq!(config.auth_rules[1].hostname_glob, "noauth*");
        assert_eq!(config.auth_rules[1].profile, "");

        let mygroup = &config.auth_profiles["mygroup"];
        assert_eq!(mygroup.username, "admin");
        assert_eq!(mygroup.password.as_deref(), Some("hunter2"));
        assert!(mygroup.key.is_none());

        let default = &config.auth_profiles["default"];
        assert_eq!(default.key.as_deref(), Some("~/.ssh/id_ed25519"));
    }

    #[test]
    fn rejects_wrong_protocol() {
        let file = write_temp(VALID.replace("LLDP", "SNMP").as_str());
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedProtocol(p) if p == "SNMP"));
    }

    #[test]
    fn rejects_profile_without_password_or_key() {
        let bad = VALID.replace(r#"Password = "hunter2""#, "");
        let file = write_temp(&bad);
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedProfile(p) if p == "mygroup"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_config("/nonexistent/networkmap.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
