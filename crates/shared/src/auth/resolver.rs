use glob::Pattern;

use super::error::AuthError;
use crate::config::Config;
use crate::konst::DEFAULT_AUTH_PROFILE;

/// A credential bundle ready to hand to the session driver. Mirrors
/// `AuthProfile` but with `key` already shell-expanded, so nothing downstream
/// needs to know about `~`.
#[derive(Clone, Debug)]
pub struct AuthParams {
    pub username: String,
    pub password: Option<String>,
    pub key_path: Option<String>,
}

/// Resolve the credentials to use for `hostname` (a device of kind
/// `device_type`, e.g. `"hp"`, `"juniper"`, `"linux"`).
///
/// Hostname-glob rules are tried first, in declaration order, case
/// insensitively. Only if none match does resolution fall back to a profile
/// named after `device_type`, then to `"default"`.
pub fn get_params(
    config: &Config,
    hostname: &str,
    device_type: &str,
) -> Result<AuthParams, AuthError> {
    let hostname_lower = hostname.to_lowercase();

    for rule in &config.auth_rules {
        let Ok(pattern) = Pattern::new(&rule.hostname_glob.to_lowercase()) else {
            continue;
        };
        if !pattern.matches(&hostname_lower) {
            continue;
        }
        if rule.profile.is_empty() {
            return Err(AuthError::NoAuthRequested);
        }
        return profile_to_params(config, &rule.profile);
    }

    if config.auth_profiles.contains_key(device_type) {
        return profile_to_params(config, device_type);
    }
    if config.auth_profiles.contains_key(DEFAULT_AUTH_PROFILE) {
        return profile_to_params(config, DEFAULT_AUTH_PROFILE);
    }

    Err(AuthError::AuthConfigError(format!(
        "tried device-type profile \"{device_type}\" and \"{DEFAULT_AUTH_PROFILE}\""
    )))
}

fn profile_to_params(config: &Config, name: &str) -> Result<AuthParams, AuthError> {
    let profile = config
        .auth_profiles
        .get(name)
        .ok_or_else(|| AuthError::MissingProfile(name.to_string()))?;

    let key_path = profile
        .key
        .as_deref()
        .map(|raw| shellexpand::tilde(raw).into_owned());

    Ok(AuthParams {
        username: profile.username.clone(),
        password: profile.password.clone(),
        key_path,
    })
}
