use std::time::Duration;

use parsers::{select_parser, VendorParser};
use session::{SessionError, SshSession};
use shared::auth::{get_params, AuthError};
use shared::config::Config;
use shared::model::{Device, DeviceStatus, ExploredSet};
use tracing::{error, info, warn};

const SSH_PORT: u16 = 22;

/// What one call to `explore_host` produced: the completed (or
/// partially-completed, on a terminal failure) device, and the neighbors it
/// discovered that the crawl controller should consider enqueuing.
pub struct ExploreOutcome {
    pub device: Device,
    pub neighbors: Vec<Device>,
}

/// Run the full single-host exploration sequence against `stub`, inserting
/// the result into `explored` under its identity key regardless of outcome.
///
/// Credentials are resolved against the literal device type `"unknown"`:
/// the vendor is not known until the banner is read in step 3, well after
/// credentials must already have been chosen, so the per-vendor auth
/// fallback profiles (`[Auth.hp]` etc.) are only reachable via an
/// `[Auth.unknown]` profile an operator defines explicitly. Hostname-glob
/// rules and `[Auth.default]` are the practical paths for a fresh host.
pub async fn explore_host(config: &Config, explored: &ExploredSet, stub: Device) -> ExploreOutcome {
    let hostname = stub.system_name.clone();
    let mut device = stub;

    let auth = match get_params(config, &hostname, "unknown") {
        Ok(auth) => auth,
        Err(AuthError::NoAuthRequested) => {
            info!(host = %hostname, "no auth requested for this host");
            return terminate(explored, device, DeviceStatus::NoAuthRequested);
        }
        Err(err) => {
            warn!(host = %hostname, error = %err, "could not resolve credentials");
            return terminate(explored, device, DeviceStatus::AuthFailed);
        }
    };

    let timeout = Duration::from_secs_f64(config.ssh.timeout);
    let max_bytes = config.ssh.maximum_bytes_to_receive;
    let max_attempts = config.ssh.maximum_attempts.max(1);

    let mut session = match open_with_retry(&hostname, &auth, timeout, max_bytes, max_attempts).await {
        Ok(session) => session,
        Err(DeviceStatus::AuthFailed) => {
            warn!(host = %hostname, "authentication rejected");
            return terminate(explored, device, DeviceStatus::AuthFailed);
        }
        Err(status) => {
            warn!(host = %hostname, "host unreachable after {} attempt(s)", max_attempts);
            return terminate(explored, device, status);
        }
    };

    match explore_over_session(&mut session, &hostname, &mut device).await {
        Ok(neighbors) => {
            session.close().await;
            info!(host = %hostname, "exploration complete");
            device.status = Some(DeviceStatus::Ok);
            explored.insert(device.identity_key().to_string(), device.clone());
            ExploreOutcome { device, neighbors }
        }
        Err(status) => {
            session.close().await;
            terminate(explored, device, status)
        }
    }
}

fn terminate(explored: &ExploredSet, mut device: Device, status: DeviceStatus) -> ExploreOutcome {
    device.status = Some(status);
    explored.insert(device.identity_key().to_string(), device.clone());
    ExploreOutcome {
        device,
        neighbors: Vec::new(),
    }
}

async fn open_with_retry(
    hostname: &str,
    auth: &shared::auth::AuthParams,
    timeout: Duration,
    max_bytes: usize,
    max_attempts: u32,
) -> Result<SshSession, DeviceStatus> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match SshSession::open(hostname, SSH_PORT, auth, timeout, max_bytes).await {
            Ok(session) => return Ok(session),
            Err(SessionError::AuthFailure { .. }) => return Err(DeviceStatus::AuthFailed),
            Err(err) if attempt < max_attempts => {
                warn!(host = %hostname, attempt, error = %err, "connection attempt failed, retrying");
                tokio::time::sleep(Duration::from_millis(200 * attempt as u64)).await;
            }
            Err(err) => {
                warn!(host = %hostname, attempt, error = %err, "connection attempt failed, giving up");
                return Err(DeviceStatus::Unreachable);
            }
        }
    }
}

fn session_error_to_status(hostname: &str, err: &SessionError) -> DeviceStatus {
    error!(host = %hostname, error = %err, "SSH session failed mid-exploration");
    match err {
        SessionError::AuthFailure { .. } => DeviceStatus::AuthFailed,
        _ => DeviceStatus::Unreachable,
    }
}

/// Steps 3-9 of the host explorer, run over an already-open session.
/// Returns the discovered neighbors, or the terminal status to record when a
/// step short-circuits the rest of the sequence.
async fn explore_over_session(
    session: &mut SshSession,
    hostname: &str,
    device: &mut Device,
) -> Result<Vec<Device>, DeviceStatus> {
    let banner = session
        .read_output()
        .await
        .map_err(|e| session_error_to_status(hostname, &e))?;

    let Some(mut parser) = select_parser(&banner) else {
        warn!(host = %hostname, "banner matched no known vendor");
        return Err(DeviceStatus::Unrecognized);
    };

    for cmd in parser.preparation_commands() {
        session
            .send(cmd, parser.prompt_marker())
            .await
            .map_err(|e| session_error_to_status(hostname, &e))?;
    }

    if device.mac_address.is_empty() {
        let local_text = match parser.lldp_local_cmd() {
            Some(cmd) => session
                .send(cmd, parser.prompt_marker())
                .await
                .map_err(|e| session_error_to_status(hostname, &e))?,
            None => String::new(),
        };
        let parsed = parser.parse_device_from_lldp_local_info(&local_text);
        if parsed.mac_address.is_empty() {
            error!(host = %hostname, "local LLDP report yielded no MAC address");
            return Err(DeviceStatus::ParseFailed);
        }
        *device = parsed;
    }

    let summary_text = match parser.lldp_neighbors_cmd() {
        Some(cmd) => session
            .send(cmd, parser.prompt_marker())
            .await
            .map_err(|e| session_error_to_status(hostname, &e))?,
        None => String::new(),
    };
    device.interfaces = parser.parse_interfaces_from_lldp_remote_info(&summary_text);

    let detail_supported = parser.lldp_neighbors_detail_cmd("").is_some();
    let texts: Vec<String> = if detail_supported {
        let valid_ports: Vec<String> = device
            .interfaces
            .values()
            .filter(|iface| iface.is_valid_lldp_interface())
            .map(|iface| iface.local_port.clone())
            .collect();

        let mut collected = Vec::with_capacity(valid_ports.len());
        for port in valid_ports {
            if let Some(cmd) = parser.lldp_neighbors_detail_cmd(&port) {
                let detail = session
                    .send(&cmd, parser.prompt_marker())
                    .await
                    .map_err(|e| session_error_to_status(hostname, &e))?;
                collected.push(detail);
            }
        }
        collected
    } else {
        vec![summary_text]
    };

    let neighbors = parser.parse_devices_from_lldp_remote_info(device, &texts);

    if let Some(global_cmd) = parser.vlans_global_cmd() {
        let global_text = session
            .send(global_cmd, parser.prompt_marker())
            .await
            .map_err(|e| session_error_to_status(hostname, &e))?;
        let vlans = parser.parse_vlans(&global_text);

        if vlans.is_empty() {
            parser.associate_vlans_to_interfaces(&mut device.interfaces, &global_text);
        } else {
            for vlan in vlans.values() {
                if let Some(cmd) = parser.vlans_specific_cmd(vlan) {
                    let detail = session
                        .send(&cmd, parser.prompt_marker())
                        .await
                        .map_err(|e| session_error_to_status(hostname, &e))?;
                    parser.associate_vlan_to_interfaces(&mut device.interfaces, vlan, &detail);
                }
            }
        }
    }

    let trunk_text = match parser.trunks_list_cmd() {
        Some(cmd) => session
            .send(cmd, parser.prompt_marker())
            .await
            .map_err(|e| session_error_to_status(hostname, &e))?,
        None => String::new(),
    };
    device.trunks = parser.parse_trunks(&mut device.interfaces, &trunk_text);

    if let Some(cmd) = parser.vms_list_cmd() {
        let vm_text = session
            .send(cmd, parser.prompt_marker())
            .await
            .map_err(|e| session_error_to_status(hostname, &e))?;
        device.virtual_machines = parser.parse_vms_list(&vm_text);
    }

    Ok(neighbors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::config::{AuthProfile, AuthRule, NetworkmapSection, SshSection};
    use shared::model::new_explored_set;
    use std::collections::HashMap;

    fn config_with_no_auth_rule() -> Config {
        Config {
            networkmap: NetworkmapSection {
                protocol: "LLDP".to_string(),
                source_address: "sw1".to_string(),
                output_file: "out.json".to_string(),
                log_file: None,
                max_concurrency: None,
            },
            ssh: SshSection::default(),
            auth_rules: vec![AuthRule {
                hostname_glob: "*".to_string(),
                profile: "".to_string(),
            }],
            auth_profiles: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn no_auth_requested_short_circuits_without_connecting() {
        let config = config_with_no_auth_rule();
        let explored = new_explored_set();
        let stub = Device::stub("sw1");

        let outcome = explore_host(&config, &explored, stub).await;

        assert_eq!(outcome.device.status, Some(DeviceStatus::NoAuthRequested));
        assert!(outcome.neighbors.is_empty());
        assert!(explored.contains_key("sw1"));
    }

    #[tokio::test]
    async fn missing_auth_profile_is_recorded_as_auth_failed() {
        let config = Config {
            networkmap: NetworkmapSection {
                protocol: "LLDP".to_string(),
                source_address: "sw1".to_string(),
                output_file: "out.json".to_string(),
                log_file: None,
                max_concurrency: None,
            },
            ssh: SshSection::default(),
            auth_rules: vec![],
            auth_profiles: HashMap::new(),
        };
        let explored = new_explored_set();
        let stub = Device::stub("sw1");

        let outcome = explore_host(&config, &explored, stub).await;

        assert_eq!(outcome.device.status, Some(DeviceStatus::AuthFailed));
        assert!(outcome.neighbors.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_is_recorded_after_retry_budget() {
        let mut profiles = HashMap::new();
        profiles.insert(
            "default".to_string(),
            AuthProfile {
                username: "admin".to_string(),
                password: Some("hunter2".to_string()),
                key: None,
            },
        );
        let config = Config {
            networkmap: NetworkmapSection {
                protocol: "LLDP".to_string(),
                source_address: "sw1".to_string(),
                output_file: "out.json".to_string(),
                log_file: None,
                max_concurrency: None,
            },
            ssh: SshSection {
                timeout: 0.2,
                maximum_bytes_to_receive: 4096,
                maximum_attempts: 2,
            },
            auth_rules: vec![],
            auth_profiles: profiles,
        };
        let explored = new_explored_set();
        // Nothing listens on localhost:22 in a sandboxed test environment, so
        // this reliably exercises the retry-then-give-up path without a real
        // network dependency.
        let stub = Device::stub("127.0.0.1");

        let outcome = explore_host(&config, &explored, stub).await;

        assert_eq!(outcome.device.status, Some(DeviceStatus::Unreachable));
        assert!(outcome.neighbors.is_empty());
    }
}
