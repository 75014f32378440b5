use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashSet;
use explorer::explore_host;
use shared::config::Config;
use shared::model::{new_explored_set, Device, ExploredSet};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Drives the crawl to completion: seeds the queue with `seed`, explores hosts
/// with up to `Networkmap.MaxConcurrency` workers in flight at once, and
/// enqueues each LLDP-valid neighbor exactly once across the whole run.
///
/// The queue itself is plain (only this function ever touches it); the
/// `explored` map and the dedup set behind it are the structures actually
/// shared across concurrently-running workers, and those are what need to be
/// concurrency-safe.
///
/// On `shutdown` cancellation, no new workers are launched; workers already in
/// flight are allowed to finish so their results are not lost, then the
/// explored-set accumulated so far is returned.
pub async fn run_crawl(config: &Config, seed: Device, shutdown: CancellationToken) -> ExploredSet {
    let explored = new_explored_set();
    let seen: Arc<DashSet<String>> = Arc::new(DashSet::new());
    let mut queue: VecDeque<Device> = VecDeque::new();

    seen.insert(seed.identity_key().to_string());
    queue.push_back(seed);

    let config = Arc::new(config.clone());
    let semaphore = config
        .networkmap
        .max_concurrency
        .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

    let mut workers: JoinSet<explorer::ExploreOutcome> = JoinSet::new();

    loop {
        if shutdown.is_cancelled() {
            info!("shutdown requested, draining in-flight workers");
            while workers.join_next().await.is_some() {}
            break;
        }

        while let Some(stub) = queue.pop_front() {
            let permit = match &semaphore {
                Some(sem) => match sem.clone().acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => unreachable!("the semaphore is never closed"),
                },
                None => None,
            };
            let config = config.clone();
            let explored = explored.clone();
            workers.spawn(async move {
                let outcome = explore_host(&config, &explored, stub).await;
                drop(permit);
                outcome
            });
        }

        if workers.is_empty() {
            break;
        }

        tokio::select! {
            _ = shutdown.cancelled() => continue,
            Some(result) = workers.join_next() => {
                match result {
                    Ok(outcome) => {
                        seen.insert(outcome.device.identity_key().to_string());
                        for neighbor in outcome.neighbors {
                            if should_enqueue(&neighbor, &seen) {
                                queue.push_back(neighbor);
                            }
                        }
                    }
                    Err(join_err) => {
                        error!(error = %join_err, "crawl worker task panicked");
                    }
                }
            }
        }
    }

    explored
}

/// A neighbor is enqueued iff it is LLDP-valid and its identity has not
/// already been seen this run. Atomic on `seen` so two workers reporting the
/// same neighbor at once enqueue it exactly once.
fn should_enqueue(neighbor: &Device, seen: &DashSet<String>) -> bool {
    neighbor.is_valid_for_lldp_traversal() && seen.insert(neighbor.identity_key().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::config::{NetworkmapSection, SshSection};
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
            auth_rules: vec![shared::config::AuthRule {
                hostname_glob: "*".to_string(),
                profile: "".to_string(),
            }],
            auth_profiles: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn single_unreachable_seed_terminates_with_one_entry() {
        let config = config_with_no_auth_rule();
        let seed = Device::stub("sw1");

        let explored = run_crawl(&config, seed, CancellationToken::new()).await;

        assert_eq!(explored.len(), 1);
        assert!(explored.contains_key("sw1"));
    }

    #[tokio::test]
    async fn shutdown_requested_before_any_worker_launches_yields_empty_set() {
        let config = config_with_no_auth_rule();
        let seed = Device::stub("sw1");
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let explored = run_crawl(&config, seed, shutdown).await;

        assert!(explored.is_empty());
    }

    fn lldp_valid_device(name: &str, mac: &str) -> Device {
        Device {
            system_name: name.to_string(),
            mac_address: mac.to_string(),
            system_description: "HP ProCurve".to_string(),
            enabled_capabilities: "Bridge".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn a_reverse_edge_between_two_switches_is_not_re_enqueued() {
        let seen: DashSet<String> = DashSet::new();
        seen.insert("sw1".to_string());

        let sw2 = lldp_valid_device("sw2", "00:11:22:33:44:02");
        assert!(should_enqueue(&sw2, &seen));

        // sw2's own worker later reports sw1 back as its neighbor.
        let sw1_reported_back = lldp_valid_device("sw1", "00:11:22:33:44:01");
        seen.insert("00:11:22:33:44:01".to_string()); // sw1's worker recorded its real MAC on completion
        assert!(!should_enqueue(&sw1_reported_back, &seen));
    }

    #[test]
    fn a_device_missing_bridge_capability_or_known_vendor_is_never_enqueued() {
        let seen: DashSet<String> = DashSet::new();
        let mut server = lldp_valid_device("host1", "00:11:22:33:44:03");
        server.enabled_capabilities = "Router".to_string();

        assert!(!should_enqueue(&server, &seen));
        assert!(!seen.contains("00:11:22:33:44:03"));
    }
}
