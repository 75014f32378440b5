use std::sync::Arc;

use dashmap::DashMap;

use super::Device;

/// The crawl's shared `mac → Device` map (plus any stub-keyed failure
/// entries). `DashMap` gives the atomic contains-or-insert the crawl
/// controller needs to avoid enqueuing the same device twice from
/// concurrently-completing workers.
pub type ExploredSet = Arc<DashMap<String, Device>>;

pub fn new_explored_set() -> ExploredSet {
    Arc::new(DashMap::new())
}
