//! Concurrent registry prefetch
//!
//! The solver is synchronous, so registry data is collected up front: every
//! requested name is fetched through a `RegistryAdapter` with bounded
//! concurrency and the results land in a `ReleaseIndex`.

use crate::progress::{FetchProgress, FetchSummary};
use crate::registry::{fetch_with_fallback, RegistryAdapter, ReleaseIndex};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Fetches releases for many packages at once
pub struct Prefetcher {
    adapter: Arc<dyn RegistryAdapter>,
    semaphore: Arc<Semaphore>,
}

impl Prefetcher {
    /// Create a prefetcher allowing `concurrency` requests in flight
    pub fn new(adapter: Box<dyn RegistryAdapter>, concurrency: usize) -> Self {
        Self {
            adapter: Arc::from(adapter),
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Fetch every distinct name; failures are recorded in the index, not raised
    pub async fn prefetch(
        &self,
        names: &[String],
        show_progress: bool,
    ) -> (ReleaseIndex, FetchSummary) {
        let registry = self.adapter.registry_name();
        let mut index = ReleaseIndex::new(registry);
        let mut tasks = JoinSet::new();

        let mut pending: Vec<&String> = names.iter().collect();
        pending.sort();
        pending.dedup();
        let progress = FetchProgress::new(show_progress, pending.len(), registry);

        for name in pending {
            let adapter = Arc::clone(&self.adapter);
            let semaphore = Arc::clone(&self.semaphore);
            let name = name.clone();
            tasks.spawn(async move {
                // The semaphore is never closed, so acquiring cannot fail
                let _permit = semaphore.acquire_owned().await;
                let result = fetch_with_fallback(adapter.as_ref(), &name).await;
                (name, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (name, result) = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "registry fetch task failed");
                    continue;
                }
            };
            match result {
                Ok(set) => {
                    debug!(package = %name, canonical = %set.name, releases = set.releases.len(), "fetched releases");
                    progress.fetched(&name);
                    index.insert(name, set);
                }
                Err(e) => {
                    debug!(package = %name, error = %e, "fetch failed");
                    progress.failed(&name);
                    index.record_failure(name, e);
                }
            }
        }

        (index, progress.finish())
    }
}
