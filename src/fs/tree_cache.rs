//! Folder listing cache and its staleness policy.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::CloudItem;

/// Inputs of a staleness decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCheck {
    /// A listing has been fetched before
    pub has_listing: bool,
    /// Time since the last successful fetch
    pub since_last_fetch: Option<Duration>,
    /// Result of a disk-usage probe, if one was made
    pub usage_changed: Option<bool>,
    /// The caller mutated the folder and wants a fresh listing
    pub forced: bool,
}

/// Decides when a cached listing must be fetched again.
pub trait StalenessPolicy: fmt::Debug + Send + Sync {
    /// Minimum age of a listing before a disk-usage probe is worth making.
    fn probe_window(&self) -> Duration;

    fn is_stale(&self, check: &CacheCheck) -> bool;

    /// Whether the caller should probe disk usage before deciding.
    fn wants_probe(&self, check: &CacheCheck) -> bool {
        check.has_listing
            && !check.forced
            && check
                .since_last_fetch
                .is_some_and(|elapsed| elapsed > self.probe_window())
    }
}

/// Refetch when there is no listing, when the listing is older than the window
/// and used bytes moved, or on demand.
#[derive(Debug, Clone, Copy)]
pub struct DiskUsagePolicy {
    pub window: Duration,
}

impl Default for DiskUsagePolicy {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(1),
        }
    }
}

impl StalenessPolicy for DiskUsagePolicy {
    fn probe_window(&self) -> Duration {
        self.window
    }

    fn is_stale(&self, check: &CacheCheck) -> bool {
        if !check.has_listing || check.forced {
            return true;
        }
        let aged = check
            .since_last_fetch
            .is_some_and(|elapsed| elapsed > self.window);
        aged && check.usage_changed == Some(true)
    }
}

/// One level of children of a folder, plus what is needed to judge freshness.
#[derive(Debug, Clone)]
pub struct TreeCache {
    items: Option<Vec<CloudItem>>,
    last_listed_at: Option<Instant>,
    last_known_used_bytes: Option<i64>,
    policy: Arc<dyn StalenessPolicy>,
}

impl Default for TreeCache {
    fn default() -> Self {
        Self {
            items: None,
            last_listed_at: None,
            last_known_used_bytes: None,
            policy: Arc::new(DiskUsagePolicy::default()),
        }
    }
}

impl TreeCache {
    /// Cache seeded with a listing fetched just now.
    pub(crate) fn with_listing(items: Vec<CloudItem>) -> Self {
        let mut cache = Self::default();
        cache.store(items);
        cache
    }

    pub fn items(&self) -> Option<&[CloudItem]> {
        self.items.as_deref()
    }

    pub fn has_listing(&self) -> bool {
        self.items.is_some()
    }

    pub fn policy(&self) -> &Arc<dyn StalenessPolicy> {
        &self.policy
    }

    pub(crate) fn set_policy(&mut self, policy: Arc<dyn StalenessPolicy>) {
        self.policy = policy;
    }

    /// Snapshot of the cache state for a decision made now.
    pub(crate) fn check(&self, forced: bool) -> CacheCheck {
        CacheCheck {
            has_listing: self.has_listing(),
            since_last_fetch: self.last_listed_at.map(|at| at.elapsed()),
            usage_changed: None,
            forced,
        }
    }

    /// Compare a probed used-bytes value with the one seen last.
    pub(crate) fn usage_changed(&self, used_bytes: i64) -> bool {
        self.last_known_used_bytes != Some(used_bytes)
    }

    pub(crate) fn record_usage(&mut self, used_bytes: i64) {
        self.last_known_used_bytes = Some(used_bytes);
    }

    /// Replace the listing after a successful fetch.
    pub(crate) fn store(&mut self, items: Vec<CloudItem>) {
        self.items = Some(items);
        self.last_listed_at = Some(Instant::now());
    }
}
