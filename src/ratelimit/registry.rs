//! Per-client rate limit registry with idle-entry eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::bucket::TokenBucket;

/// Configuration for a [`RateLimitRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How often the background sweep runs
    pub sweep_interval: Duration,
    /// How long a client may be idle before its entry is evicted
    pub idle_threshold: Duration,
    /// Window over which a bucket refills to full capacity
    pub refill_period: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),
            idle_threshold: Duration::from_secs(60),
            refill_period: Duration::from_secs(60),
        }
    }
}

/// Key identifying a rate limit bucket in the registry.
///
/// Buckets are keyed by client AND limit class. Two routes configured with
/// different per-minute limits enforce independent budgets against the same
/// caller, rather than the first-seen route's limit applying to both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    /// The caller's identity, the source IP with port stripped
    pub client: String,
    /// The route's configured requests-per-minute limit
    pub limit: u32,
}

/// Per-client state: the admission bucket plus the activity timestamp the
/// eviction sweep keys off.
struct ClientEntry {
    bucket: TokenBucket,
    last_seen: Instant,
}

/// The registry that owns all per-client rate limit buckets.
///
/// A single mutex guards the whole map; every critical section is an O(1)
/// lookup, insert, or delete, so coarse locking is sufficient here. The
/// struct is thread-safe and shared across request tasks behind an `Arc`.
pub struct RateLimitRegistry {
    entries: Mutex<HashMap<BucketKey, ClientEntry>>,
    config: RegistryConfig,
}

impl RateLimitRegistry {
    /// Create a new registry with the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Decide whether `client` may perform one more request under a
    /// `limit` requests-per-minute budget.
    ///
    /// The bucket is created on first sight, full, so a new client can burst
    /// up to `limit` requests. `last_seen` is refreshed on every call,
    /// admitted or denied; being throttled still counts as activity.
    pub fn admit(&self, client: &str, limit: u32) -> bool {
        self.admit_at(client, limit, Instant::now())
    }

    /// `admit` with an explicit clock reading. Useful for tests.
    pub fn admit_at(&self, client: &str, limit: u32, now: Instant) -> bool {
        let key = BucketKey {
            client: client.to_string(),
            limit,
        };

        let mut entries = self.entries.lock();
        let entry = entries.entry(key).or_insert_with(|| {
            debug!(client, limit, "creating rate limit bucket");
            ClientEntry {
                // Created on the caller's clock so the first refill window
                // is measured from the same origin as the admissions.
                bucket: TokenBucket::with_period_at(limit, self.config.refill_period, now),
                last_seen: now,
            }
        });

        entry.last_seen = now;
        let admitted = entry.bucket.try_acquire_at(now);
        trace!(client, limit, admitted, "admission check");
        admitted
    }

    /// Remove every entry idle past the configured threshold.
    ///
    /// Returns the number of entries evicted.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// `sweep` with an explicit clock reading. Useful for tests.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= self.config.idle_threshold);
        before - entries.len()
    }

    /// Number of live bucket entries.
    pub fn entry_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Spawn the background eviction sweep.
    ///
    /// The task runs `sweep` once per configured interval until the returned
    /// handle is shut down, which stops it deterministically.
    pub fn start_sweeper(self: Arc<Self>) -> SweeperHandle {
        let registry = self;
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(registry.config.sweep_interval);
            // The first tick completes immediately; consume it so the first
            // sweep happens one full interval after startup.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = registry.sweep();
                        if evicted > 0 {
                            debug!(evicted, remaining = registry.entry_count(), "evicted idle clients");
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            debug!("eviction sweeper stopping");
                            break;
                        }
                    }
                }
            }
        });

        SweeperHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

impl Default for RateLimitRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

/// Handle to the background eviction sweep task.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the sweeper to stop and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
