//! Request-keyed cache for remote data.
//!
//! Each [`QueryCache`] holds one kind of record behind an `Arc<RwLock<..>>`,
//! keyed by the request that produced it. A read returns fresh cached data
//! directly, otherwise it fetches with retry and records the outcome as a
//! [`QueryState`] the views can render.

use crate::config::CacheConfig;
use crate::errors::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Identifies one request, e.g. `["app", "pharmacy-pro"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Key built from its parts, e.g. `["app", slug]`.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Parts of the key, in order.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(parts: [&str; N]) -> Self {
        Self::new(parts)
    }
}

/// What a view shows for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Never requested, or invalidated
    Idle,
    /// A fetch is in flight
    Loading,
    /// Every attempt failed
    Error {
        /// Message of the last failure
        message: String,
        /// Attempts made, retries included
        failure_count: u32,
    },
    /// Last successful result
    Data {
        /// The fetched value
        value: T,
        /// When it was fetched
        fetched_at: DateTime<Utc>,
    },
}

impl<T> QueryState<T> {
    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The cached value, only in the `Data` state.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Data { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Retry and freshness rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Extra attempts after the first failure
    pub retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub retry_delay: Duration,
    /// Upper bound on the retry delay
    pub max_retry_delay: Duration,
    /// Age after which data is refetched on the next read
    pub stale_after: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for CachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            retries: config.retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            max_retry_delay: Duration::from_millis(config.max_retry_delay_ms),
            stale_after: Duration::from_secs(config.stale_after_secs),
        }
    }
}

impl CachePolicy {
    /// Delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.retry_delay
            .saturating_mul(factor)
            .min(self.max_retry_delay)
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>) -> bool {
        (Utc::now() - fetched_at)
            .to_std()
            .map_or(true, |age| age < self.stale_after)
    }
}

/// Cache of one record type.
#[derive(Debug)]
pub struct QueryCache<T> {
    entries: Arc<RwLock<HashMap<QueryKey, QueryState<T>>>>,
    policy: CachePolicy,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            policy: self.policy,
        }
    }
}

impl<T: Clone> QueryCache<T> {
    /// Empty cache governed by `policy`.
    #[must_use]
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            policy,
        }
    }

    /// Current state of `key`.
    pub async fn state(&self, key: &QueryKey) -> QueryState<T> {
        self.entries
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or(QueryState::Idle)
    }

    /// Returns cached data for `key` when fresh, otherwise runs `fetcher`.
    ///
    /// A failed fetch is retried `policy.retries` times with exponential
    /// backoff. When every attempt fails the entry moves to
    /// [`QueryState::Error`] and the last error is returned; previously cached
    /// data is dropped.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let QueryState::Data { value, fetched_at } = self.state(key).await {
            if self.policy.is_fresh(fetched_at) {
                debug!("Cache hit for {:?}", key.parts());
                return Ok(value);
            }
            debug!("Cached data for {:?} is stale, refetching", key.parts());
        }

        self.set(key, QueryState::Loading).await;

        let mut failures = 0;
        loop {
            match fetcher().await {
                Ok(value) => {
                    self.set(
                        key,
                        QueryState::Data {
                            value: value.clone(),
                            fetched_at: Utc::now(),
                        },
                    )
                    .await;
                    return Ok(value);
                }
                Err(e) => {
                    failures += 1;
                    if failures > self.policy.retries {
                        warn!(
                            "Fetching {:?} failed after {} attempts: {}",
                            key.parts(),
                            failures,
                            e
                        );
                        self.set(
                            key,
                            QueryState::Error {
                                message: e.user_message(),
                                failure_count: failures,
                            },
                        )
                        .await;
                        return Err(e);
                    }
                    let delay = self.policy.backoff(failures);
                    debug!(
                        "Fetching {:?} failed ({}), retrying in {:?}",
                        key.parts(),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Drops `key` so the next read refetches.
    pub async fn invalidate(&self, key: &QueryKey) {
        self.entries.write().await.remove(key);
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        info!("Clearing {} cached queries", entries.len());
        entries.clear();
    }

    async fn set(&self, key: &QueryKey, state: QueryState<T>) {
        self.entries.write().await.insert(key.clone(), state);
    }
}
