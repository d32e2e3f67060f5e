//! In-memory request token cache

use crate::clock::{Clock, SystemClock};
use crate::traits::RequestTokenCache;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use supermsg_core::{Member, Result};
use tokio::task::JoinHandle;

/// Interval between background sweeps of expired tokens
pub const DEFAULT_JANITOR_INTERVAL: Duration = Duration::from_secs(600);

/// Process-local token cache backed by a concurrent map.
///
/// Expiry is checked on every read, so the janitor only reclaims memory; a
/// stale entry is never served while it waits for the next sweep.
#[derive(Debug)]
pub struct MemoryCache {
    entries: DashMap<String, Member>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Shared cache swept every [`DEFAULT_JANITOR_INTERVAL`].
    ///
    /// Must be called from within a tokio runtime. The janitor stops once the
    /// last `Arc` is dropped.
    pub fn with_janitor() -> Arc<Self> {
        let cache = Arc::new(Self::new());
        cache.spawn_janitor(DEFAULT_JANITOR_INTERVAL);
        cache
    }

    /// Look up a token, dropping it if it has expired
    pub fn lookup(&self, token: &str) -> Option<Member> {
        let now = self.clock.now();
        let member = self.entries.get(token)?.value().clone();
        if member.is_expired_at(now) {
            // A concurrent set may have refreshed the entry since the read
            self.entries.remove_if(token, |_, m| m.is_expired_at(now));
            tracing::trace!("dropped expired request token on read");
            return None;
        }
        Some(member)
    }

    /// Store a member for the rest of its lifetime.
    ///
    /// Returns `false` without storing anything when the member has already
    /// expired; any older entry for the token is dropped as well.
    pub fn insert(&self, token: &str, member: Member) -> bool {
        let now = self.clock.now();
        match member.ttl_at(now) {
            Some(ttl) => {
                tracing::trace!(ttl_secs = ttl.as_secs(), "caching request token");
                self.entries.insert(token.to_string(), member);
                true
            }
            None => {
                self.entries.remove(token);
                false
            }
        }
    }

    pub fn remove(&self, token: &str) -> Option<Member> {
        self.entries.remove(token).map(|(_, member)| member)
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, member| !member.is_expired_at(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sweep expired entries every `interval` on the current tokio runtime.
    ///
    /// The task holds a weak reference and exits once the cache is dropped.
    pub fn spawn_janitor(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let purged = cache.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, remaining = cache.len(), "purged expired request tokens");
                }
            }
        })
    }
}

#[async_trait]
impl RequestTokenCache for MemoryCache {
    async fn get(&self, token: &str) -> Option<Member> {
        self.lookup(token)
    }

    async fn set(&self, token: &str, member: Member) -> Result<()> {
        self.insert(token, member);
        Ok(())
    }

    async fn delete(&self, token: &str) {
        self.remove(token);
    }
}
