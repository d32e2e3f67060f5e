//! Identity of the end user behind a request token

use crate::constants::CACHE_EXPIRY_MARGIN_SECS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Channel member resolved from a request token.
///
/// For one developer account the same person always maps to the same
/// `open_id`, whichever of the developer's channels the request came from, so
/// it is the value to key application data on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "channelCreator", default)]
    pub channel_creator: bool,
    /// Unix timestamp (seconds) at which the request token stops being valid
    #[serde(rename = "expiredAt", default)]
    pub expired_at: i64,
    #[serde(rename = "openID", default)]
    pub open_id: String,
}

impl Member {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expired_at, 0)
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expired_at
    }

    /// Remaining lifetime at `now`, `None` once expired
    pub fn ttl_at(&self, now: i64) -> Option<Duration> {
        let remaining = self.expired_at.checked_sub(now)?;
        if remaining <= 0 {
            return None;
        }
        Some(Duration::from_secs(remaining as u64))
    }

    /// Anonymous identities and identities about to expire are not worth caching
    pub fn is_cacheable_at(&self, now: i64) -> bool {
        !self.open_id.is_empty()
            && self.expired_at.saturating_sub(CACHE_EXPIRY_MARGIN_SECS) > now
    }
}
