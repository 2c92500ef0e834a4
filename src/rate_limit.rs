//! Per-bucket rate-limit tracking from response headers.
//!
//! The tracker is advisory and local to one client. It never talks to the
//! server; it only sleeps before a request when the last response seen for
//! the same bucket said no requests were left.

use log::debug;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

/// Header naming the server-side bucket. State is only recorded when present.
pub const BUCKET_HEADER: &str = "x-ratelimit-bucket";
pub const RESET_AFTER_HEADER: &str = "x-ratelimit-reset-after";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Upper bound on a single wait, whatever the server reports.
pub const MAX_RESET_AFTER: Duration = Duration::from_secs(3600);

/// Last-known limit state for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BucketState {
    /// Seconds until the bucket resets.
    pub reset_after: f64,
    pub remaining: u64,
    /// Seconds the server asked us to back off.
    pub retry_after: f64,
}

impl BucketState {
    /// Parses limit headers, falling back to zero for missing or unparsable values.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            reset_after: header_or_default(headers, RESET_AFTER_HEADER),
            remaining: header_or_default(headers, REMAINING_HEADER),
            retry_after: header_or_default(headers, RETRY_AFTER.as_str()),
        }
    }

    /// How long the next request on this bucket has to wait, capped at
    /// [`MAX_RESET_AFTER`]. Negative or NaN resets mean no wait.
    pub fn delay(&self) -> Option<Duration> {
        if self.remaining > 0 {
            return None;
        }
        if self.reset_after.is_nan() || self.reset_after <= 0.0 {
            return Some(Duration::ZERO);
        }
        let delay = Duration::try_from_secs_f64(self.reset_after).unwrap_or(MAX_RESET_AFTER);
        Some(delay.min(MAX_RESET_AFTER))
    }
}

fn header_or_default<T: FromStr + Default>(headers: &HeaderMap, name: &str) -> T {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_default()
}

/// Tracks [`BucketState`] per bucket name.
///
/// The check in [`RateLimiter::wait_if_needed`] and the update in
/// [`RateLimiter::record`] are separate steps, so concurrent calls on the same
/// bucket can all pass the check before any of them records new state. The
/// lock only guards the map and is never held across an await.
#[derive(Debug, Default)]
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, BucketState>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the limit state from `headers` under `bucket`, replacing any
    /// previous state. Responses without a bucket header are ignored.
    pub fn record(&self, bucket: &str, headers: &HeaderMap) {
        let Some(server_bucket) = headers.get(BUCKET_HEADER) else {
            return;
        };

        let state = BucketState::from_headers(headers);
        debug!(
            "Rate limit for {} (server bucket {:?}): remaining={}, reset_after={}s, retry_after={}s",
            bucket, server_bucket, state.remaining, state.reset_after, state.retry_after
        );

        self.lock().insert(bucket.to_string(), state);
    }

    /// Sleeps until the bucket resets if its last recorded state had no
    /// requests remaining. Unknown buckets return immediately.
    #[tracing::instrument(skip(self))]
    pub async fn wait_if_needed(&self, bucket: &str) {
        let delay = self.lock().get(bucket).and_then(BucketState::delay);

        if let Some(delay) = delay {
            debug!("Bucket {} exhausted, waiting {:?}", bucket, delay);
            tokio::time::sleep(delay).await;
        }
    }

    /// Returns a copy of the recorded state for `bucket`.
    pub fn state(&self, bucket: &str) -> Option<BucketState> {
        self.lock().get(bucket).copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, BucketState>> {
        // The map holds plain values, so a poisoned lock still has usable data.
        self.buckets.lock().unwrap_or_else(|e| e.into_inner())
    }
}
