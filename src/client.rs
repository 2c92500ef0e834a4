//! Rate-limited facade over the RoVer API.

use log::debug;
use reqwest::header::HeaderMap;
use std::future::Future;
use std::pin::Pin;

use crate::api::{RoverApi, RoverApiClient};
use crate::config::Config;
use crate::error::Result;
use crate::models::{DiscordLinkResult, LinkRecord, UpdateOutcome};
use crate::rate_limit::{BucketState, RateLimiter};

pub const DISCORD_TO_ROBLOX_BUCKET: &str = "discord_to_roblox";
pub const ROBLOX_TO_DISCORD_BUCKET: &str = "roblox_to_discord";
pub const UPDATE_USER_BUCKET: &str = "update_user";

/// Client for the RoVer API.
///
/// Every lookup first waits on its bucket if the last response for that
/// bucket reported no remaining requests, then sends the request and records
/// the new limit state from the response headers. Errors are returned as-is;
/// nothing is retried.
///
/// ```no_run
/// # async fn run() -> rover::Result<()> {
/// let mut client = rover::RoverClient::new("my-api-key");
/// client.open()?;
/// let link = client.get_roblox_from_discord(1, 2).await;
/// client.close();
/// println!("{}", link?.cached_username);
/// # Ok(())
/// # }
/// ```
pub struct RoverClient<A = RoverApiClient> {
    api: A,
    rate_limits: RateLimiter,
}

impl RoverClient<RoverApiClient> {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(Config::new(api_key))
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_api(RoverApiClient::new(config))
    }
}

impl<A: RoverApi> RoverClient<A> {
    pub fn with_api(api: A) -> Self {
        Self {
            api,
            rate_limits: RateLimiter::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn rate_limits(&self) -> &RateLimiter {
        &self.rate_limits
    }

    /// Last recorded limit state for one of the bucket names above.
    pub fn bucket_state(&self, bucket: &str) -> Option<BucketState> {
        self.rate_limits.state(bucket)
    }

    /// Opens the session. Fails with a configuration error when no API key is set.
    pub fn open(&mut self) -> Result<()> {
        self.api.open()
    }

    pub fn close(&mut self) {
        self.api.close()
    }

    /// Runs `f` inside an open session and closes it afterwards, whether `f`
    /// succeeded, failed or was cancelled by dropping the future.
    ///
    /// ```no_run
    /// # async fn run() -> rover::Result<()> {
    /// let mut client = rover::RoverClient::new("my-api-key");
    /// let outcome = client
    ///     .scoped(|c| Box::pin(async move { c.update_user(1, 2).await }))
    ///     .await?;
    /// println!("added {:?}", outcome.added_roles);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scoped<T, F>(&mut self, f: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c Self) -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'c>>,
    {
        self.open()?;
        let _session = CloseOnDrop(&self.api);
        f(&*self).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_roblox_from_discord(&self, guild_id: u64, user_id: u64) -> Result<LinkRecord> {
        self.limited(DISCORD_TO_ROBLOX_BUCKET, || {
            self.api.get_roblox_from_discord(guild_id, user_id)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_discord_from_roblox(
        &self,
        guild_id: u64,
        roblox_id: u64,
    ) -> Result<DiscordLinkResult> {
        self.limited(ROBLOX_TO_DISCORD_BUCKET, || {
            self.api.get_discord_from_roblox(guild_id, roblox_id)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_user(&self, guild_id: u64, user_id: u64) -> Result<UpdateOutcome> {
        self.limited(UPDATE_USER_BUCKET, || self.api.update_user(guild_id, user_id))
            .await
    }

    /// Revokes the API key. Not rate limited.
    #[tracing::instrument(skip(self))]
    pub async fn delete_api_key(&self) -> Result<()> {
        self.api.delete_api_key().await
    }

    /// Waits on `bucket`, sends the request built by `call`, and records the
    /// response's limit headers. Failed requests leave the bucket untouched.
    async fn limited<T, F, Fut>(&self, bucket: &str, call: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(T, HeaderMap)>>,
    {
        self.rate_limits.wait_if_needed(bucket).await;

        let (record, headers) = call().await?;
        self.rate_limits.record(bucket, &headers);
        debug!("{} request completed", bucket);

        Ok(record)
    }
}

/// Closes the wrapped session when dropped.
struct CloseOnDrop<'a, A: RoverApi>(&'a A);

impl<A: RoverApi> Drop for CloseOnDrop<'_, A> {
    fn drop(&mut self) {
        self.0.close();
    }
}
