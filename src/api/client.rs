use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::config::Config;
use crate::error::Result;
use crate::http::HttpClient;
use crate::models::{DiscordLinkResult, LinkRecord, UpdateOutcome};

/// One call per RoVer endpoint. Each returns the decoded record together
/// with the response headers so callers can track rate limits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoverApi: Send + Sync {
    /// Opens the authenticated session.
    fn open(&mut self) -> Result<()>;

    /// Closes the session. Safe to call when never opened.
    fn close(&self);

    async fn get_roblox_from_discord(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<(LinkRecord, HeaderMap)>;

    async fn get_discord_from_roblox(
        &self,
        guild_id: u64,
        roblox_id: u64,
    ) -> Result<(DiscordLinkResult, HeaderMap)>;

    async fn update_user(&self, guild_id: u64, user_id: u64) -> Result<(UpdateOutcome, HeaderMap)>;

    /// Revokes the API key used by this client. Any response body is ignored.
    async fn delete_api_key(&self) -> Result<()>;
}

pub struct RoverApiClient {
    http: HttpClient,
}

impl RoverApiClient {
    pub fn new(config: Config) -> Self {
        Self {
            http: HttpClient::new(config),
        }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

pub fn discord_to_roblox_path(guild_id: u64, user_id: u64) -> String {
    format!("/guilds/{}/discord-to-roblox/{}", guild_id, user_id)
}

pub fn roblox_to_discord_path(guild_id: u64, roblox_id: u64) -> String {
    format!("/guilds/{}/roblox-to-discord/{}", guild_id, roblox_id)
}

pub fn update_path(guild_id: u64, user_id: u64) -> String {
    format!("/guilds/{}/update/{}", guild_id, user_id)
}

pub const API_KEY_PATH: &str = "/api-key";

#[async_trait]
impl RoverApi for RoverApiClient {
    fn open(&mut self) -> Result<()> {
        self.http.open()
    }

    fn close(&self) {
        self.http.close()
    }

    #[tracing::instrument(skip(self))]
    async fn get_roblox_from_discord(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<(LinkRecord, HeaderMap)> {
        let path = discord_to_roblox_path(guild_id, user_id);
        let (payload, headers) = self.http.request(Method::GET, &path, None, &[]).await?;
        Ok((LinkRecord::from_api(payload)?, headers))
    }

    #[tracing::instrument(skip(self))]
    async fn get_discord_from_roblox(
        &self,
        guild_id: u64,
        roblox_id: u64,
    ) -> Result<(DiscordLinkResult, HeaderMap)> {
        let path = roblox_to_discord_path(guild_id, roblox_id);
        let (payload, headers) = self.http.request(Method::GET, &path, None, &[]).await?;
        Ok((DiscordLinkResult::from_api(payload)?, headers))
    }

    #[tracing::instrument(skip(self))]
    async fn update_user(&self, guild_id: u64, user_id: u64) -> Result<(UpdateOutcome, HeaderMap)> {
        let path = update_path(guild_id, user_id);
        let (payload, headers) = self.http.request(Method::POST, &path, None, &[]).await?;
        Ok((UpdateOutcome::from_api(payload)?, headers))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_api_key(&self) -> Result<()> {
        self.http
            .request(Method::DELETE, API_KEY_PATH, None, &[])
            .await?;
        debug!("API key revoked");
        Ok(())
    }
}
