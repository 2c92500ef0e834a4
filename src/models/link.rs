use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GuildMemberRecord, decode};
use crate::error::Result;

/// The Roblox account linked to a Discord user in a guild.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    #[serde(alias = "roblox_id")]
    pub roblox_id: u64,
    #[serde(alias = "cached_username")]
    pub cached_username: String,
    #[serde(alias = "discord_id")]
    pub discord_id: String,
    #[serde(alias = "guild_id")]
    pub guild_id: String,
}

impl LinkRecord {
    pub fn from_api(payload: Value) -> Result<Self> {
        decode("LinkRecord", payload)
    }
}

/// The Discord members linked to a Roblox account in a guild.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscordLinkResult {
    #[serde(alias = "discord_users")]
    pub discord_users: Vec<GuildMemberRecord>,
    #[serde(alias = "roblox_id")]
    pub roblox_id: u64,
    #[serde(alias = "guild_id")]
    pub guild_id: String,
}

impl DiscordLinkResult {
    pub fn from_api(payload: Value) -> Result<Self> {
        decode("DiscordLinkResult", payload)
    }
}
