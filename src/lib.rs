//! Typed async client for the RoVer Discord/Roblox account-linking API.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod rate_limit;
pub mod runtime;

pub use client::RoverClient;
pub use config::Config;
pub use error::{ApiError, ApiErrorKind, Result, RoverError};
pub use models::{
    DiscordLinkResult, GuildMemberRecord, LinkRecord, UpdateActions, UpdateOutcome, UserRecord,
};
