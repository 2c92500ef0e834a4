//! Typed records decoded from RoVer API responses.
//!
//! Each record maps JSON keys explicitly through serde renames and aliases,
//! so both camelCase and snake_case payloads decode into the same fields.

mod link;
mod member;
mod update;

pub use link::{DiscordLinkResult, LinkRecord};
pub use member::{GuildMemberRecord, UserRecord};
pub use update::{UpdateActions, UpdateOutcome};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, RoverError};

/// Decodes a JSON payload into `T`, naming `record` in the error on failure.
pub(crate) fn decode<T: DeserializeOwned>(record: &'static str, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| RoverError::decode(record, e))
}
