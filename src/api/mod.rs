//! RoVer endpoints: routes, request dispatch and record decoding.

mod client;

#[cfg(test)]
pub use client::MockRoverApi;
pub use client::{
    API_KEY_PATH, RoverApi, RoverApiClient, discord_to_roblox_path, roblox_to_discord_path,
    update_path,
};
