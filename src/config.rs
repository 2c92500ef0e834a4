//! Client configuration.

use log::{debug, warn};
use std::time::Duration;

use crate::runtime::Runtime;

pub const DEFAULT_API_URL: &str = "https://registry.rover.link/api";

pub const API_KEY_ENV: &str = "ROVER_API_KEY";
pub const API_URL_ENV: &str = "ROVER_API_URL";
pub const TIMEOUT_ENV: &str = "ROVER_TIMEOUT_SECS";

pub const USER_AGENT: &str = "rover-cli";

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Bearer credential. Opening a session without one fails.
    pub api_key: Option<String>,
    pub api_url: String,
    /// Whole-request timeout. `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `ROVER_API_KEY`, `ROVER_API_URL` and `ROVER_TIMEOUT_SECS`.
    /// Unset or empty variables keep their defaults.
    #[tracing::instrument(skip(runtime))]
    pub fn from_runtime<R: Runtime>(runtime: &R) -> Self {
        let read = |key: &str| runtime.env_var(key).ok().filter(|v| !v.trim().is_empty());

        let api_key = read(API_KEY_ENV);
        if let Some(key) = &api_key {
            debug!("Using {} for authentication: {}", API_KEY_ENV, mask_key(key));
        }

        let api_url = read(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = read(TIMEOUT_ENV).and_then(|v| match v.trim().parse::<u64>() {
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                warn!("Ignoring invalid {} value: {}", TIMEOUT_ENV, v);
                None
            }
        });

        Self {
            api_key,
            api_url,
            timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(mask_key))
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Shows only the ends of a credential, e.g. `abcd*********wxyz`.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
