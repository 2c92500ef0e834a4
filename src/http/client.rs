//! Session-scoped HTTP dispatcher for the RoVer API.

use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::{Map, Value};
use std::sync::{Mutex, MutexGuard};

use crate::config::{Config, USER_AGENT, mask_key};
use crate::error::{ApiError, Result, RoverError};

/// Issues single requests and classifies their outcome. Never retries.
///
/// The connection pool only exists between [`HttpClient::open`] and
/// [`HttpClient::close`]; requests outside that window fail with a
/// configuration error. Closing only needs a shared reference, so a session
/// can be released from a drop guard while requests still borrow the client.
pub struct HttpClient {
    config: Config,
    client: Mutex<Option<Client>>,
}

impl HttpClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.session().is_some()
    }

    fn session(&self) -> MutexGuard<'_, Option<Client>> {
        // Only ever holds a cloneable handle, so a poisoned lock is still usable.
        self.client.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Builds the authenticated connection pool. Calling it on an open
    /// client is a no-op.
    #[tracing::instrument(skip(self))]
    pub fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }

        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                RoverError::Configuration(
                    "API key not set. Provide an API key before opening the client.".to_string(),
                )
            })?;

        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
            RoverError::Configuration("API key contains invalid header characters".to_string())
        })?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            RoverError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        debug!(
            "Opened RoVer session at {} with key {}",
            self.config.api_url,
            mask_key(api_key)
        );
        *self.session() = Some(client);
        Ok(())
    }

    /// Releases the connection pool. Safe to call on a client that was never opened.
    pub fn close(&self) {
        if self.session().take().is_some() {
            debug!("Closed RoVer session");
        }
    }

    /// Sends one request to `path` under the configured API URL.
    ///
    /// Returns the decoded JSON body and the response headers on HTTP 200.
    /// An empty 200 body decodes to `null`. Any other status becomes an
    /// [`ApiError`] built from the error body, and transport failures become
    /// an [`ApiError`] without a status code.
    #[tracing::instrument(skip(self, body, query))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> Result<(Value, HeaderMap)> {
        let client = self.session().clone().ok_or_else(|| {
            RoverError::Configuration(
                "API client not initialized. Call open() before sending requests.".to_string(),
            )
        })?;

        let url = format!("{}{}", self.config.api_url.trim_end_matches('/'), path);
        debug!("{} {}...", method, url);

        let mut request = client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| ApiError::network(&e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(|e| ApiError::network(&e))?;

        if status == StatusCode::OK {
            let payload = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes)
                    .map_err(|e| RoverError::decode("response body", e))?
            };
            return Ok((payload, headers));
        }

        let body: Value =
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new()));
        let error = ApiError::from_response(status, &body);
        warn!("{} returned {}: {}", url, status, error);

        Err(error.into())
    }
}
