//! Error taxonomy for the RoVer client.

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Message used when an error body carries no `message` field.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Server error code that marks a failure on Discord's side.
pub const DISCORD_ERROR_CODE: &str = "discord_error";

pub type Result<T, E = RoverError> = std::result::Result<T, E>;

/// Errors surfaced by the client. Nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum RoverError {
    /// Missing credential, or the client was used outside an open session.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The response body did not match the record it was decoded into.
    #[error("Failed to decode {record}: {source}")]
    Decode {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl RoverError {
    pub(crate) fn decode(record: &'static str, source: serde_json::Error) -> Self {
        RoverError::Decode { record, source }
    }

    /// Returns the API error kind, if this is an API error.
    pub fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            RoverError::Api(e) => Some(e.kind),
            _ => None,
        }
    }

    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            RoverError::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ApiErrorKind::NotFound)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind() == Some(ApiErrorKind::RateLimit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The server reported `errorCode: "discord_error"`.
    Discord,
    /// HTTP 429
    RateLimit,
    /// HTTP 401
    Authentication,
    /// HTTP 404
    NotFound,
    /// HTTP 5xx
    Server,
    /// Any other HTTP failure, and network-level failures.
    Api,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiErrorKind::Discord => "Discord error",
            ApiErrorKind::RateLimit => "Rate limit exceeded",
            ApiErrorKind::Authentication => "Authentication failed",
            ApiErrorKind::NotFound => "Not found",
            ApiErrorKind::Server => "Server error",
            ApiErrorKind::Api => "API error",
        };
        f.write_str(name)
    }
}

/// An error reported by the API, or a transport failure.
///
/// Transport failures have no `status_code`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub status_code: Option<u16>,
    pub error_code: Option<String>,
    pub detail: Option<Value>,
}

impl ApiError {
    /// Builds an error from a non-200 status and its decoded JSON body.
    ///
    /// The first matching rule wins: a `discord_error` code, then 429, 401,
    /// 404, any 5xx, and finally the generic kind.
    pub fn from_response(status: StatusCode, body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR_MESSAGE)
            .to_string();
        let error_code = body
            .get("errorCode")
            .and_then(Value::as_str)
            .map(str::to_string);
        let detail = body.get("detail").filter(|v| !v.is_null()).cloned();

        let kind = if error_code.as_deref() == Some(DISCORD_ERROR_CODE) {
            ApiErrorKind::Discord
        } else {
            match status {
                StatusCode::TOO_MANY_REQUESTS => ApiErrorKind::RateLimit,
                StatusCode::UNAUTHORIZED => ApiErrorKind::Authentication,
                StatusCode::NOT_FOUND => ApiErrorKind::NotFound,
                s if s.is_server_error() => ApiErrorKind::Server,
                _ => ApiErrorKind::Api,
            }
        };

        ApiError {
            kind,
            message,
            status_code: Some(status.as_u16()),
            error_code,
            detail,
        }
    }

    /// Wraps a transport failure (connect, timeout, DNS, body read).
    pub fn network(error: &reqwest::Error) -> Self {
        ApiError {
            kind: ApiErrorKind::Api,
            message: format!("Network error occurred: {}", error),
            status_code: None,
            error_code: None,
            detail: None,
        }
    }

    pub fn is_network(&self) -> bool {
        self.status_code.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify(status: u16, body: Value) -> ApiError {
        ApiError::from_response(StatusCode::from_u16(status).unwrap(), &body)
    }

    #[test]
    fn test_discord_error_code_wins_over_status() {
        let err = classify(429, json!({"message": "x", "errorCode": "discord_error"}));
        assert_eq!(err.kind, ApiErrorKind::Discord);
        assert_eq!(err.status_code, Some(429));

        let err = classify(404, json!({"errorCode": "discord_error"}));
        assert_eq!(err.kind, ApiErrorKind::Discord);
    }

    #[test]
    fn test_status_precedence() {
        assert_eq!(classify(429, json!({})).kind, ApiErrorKind::RateLimit);
        assert_eq!(classify(401, json!({})).kind, ApiErrorKind::Authentication);
        assert_eq!(classify(404, json!({})).kind, ApiErrorKind::NotFound);
        assert_eq!(classify(500, json!({})).kind, ApiErrorKind::Server);
        assert_eq!(classify(503, json!({})).kind, ApiErrorKind::Server);
        assert_eq!(classify(599, json!({})).kind, ApiErrorKind::Server);
        assert_eq!(classify(400, json!({})).kind, ApiErrorKind::Api);
        assert_eq!(classify(403, json!({})).kind, ApiErrorKind::Api);
        assert_eq!(classify(201, json!({})).kind, ApiErrorKind::Api);
    }

    #[test]
    fn test_other_error_codes_fall_through_to_status() {
        let err = classify(404, json!({"errorCode": "user_not_found"}));
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.error_code.as_deref(), Some("user_not_found"));
    }

    #[test]
    fn test_missing_message_uses_default() {
        let err = classify(500, json!({}));
        assert_eq!(err.message, UNKNOWN_ERROR_MESSAGE);
        assert_eq!(err.error_code, None);
        assert_eq!(err.detail, None);
    }

    #[test]
    fn test_fields_are_carried() {
        let err = classify(
            400,
            json!({"message": "bad guild", "errorCode": "invalid", "detail": {"field": "guildId"}}),
        );
        assert_eq!(err.message, "bad guild");
        assert_eq!(err.status_code, Some(400));
        assert_eq!(err.error_code.as_deref(), Some("invalid"));
        assert_eq!(err.detail, Some(json!({"field": "guildId"})));
    }

    #[test]
    fn test_display() {
        let err = classify(404, json!({"message": "not linked"}));
        assert_eq!(err.to_string(), "Not found: not linked");

        let err = RoverError::Configuration("API key not set".to_string());
        assert!(err.to_string().contains("API key not set"));
    }

    #[test]
    fn test_rover_error_predicates() {
        let err = RoverError::from(classify(404, json!({})));
        assert!(err.is_not_found());
        assert!(!err.is_rate_limited());
        assert_eq!(err.as_api_error().map(|e| e.status_code), Some(Some(404)));

        let err = RoverError::Configuration("x".into());
        assert_eq!(err.kind(), None);
    }
}
