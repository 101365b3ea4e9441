use std::time::Duration;

/// Non-2xx response returned by the Splox API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API error {status_code}: {message}")]
pub struct ApiError {
    /// HTTP status code.
    pub status_code: u16,
    /// `error` field of the JSON body when present, otherwise the raw body.
    pub message: String,
    /// Raw response body.
    pub response_body: String,
}

impl ApiError {
    /// Builds an API error from a status code and a raw response body.
    pub fn from_body(status_code: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(ToOwned::to_owned))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.clone());
        Self {
            status_code,
            message,
            response_body: body,
        }
    }
}

/// Top-level error type for every client operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SploxError {
    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Invalid caller input.
    #[error("validation error: {0}")]
    Validation(String),
    /// The HTTP request failed at the network layer.
    #[error("connection error: {0}")]
    Connection(String),
    /// An open event stream failed while reading.
    #[error("stream error: {0}")]
    Stream(String),
    /// `run_and_wait` did not observe a terminal status in time.
    #[error("timeout: workflow did not complete within {timeout:?}")]
    Timeout { timeout: Duration },
    /// A successful response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// 401 Unauthorized.
    #[error("unauthorized: {0}")]
    Auth(ApiError),
    /// 403 Forbidden.
    #[error("forbidden: {0}")]
    Forbidden(ApiError),
    /// 404 Not Found.
    #[error("not found: {0}")]
    NotFound(ApiError),
    /// 410 Gone.
    #[error("gone: {0}")]
    Gone(ApiError),
    /// 429 Too Many Requests.
    #[error("rate limited: {error}")]
    RateLimited {
        error: ApiError,
        /// Raw `Retry-After` header value, if the server sent one.
        retry_after: Option<String>,
    },
    /// Any other non-2xx status.
    #[error(transparent)]
    Api(ApiError),
}

impl SploxError {
    /// Maps a non-2xx status and body onto the matching variant.
    pub fn from_status(status_code: u16, body: impl Into<String>, retry_after: Option<String>) -> Self {
        let error = ApiError::from_body(status_code, body);
        match status_code {
            401 => Self::Auth(error),
            403 => Self::Forbidden(error),
            404 => Self::NotFound(error),
            410 => Self::Gone(error),
            429 => Self::RateLimited { error, retry_after },
            _ => Self::Api(error),
        }
    }

    /// Returns the API error payload for status-mapped variants.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Auth(error)
            | Self::Forbidden(error)
            | Self::NotFound(error)
            | Self::Gone(error)
            | Self::RateLimited { error, .. }
            | Self::Api(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the HTTP status code for status-mapped variants.
    pub fn status_code(&self) -> Option<u16> {
        self.api_error().map(|e| e.status_code)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    pub(crate) fn connection(err: reqwest::Error) -> Self {
        Self::Connection(err.to_string())
    }

    pub(crate) fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_field_becomes_message() {
        let err = SploxError::from_status(401, r#"{"error":"invalid token"}"#, None);
        match err {
            SploxError::Auth(api) => {
                assert_eq!(api.status_code, 401);
                assert_eq!(api.message, "invalid token");
                assert_eq!(api.response_body, r#"{"error":"invalid token"}"#);
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn plain_body_is_used_as_message() {
        let err = SploxError::from_status(500, "upstream exploded", None);
        assert!(matches!(&err, SploxError::Api(api) if api.message == "upstream exploded"));
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn empty_json_error_falls_back_to_body() {
        let err = SploxError::from_status(400, r#"{"error":""}"#, None);
        assert_eq!(err.api_error().map(|e| e.message.as_str()), Some(r#"{"error":""}"#));
    }

    #[test]
    fn status_codes_map_to_variants() {
        assert!(matches!(SploxError::from_status(403, "", None), SploxError::Forbidden(_)));
        assert!(matches!(SploxError::from_status(404, "", None), SploxError::NotFound(_)));
        assert!(matches!(SploxError::from_status(410, "", None), SploxError::Gone(_)));
        let limited = SploxError::from_status(429, "slow down", Some("30".into()));
        assert!(matches!(
            limited,
            SploxError::RateLimited { retry_after: Some(ref v), .. } if v == "30"
        ));
    }

    #[test]
    fn timeout_carries_duration() {
        let err = SploxError::Timeout {
            timeout: Duration::from_secs(5),
        };
        assert!(err.is_timeout());
        assert!(!err.is_connection());
        assert!(err.to_string().contains("5s"));
        assert_eq!(err.status_code(), None);
    }
}
