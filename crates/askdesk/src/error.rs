//! Error types for the assistant service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Assistant service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid UTF-8 in a text upload
    #[error("File '{filename}' is not valid UTF-8 (invalid byte at offset {offset})")]
    Decode { filename: String, offset: usize },

    /// Unsupported file extension
    #[error("Unsupported file format '{extension}' (supported: {supported})")]
    UnsupportedFormat { extension: String, supported: String },

    /// Upload exceeds the configured size cap
    #[error("File '{filename}' is {size} bytes, limit is {limit}")]
    FileTooLarge {
        filename: String,
        size: u64,
        limit: u64,
    },

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Question alone does not fit the provider's hard limit
    #[error("Question exceeds the {limit}-character limit for provider '{provider}'")]
    PromptTooLarge { provider: String, limit: usize },

    /// Authentication rejected by a provider
    #[error("Authentication failed for provider '{provider}': {message}")]
    Auth { provider: String, message: String },

    /// Provider rate limit hit
    #[error("Rate limited by provider '{provider}': {message}")]
    RateLimit { provider: String, message: String },

    /// Provider call exceeded its time allowance
    #[error("Request to provider '{provider}' timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    /// Provider unreachable or returning server errors
    #[error("Provider '{provider}' unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    /// Provider returned a body we could not use
    #[error("Invalid response from provider '{provider}': {message}")]
    InvalidResponse { provider: String, message: String },

    /// Requested provider is not in the registry
    #[error("Unknown provider '{name}' (registered: {registered})")]
    UnknownProvider { name: String, registered: String },

    /// Requested tab is not in the catalog
    #[error("Unknown tab '{0}'")]
    UnknownTab(String),

    /// Terminal dispatch failure after retries
    #[error("Dispatch failed after {attempts} attempt(s): {cause}")]
    Dispatch { attempts: u32, cause: Box<Error> },

    /// Malformed request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RateLimit {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a provider unavailable error
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable name for this error
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::Decode { .. } => "decode_error",
            Error::UnsupportedFormat { .. } => "unsupported_format",
            Error::FileTooLarge { .. } => "file_too_large",
            Error::FileParse { .. } => "parse_error",
            Error::PromptTooLarge { .. } => "prompt_too_large",
            Error::Auth { .. } => "auth_error",
            Error::RateLimit { .. } => "rate_limited",
            Error::Timeout { .. } => "timeout",
            Error::ProviderUnavailable { .. } => "provider_unavailable",
            Error::InvalidResponse { .. } => "invalid_response",
            Error::UnknownProvider { .. } => "unknown_provider",
            Error::UnknownTab(_) => "unknown_tab",
            Error::Dispatch { .. } => "dispatch_failed",
            Error::BadRequest(_) => "bad_request",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Whether a retry can plausibly succeed.
    ///
    /// The dispatcher retries exactly these kinds; everything else fails
    /// the request on the first attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Timeout { .. } | Error::RateLimit { .. } | Error::ProviderUnavailable { .. }
        )
    }

    /// Provider the error originated from, if any
    pub fn provider(&self) -> Option<&str> {
        match self {
            Error::Auth { provider, .. }
            | Error::RateLimit { provider, .. }
            | Error::Timeout { provider, .. }
            | Error::ProviderUnavailable { provider, .. }
            | Error::InvalidResponse { provider, .. }
            | Error::PromptTooLarge { provider, .. } => Some(provider),
            Error::Dispatch { cause, .. } => cause.provider(),
            _ => None,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Config(_) | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Decode { .. } | Error::FileParse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::FileTooLarge { .. } | Error::PromptTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Error::Auth { .. } => StatusCode::UNAUTHORIZED,
            Error::RateLimit { .. } => StatusCode::TOO_MANY_REQUESTS,
            Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::ProviderUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Error::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
            Error::UnknownProvider { .. } | Error::UnknownTab(_) => StatusCode::BAD_REQUEST,
            // A dispatch failure reports the status of its final cause
            Error::Dispatch { cause, .. } => return dispatch_response(self.error_type(), cause),
            Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Io(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

fn dispatch_response(error_type: &'static str, cause: &Error) -> Response {
    let status = match cause {
        Error::Auth { .. } => StatusCode::UNAUTHORIZED,
        Error::RateLimit { .. } => StatusCode::TOO_MANY_REQUESTS,
        Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        Error::ProviderUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        Error::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::warn!(cause = %cause, "dispatch exhausted");

    let body = Json(json!({
        "error": {
            "type": error_type,
            "message": cause.to_string(),
            "cause_type": cause.error_type(),
        }
    }));

    (status, body).into_response()
}
