//! Entur client error types.

/// Errors that can occur when talking to the Entur APIs.
#[derive(Debug, thiserror::Error)]
pub enum EnturError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by Entur, try again later")]
    RateLimited,

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// GraphQL endpoint answered with errors
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The journey planner does not know this stop
    #[error("unknown stop place: {0}")]
    UnknownStop(String),

    /// Client could not be configured
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}
