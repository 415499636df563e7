use thiserror::Error;

/// Client-side error taxonomy. Not-found and upstream failures are
/// fatal to the request that hit them; nothing here is retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required configuration is missing or malformed.
    #[error("missing engine configuration: {0}")]
    Config(String),

    /// The process instance or pending review task does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The engine answered with a non-success status.
    #[error("workflow engine returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Transport-level failure (connect, timeout, body decode).
    #[error("engine request failed: {0}")]
    Http(#[from] reqwest::Error),
}
