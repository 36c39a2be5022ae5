use thiserror::Error;

/// Errors surfaced by a store backend. Callers treat every variant as opaque
/// infrastructure failure; nothing here is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("store returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
