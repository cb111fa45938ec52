//! Error taxonomy for the resolution pipeline.
//!
//! Two layers: `AdapterFailure` covers a single provider attempt and is
//! always recovered below the orchestrator; `ResolveError` is what the
//! caller sees once the whole cascade has run its course.

use thiserror::Error;

/// Terminal resolution errors surfaced to the caller.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Missing or malformed video identifier.
    ///
    /// Reported immediately; no provider is contacted.
    #[error("invalid video id: {reason}")]
    InvalidVideoId { reason: String },

    /// Every configured option at every adapter failed.
    #[error("all audio sources exhausted")]
    AllSourcesExhausted,
}

impl ResolveError {
    /// The fixed message shown to API callers for this error.
    ///
    /// Provider-level detail stays in the `Display` output and the logs;
    /// callers only ever see these two strings.
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolveError::InvalidVideoId { .. } => "Video ID is required",
            ResolveError::AllSourcesExhausted => {
                "Unable to stream audio. All sources unavailable."
            }
        }
    }
}

/// A single provider attempt failure.
///
/// These never abort the resolution on their own; the orchestrator logs
/// them and advances to the next option.
#[derive(Debug, Error)]
pub enum AdapterFailure {
    /// Transport-level failure reaching the provider.
    #[error("provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    /// The attempt exceeded its configured time bound.
    #[error("provider timed out")]
    Timeout,

    /// The provider answered but offered nothing playable.
    #[error("no usable audio option")]
    NoUsableOption,

    /// The provider rejected the request with a definitive HTTP status.
    #[error("upstream rejected request with status {code}")]
    UpstreamRejected { code: u16 },

    /// The provider was reachable but its response shape was not
    /// recognized.
    #[error("unexpected provider response: {reason}")]
    ProtocolError { reason: String },
}

impl From<reqwest::Error> for AdapterFailure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            AdapterFailure::Timeout
        } else {
            AdapterFailure::ProviderUnavailable {
                reason: error.to_string(),
            }
        }
    }
}
