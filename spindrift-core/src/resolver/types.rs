//! Core types for audio source resolution.

use std::fmt;

use bytes::Bytes;
use futures::stream::BoxStream;

use super::error::ResolveError;

/// Streamed audio bytes piped from an upstream response.
pub type AudioByteStream = BoxStream<'static, Result<Bytes, std::io::Error>>;

/// Opaque identifier naming a source video.
///
/// Immutable once constructed; every adapter derives its provider-specific
/// URL from this single identifier. Validation is strict (alphanumeric
/// plus `-` and `_`) so identifiers can be embedded in URLs without
/// further encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    /// Validates and wraps a raw identifier.
    ///
    /// # Errors
    ///
    /// - `ResolveError::InvalidVideoId` - Empty, blank, or containing
    ///   characters outside `[A-Za-z0-9_-]`
    pub fn new(raw: &str) -> Result<Self, ResolveError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ResolveError::InvalidVideoId {
                reason: "empty identifier".to_string(),
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ResolveError::InvalidVideoId {
                reason: "identifier contains unexpected characters".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the canonical watch URL used by conversion and extraction
    /// providers.
    pub fn watch_url(&self, base: &str) -> String {
        format!("{base}{}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-request resolution input.
///
/// Created once per inbound request and discarded with it; nothing here
/// survives across requests.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// The video to resolve an audio stream for
    pub video_id: VideoId,
    /// Client byte-range header, forwarded verbatim to the proxy step
    pub range: Option<String>,
}

impl ResolveRequest {
    /// Creates a request without a byte range.
    pub fn new(video_id: VideoId) -> Self {
        Self {
            video_id,
            range: None,
        }
    }

    /// Attaches the client's `Range` header value.
    pub fn with_range(mut self, range: Option<String>) -> Self {
        self.range = range;
        self
    }
}

/// One audio encoding offered by the metadata extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFormat {
    /// Direct URL serving this encoding
    pub url: String,
    /// MIME type, possibly with codec parameters attached
    pub mime_type: String,
    /// Average bitrate in kilobits per second
    pub bitrate_kbps: u32,
}

/// Headers and body of an upstream response forwarded to the client.
///
/// Consumed exactly once; the body is a live pipe from the upstream
/// connection, never buffered in full.
pub struct ProxiedStream {
    /// Upstream HTTP status (200 or 206)
    pub status: u16,
    /// Content type presented to the client, stripped of parameters
    pub content_type: String,
    /// Upstream content length, passed through when supplied
    pub content_length: Option<u64>,
    /// Live upstream byte stream
    pub body: AudioByteStream,
}

impl fmt::Debug for ProxiedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxiedStream")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("body", &"<stream>")
            .finish()
    }
}

/// Result of a successful resolution attempt.
///
/// At most one candidate is produced per request; the first adapter
/// success wins and no merging occurs.
#[derive(Debug)]
pub enum StreamCandidate {
    /// The client should be redirected; no bytes pass through this service
    Redirect { url: String },
    /// This service forwards upstream bytes to the client itself
    Proxied(ProxiedStream),
}

impl StreamCandidate {
    /// Short outcome label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamCandidate::Redirect { .. } => "redirect",
            StreamCandidate::Proxied(_) => "proxied-stream",
        }
    }
}
