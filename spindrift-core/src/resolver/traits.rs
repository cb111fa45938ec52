//! Seams between the orchestrator, provider adapters, and collaborators.
//!
//! The orchestrator only ever sees `SourceAdapter`; each adapter wraps one
//! provider-specific protocol behind the same uniform signature, which is
//! what makes the priority order and short-circuit behavior independently
//! testable per adapter.

use async_trait::async_trait;

use super::error::AdapterFailure;
use super::types::{AudioFormat, ResolveRequest, StreamCandidate, VideoId};

/// A component implementing one provider-specific resolution protocol.
///
/// One attempt per request; adapters hold no mutable per-request state and
/// never retry an attempt with identical parameters.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short stable name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Attempts to resolve the request against this provider.
    ///
    /// # Errors
    ///
    /// - `AdapterFailure` - Every configured option of this provider was
    ///   tried without producing a candidate; the orchestrator advances
    ///   to the next adapter
    async fn resolve(
        &self,
        request: &ResolveRequest,
    ) -> Result<StreamCandidate, AdapterFailure>;
}

/// External collaborator producing the available audio encodings for a
/// video.
///
/// Implementations resolve the set of encodings (URL, MIME type, bitrate)
/// that the extraction adapter then reduces to a single best candidate.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Returns every known audio encoding for the video.
    ///
    /// # Errors
    ///
    /// - `AdapterFailure` - The extraction capability is unreachable or
    ///   its response cannot be interpreted
    async fn audio_formats(&self, video_id: &VideoId) -> Result<Vec<AudioFormat>, AdapterFailure>;
}
