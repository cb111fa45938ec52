//! Metadata extraction and proxy adapter, the cascade's last resort.
//!
//! Pulls the full set of audio encodings from the metadata extractor,
//! picks the highest bitrate, and proxies the upstream bytes through this
//! service. The most expensive path by far: a full format parse plus this
//! service owning the bandwidth cost, which is why it runs last.

use std::sync::Arc;

use tracing::debug;

use crate::resolver::error::AdapterFailure;
use crate::resolver::traits::{MetadataExtractor, SourceAdapter};
use crate::resolver::transport::StreamFetcher;
use crate::resolver::types::{AudioFormat, ProxiedStream, ResolveRequest, StreamCandidate};

/// Content type served when the selected encoding carries no usable MIME.
const FALLBACK_CONTENT_TYPE: &str = "audio/mpeg";

/// Adapter extracting format metadata and proxying the chosen stream.
pub struct ExtractionProxyAdapter {
    extractor: Arc<dyn MetadataExtractor>,
    fetcher: Arc<dyn StreamFetcher>,
}

impl ExtractionProxyAdapter {
    /// Creates the adapter over an extractor collaborator and a fetcher.
    pub fn new(extractor: Arc<dyn MetadataExtractor>, fetcher: Arc<dyn StreamFetcher>) -> Self {
        Self { extractor, fetcher }
    }
}

/// Reduces the offered encodings to the single audio-only candidate with
/// the highest bitrate.
fn best_audio_format(formats: &[AudioFormat]) -> Option<&AudioFormat> {
    formats
        .iter()
        .filter(|format| format.mime_type.starts_with("audio/"))
        .max_by_key(|format| format.bitrate_kbps)
}

/// Strips codec parameters from a MIME type: `audio/webm; codecs=opus`
/// becomes `audio/webm`.
fn strip_mime_params(mime: &str) -> &str {
    mime.split(';').next().unwrap_or(mime).trim()
}

#[async_trait::async_trait]
impl SourceAdapter for ExtractionProxyAdapter {
    fn name(&self) -> &'static str {
        "extract-proxy"
    }

    async fn resolve(
        &self,
        request: &ResolveRequest,
    ) -> Result<StreamCandidate, AdapterFailure> {
        let formats = self.extractor.audio_formats(&request.video_id).await?;

        let chosen = best_audio_format(&formats).ok_or(AdapterFailure::NoUsableOption)?;
        debug!(
            "selected {} at {} kbps from {} formats",
            chosen.mime_type,
            chosen.bitrate_kbps,
            formats.len()
        );

        let upstream = self
            .fetcher
            .fetch(&chosen.url, request.range.as_deref())
            .await?;

        match upstream.status {
            200 | 206 => {
                let stripped = strip_mime_params(&chosen.mime_type);
                let content_type = if stripped.is_empty() {
                    FALLBACK_CONTENT_TYPE.to_string()
                } else {
                    stripped.to_string()
                };

                Ok(StreamCandidate::Proxied(ProxiedStream {
                    status: upstream.status,
                    content_type,
                    content_length: upstream.content_length,
                    body: upstream.body,
                }))
            }
            code => Err(AdapterFailure::UpstreamRejected { code }),
        }
    }
}
