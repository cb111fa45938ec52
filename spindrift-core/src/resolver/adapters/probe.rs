//! Direct-probe adapter.
//!
//! Checks lightweight redirect mirrors for a directly playable stream by
//! HEAD-probing a small matrix of (mirror, encoding tag) pairs. Probing
//! first avoids downloading audio just to prove existence, so committing
//! to a redirect costs almost nothing in latency or bandwidth.

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::SpindriftError;
use crate::resolver::error::AdapterFailure;
use crate::resolver::traits::SourceAdapter;
use crate::resolver::transport::ProbeTransport;
use crate::resolver::types::{ResolveRequest, StreamCandidate, VideoId};

/// Adapter probing mirror services for direct stream URLs.
pub struct DirectProbeAdapter {
    mirrors: Vec<String>,
    itags: Vec<String>,
    transport: Arc<dyn ProbeTransport>,
}

impl DirectProbeAdapter {
    /// Creates the adapter over ordered mirror and encoding-tag lists.
    ///
    /// # Errors
    ///
    /// - `SpindriftError::Configuration` - A mirror base is not a valid URL
    pub fn new(
        mirrors: Vec<String>,
        itags: Vec<String>,
        transport: Arc<dyn ProbeTransport>,
    ) -> Result<Self, SpindriftError> {
        for mirror in &mirrors {
            Url::parse(mirror).map_err(|e| SpindriftError::Configuration {
                reason: format!("invalid probe mirror {mirror}: {e}"),
            })?;
        }

        Ok(Self {
            mirrors,
            itags,
            transport,
        })
    }

    /// Builds the direct stream URL for one (mirror, tag) pair.
    ///
    /// Video identifiers are validated to URL-safe characters at
    /// construction, so plain formatting is sufficient here.
    fn stream_url(mirror: &str, video_id: &VideoId, itag: &str) -> String {
        format!(
            "{}/latest_version?id={}&itag={}",
            mirror.trim_end_matches('/'),
            video_id,
            itag
        )
    }
}

#[async_trait::async_trait]
impl SourceAdapter for DirectProbeAdapter {
    fn name(&self) -> &'static str {
        "direct-probe"
    }

    async fn resolve(
        &self,
        request: &ResolveRequest,
    ) -> Result<StreamCandidate, AdapterFailure> {
        for mirror in &self.mirrors {
            for itag in &self.itags {
                let url = Self::stream_url(mirror, &request.video_id, itag);

                match self.transport.head_status(&url).await {
                    // Redirect statuses count as success: the mirror is
                    // vouching for the stream behind them.
                    Ok(code) if (200..400).contains(&code) => {
                        info!("probe hit: {} (status {})", url, code);
                        return Ok(StreamCandidate::Redirect { url });
                    }
                    Ok(code) => {
                        debug!("probe {} rejected with status {}", url, code);
                    }
                    Err(failure) => {
                        debug!("probe {} failed: {}", url, failure);
                    }
                }
            }
        }

        Err(AdapterFailure::NoUsableOption)
    }
}
