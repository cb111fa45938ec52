//! Conversion-API adapter.
//!
//! Posts a structured audio-conversion job to each configured endpoint in
//! order and decodes the loose JSON reply into a closed set of outcomes.
//! This adapter only ever produces redirect candidates; it never proxies
//! bytes itself.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::resolver::error::AdapterFailure;
use crate::resolver::traits::SourceAdapter;
use crate::resolver::transport::ConversionTransport;
use crate::resolver::types::{ResolveRequest, StreamCandidate};

/// Job description posted to a conversion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionJob {
    /// Canonical watch URL of the source video
    pub url: String,
    pub download_mode: &'static str,
    pub audio_format: &'static str,
    pub audio_bitrate: &'static str,
}

impl ConversionJob {
    /// Builds the fixed audio job for a watch URL.
    pub fn for_watch_url(url: String) -> Self {
        Self {
            url,
            download_mode: "audio",
            audio_format: "mp3",
            audio_bitrate: "128",
        }
    }
}

/// Conversion reply shapes, keyed by the provider's `status` tag.
///
/// Anything that fails to decode into one of these variants is a protocol
/// error for that endpoint, never a crash.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum ConversionResponse {
    Tunnel { url: String },
    Redirect { url: String },
    Picker { picker: Vec<PickerOption> },
    Error { error: Option<ErrorDetail> },
}

#[derive(Debug, Deserialize)]
struct PickerOption {
    url: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
}

/// Adapter for conversion-service endpoints (tunnel/redirect/picker
/// protocol).
pub struct ConversionApiAdapter {
    endpoints: Vec<String>,
    watch_url_base: String,
    transport: Arc<dyn ConversionTransport>,
}

impl ConversionApiAdapter {
    /// Creates the adapter over an ordered endpoint list.
    pub fn new(
        endpoints: Vec<String>,
        watch_url_base: String,
        transport: Arc<dyn ConversionTransport>,
    ) -> Self {
        Self {
            endpoints,
            watch_url_base,
            transport,
        }
    }

    /// Submits the job to one endpoint and interprets its reply.
    async fn try_endpoint(
        &self,
        endpoint: &str,
        job: &ConversionJob,
    ) -> Result<StreamCandidate, AdapterFailure> {
        let reply = self.transport.submit_job(endpoint, job).await?;

        if !(200..300).contains(&reply.status) {
            return Err(AdapterFailure::UpstreamRejected { code: reply.status });
        }

        let decoded: ConversionResponse =
            serde_json::from_value(reply.body).map_err(|e| AdapterFailure::ProtocolError {
                reason: format!("undecodable conversion reply: {e}"),
            })?;

        match decoded {
            ConversionResponse::Tunnel { url } | ConversionResponse::Redirect { url } => {
                Ok(StreamCandidate::Redirect { url })
            }
            ConversionResponse::Picker { picker } => {
                let chosen = picker
                    .iter()
                    .find(|option| option.kind.as_deref() == Some("audio"))
                    .or_else(|| picker.first())
                    .ok_or(AdapterFailure::NoUsableOption)?;
                debug!("picker offered {} options, chose {}", picker.len(), chosen.url);
                Ok(StreamCandidate::Redirect {
                    url: chosen.url.clone(),
                })
            }
            ConversionResponse::Error { error } => {
                let code = error
                    .and_then(|detail| detail.code)
                    .unwrap_or_else(|| "unspecified".to_string());
                Err(AdapterFailure::ProviderUnavailable {
                    reason: format!("conversion service reported {code}"),
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl SourceAdapter for ConversionApiAdapter {
    fn name(&self) -> &'static str {
        "conversion-api"
    }

    async fn resolve(
        &self,
        request: &ResolveRequest,
    ) -> Result<StreamCandidate, AdapterFailure> {
        let watch_url = request.video_id.watch_url(&self.watch_url_base);
        let job = ConversionJob::for_watch_url(watch_url);

        let mut last_failure = None;

        for endpoint in &self.endpoints {
            match self.try_endpoint(endpoint, &job).await {
                Ok(candidate) => return Ok(candidate),
                Err(failure) => {
                    warn!("conversion endpoint {} failed: {}", endpoint, failure);
                    last_failure = Some(failure);
                }
            }
        }

        Err(last_failure.unwrap_or_else(|| AdapterFailure::ProviderUnavailable {
            reason: "no conversion endpoints configured".to_string(),
        }))
    }
}
