//! HTTP metadata extractor querying Invidious-compatible video APIs.
//!
//! Maps the `adaptiveFormats` array of `{base}/api/v1/videos/{id}` onto
//! `AudioFormat` descriptors. Bases are tried in configured order; the
//! first one answering with a non-empty format set wins. Malformed
//! entries are skipped, a malformed response fails that base.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::error::AdapterFailure;
use super::traits::MetadataExtractor;
use super::types::{AudioFormat, VideoId};

/// Production metadata extractor over configured extractor API bases.
pub struct HttpMetadataExtractor {
    api_bases: Vec<String>,
    timeout: Duration,
    client: reqwest::Client,
}

/// Subset of the extractor API's video document we care about.
#[derive(Debug, Deserialize)]
struct VideoMetadata {
    #[serde(default, rename = "adaptiveFormats")]
    adaptive_formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "type")]
    mime: Option<String>,
    /// Bits per second; some API versions encode this as a string
    #[serde(default)]
    bitrate: Option<serde_json::Value>,
}

/// Parses the API's bits-per-second bitrate field, which appears as
/// either a JSON number or a numeric string.
fn parse_bitrate_kbps(raw: &serde_json::Value) -> Option<u32> {
    let bps = match raw {
        serde_json::Value::String(s) => s.parse::<u64>().ok()?,
        serde_json::Value::Number(n) => n.as_u64()?,
        _ => return None,
    };
    Some((bps / 1000) as u32)
}

/// Maps a decoded video document onto format descriptors, skipping
/// entries missing a URL or MIME type.
fn formats_from_metadata(metadata: VideoMetadata) -> Vec<AudioFormat> {
    metadata
        .adaptive_formats
        .into_iter()
        .filter_map(|raw| {
            let url = raw.url?;
            let mime_type = raw.mime?;
            let bitrate_kbps = raw.bitrate.as_ref().and_then(parse_bitrate_kbps)?;
            Some(AudioFormat {
                url,
                mime_type,
                bitrate_kbps,
            })
        })
        .collect()
}

impl HttpMetadataExtractor {
    /// Creates the extractor over ordered API bases and a shared client.
    pub fn new(api_bases: Vec<String>, timeout: Duration, client: reqwest::Client) -> Self {
        Self {
            api_bases,
            timeout,
            client,
        }
    }

    /// Queries one API base for the video's format set.
    async fn query_base(
        &self,
        base: &str,
        video_id: &VideoId,
    ) -> Result<Vec<AudioFormat>, AdapterFailure> {
        let url = format!("{}/api/v1/videos/{}", base.trim_end_matches('/'), video_id);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterFailure::UpstreamRejected {
                code: status.as_u16(),
            });
        }

        let metadata: VideoMetadata =
            response
                .json()
                .await
                .map_err(|e| AdapterFailure::ProtocolError {
                    reason: format!("undecodable video metadata: {e}"),
                })?;

        Ok(formats_from_metadata(metadata))
    }
}

#[async_trait]
impl MetadataExtractor for HttpMetadataExtractor {
    async fn audio_formats(&self, video_id: &VideoId) -> Result<Vec<AudioFormat>, AdapterFailure> {
        let mut last_failure = None;

        for base in &self.api_bases {
            match self.query_base(base, video_id).await {
                Ok(formats) if !formats.is_empty() => return Ok(formats),
                Ok(_) => {
                    warn!("extractor {} returned no formats for {}", base, video_id);
                    last_failure = Some(AdapterFailure::NoUsableOption);
                }
                Err(failure) => {
                    warn!("extractor {} failed for {}: {}", base, video_id, failure);
                    last_failure = Some(failure);
                }
            }
        }

        Err(last_failure.unwrap_or_else(|| AdapterFailure::ProviderUnavailable {
            reason: "no extractor endpoints configured".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_bitrate_from_string_and_number() {
        assert_eq!(parse_bitrate_kbps(&json!("129478")), Some(129));
        assert_eq!(parse_bitrate_kbps(&json!(160000)), Some(160));
        assert_eq!(parse_bitrate_kbps(&json!(null)), None);
        assert_eq!(parse_bitrate_kbps(&json!("not-a-number")), None);
    }

    #[test]
    fn test_formats_from_metadata_maps_complete_entries() {
        let metadata: VideoMetadata = serde_json::from_value(json!({
            "adaptiveFormats": [
                {
                    "url": "https://cdn.example/opus",
                    "type": "audio/webm; codecs=\"opus\"",
                    "bitrate": "142000"
                },
                {
                    "url": "https://cdn.example/video",
                    "type": "video/mp4",
                    "bitrate": 2500000
                }
            ]
        }))
        .unwrap();

        let formats = formats_from_metadata(metadata);
        assert_eq!(formats.len(), 2);
        assert_eq!(formats[0].url, "https://cdn.example/opus");
        assert_eq!(formats[0].mime_type, "audio/webm; codecs=\"opus\"");
        assert_eq!(formats[0].bitrate_kbps, 142);
        assert_eq!(formats[1].bitrate_kbps, 2500);
    }

    #[test]
    fn test_formats_from_metadata_skips_incomplete_entries() {
        let metadata: VideoMetadata = serde_json::from_value(json!({
            "adaptiveFormats": [
                { "type": "audio/webm", "bitrate": "100000" },
                { "url": "https://cdn.example/x", "bitrate": "100000" },
                { "url": "https://cdn.example/y", "type": "audio/webm" }
            ]
        }))
        .unwrap();

        assert!(formats_from_metadata(metadata).is_empty());
    }

    #[test]
    fn test_missing_adaptive_formats_field_decodes_empty() {
        let metadata: VideoMetadata = serde_json::from_value(json!({
            "title": "some video"
        }))
        .unwrap();

        assert!(formats_from_metadata(metadata).is_empty());
    }
}
