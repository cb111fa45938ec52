//! Production HTTP transport behind the adapter seams.
//!
//! One shared `reqwest::Client` serves every adapter; per-call timeouts
//! come from `NetworkConfig`. Tests substitute the transport traits with
//! counting fakes, so nothing in the adapters touches the network
//! directly.

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header;

use super::adapters::conversion::ConversionJob;
use super::error::AdapterFailure;
use super::types::AudioByteStream;
use crate::config::NetworkConfig;

/// Raw reply from a conversion endpoint, prior to shape decoding.
#[derive(Debug, Clone)]
pub struct ConversionReply {
    /// HTTP status of the job submission
    pub status: u16,
    /// Response body as loose JSON; `Null` when the body was not JSON
    pub body: serde_json::Value,
}

/// Upstream audio response handed to the proxy step.
pub struct UpstreamAudio {
    /// Upstream HTTP status
    pub status: u16,
    /// Upstream `Content-Length`, when supplied
    pub content_length: Option<u64>,
    /// Live upstream byte stream
    pub body: AudioByteStream,
}

/// Submits conversion jobs to a conversion-service endpoint.
#[async_trait]
pub trait ConversionTransport: Send + Sync {
    /// Posts the job description and returns status plus loose JSON body.
    ///
    /// # Errors
    ///
    /// - `AdapterFailure::Timeout` - The bounded call did not complete
    /// - `AdapterFailure::ProviderUnavailable` - Transport-level failure
    async fn submit_job(
        &self,
        endpoint: &str,
        job: &ConversionJob,
    ) -> Result<ConversionReply, AdapterFailure>;
}

/// Issues cheap existence probes without downloading bodies.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// HEAD-checks the URL, following redirects, and returns the final
    /// HTTP status code.
    ///
    /// # Errors
    ///
    /// - `AdapterFailure::Timeout` - The bounded probe did not complete
    /// - `AdapterFailure::ProviderUnavailable` - Transport-level failure
    async fn head_status(&self, url: &str) -> Result<u16, AdapterFailure>;
}

/// Fetches an upstream audio URL for byte proxying.
#[async_trait]
pub trait StreamFetcher: Send + Sync {
    /// Issues the upstream GET, forwarding the client byte range verbatim
    /// when present, and returns the response as a live stream.
    ///
    /// # Errors
    ///
    /// - `AdapterFailure::Timeout` - No response headers within the bound
    /// - `AdapterFailure::ProviderUnavailable` - Transport-level failure
    async fn fetch(
        &self,
        url: &str,
        range: Option<&str>,
    ) -> Result<UpstreamAudio, AdapterFailure>;
}

/// Shared outbound HTTP transport for all production adapters.
pub struct HttpTransport {
    client: reqwest::Client,
    config: NetworkConfig,
}

impl HttpTransport {
    /// Creates the shared client with connect timeout, redirect policy,
    /// and browser user agent from network configuration.
    pub fn new(config: NetworkConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .expect("HTTP client creation should not fail");

        Self { client, config }
    }

    /// Returns a handle to the shared client for collaborators that issue
    /// their own requests (the metadata extractor).
    pub fn client(&self) -> reqwest::Client {
        self.client.clone()
    }
}

#[async_trait]
impl ConversionTransport for HttpTransport {
    async fn submit_job(
        &self,
        endpoint: &str,
        job: &ConversionJob,
    ) -> Result<ConversionReply, AdapterFailure> {
        let response = self
            .client
            .post(endpoint)
            .timeout(self.config.conversion_timeout)
            .header(header::ACCEPT, "application/json")
            .json(job)
            .send()
            .await?;

        let status = response.status().as_u16();
        // Non-JSON bodies still carry a meaningful status; the adapter
        // decides how to treat them.
        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);

        Ok(ConversionReply { status, body })
    }
}

#[async_trait]
impl ProbeTransport for HttpTransport {
    async fn head_status(&self, url: &str) -> Result<u16, AdapterFailure> {
        let response = self
            .client
            .head(url)
            .timeout(self.config.probe_timeout)
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl StreamFetcher for HttpTransport {
    async fn fetch(
        &self,
        url: &str,
        range: Option<&str>,
    ) -> Result<UpstreamAudio, AdapterFailure> {
        let mut request = self.client.get(url);
        if let Some(range) = range {
            request = request.header(header::RANGE, range.to_string());
        }

        // Bounds time to response headers only; a whole-body timeout would
        // cut off long audio streams mid-play.
        let response = tokio::time::timeout(self.config.proxy_timeout, request.send())
            .await
            .map_err(|_| AdapterFailure::Timeout)??;

        let status = response.status().as_u16();
        let content_length = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());

        let body: AudioByteStream =
            Box::pin(response.bytes_stream().map_err(std::io::Error::other));

        Ok(UpstreamAudio {
            status,
            content_length,
            body,
        })
    }
}
