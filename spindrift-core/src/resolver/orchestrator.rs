//! Resolution orchestrator: the fixed-priority source cascade.
//!
//! Adapters run strictly in sequence within one request. Upstream quota
//! and bandwidth are real costs, so branches are never fanned out in
//! parallel; the first success ends the cascade and every failure below
//! this level is recovered by advancing to the next option.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::adapters::{ConversionApiAdapter, DirectProbeAdapter, ExtractionProxyAdapter};
use super::error::ResolveError;
use super::extractor::HttpMetadataExtractor;
use super::traits::SourceAdapter;
use super::transport::HttpTransport;
use super::types::{ResolveRequest, StreamCandidate};
use crate::config::SpindriftConfig;

/// Orchestrates provider adapters in fixed priority order.
///
/// Holds only immutable configuration and stateless adapters; nothing
/// here is shared mutably between requests, so identical requests are
/// independent and repeatable.
pub struct AudioResolver {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl AudioResolver {
    /// Creates a resolver over an ordered adapter list.
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self { adapters }
    }

    /// Builds the production cascade from configuration: conversion API
    /// first, direct mirror probes second, extraction plus proxy last.
    ///
    /// # Errors
    ///
    /// - `SpindriftError::Configuration` - A configured mirror base URL
    ///   is invalid
    pub fn from_config(config: &SpindriftConfig) -> crate::Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.network.clone()));

        let extractor = Arc::new(HttpMetadataExtractor::new(
            config.providers.extractor_api_bases.clone(),
            config.network.extraction_timeout,
            transport.client(),
        ));

        let conversion = ConversionApiAdapter::new(
            config.providers.conversion_endpoints.clone(),
            config.providers.watch_url_base.to_string(),
            transport.clone(),
        );
        let probe = DirectProbeAdapter::new(
            config.providers.probe_mirrors.clone(),
            config.providers.probe_itags.clone(),
            transport.clone(),
        )?;
        let extraction = ExtractionProxyAdapter::new(extractor, transport);

        Ok(Self::new(vec![
            Arc::new(conversion),
            Arc::new(probe),
            Arc::new(extraction),
        ]))
    }

    /// Names of the configured sources in cascade order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|adapter| adapter.name()).collect()
    }

    /// Resolves a video identifier to a playable stream candidate.
    ///
    /// Tries adapters in order; the first success wins and remaining
    /// adapters are not contacted. Adapter failures are logged and
    /// swallowed here; nothing below this method aborts the resolution.
    ///
    /// # Errors
    ///
    /// - `ResolveError::AllSourcesExhausted` - Every configured option at
    ///   every adapter failed
    pub async fn resolve(
        &self,
        request: &ResolveRequest,
    ) -> Result<StreamCandidate, ResolveError> {
        info!(
            "resolving audio for {} across {} sources",
            request.video_id,
            self.adapters.len()
        );

        for adapter in &self.adapters {
            debug!("trying source: {}", adapter.name());

            match adapter.resolve(request).await {
                Ok(candidate) => {
                    info!(
                        "source {} resolved {} as {}",
                        adapter.name(),
                        request.video_id,
                        candidate.kind()
                    );
                    return Ok(candidate);
                }
                Err(failure) => {
                    warn!(
                        "source {} failed for {}: {}",
                        adapter.name(),
                        request.video_id,
                        failure
                    );
                }
            }
        }

        Err(ResolveError::AllSourcesExhausted)
    }
}
