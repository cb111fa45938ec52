//! Audio source resolution pipeline.
//!
//! Given an opaque video identifier, this module produces either a redirect
//! to an upstream audio URL or a proxied byte stream, by trying provider
//! adapters in a fixed priority order: conversion API first, direct mirror
//! probes second, metadata extraction plus byte proxying last. The first
//! adapter to succeed ends the cascade; only exhausting every adapter
//! surfaces a terminal failure.

pub mod adapters;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod traits;
pub mod transport;
pub mod types;

// Re-export public API
pub use adapters::{ConversionApiAdapter, DirectProbeAdapter, ExtractionProxyAdapter};
pub use error::{AdapterFailure, ResolveError};
pub use extractor::HttpMetadataExtractor;
pub use orchestrator::AudioResolver;
pub use traits::{MetadataExtractor, SourceAdapter};
pub use transport::{
    ConversionReply, ConversionTransport, HttpTransport, ProbeTransport, StreamFetcher,
    UpstreamAudio,
};
pub use types::{
    AudioByteStream, AudioFormat, ProxiedStream, ResolveRequest, StreamCandidate, VideoId,
};
