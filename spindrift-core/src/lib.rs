//! Spindrift Core - Audio source resolution
//!
//! This crate provides the building blocks for resolving an opaque video
//! identifier into a playable audio stream: provider adapters, the
//! resolution orchestrator, transport seams, and configuration management.

pub mod config;
pub mod resolver;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::SpindriftConfig;
pub use resolver::{AudioResolver, ResolveError, StreamCandidate};

/// Core errors that can bubble up from any Spindrift subsystem.
#[derive(Debug, thiserror::Error)]
pub enum SpindriftError {
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

pub type Result<T> = std::result::Result<T, SpindriftError>;
