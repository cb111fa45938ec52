//! Provider adapters, one per upstream protocol shape.
//!
//! Ordered by cascade priority: conversion API (richest metadata), direct
//! mirror probes (cheapest), metadata extraction plus byte proxying (most
//! expensive, tried last).

pub mod conversion;
pub mod extraction;
pub mod probe;

// Re-export public API
pub use conversion::ConversionApiAdapter;
pub use extraction::ExtractionProxyAdapter;
pub use probe::DirectProbeAdapter;
