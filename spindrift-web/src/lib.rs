//! Spindrift Web - HTTP boundary for audio source resolution
//!
//! Thin translation layer between HTTP and the resolution core: one
//! streaming endpoint, one liveness endpoint, no decision logic of its
//! own.

pub mod handlers;
pub mod server;

pub use server::{AppState, build_router, run_server};
