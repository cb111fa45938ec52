//! HTTP request handlers.

pub mod health;
pub mod stream;

// Re-export public API
pub use health::health;
pub use stream::{stream_audio, stream_missing_id};
