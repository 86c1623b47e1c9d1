//! Viewport-driven chunk streaming.
//!
//! Decides which chunks of the infinite hex grid the current viewport
//! needs, requests them from a background generation worker over a
//! message-passing boundary, caches completed results, and invalidates
//! stale work with a generation epoch whenever the world configuration
//! changes. Completions arrive in arbitrary order and are delivered to the
//! consumer by draining once per frame.

mod plan;
mod streamer;
mod worker;

pub use plan::{ViewTransform, prioritize_chunks, visible_chunks};
pub use streamer::{ChunkStreamer, MAX_VISIBLE_REQUESTS, StreamStats};
pub use worker::{Completion, GenRequest, GenResponse, GenWorker, StreamError};
