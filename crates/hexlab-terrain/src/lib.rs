//! Deterministic terrain field synthesis for hex worlds.
//!
//! Turns an axial cell address plus a [`WorldConfig`](hexlab_config::WorldConfig)
//! into a scalar elevation/movement value in `[-1, 1]`, one chunk at a time.
//! The pipeline composites domain-warped fractal noise, a ridged variant, a
//! Voronoi plate field, and a seam channel, then shapes the sum around sea
//! level. Identical inputs always produce identical output; determinism is
//! what makes chunk caching and epoch invalidation sound.

mod composer;
mod context;
pub mod debug_viz;
mod rng;

pub use composer::{ChunkData, depth_band, generate_chunk, quantize_movement};
pub use context::{
    CONTEXT_CACHE_CAPACITY, ContextCache, ContextKey, PlateSite, TerrainContext,
};
pub use rng::Lcg32;
