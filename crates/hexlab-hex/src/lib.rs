//! Axial hex-grid coordinates and flat-top projection math.
//!
//! This crate provides the coordinate vocabulary shared by the terrain
//! composer and the chunk streamer: integer axial cell addresses on an
//! infinite flat-top hex grid, fixed-size chunk addresses, and the
//! projection between axial space and the continuous world plane.
//!
//! All functions here are pure coordinate arithmetic with no dependency on
//! terrain generation or rendering.

mod axial;
mod chunk;
mod projection;

pub use axial::{AXIAL_DIRS, Axial, axial_distance, in_radius};
pub use chunk::{CHUNK_AREA, CHUNK_SIZE, ChunkCoord};
pub use projection::{
    SQRT_3, axial_to_world, axial_to_world_unit, frac_axial_to_world, world_to_axial,
};
