//! The terrain field composer: axial cell → scalar in `[-1, 1]`.
//!
//! Composition order per cell: project the cell to the unit world plane,
//! warp the sampling position at two frequency bands, then sum a macro
//! continent term, a micro fBm/ridged/detail term, plate boundary uplift, a
//! seam channel, and a depth band. Remix weight deltas are added using the
//! same per-cell samples, the sum is shifted by sea level, shaped
//! asymmetrically around it, and squashed through `tanh`.
//!
//! Every step is a pure function of the inputs, so the same request always
//! fills an identical buffer.

use std::time::Instant;

use noise::OpenSimplex;

use hexlab_config::{Remix, WorldConfig};
use hexlab_hex::{CHUNK_AREA, ChunkCoord, axial_to_world_unit};

use crate::context::{PlateSite, TerrainContext};

/// Floor for warp frequencies so a zeroed config cannot produce a
/// degenerate (or NaN-feeding) sampling position.
const MIN_WARP_FREQ: f64 = 1e-4;

/// One generated chunk: a dense row-major buffer of field values.
///
/// Immutable once produced. `values[i]` belongs to the axial cell
/// `coord.cell(i)` and always lies in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkData {
    /// Which chunk this buffer covers.
    pub coord: ChunkCoord,
    /// Field values, `CHUNK_AREA` of them, index-aligned with
    /// [`ChunkCoord::cell`].
    pub values: Vec<f32>,
}

impl ChunkData {
    /// Number of cells in the buffer.
    pub fn size(&self) -> usize {
        self.values.len()
    }
}

/// Generates the full value buffer for one chunk.
///
/// `layer` selects the depth band for multi-layer worlds; layer 0 is the
/// surface. The caller supplies the (possibly cached) context built for
/// exactly this config/remix pair; mixing in a context from another seed
/// silently corrupts the output, which is why context cache keys matter.
pub fn generate_chunk(
    cfg: &WorldConfig,
    remix: Option<&Remix>,
    chunk: ChunkCoord,
    layer: u32,
    ctx: &TerrainContext,
) -> ChunkData {
    let started = Instant::now();
    let cfg = cfg.sanitized();
    let n = &cfg.noise;

    let macro_warp_freq = (n.warp_freq * 0.35).max(MIN_WARP_FREQ);
    let micro_warp_freq = (n.warp_freq * 1.6).max(MIN_WARP_FREQ);
    let macro_warp_amp = n.warp_amp * 0.55;
    let micro_warp_amp = n.warp_amp * 0.95;

    let micro_octaves = n.octaves;
    let side_octaves = n.octaves.saturating_sub(1).max(2);
    let depth = depth_band(layer, cfg.layers);

    let mut values = Vec::with_capacity(CHUNK_AREA);
    for i in 0..CHUNK_AREA {
        let cell = chunk.cell(i);
        let world = axial_to_world_unit(cell.q, cell.r);

        // Two warp bands at offset sampling positions; a single band leaves
        // visible axis-aligned streaks at low frequencies.
        let mwx = world.x
            + macro_warp_amp
                * TerrainContext::sample(&ctx.warp_x, world.x * macro_warp_freq, world.y * macro_warp_freq);
        let mwy = world.y
            + macro_warp_amp
                * TerrainContext::sample(&ctx.warp_y, world.x * macro_warp_freq, world.y * macro_warp_freq);
        let uwx = world.x
            + micro_warp_amp
                * TerrainContext::sample(
                    &ctx.warp_x,
                    world.x * micro_warp_freq + 1000.0,
                    world.y * micro_warp_freq - 1000.0,
                );
        let uwy = world.y
            + micro_warp_amp
                * TerrainContext::sample(
                    &ctx.warp_y,
                    world.x * micro_warp_freq - 1000.0,
                    world.y * micro_warp_freq + 1000.0,
                );

        let macro_continent = fbm(&ctx.continent, mwx * 0.12, mwy * 0.12, 4, 2.0, 0.5);
        let micro_fbm = fbm(&ctx.base, uwx, uwy, micro_octaves, n.lacunarity, n.gain);
        let detail = fbm(&ctx.detail, uwx * 1.7, uwy * 1.7, side_octaves, 2.1, 0.52);
        let ridged = 1.0
            - fbm(&ctx.ridge, uwx * 1.35, uwy * 1.35, side_octaves, n.lacunarity, n.gain).abs();
        let plate = plate_metrics(mwx, mwy, &ctx.plates);
        let seam = seam_field(&ctx.seam, uwx, uwy, n.seam_density);

        let macro_term = macro_continent * 0.95 + plate.interior * n.plate_weight;
        let micro_term = micro_fbm * n.fbm_weight
            + (ridged * 2.0 - 1.0) * n.ridged_weight
            + detail * 0.25;
        let boundary_uplift = plate.boundary * n.plate_weight.max(0.05) * 0.85;

        let mut v = macro_term
            + micro_term
            + boundary_uplift
            + seam * n.seam_weight * 0.18
            + n.depth_weight * depth;

        if let Some(remix) = remix {
            let d = &remix.weight_deltas;
            v += d.fbm * micro_fbm
                + d.ridged * (ridged * 2.0 - 1.0)
                + d.plate * plate.interior
                + d.seam * seam
                + d.depth * depth;
        }

        let sea_shifted = v - n.sea_level;
        let coast = n.coast_sharpness.max(0.35);
        let mountain = n.mountain_sharpness.max(0.6);
        let shaped = if sea_shifted < 0.0 {
            -(-sea_shifted).powf(coast)
        } else {
            sea_shifted.powf(mountain)
        };

        values.push((shaped * 1.15).tanh().clamp(-1.0, 1.0) as f32);
    }

    tracing::trace!(
        cq = chunk.cq,
        cr = chunk.cr,
        layer,
        elapsed_us = started.elapsed().as_micros() as u64,
        "generated chunk"
    );

    ChunkData { coord: chunk, values }
}

/// Fractal Brownian motion over one noise channel.
///
/// Octave 0 starts at frequency 1 and amplitude 0.5; each further octave
/// multiplies frequency by `lacunarity` and amplitude by `gain`.
fn fbm(channel: &OpenSimplex, x: f64, y: f64, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    let mut sum = 0.0;

    for _ in 0..octaves.max(1) {
        sum += amplitude * TerrainContext::sample(channel, x * frequency, y * frequency);
        frequency *= lacunarity;
        amplitude *= gain;
    }

    sum
}

struct PlateMetrics {
    /// High deep inside a plate, low near boundaries; in `[-1, 1]`.
    interior: f64,
    /// High near plate boundaries (used for uplift); in `[0, 1]`.
    boundary: f64,
}

/// Nearest / second-nearest distance field over the plate sites.
///
/// The gap `d2 - d1` is zero exactly on a Voronoi edge and grows toward the
/// cell interior; normalizing it by 480 world units gives the spread signal
/// both metrics derive from. A low-frequency sine adds slow variation so
/// plate interiors are not uniformly flat.
fn plate_metrics(x: f64, y: f64, sites: &[PlateSite]) -> PlateMetrics {
    let mut min1 = f64::INFINITY;
    let mut min2 = f64::INFINITY;

    for site in sites {
        let d = (x - site.x).hypot(y - site.y);
        if d < min1 {
            min2 = min1;
            min1 = d;
        } else if d < min2 {
            min2 = d;
        }
    }

    let spread = ((min2 - min1) / 480.0).clamp(0.0, 1.0);
    let boundary = 1.0 - spread;
    let interior = spread * 2.0 - 1.0;
    let variation = (x * 0.0016 + y * 0.0007).sin() * 0.12;

    PlateMetrics {
        interior: (interior + variation).clamp(-1.0, 1.0),
        boundary: (boundary + variation * 0.3).clamp(0.0, 1.0),
    }
}

/// Seam/coastline channel: narrow ridges where the noise crosses zero.
fn seam_field(channel: &OpenSimplex, x: f64, y: f64, density: f64) -> f64 {
    let freq = 0.22 + density * 0.28;
    let n = TerrainContext::sample(channel, x * freq, y * freq).abs();
    ((1.0 - n) * 2.0 - 1.0).clamp(-1.0, 1.0)
}

/// Depth-band contribution for a layer.
///
/// Convention: depth increases with layer index, `0` at the surface down to
/// `-1` at the deepest layer; single-layer worlds get no contribution.
pub fn depth_band(layer: u32, layers: u32) -> f64 {
    if layers <= 1 {
        return 0.0;
    }
    -(f64::from(layer.min(layers - 1)) / f64::from(layers - 1))
}

/// Legacy bucket mode: quantizes a continuous field value against an
/// ascending threshold list into a small signed movement cost.
///
/// The result is the index of the first threshold at or above `v`, centered
/// by half the list length and clamped to `[-8, 8]`.
pub fn quantize_movement(v: f64, bands: &[f64]) -> i8 {
    let idx = bands.iter().position(|&b| v <= b).unwrap_or(bands.len());
    let centered = idx as i64 - (bands.len() / 2) as i64;
    centered.clamp(-8, 8) as i8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn base_cfg() -> WorldConfig {
        WorldConfig::default()
    }

    fn generate(cfg: &WorldConfig, chunk: ChunkCoord) -> ChunkData {
        let ctx = TerrainContext::build(cfg, None);
        generate_chunk(cfg, None, chunk, 0, &ctx)
    }

    #[test]
    fn generation_is_deterministic() {
        let cfg = base_cfg();
        let a = generate(&cfg, ChunkCoord::new(0, 0));
        let b = generate(&cfg, ChunkCoord::new(0, 0));
        assert_eq!(a.values, b.values);
    }

    #[test]
    fn reference_chunk_fills_full_buffer_in_range() {
        let a = generate(&base_cfg(), ChunkCoord::new(0, 0));
        assert_eq!(a.size(), 4096);
        for &v in &a.values {
            assert!((-1.0..=1.0).contains(&v), "value {v} out of range");
        }
    }

    #[test]
    fn seed_change_rewrites_most_of_the_chunk() {
        let a = generate(&base_cfg(), ChunkCoord::new(1, -2));
        let mut other = base_cfg();
        other.seed = 99;
        let c = generate(&other, ChunkCoord::new(1, -2));

        let diff = a
            .values
            .iter()
            .zip(&c.values)
            .filter(|(x, y)| (**x - **y).abs() > 1e-6)
            .count();
        assert!(diff > 2000, "only {diff} of 4096 cells changed");
    }

    #[test]
    fn output_is_continuous_not_bucketed() {
        let a = generate(&base_cfg(), ChunkCoord::new(0, 0));
        let distinct: HashSet<i64> = a
            .values
            .iter()
            .map(|v| (f64::from(*v) * 1000.0).round() as i64)
            .collect();
        assert!(distinct.len() > 400, "only {} distinct values", distinct.len());
    }

    #[test]
    fn degenerate_config_still_yields_finite_values() {
        let mut cfg = base_cfg();
        cfg.noise.warp_freq = 0.0;
        cfg.noise.octaves = 0;
        cfg.noise.gain = f64::NAN;

        let a = generate(&cfg, ChunkCoord::new(0, 0));
        for &v in &a.values {
            assert!(v.is_finite());
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn remix_weight_deltas_change_output_without_touching_config() {
        let cfg = base_cfg();
        let ctx = TerrainContext::build(&cfg, None);
        let plain = generate_chunk(&cfg, None, ChunkCoord::new(0, 0), 0, &ctx);

        let mut remix = Remix::default();
        remix.weight_deltas.ridged = 0.4;
        let remixed = generate_chunk(&cfg, Some(&remix), ChunkCoord::new(0, 0), 0, &ctx);

        assert_ne!(plain.values, remixed.values);
        for &v in &remixed.values {
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn deeper_layers_sit_lower() {
        let cfg = base_cfg();
        let ctx = TerrainContext::build(&cfg, None);
        let surface = generate_chunk(&cfg, None, ChunkCoord::new(0, 0), 0, &ctx);
        let deep = generate_chunk(&cfg, None, ChunkCoord::new(0, 0), 3, &ctx);

        let mean = |c: &ChunkData| {
            c.values.iter().map(|&v| f64::from(v)).sum::<f64>() / c.values.len() as f64
        };
        assert!(mean(&deep) < mean(&surface));
    }

    #[test]
    fn depth_band_convention() {
        assert_eq!(depth_band(0, 1), 0.0);
        assert_eq!(depth_band(0, 4), 0.0);
        assert_eq!(depth_band(3, 4), -1.0);
        assert!((depth_band(1, 4) - (-1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn quantizer_centers_and_clamps() {
        let bands = [-0.5, 0.0, 0.5];
        assert_eq!(quantize_movement(-0.9, &bands), -1);
        assert_eq!(quantize_movement(-0.2, &bands), 0);
        assert_eq!(quantize_movement(0.2, &bands), 1);
        assert_eq!(quantize_movement(0.9, &bands), 2);

        let wide: Vec<f64> = (0..40).map(|i| f64::from(i) / 20.0 - 1.0).collect();
        assert_eq!(quantize_movement(-2.0, &wide), -8);
        assert_eq!(quantize_movement(2.0, &wide), 8);
    }

    #[test]
    fn far_negative_chunks_stay_in_range() {
        let a = generate(&base_cfg(), ChunkCoord::new(-120, 85));
        assert_eq!(a.size(), 4096);
        for &v in &a.values {
            assert!((-1.0..=1.0).contains(&v));
        }
    }
}
