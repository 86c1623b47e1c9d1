//! Configuration structs with sensible defaults and RON persistence.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable description of one generated world.
///
/// Every field that affects terrain values lives here; the composer reads a
/// snapshot of this struct and never mutates it. Two equal `WorldConfig`
/// values always describe the identical world.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed. Drives every noise channel and the plate layout.
    pub seed: i64,
    /// World diameter in hexes. Cells beyond `diameter / 2` from the origin
    /// are outside the world; the generator itself is unbounded.
    pub diameter: u32,
    /// Noise composition parameters.
    pub noise: NoiseParams,
    /// Number of depth layers (vertical bands) in the world.
    pub layers: u32,
    /// Ascending thresholds for the legacy bucketed movement mode.
    /// Empty means continuous elevation output.
    pub bands: Vec<f64>,
}

/// Parameters of the terrain field composition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseParams {
    /// Number of Voronoi plate sites forming continental structure.
    pub plate_count: u32,
    /// Domain warp displacement amplitude, in world-plane units.
    pub warp_amp: f64,
    /// Domain warp sampling frequency.
    pub warp_freq: f64,
    /// fBm octave count for the micro terrain band.
    pub octaves: u32,
    /// Frequency multiplier between successive fBm octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive fBm octaves.
    pub gain: f64,
    /// Blend weight of the micro fBm term.
    pub fbm_weight: f64,
    /// Blend weight of the ridged term.
    pub ridged_weight: f64,
    /// Blend weight of the plate interior term.
    pub plate_weight: f64,
    /// Blend weight of the seam/coastline term.
    pub seam_weight: f64,
    /// Blend weight of the depth-band term for multi-layer worlds.
    pub depth_weight: f64,
    /// Density of seam channels; raises the seam sampling frequency.
    pub seam_density: f64,
    /// Elevation of the sea surface; the field is shifted down by this
    /// before shaping, so higher values mean more ocean.
    pub sea_level: f64,
    /// Exponent applied to below-sea magnitudes. Values under 1 flatten
    /// shallows into gradual coasts.
    pub coast_sharpness: f64,
    /// Exponent applied to above-sea magnitudes. Values over 1 sharpen
    /// peaks.
    pub mountain_sharpness: f64,
}

/// Optional per-session delta applied on top of a [`WorldConfig`].
///
/// A remix never mutates the base config; the composer reads both and
/// applies the deltas at evaluation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Remix {
    /// Identifier for the remix session.
    pub id: String,
    /// Positional shift per plate index, applied when plate sites are built.
    pub plate_shift: BTreeMap<u32, PlateShift>,
    /// Additive deltas on the blend weights.
    pub weight_deltas: WeightDeltas,
}

/// World-plane displacement of a single plate site.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlateShift {
    /// Horizontal displacement.
    pub dx: f64,
    /// Vertical displacement.
    pub dy: f64,
}

/// Additive blend-weight deltas. Each delta multiplies the same per-cell
/// sample its base weight does, so a zero delta is always a no-op.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeightDeltas {
    /// Delta on the micro fBm weight.
    pub fbm: f64,
    /// Delta on the ridged weight.
    pub ridged: f64,
    /// Delta on the plate interior weight.
    pub plate: f64,
    /// Delta on the seam weight.
    pub seam: f64,
    /// Delta on the depth-band weight.
    pub depth: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            diameter: 160,
            noise: NoiseParams::default(),
            layers: 4,
            bands: Vec::new(),
        }
    }
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            plate_count: 8,
            warp_amp: 80.0,
            warp_freq: 0.007,
            octaves: 5,
            lacunarity: 2.0,
            gain: 0.52,
            fbm_weight: 0.7,
            ridged_weight: 0.35,
            plate_weight: 0.5,
            seam_weight: 0.2,
            depth_weight: 0.15,
            seam_density: 0.4,
            sea_level: 0.05,
            coast_sharpness: 0.78,
            mountain_sharpness: 1.25,
        }
    }
}

impl WorldConfig {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("world.ron");

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: WorldConfig =
                ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            tracing::info!("loaded world config from {}", config_path.display());
            Ok(config)
        } else {
            let config = WorldConfig::default();
            config.save(config_dir)?;
            tracing::info!("created default world config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `world.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("world.ron");
        let pretty = ron::ser::PrettyConfig::new().depth_limit(3);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Returns a copy with out-of-range fields clamped into the domain the
    /// composer assumes.
    ///
    /// A bad field should degrade terrain quality, never crash generation,
    /// so sanitization replaces non-finite values with defaults and floors
    /// the structural counts.
    pub fn sanitized(&self) -> Self {
        let defaults = NoiseParams::default();
        let mut cfg = self.clone();
        let n = &mut cfg.noise;

        n.plate_count = n.plate_count.max(1);
        n.octaves = n.octaves.max(1);
        cfg.layers = cfg.layers.max(1);

        for (value, default) in [
            (&mut n.warp_amp, defaults.warp_amp),
            (&mut n.warp_freq, defaults.warp_freq),
            (&mut n.lacunarity, defaults.lacunarity),
            (&mut n.gain, defaults.gain),
            (&mut n.fbm_weight, defaults.fbm_weight),
            (&mut n.ridged_weight, defaults.ridged_weight),
            (&mut n.plate_weight, defaults.plate_weight),
            (&mut n.seam_weight, defaults.seam_weight),
            (&mut n.depth_weight, defaults.depth_weight),
            (&mut n.seam_density, defaults.seam_density),
            (&mut n.sea_level, defaults.sea_level),
            (&mut n.coast_sharpness, defaults.coast_sharpness),
            (&mut n.mountain_sharpness, defaults.mountain_sharpness),
        ] {
            if !value.is_finite() {
                tracing::warn!("non-finite noise parameter replaced with default {default}");
                *value = default;
            }
        }

        cfg
    }
}
