//! Command-line argument parsing for hexlab tools.

use std::path::PathBuf;

use clap::Parser;

use crate::WorldConfig;

/// Hexlab command-line arguments.
///
/// CLI values override settings loaded from `world.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "hexlab", about = "Hexlab terrain generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<i64>,

    /// World diameter in hexes.
    #[arg(long)]
    pub diameter: Option<u32>,

    /// Voronoi plate count.
    #[arg(long)]
    pub plate_count: Option<u32>,

    /// fBm octave count.
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Depth layer count.
    #[arg(long)]
    pub layers: Option<u32>,

    /// Sea level offset.
    #[arg(long)]
    pub sea_level: Option<f64>,

    /// Log level filter (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl WorldConfig {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(diameter) = args.diameter {
            self.diameter = diameter;
        }
        if let Some(plate_count) = args.plate_count {
            self.noise.plate_count = plate_count;
        }
        if let Some(octaves) = args.octaves {
            self.noise.octaves = octaves;
        }
        if let Some(layers) = args.layers {
            self.layers = layers;
        }
        if let Some(sea_level) = args.sea_level {
            self.noise.sea_level = sea_level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_only_when_present() {
        let mut cfg = WorldConfig::default();
        let args = CliArgs {
            seed: Some(99),
            octaves: Some(7),
            ..Default::default()
        };

        cfg.apply_cli_overrides(&args);
        assert_eq!(cfg.seed, 99);
        assert_eq!(cfg.noise.octaves, 7);
        // Untouched fields keep their loaded values.
        assert_eq!(cfg.diameter, WorldConfig::default().diameter);
    }
}
