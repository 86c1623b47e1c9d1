//! Headless demo: stream a hex world and render it to a PNG.
//!
//! Loads `world.ron` (creating it with defaults on first run), applies CLI
//! overrides, then drives the chunk streamer against a synthetic viewport
//! zoomed so the whole world disc fits. Once streaming converges, the world
//! is rendered one pixel per hex to the output image and the streamer's
//! observability counters are logged.
//!
//! Run with `cargo run -p hexlab-demo -- --seed 7 --out world.png`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;

use hexlab_config::{CliArgs, WorldConfig};
use hexlab_hex::{SQRT_3, in_radius};
use hexlab_stream::{ChunkStreamer, ViewTransform};
use hexlab_terrain::debug_viz::{FieldImage, MAX_RENDER_HEXES, render_region_capped};

/// Tile radius used for planning, in viewport pixels at zoom 1.
const TILE_RADIUS: f64 = 14.0;

/// Give up if streaming has not converged within this window.
const STREAM_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(name = "hexlab-demo", about = "Hexlab terrain streaming demo")]
struct DemoArgs {
    #[command(flatten)]
    world: CliArgs,

    /// Output PNG path.
    #[arg(long, default_value = "terrain.png")]
    out: PathBuf,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 800.0)]
    viewport_width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 600.0)]
    viewport_height: f64,

    /// Depth layer to render.
    #[arg(long, default_value_t = 0)]
    layer: u32,
}

fn main() {
    let args = DemoArgs::parse();
    hexlab_log::init_logging(args.world.log_level.as_deref());

    if let Err(err) = run(&args) {
        tracing::error!("demo failed: {err}");
        std::process::exit(1);
    }
}

fn run(args: &DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = args.world.config.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut config = WorldConfig::load_or_create(&config_dir)?;
    config.apply_cli_overrides(&args.world);
    let config = config.sanitized();

    let radius = (config.diameter / 2) as i32;
    let view = fit_world_view(
        config.diameter,
        args.viewport_width,
        args.viewport_height,
    );
    info!(
        seed = config.seed,
        diameter = config.diameter,
        zoom = view.k,
        "streaming world"
    );

    let mut streamer = ChunkStreamer::new(config, None);
    streamer.set_layer(args.layer);
    stream_until_settled(&mut streamer, &view, args)?;

    let started = Instant::now();
    let side = (radius * 2 + 1) as u32;
    let (image, rendered_hexes) =
        render_region_capped(-radius, -radius, side, side, MAX_RENDER_HEXES, |q, r| {
            if !in_radius(q, r, radius) {
                return None;
            }
            streamer.cell_value(q, r)
        });
    streamer.set_rendered_hexes(rendered_hexes);

    write_png(&args.out, &image)?;

    let stats = streamer.stats();
    info!(
        visible_chunks = stats.visible_chunks,
        stored_chunks = stats.stored_chunks,
        rendered_hexes = stats.rendered_hexes,
        render_ms = started.elapsed().as_millis() as u64,
        out = %args.out.display(),
        "world rendered"
    );
    Ok(())
}

/// Issues visibility passes and drains completions until no new requests
/// are dispatched and nothing is pending.
///
/// Each pass is capped at the streamer's per-pass request limit, so large
/// worlds take several passes to fill in, exactly as they do when a user
/// pans across them.
fn stream_until_settled(
    streamer: &mut ChunkStreamer,
    view: &ViewTransform,
    args: &DemoArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let deadline = Instant::now() + STREAM_TIMEOUT;
    let mut passes = 0usize;

    loop {
        let dispatched =
            streamer.ensure_visible(view, args.viewport_width, args.viewport_height, TILE_RADIUS);
        passes += 1;

        while streamer.pending_count() > 0 {
            if Instant::now() > deadline {
                return Err("generation worker did not settle in time".into());
            }
            streamer.drain_completed(|_| {});
            std::thread::sleep(Duration::from_millis(1));
        }
        streamer.drain_completed(|_| {});

        if dispatched == 0 {
            break;
        }
    }

    info!(
        passes,
        stored = streamer.stats().stored_chunks,
        "streaming settled"
    );
    Ok(())
}

/// A view transform centering the world disc and zooming out until the
/// whole disc fits the viewport.
fn fit_world_view(diameter: u32, width: f64, height: f64) -> ViewTransform {
    let world_width = f64::from(diameter) * SQRT_3 * TILE_RADIUS;
    let world_height = f64::from(diameter) * 1.5 * TILE_RADIUS;
    let k = (width / world_width).min(height / world_height).min(1.0);
    ViewTransform {
        x: width * 0.5,
        y: height * 0.5,
        k,
    }
}

fn write_png(path: &Path, image: &FieldImage) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.write_header()?.write_image_data(&image.pixels)?;
    Ok(())
}
