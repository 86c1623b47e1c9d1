//! Structured logging for hexlab tools.
//!
//! Thin setup layer over the `tracing` ecosystem: console output with
//! uptime timestamps and module targets, filterable per module via
//! `RUST_LOG` or an explicit filter string (typically the `--log-level`
//! CLI flag).

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Filter precedence: the `RUST_LOG` environment variable wins, then the
/// explicit `filter` argument, then the default (`info`, with the chatty
/// generation traces of `hexlab_terrain` capped at `debug`).
///
/// Call once at startup; a second call would fail to set the global
/// subscriber and is a programming error in the caller.
pub fn init_logging(filter: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match filter {
        Some(f) => EnvFilter::new(f),
        None => default_env_filter(),
    });

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true) // the generation worker thread is named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

/// The default filter: `info` everywhere, per-chunk generation traces off.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info,hexlab_terrain=debug")
}
