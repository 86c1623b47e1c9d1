//! Per-configuration generation context and its bounded cache.
//!
//! Building the seeded noise channels and the plate-site table is the
//! expensive part of starting a new world, so it happens once per distinct
//! `(seed, plate count, plate shift)` key and is shared read-only across
//! every chunk request for that world.

use std::collections::VecDeque;
use std::sync::Arc;

use noise::{NoiseFn, OpenSimplex};
use rustc_hash::FxHashMap;

use hexlab_config::{Remix, WorldConfig};

use crate::rng::{Lcg32, xorshift_mix};

/// Default number of contexts kept alive at once. Users iterating on
/// settings churn through keys quickly; eight covers a session of tweaking
/// without letting noise tables pile up.
pub const CONTEXT_CACHE_CAPACITY: usize = 8;

/// A seeded Voronoi generator point for continental structure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlateSite {
    /// World-plane x position.
    pub x: f64,
    /// World-plane y position.
    pub y: f64,
}

/// Derived, immutable state for one world configuration: seven seeded noise
/// channels plus the plate-site table.
///
/// Never mutated after construction; chunk generation for the same world
/// shares one context concurrently.
pub struct TerrainContext {
    pub(crate) base: OpenSimplex,
    pub(crate) ridge: OpenSimplex,
    pub(crate) continent: OpenSimplex,
    pub(crate) detail: OpenSimplex,
    pub(crate) warp_x: OpenSimplex,
    pub(crate) warp_y: OpenSimplex,
    pub(crate) seam: OpenSimplex,
    pub(crate) plates: Vec<PlateSite>,
}

impl TerrainContext {
    /// Builds the context for a config, applying any remix plate shifts.
    pub fn build(cfg: &WorldConfig, remix: Option<&Remix>) -> Self {
        let seed = cfg.seed;
        let channel = |k: i64| OpenSimplex::new(seed.wrapping_mul(11).wrapping_add(k) as u32);

        Self {
            base: channel(1),
            ridge: channel(2),
            continent: channel(3),
            detail: channel(4),
            warp_x: channel(5),
            warp_y: channel(6),
            seam: channel(7),
            plates: plate_sites(cfg.noise.plate_count.max(1), seed, remix),
        }
    }

    /// The plate-site table for this world.
    pub fn plates(&self) -> &[PlateSite] {
        &self.plates
    }

    pub(crate) fn sample(channel: &OpenSimplex, x: f64, y: f64) -> f64 {
        channel.get([x, y])
    }
}

/// Places `count` plate sites deterministically from the world seed.
///
/// Consecutive LCG outputs are strongly correlated in their low bits, so
/// each draw is passed through an xorshift mix before being reduced to a
/// coordinate in `[-10000, 10000)`.
fn plate_sites(count: u32, seed: i64, remix: Option<&Remix>) -> Vec<PlateSite> {
    let mut rng = Lcg32::from_seed_int(seed);
    let mut out = Vec::with_capacity(count as usize);

    for i in 0..count {
        let x = f64::from(xorshift_mix(rng.next_u32()) % 20_000) - 10_000.0;
        let y = f64::from(xorshift_mix(rng.next_u32()) % 20_000) - 10_000.0;

        let shift = remix
            .and_then(|r| r.plate_shift.get(&i))
            .copied()
            .unwrap_or_default();
        out.push(PlateSite {
            x: x + shift.dx,
            y: y + shift.dy,
        });
    }

    out
}

/// The subset of configuration that determines context construction.
///
/// Render-affecting fields (bands, layers, blend weights) are deliberately
/// absent: two configs differing only in those must share a context, while
/// two configs differing in seed must not. Plate shifts are folded in as
/// bit patterns so the key stays `Eq + Hash` despite holding floats.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContextKey {
    seed: i64,
    plate_count: u32,
    plate_shift: Vec<(u32, u64, u64)>,
}

impl ContextKey {
    /// Derives the key for a config plus optional remix.
    pub fn for_world(cfg: &WorldConfig, remix: Option<&Remix>) -> Self {
        let plate_shift = remix
            .map(|r| {
                r.plate_shift
                    .iter()
                    .map(|(&i, s)| (i, s.dx.to_bits(), s.dy.to_bits()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            seed: cfg.seed,
            plate_count: cfg.noise.plate_count.max(1),
            plate_shift,
        }
    }
}

/// Bounded cache of [`TerrainContext`] values keyed by [`ContextKey`].
///
/// Eviction is insertion-order (oldest key first), not LRU: the cache is
/// small and the common access pattern is "many hits on the newest key",
/// so tracking access time buys nothing.
pub struct ContextCache {
    capacity: usize,
    map: FxHashMap<ContextKey, Arc<TerrainContext>>,
    order: VecDeque<ContextKey>,
}

impl ContextCache {
    /// Creates a cache holding at most `capacity` contexts.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            map: FxHashMap::default(),
            order: VecDeque::new(),
        }
    }

    /// Returns the cached context for this world, building it on miss.
    ///
    /// On overflow the oldest-inserted entry is dropped. Requests that
    /// still hold an `Arc` to an evicted context keep it alive until they
    /// finish; eviction only forgets the cache's own reference.
    pub fn get_or_build(&mut self, cfg: &WorldConfig, remix: Option<&Remix>) -> Arc<TerrainContext> {
        let key = ContextKey::for_world(cfg, remix);
        if let Some(ctx) = self.map.get(&key) {
            return Arc::clone(ctx);
        }

        tracing::debug!(seed = cfg.seed, plates = cfg.noise.plate_count, "building terrain context");
        let ctx = Arc::new(TerrainContext::build(cfg, remix));
        self.map.insert(key.clone(), Arc::clone(&ctx));
        self.order.push_back(key);

        while self.map.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }

        ctx
    }

    /// Whether a context for this key is currently cached.
    pub fn contains(&self, key: &ContextKey) -> bool {
        self.map.contains_key(key)
    }

    /// Number of cached contexts.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for ContextCache {
    fn default() -> Self {
        Self::new(CONTEXT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg_with_seed(seed: i64) -> WorldConfig {
        WorldConfig {
            seed,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn plate_sites_are_deterministic() {
        let cfg = cfg_with_seed(42);
        let a = TerrainContext::build(&cfg, None);
        let b = TerrainContext::build(&cfg, None);
        assert_eq!(a.plates, b.plates);
        assert_eq!(a.plates.len(), 8);
    }

    #[test]
    fn plate_sites_depend_on_seed() {
        let a = TerrainContext::build(&cfg_with_seed(42), None);
        let b = TerrainContext::build(&cfg_with_seed(99), None);
        assert_ne!(a.plates, b.plates);
    }

    #[test]
    fn remix_shifts_only_the_named_plate() {
        let cfg = cfg_with_seed(42);
        let mut remix = Remix::default();
        remix
            .plate_shift
            .insert(2, hexlab_config::PlateShift { dx: 300.0, dy: -120.0 });

        let plain = TerrainContext::build(&cfg, None);
        let shifted = TerrainContext::build(&cfg, Some(&remix));

        assert_eq!(shifted.plates[2].x, plain.plates[2].x + 300.0);
        assert_eq!(shifted.plates[2].y, plain.plates[2].y - 120.0);
        assert_eq!(shifted.plates[0], plain.plates[0]);
    }

    #[test]
    fn key_ignores_render_only_fields() {
        let mut a = cfg_with_seed(42);
        let mut b = cfg_with_seed(42);
        a.bands = vec![-0.5, 0.0, 0.5];
        b.noise.fbm_weight = 0.1;
        b.layers = 9;
        assert_eq!(ContextKey::for_world(&a, None), ContextKey::for_world(&b, None));
    }

    #[test]
    fn key_separates_seeds_and_shifts() {
        let base = cfg_with_seed(42);
        assert_ne!(
            ContextKey::for_world(&base, None),
            ContextKey::for_world(&cfg_with_seed(43), None)
        );

        let mut remix = Remix::default();
        remix
            .plate_shift
            .insert(0, hexlab_config::PlateShift { dx: 1.0, dy: 0.0 });
        assert_ne!(
            ContextKey::for_world(&base, None),
            ContextKey::for_world(&base, Some(&remix))
        );
    }

    #[test]
    fn cache_reuses_contexts_per_key() {
        let mut cache = ContextCache::default();
        let cfg = cfg_with_seed(42);
        let a = cache.get_or_build(&cfg, None);
        let b = cache.get_or_build(&cfg, None);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_evicts_oldest_beyond_capacity() {
        let mut cache = ContextCache::default();
        for seed in 0..10 {
            cache.get_or_build(&cfg_with_seed(seed), None);
        }

        assert_eq!(cache.len(), CONTEXT_CACHE_CAPACITY);
        // Seeds 0 and 1 went in first and must be gone; the newest survive.
        assert!(!cache.contains(&ContextKey::for_world(&cfg_with_seed(0), None)));
        assert!(!cache.contains(&ContextKey::for_world(&cfg_with_seed(1), None)));
        assert!(cache.contains(&ContextKey::for_world(&cfg_with_seed(2), None)));
        assert!(cache.contains(&ContextKey::for_world(&cfg_with_seed(9), None)));
    }
}
