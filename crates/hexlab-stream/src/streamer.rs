//! The chunk streamer: demand scheduling with epoch invalidation.
//!
//! Owns the result store and in-flight bookkeeping on the coordinating
//! side. Every dispatched request is stamped with the generation epoch
//! current at dispatch time; when the world configuration changes the epoch
//! is bumped and the store cleared, so results that complete afterwards are
//! recognized as stale and dropped on arrival. There is no hard
//! cancellation; work already handed to the worker runs to completion and
//! is discarded at the boundary.

use rustc_hash::{FxHashMap, FxHashSet};

use hexlab_config::{Remix, WorldConfig};
use hexlab_hex::ChunkCoord;
use hexlab_terrain::ChunkData;

use crate::plan::{ViewTransform, prioritize_chunks, visible_chunks};
use crate::worker::{Completion, GenWorker};

/// Cap on generation requests issued per planning pass. Keeps worker load
/// bounded even when a zoomed-out viewport sees thousands of chunks.
pub const MAX_VISIBLE_REQUESTS: usize = 72;

/// Store/in-flight key: a chunk address qualified by the generation epoch
/// it was requested under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ChunkKey {
    epoch: u64,
    coord: ChunkCoord,
}

/// Observability counters for the perf HUD. Informational only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Chunk count of the last visibility pass.
    pub visible_chunks: usize,
    /// Hex count reported by the renderer after its last draw.
    pub rendered_hexes: usize,
    /// Requests currently in flight.
    pub in_flight: usize,
    /// Chunks completed and stored for the current epoch.
    pub stored_chunks: usize,
}

/// Coordinating-side scheduler for asynchronous chunk generation.
///
/// Single-owner: all mutation happens through `&mut self` on the thread
/// that owns the streamer, so the store and in-flight set need no locks.
pub struct ChunkStreamer {
    worker: GenWorker,
    config: WorldConfig,
    remix: Option<Remix>,
    layer: u32,
    epoch: u64,
    store: FxHashMap<ChunkKey, ChunkData>,
    in_flight: FxHashSet<ChunkKey>,
    /// Dispatch-time bookkeeping per correlation id. Entries survive epoch
    /// bumps so late completions can be matched and discarded.
    pending: FxHashMap<u64, ChunkKey>,
    visible_chunks: usize,
    rendered_hexes: usize,
}

impl ChunkStreamer {
    /// Creates a streamer for the given world and spawns its worker.
    pub fn new(config: WorldConfig, remix: Option<Remix>) -> Self {
        Self {
            worker: GenWorker::spawn(),
            config,
            remix,
            layer: 0,
            epoch: 0,
            store: FxHashMap::default(),
            in_flight: FxHashSet::default(),
            pending: FxHashMap::default(),
            visible_chunks: 0,
            rendered_hexes: 0,
        }
    }

    /// Swaps in a new world configuration and/or remix.
    ///
    /// Bumps the epoch and clears the store and in-flight set. Requests
    /// already dispatched keep running on the worker; their results are
    /// discarded when they arrive under the old epoch.
    pub fn set_world(&mut self, config: WorldConfig, remix: Option<Remix>) {
        self.config = config;
        self.remix = remix;
        self.bump_epoch();
    }

    /// Selects the depth layer to stream. A layer is a different field, so
    /// this invalidates exactly like a configuration change.
    pub fn set_layer(&mut self, layer: u32) {
        if layer != self.layer {
            self.layer = layer;
            self.bump_epoch();
        }
    }

    fn bump_epoch(&mut self) {
        self.epoch += 1;
        self.store.clear();
        self.in_flight.clear();
        tracing::debug!(epoch = self.epoch, "world changed, invalidating stream state");
    }

    /// Plans visibility for the viewport and requests the highest-priority
    /// missing chunks. Returns the number of requests dispatched.
    pub fn ensure_visible(
        &mut self,
        view: &ViewTransform,
        width: f64,
        height: f64,
        tile_radius: f64,
    ) -> usize {
        let candidates =
            visible_chunks(view, width, height, tile_radius, hexlab_hex::CHUNK_SIZE);
        self.visible_chunks = candidates.len();

        let prioritized = prioritize_chunks(
            &candidates,
            view,
            width,
            height,
            tile_radius,
            hexlab_hex::CHUNK_SIZE,
            MAX_VISIBLE_REQUESTS,
        );

        let mut dispatched = 0;
        for chunk in prioritized {
            if self.ensure(chunk) {
                dispatched += 1;
            }
        }
        dispatched
    }

    /// Requests one chunk unless it is already stored or in flight.
    ///
    /// Returns `true` if a request was dispatched. A transport failure is
    /// logged and swallowed; the chunk stays unmarked so the next pass
    /// retries it.
    pub fn ensure(&mut self, chunk: ChunkCoord) -> bool {
        let key = ChunkKey { epoch: self.epoch, coord: chunk };
        if self.store.contains_key(&key) || self.in_flight.contains(&key) {
            return false;
        }

        match self.worker.submit(
            self.config.clone(),
            self.remix.clone(),
            chunk,
            self.layer,
        ) {
            Ok(id) => {
                self.in_flight.insert(key);
                self.pending.insert(id, key);
                true
            }
            Err(err) => {
                tracing::warn!(cq = chunk.cq, cr = chunk.cr, %err, "chunk request not dispatched");
                false
            }
        }
    }

    /// Drains completed chunks, stores the current-epoch ones, and hands
    /// each stored chunk to `on_chunk`. Returns how many were stored.
    ///
    /// Call once per frame. Stale completions (dispatched under an earlier
    /// epoch) are dropped here; their in-flight markers were already
    /// cleared when the epoch changed.
    pub fn drain_completed(&mut self, mut on_chunk: impl FnMut(&ChunkData)) -> usize {
        let mut stored = 0;
        loop {
            let response = match self.worker.poll() {
                Completion::Ready(response) => response,
                Completion::Empty => break,
                Completion::Disconnected => {
                    // Nothing pending will ever resolve; clear the markers so
                    // chunks stay retryable if a new worker is attached.
                    if !self.pending.is_empty() {
                        tracing::warn!(
                            pending = self.pending.len(),
                            "generation worker gone, dropping in-flight markers"
                        );
                        self.pending.clear();
                        self.in_flight.clear();
                    }
                    break;
                }
            };

            let Some(key) = self.pending.remove(&response.id) else {
                tracing::warn!(id = response.id, "completion with unknown correlation id");
                continue;
            };
            self.in_flight.remove(&key);

            if key.epoch != self.epoch {
                tracing::trace!(
                    cq = key.coord.cq,
                    cr = key.coord.cr,
                    stale = key.epoch,
                    current = self.epoch,
                    "discarding stale chunk"
                );
                continue;
            }

            on_chunk(&response.chunk);
            self.store.insert(key, response.chunk);
            stored += 1;
        }
        stored
    }

    /// The stored chunk at `coord` for the current epoch, if generated.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkData> {
        self.store.get(&ChunkKey { epoch: self.epoch, coord })
    }

    /// The field value of one axial cell, if its chunk is generated.
    pub fn cell_value(&self, q: i32, r: i32) -> Option<f32> {
        let size = hexlab_hex::CHUNK_SIZE;
        let coord = ChunkCoord::new(q.div_euclid(size), r.div_euclid(size));
        let chunk = self.chunk(coord)?;
        let index = (r.rem_euclid(size) * size + q.rem_euclid(size)) as usize;
        chunk.values.get(index).copied()
    }

    /// Number of requests dispatched but not yet resolved (any epoch).
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Lets the renderer report how many hexes its last draw produced.
    pub fn set_rendered_hexes(&mut self, count: usize) {
        self.rendered_hexes = count;
    }

    /// Current observability counters.
    pub fn stats(&self) -> StreamStats {
        StreamStats {
            visible_chunks: self.visible_chunks,
            rendered_hexes: self.rendered_hexes,
            in_flight: self.in_flight.len(),
            stored_chunks: self.store.len(),
        }
    }

    /// The active world configuration snapshot.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }
}
