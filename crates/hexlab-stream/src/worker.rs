//! The generation worker boundary.
//!
//! Field evaluation runs on one dedicated background thread, reachable only
//! through bounded message channels: a request in, a response out, nothing
//! shared but the channel endpoints. The worker owns the terrain context
//! cache, so expensive per-configuration setup is reused across requests
//! without any cross-thread locking. Requests carry a correlation id that
//! is echoed back unchanged; the streamer uses it to match completions to
//! dispatch-time bookkeeping.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use hexlab_config::{Remix, WorldConfig};
use hexlab_hex::ChunkCoord;
use hexlab_terrain::{ChunkData, ContextCache, generate_chunk};

/// Capacity of the request and response queues. Deeper than the per-pass
/// request cap so a full planning pass never trips the backpressure limit.
const QUEUE_CAPACITY: usize = 128;

/// A chunk generation request crossing the worker boundary.
#[derive(Clone, Debug)]
pub struct GenRequest {
    /// Correlation id, unique per worker. Echoed unchanged in the response.
    pub id: u64,
    /// World configuration snapshot for this request.
    pub config: WorldConfig,
    /// Optional remix delta.
    pub remix: Option<Remix>,
    /// Which chunk to generate.
    pub chunk: ChunkCoord,
    /// Depth layer to evaluate.
    pub layer: u32,
}

/// A completed generation crossing back from the worker.
#[derive(Debug)]
pub struct GenResponse {
    /// The correlation id of the originating request.
    pub id: u64,
    /// The generated chunk buffer, moved (not copied) out of the worker.
    pub chunk: ChunkData,
}

/// Errors at the worker transport boundary.
///
/// These are retryable by design: a failed submit leaves the chunk
/// ungenerated, and the next visibility pass will ask for it again.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The request queue is at capacity.
    #[error("generation request queue is full")]
    QueueFull,
    /// The worker thread has shut down.
    #[error("generation worker disconnected")]
    WorkerGone,
}

/// Handle to the background generation thread.
///
/// Dropping the handle closes the request channel, which ends the worker's
/// receive loop and lets the thread exit.
pub struct GenWorker {
    request_tx: Sender<GenRequest>,
    response_rx: Receiver<GenResponse>,
    next_id: u64,
}

impl GenWorker {
    /// Spawns the generation thread and connects the channel pair.
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = bounded::<GenRequest>(QUEUE_CAPACITY);
        let (response_tx, response_rx) = bounded::<GenResponse>(QUEUE_CAPACITY);

        std::thread::Builder::new()
            .name("hexlab-gen".into())
            .spawn(move || worker_loop(&request_rx, &response_tx))
            .expect("failed to spawn generation worker thread");

        Self {
            request_tx,
            response_rx,
            next_id: 0,
        }
    }

    /// Submits one generation request; returns its correlation id.
    pub fn submit(
        &mut self,
        config: WorldConfig,
        remix: Option<Remix>,
        chunk: ChunkCoord,
        layer: u32,
    ) -> Result<u64, StreamError> {
        self.next_id += 1;
        let id = self.next_id;

        let request = GenRequest { id, config, remix, chunk, layer };
        match self.request_tx.try_send(request) {
            Ok(()) => Ok(id),
            Err(TrySendError::Full(_)) => Err(StreamError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(StreamError::WorkerGone),
        }
    }

    /// Polls for one completed response without blocking.
    pub fn poll(&self) -> Completion {
        match self.response_rx.try_recv() {
            Ok(response) => Completion::Ready(response),
            Err(crossbeam_channel::TryRecvError::Empty) => Completion::Empty,
            Err(crossbeam_channel::TryRecvError::Disconnected) => Completion::Disconnected,
        }
    }

    /// Blocks until a response arrives or the worker is gone.
    pub fn recv(&self) -> Result<GenResponse, StreamError> {
        self.response_rx.recv().map_err(|_| StreamError::WorkerGone)
    }
}

/// Result of polling the worker for a completion.
#[derive(Debug)]
pub enum Completion {
    /// A response arrived.
    Ready(GenResponse),
    /// Nothing has completed yet.
    Empty,
    /// The worker thread has shut down; no further responses will come.
    Disconnected,
}

fn worker_loop(requests: &Receiver<GenRequest>, responses: &Sender<GenResponse>) {
    let mut contexts = ContextCache::default();

    while let Ok(request) = requests.recv() {
        let ctx = contexts.get_or_build(&request.config, request.remix.as_ref());
        let chunk = generate_chunk(
            &request.config,
            request.remix.as_ref(),
            request.chunk,
            request.layer,
            &ctx,
        );

        if responses
            .send(GenResponse { id: request.id, chunk })
            .is_err()
        {
            // Consumer side is gone; nothing left to generate for.
            break;
        }
    }

    tracing::debug!("generation worker shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_echoes_request_id_and_chunk() {
        let mut worker = GenWorker::spawn();
        let id = worker
            .submit(WorldConfig::default(), None, ChunkCoord::new(2, -3), 0)
            .unwrap();

        let response = worker.recv().unwrap();
        assert_eq!(response.id, id);
        assert_eq!(response.chunk.coord, ChunkCoord::new(2, -3));
        assert_eq!(response.chunk.size(), 4096);
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let mut worker = GenWorker::spawn();
        let a = worker
            .submit(WorldConfig::default(), None, ChunkCoord::new(0, 0), 0)
            .unwrap();
        let b = worker
            .submit(WorldConfig::default(), None, ChunkCoord::new(1, 0), 0)
            .unwrap();
        assert!(b > a);
    }

    #[test]
    fn worker_matches_direct_generation() {
        let mut worker = GenWorker::spawn();
        let cfg = WorldConfig::default();
        worker.submit(cfg.clone(), None, ChunkCoord::new(0, 0), 0).unwrap();
        let via_worker = worker.recv().unwrap().chunk;

        let ctx = hexlab_terrain::TerrainContext::build(&cfg, None);
        let direct = generate_chunk(&cfg, None, ChunkCoord::new(0, 0), 0, &ctx);
        assert_eq!(via_worker.values, direct.values);
    }

    #[test]
    fn completions_cover_all_requests_in_some_order() {
        let mut worker = GenWorker::spawn();
        let mut ids = Vec::new();
        for cq in 0..6 {
            ids.push(
                worker
                    .submit(WorldConfig::default(), None, ChunkCoord::new(cq, 0), 0)
                    .unwrap(),
            );
        }

        let mut seen = Vec::new();
        for _ in 0..ids.len() {
            seen.push(worker.recv().unwrap().id);
        }
        seen.sort_unstable();
        assert_eq!(seen, ids);
    }
}
