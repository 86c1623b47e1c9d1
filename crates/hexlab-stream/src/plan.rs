//! Visibility planning: viewport transform → bounded chunk sets.
//!
//! Pure coordinate arithmetic. [`visible_chunks`] answers "which chunks
//! could the viewport touch", with margins so edge chunks are ready before
//! they scroll in; [`prioritize_chunks`] picks the nearest-first subset that
//! bounds how many generation requests one planning pass may issue.

use hexlab_hex::{ChunkCoord, SQRT_3, frac_axial_to_world};

/// Mapping from world space to screen space: translation `(x, y)` plus
/// uniform scale `k`. Supplied by the camera on every pan/zoom/resize and
/// read-only here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Screen-space x translation in pixels.
    pub x: f64,
    /// Screen-space y translation in pixels.
    pub y: f64,
    /// Uniform zoom factor. Positive for any usable viewport.
    pub k: f64,
}

impl ViewTransform {
    /// Identity transform: world origin at the screen's top-left, no zoom.
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, k: 1.0 };

    /// Transform placing the world origin at the viewport center, no zoom.
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            x: width * 0.5,
            y: height * 0.5,
            k: 1.0,
        }
    }
}

/// Every chunk whose world footprint intersects the viewport.
///
/// The visible world rectangle is expanded by a `2 × tile_radius` margin to
/// avoid pop-in at the edges, and the chunk index bounds get a ±1 safety
/// margin. Empty only for a degenerate viewport (non-positive size or
/// scale). At low zoom the result can number in the thousands; pair it
/// with [`prioritize_chunks`] before issuing work.
pub fn visible_chunks(
    view: &ViewTransform,
    width: f64,
    height: f64,
    tile_radius: f64,
    chunk_size: i32,
) -> Vec<ChunkCoord> {
    if width <= 0.0 || height <= 0.0 || view.k <= 0.0 {
        return Vec::new();
    }

    let pad = 2.0 * tile_radius;
    let x0 = -view.x / view.k - pad;
    let y0 = -view.y / view.k - pad;
    let x1 = x0 + width / view.k + 2.0 * pad;
    let y1 = y0 + height / view.k + 2.0 * pad;

    let chunk_world_width = f64::from(chunk_size) * SQRT_3 * tile_radius;
    let chunk_world_height = f64::from(chunk_size) * 1.5 * tile_radius;

    let cq0 = (x0 / chunk_world_width).floor() as i32 - 1;
    let cq1 = (x1 / chunk_world_width).floor() as i32 + 1;
    let cr0 = (y0 / chunk_world_height).floor() as i32 - 1;
    let cr1 = (y1 / chunk_world_height).floor() as i32 + 1;

    let mut out =
        Vec::with_capacity(((cq1 - cq0 + 1) * (cr1 - cr0 + 1)).max(0) as usize);
    for cr in cr0..=cr1 {
        for cq in cq0..=cq1 {
            out.push(ChunkCoord::new(cq, cr));
        }
    }
    out
}

/// The `limit` candidates nearest the viewport center, nearest first.
///
/// Distance is squared Euclidean in world space from each chunk's center to
/// the point the viewport is looking at. The sort is stable, so candidates
/// at equal distance keep their input order. A non-positive zoom yields an
/// empty result, as it does for [`visible_chunks`].
pub fn prioritize_chunks(
    chunks: &[ChunkCoord],
    view: &ViewTransform,
    width: f64,
    height: f64,
    tile_radius: f64,
    chunk_size: i32,
    limit: usize,
) -> Vec<ChunkCoord> {
    if view.k <= 0.0 {
        return Vec::new();
    }

    let center_world_x = (width * 0.5 - view.x) / view.k;
    let center_world_y = (height * 0.5 - view.y) / view.k;

    let mut scored: Vec<(ChunkCoord, f64)> = chunks
        .iter()
        .map(|&c| {
            let center_q = f64::from(c.cq * chunk_size) + f64::from(chunk_size) * 0.5;
            let center_r = f64::from(c.cr * chunk_size) + f64::from(chunk_size) * 0.5;
            let world = frac_axial_to_world(center_q, center_r, tile_radius);
            let dx = world.x - center_world_x;
            let dy = world.y - center_world_y;
            (c, dx * dx + dy * dy)
        })
        .collect();

    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.truncate(limit);
    scored.into_iter().map(|(c, _)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexlab_hex::{CHUNK_SIZE, world_to_axial};

    const TILE_RADIUS: f64 = 14.0;

    fn center_chunk(view: &ViewTransform, width: f64, height: f64) -> ChunkCoord {
        let wx = (width * 0.5 - view.x) / view.k;
        let wy = (height * 0.5 - view.y) / view.k;
        let cell = world_to_axial(wx, wy, TILE_RADIUS);
        ChunkCoord::new(cell.q.div_euclid(CHUNK_SIZE), cell.r.div_euclid(CHUNK_SIZE))
    }

    #[test]
    fn visible_set_is_never_empty_for_positive_viewport() {
        let view = ViewTransform::centered(800.0, 600.0);
        let chunks = visible_chunks(&view, 800.0, 600.0, TILE_RADIUS, CHUNK_SIZE);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn visible_set_contains_viewport_center_chunk() {
        let views = [
            ViewTransform::centered(800.0, 600.0),
            ViewTransform { x: -5000.0, y: 3000.0, k: 0.4 },
            ViewTransform { x: 120.0, y: -80.0, k: 3.0 },
        ];
        for view in views {
            let chunks = visible_chunks(&view, 800.0, 600.0, TILE_RADIUS, CHUNK_SIZE);
            let center = center_chunk(&view, 800.0, 600.0);
            assert!(chunks.contains(&center), "missing center chunk {center:?}");
        }
    }

    #[test]
    fn degenerate_viewport_yields_nothing() {
        let view = ViewTransform::IDENTITY;
        assert!(visible_chunks(&view, 0.0, 600.0, TILE_RADIUS, CHUNK_SIZE).is_empty());
        assert!(visible_chunks(&view, 800.0, -1.0, TILE_RADIUS, CHUNK_SIZE).is_empty());
        let flat = ViewTransform { x: 0.0, y: 0.0, k: 0.0 };
        assert!(visible_chunks(&flat, 800.0, 600.0, TILE_RADIUS, CHUNK_SIZE).is_empty());
    }

    #[test]
    fn low_zoom_expands_the_candidate_set() {
        let near = visible_chunks(
            &ViewTransform { x: 0.0, y: 0.0, k: 1.0 },
            800.0,
            600.0,
            TILE_RADIUS,
            CHUNK_SIZE,
        );
        let far = visible_chunks(
            &ViewTransform { x: 0.0, y: 0.0, k: 0.2 },
            800.0,
            600.0,
            TILE_RADIUS,
            CHUNK_SIZE,
        );
        assert!(far.len() > near.len());
    }

    #[test]
    fn prioritize_caps_count_and_sorts_by_distance() {
        let view = ViewTransform::centered(800.0, 600.0);
        let candidates = visible_chunks(&view, 800.0, 600.0, TILE_RADIUS, CHUNK_SIZE);
        let limit = 4;
        let picked =
            prioritize_chunks(&candidates, &view, 800.0, 600.0, TILE_RADIUS, CHUNK_SIZE, limit);

        assert_eq!(picked.len(), limit.min(candidates.len()));

        let dist2 = |c: &ChunkCoord| {
            let center_q = f64::from(c.cq * CHUNK_SIZE) + f64::from(CHUNK_SIZE) * 0.5;
            let center_r = f64::from(c.cr * CHUNK_SIZE) + f64::from(CHUNK_SIZE) * 0.5;
            let w = frac_axial_to_world(center_q, center_r, TILE_RADIUS);
            w.x * w.x + w.y * w.y
        };
        for pair in picked.windows(2) {
            assert!(dist2(&pair[0]) <= dist2(&pair[1]));
        }
    }

    #[test]
    fn prioritize_keeps_near_chunks_and_drops_far_ones() {
        let view = ViewTransform::centered(800.0, 600.0);
        // The chunk containing the world origin is the closest candidate
        // here: chunk (-1, -1) spans cells [-64, 0) on both axes.
        let near = ChunkCoord::new(-1, -1);
        let far = ChunkCoord::new(40, 40);
        let candidates = vec![far, near, ChunkCoord::new(10, 0), ChunkCoord::new(0, 10)];

        let picked =
            prioritize_chunks(&candidates, &view, 800.0, 600.0, TILE_RADIUS, CHUNK_SIZE, 2);
        assert_eq!(picked[0], near);
        assert!(!picked.contains(&far));
    }

    #[test]
    fn prioritize_rejects_degenerate_zoom() {
        let candidates = vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, 1)];
        let flat = ViewTransform { x: 0.0, y: 0.0, k: 0.0 };
        assert!(
            prioritize_chunks(&candidates, &flat, 800.0, 600.0, TILE_RADIUS, CHUNK_SIZE, 10)
                .is_empty()
        );
    }

    #[test]
    fn prioritize_with_generous_limit_returns_everything() {
        let view = ViewTransform::centered(800.0, 600.0);
        let candidates = vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, 1)];
        let picked =
            prioritize_chunks(&candidates, &view, 800.0, 600.0, TILE_RADIUS, CHUNK_SIZE, 100);
        assert_eq!(picked.len(), 2);
    }
}
