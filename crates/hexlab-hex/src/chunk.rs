//! Chunk addressing: fixed-size square blocks of axial cells.

use crate::axial::Axial;

/// Cells per chunk edge. A chunk covers `CHUNK_SIZE × CHUNK_SIZE` axial
/// cells and is the unit of generation, caching, and delivery.
pub const CHUNK_SIZE: i32 = 64;

/// Cells per chunk (`CHUNK_SIZE²`), the length of a chunk's value buffer.
pub const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Address of one chunk on the infinite chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk-grid column.
    pub cq: i32,
    /// Chunk-grid row.
    pub cr: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(cq: i32, cr: i32) -> Self {
        Self { cq, cr }
    }

    /// The axial cell at the chunk's low corner (local index 0).
    pub const fn base(self) -> Axial {
        Axial::new(self.cq * CHUNK_SIZE, self.cr * CHUNK_SIZE)
    }

    /// The axial cell for a row-major local index in `0..CHUNK_AREA`.
    ///
    /// Local index `i` maps to offset `(i % CHUNK_SIZE, i / CHUNK_SIZE)`.
    pub fn cell(self, index: usize) -> Axial {
        debug_assert!(index < CHUNK_AREA);
        let i = index as i32;
        Axial::new(
            self.cq * CHUNK_SIZE + i % CHUNK_SIZE,
            self.cr * CHUNK_SIZE + i / CHUNK_SIZE,
        )
    }

    /// The fractional axial coordinate of the chunk's center.
    pub fn center_axial(self) -> (f64, f64) {
        (
            (self.cq * CHUNK_SIZE) as f64 + CHUNK_SIZE as f64 * 0.5,
            (self.cr * CHUNK_SIZE) as f64 + CHUNK_SIZE as f64 * 0.5,
        )
    }
}
