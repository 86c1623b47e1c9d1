//! Axial cell addresses and the cube-coordinate hex metric.

/// Address of one hex cell on the infinite flat-top grid.
///
/// The implied third cube coordinate is `s = -q - r`. No world bound is
/// enforced here; callers that want a finite world apply [`in_radius`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Axial {
    /// Column coordinate.
    pub q: i32,
    /// Row coordinate.
    pub r: i32,
}

impl Axial {
    /// Creates a new axial coordinate.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Component-wise sum.
    pub const fn add(self, other: Axial) -> Axial {
        Axial::new(self.q + other.q, self.r + other.r)
    }

    /// The six adjacent cells, in [`AXIAL_DIRS`] order.
    pub fn neighbors(self) -> [Axial; 6] {
        AXIAL_DIRS.map(|d| self.add(d))
    }
}

/// The six axial direction offsets, counter-clockwise from east.
pub const AXIAL_DIRS: [Axial; 6] = [
    Axial::new(1, 0),
    Axial::new(1, -1),
    Axial::new(0, -1),
    Axial::new(-1, 0),
    Axial::new(-1, 1),
    Axial::new(0, 1),
];

/// Hex-grid distance between two cells (cube metric).
pub fn axial_distance(a: Axial, b: Axial) -> i32 {
    let dq = a.q - b.q;
    let dr = a.r - b.r;
    let ds = (-a.q - a.r) - (-b.q - b.r);
    dq.abs().max(dr.abs()).max(ds.abs())
}

/// Whether a cell lies within `radius` hexes of the origin.
///
/// Used to clip an infinite generated field to a finite world disc of
/// diameter `2 * radius`.
pub fn in_radius(q: i32, r: i32, radius: i32) -> bool {
    let s = -q - r;
    q.abs().max(r.abs()).max(s.abs()) <= radius
}
