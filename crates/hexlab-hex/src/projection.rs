//! Projection between axial cells and the continuous world plane.
//!
//! Flat-top layout: a cell at `(q, r)` sits at `x = √3·(q + r/2)·radius`,
//! `y = 1.5·r·radius`. The unit-radius form is what the terrain composer
//! samples noise at; the scaled form is what the planner and renderer use.

use glam::DVec2;

use crate::axial::Axial;

/// √3, the horizontal spacing of flat-top hex columns at unit radius.
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Projects an axial cell to world space at the given tile radius.
pub fn axial_to_world(q: i32, r: i32, radius: f64) -> DVec2 {
    let unit = axial_to_world_unit(q, r);
    DVec2::new(unit.x * radius, unit.y * radius)
}

/// Projects an axial cell to the unit-radius world plane.
///
/// This is the coordinate space the terrain field is defined over, so it
/// must stay fixed: rescaling it would rescale every noise frequency.
pub fn axial_to_world_unit(q: i32, r: i32) -> DVec2 {
    DVec2::new(SQRT_3 * (q as f64 + r as f64 / 2.0), 1.5 * r as f64)
}

/// Projects a fractional axial coordinate to world space.
///
/// Used for positions that are not cell centers, such as chunk centers.
pub fn frac_axial_to_world(qf: f64, rf: f64, radius: f64) -> DVec2 {
    DVec2::new(SQRT_3 * (qf + rf / 2.0) * radius, 1.5 * rf * radius)
}

/// Maps a world-plane point back to the containing cell.
///
/// Inverts the flat-top projection into fractional axial coordinates, then
/// rounds in cube space so points near cell edges land in the correct hex.
pub fn world_to_axial(x: f64, y: f64, radius: f64) -> Axial {
    let rf = y / (1.5 * radius);
    let qf = x / (SQRT_3 * radius) - rf / 2.0;

    // Cube rounding: round all three, then fix the axis with the largest
    // rounding error so q + r + s stays zero.
    let xf = qf;
    let zf = rf;
    let yf = -xf - zf;

    let mut rx = xf.round();
    let ry = yf.round();
    let mut rz = zf.round();

    let x_diff = (rx - xf).abs();
    let y_diff = (ry - yf).abs();
    let z_diff = (rz - zf).abs();

    if x_diff > y_diff && x_diff > z_diff {
        rx = -ry - rz;
    } else if y_diff <= z_diff {
        rz = -rx - ry;
    }
    // The remaining case corrects the y axis, which does not appear in the
    // axial result.

    Axial::new(rx as i32, rz as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_round_trips_for_typical_radius() {
        let samples = [
            Axial::new(0, 0),
            Axial::new(1, 0),
            Axial::new(0, 1),
            Axial::new(-1, 1),
            Axial::new(2, -1),
            Axial::new(-40, 17),
        ];
        for a in samples {
            let p = axial_to_world(a.q, a.r, 14.0);
            let back = world_to_axial(p.x, p.y, 14.0);
            assert_eq!(back, a);
        }
    }

    #[test]
    fn off_center_points_round_to_nearest_cell() {
        let center = axial_to_world(3, -2, 14.0);
        // Nudge well inside the hex; must still resolve to the same cell.
        let back = world_to_axial(center.x + 4.0, center.y - 4.0, 14.0);
        assert_eq!(back, Axial::new(3, -2));
    }

    #[test]
    fn unit_projection_matches_flat_top_spacing() {
        let a = axial_to_world_unit(1, 0);
        let b = axial_to_world_unit(0, 1);
        assert!((a.x - SQRT_3).abs() < 1e-12);
        assert_eq!(a.y, 0.0);
        assert!((b.x - SQRT_3 / 2.0).abs() < 1e-12);
        assert_eq!(b.y, 1.5);
    }
}
