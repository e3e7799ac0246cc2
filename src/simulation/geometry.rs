//! Distance and angle helpers shared by the force model and the viewer
//!
//! All planets are axis-aligned circles, so a "center" is always
//! top-left position + radius on both axes.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Distance between two points, plus the per-axis deltas (`one - two`)
pub fn hypot(one: NVec2, two: NVec2) -> (f64, f64, f64) {
    let dist_x = one.x - two.x;
    let dist_y = one.y - two.y;
    ((dist_x * dist_x + dist_y * dist_y).sqrt(), dist_x, dist_y)
}

/// Distance between the centers of two circles given top-left positions
/// and radii
pub fn hypot_center(one: NVec2, r_one: f64, two: NVec2, r_two: f64) -> (f64, f64, f64) {
    hypot(one.add_scalar(r_one), two.add_scalar(r_two))
}

/// Bearing in radians from `one` toward `two`, measured the way the rope
/// visual expects it (atan2 of x-delta over y-delta)
pub fn angle_relative(one: NVec2, two: NVec2) -> f64 {
    (one.x - two.x).atan2(one.y - two.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hypot_is_euclidean() {
        let (d, dx, dy) = hypot(NVec2::new(3.0, 4.0), NVec2::new(0.0, 0.0));
        assert_eq!(d, 5.0);
        assert_eq!(dx, 3.0);
        assert_eq!(dy, 4.0);
    }

    #[test]
    fn center_distance_accounts_for_radii() {
        // Two circles whose top-left corners differ but whose centers coincide
        let (d, _, _) = hypot_center(NVec2::new(0.0, 0.0), 10.0, NVec2::new(5.0, 5.0), 5.0);
        assert_eq!(d, 0.0);
    }
}
