//! 2D point helpers

use glam::DVec2;

/// A 2D point (or vector) in sketch coordinates
pub type Point2D = DVec2;

/// Check whether two points coincide within `tolerance`
#[inline]
pub fn same_point(a: Point2D, b: Point2D, tolerance: f64) -> bool {
    a.distance_squared(b) <= tolerance * tolerance
}

/// Z component of the 3D cross product of two 2D vectors
#[inline]
pub fn cross(a: Point2D, b: Point2D) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Remove points that coincide with an earlier point of the list.
///
/// First occurrences win, so the order of the remaining points is stable.
pub fn remove_duplicate_points(points: &[Point2D], tolerance: f64) -> Vec<Point2D> {
    let mut unique: Vec<Point2D> = Vec::with_capacity(points.len());
    for point in points {
        if !unique.iter().any(|p| same_point(*p, *point, tolerance)) {
            unique.push(*point);
        }
    }
    unique
}
