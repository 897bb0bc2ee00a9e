//! Axis-aligned 2D bounding box

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::Point2D;

/// Axis-aligned bounding box in sketch coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// Lower-left corner
    pub min: Point2D,
    /// Upper-right corner
    pub max: Point2D,
}

impl BoundingBox2D {
    /// Create a box from two opposite corners (in any order)
    pub fn new(a: Point2D, b: Point2D) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Grow the box so that it holds `point`
    pub fn with_point(self, point: Point2D) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Smallest box holding both boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Check whether the boxes share at least one point (touching counts)
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Check whether the point lies in the closed box
    pub fn contains_point(&self, point: Point2D) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check whether the point is farther than `tolerance` outside the box
    pub fn is_out(&self, point: Point2D, tolerance: f64) -> bool {
        !self.expanded(tolerance).contains_point(point)
    }

    /// Box grown by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: self.min - DVec2::splat(margin),
            max: self.max + DVec2::splat(margin),
        }
    }

    /// Corners as plain arrays, the form the spatial index works with
    pub fn corners(&self) -> ([f64; 2], [f64; 2]) {
        (self.min.to_array(), self.max.to_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_touch() {
        let a = BoundingBox2D::new(DVec2::ZERO, DVec2::new(10.0, 10.0));
        let b = BoundingBox2D::new(DVec2::new(15.0, 15.0), DVec2::new(5.0, 5.0));
        let c = BoundingBox2D::new(DVec2::new(10.0, 0.0), DVec2::new(20.0, 10.0));
        let d = BoundingBox2D::new(DVec2::new(11.0, 0.0), DVec2::new(20.0, 10.0));

        assert_eq!(b.min, DVec2::new(5.0, 5.0));
        assert!(a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_with_point() {
        let bbox = BoundingBox2D::new(DVec2::new(1.0, -2.0), DVec2::new(0.0, 0.0))
            .with_point(DVec2::new(-3.0, 4.0));
        assert_eq!(bbox.min, DVec2::new(-3.0, -2.0));
        assert_eq!(bbox.max, DVec2::new(1.0, 4.0));
        assert!(!bbox.is_out(DVec2::new(1.0 + 1e-10, 0.0), 1e-9));
        assert!(bbox.is_out(DVec2::new(1.1, 0.0), 1e-9));
    }
}
