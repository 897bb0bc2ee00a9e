//! Tolerances shared by the profile algorithms

/// Distance under which two intersection points are considered the same point.
///
/// The curve-curve primitive itself runs with `PRECISION_INTERSECTION / 100`.
pub const PRECISION_INTERSECTION: f64 = 1e-9;

/// Distance under which two curve endpoints are considered coincident
/// when validating loops and walking corners.
pub const PRECISION_POINT: f64 = 1e-7;

/// Cross-product magnitude (on unit tangents) under which a junction is smooth
pub const PRECISION_ANGLE: f64 = 1e-9;

/// Tolerance set used by the finder and the organizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Point deduplication distance for intersections
    pub intersection: f64,
    /// Endpoint coincidence distance
    pub point: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new()
    }
}

impl Tolerance {
    /// Create the default tolerance set
    pub fn new() -> Self {
        Self {
            intersection: PRECISION_INTERSECTION,
            point: PRECISION_POINT,
        }
    }

    /// Set the intersection deduplication distance
    pub fn with_intersection(mut self, intersection: f64) -> Self {
        self.intersection = intersection.abs();
        self
    }

    /// Set the endpoint coincidence distance
    pub fn with_point(mut self, point: f64) -> Self {
        self.point = point.abs();
        self
    }

    /// Tolerance handed to the curve-curve intersection primitive
    pub fn curve_intersection(&self) -> f64 {
        self.intersection / 100.0
    }
}
