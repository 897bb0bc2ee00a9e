//! Blueprints: closed 2D loops and the shapes built from them
//!
//! A [`Blueprint`] is one closed, simple loop of curves. A
//! [`CompoundBlueprint`] subtracts holes from an outer loop, [`Blueprints`]
//! gathers several disjoint regions, and [`Shape2D`] is the sum of all of
//! these plus the empty shape.

mod collection;
mod compound;
mod shape;

pub use collection::{Blueprints, Region};
pub use compound::CompoundBlueprint;
pub use shape::Shape2D;

use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{PRECISION_INTERSECTION, PRECISION_POINT};
use crate::curve::Curve2D;
use crate::geometry::{BoundingBox2D, Point2D, cross, same_point};

/// Blueprint construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlueprintError {
    #[error("Blueprint has no curves")]
    Empty,

    #[error("Curve {index} is degenerate")]
    DegenerateCurve { index: usize },

    #[error("Loop is not closed: curve {index} does not end where the next one starts")]
    NotClosed { index: usize },

    #[error("Polygon needs at least 3 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
}

/// Result type for blueprint construction
pub type BlueprintResult<T> = Result<T, BlueprintError>;

/// Winding direction of a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Positive signed area
    CounterClockwise,
    /// Negative signed area
    Clockwise,
}

/// A closed loop of curves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    curves: Vec<Curve2D>,
}

impl Blueprint {
    /// Create a blueprint, checking that the curves form a closed chain
    pub fn new(curves: Vec<Curve2D>) -> BlueprintResult<Self> {
        if curves.is_empty() {
            return Err(BlueprintError::Empty);
        }
        for (index, curve) in curves.iter().enumerate() {
            if curve.length() <= PRECISION_POINT {
                return Err(BlueprintError::DegenerateCurve { index });
            }
            let next = &curves[(index + 1) % curves.len()];
            if !same_point(curve.last_point(), next.first_point(), PRECISION_POINT) {
                return Err(BlueprintError::NotClosed { index });
            }
        }
        Ok(Self { curves })
    }

    /// Create a blueprint from curves already known to form a closed chain
    pub(crate) fn new_unchecked(curves: Vec<Curve2D>) -> Self {
        Self { curves }
    }

    /// Closed polygon through the given vertices
    pub fn polygon(points: &[Point2D]) -> BlueprintResult<Self> {
        if points.len() < 3 {
            return Err(BlueprintError::TooFewPoints {
                count: points.len(),
            });
        }
        let curves = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(start, end)| Curve2D::segment(*start, *end))
            .collect();
        Self::new(curves)
    }

    /// Axis-aligned counter-clockwise rectangle
    pub fn rectangle(center: Point2D, width: f64, height: f64) -> BlueprintResult<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(BlueprintError::InvalidDimension(format!(
                "rectangle {width} x {height}"
            )));
        }
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::polygon(&[
            center + DVec2::new(-hw, -hh),
            center + DVec2::new(hw, -hh),
            center + DVec2::new(hw, hh),
            center + DVec2::new(-hw, hh),
        ])
    }

    /// Counter-clockwise circle made of a single closed arc
    pub fn circle(center: Point2D, radius: f64) -> BlueprintResult<Self> {
        if !(radius > 0.0) {
            return Err(BlueprintError::InvalidDimension(format!("radius {radius}")));
        }
        Self::new(vec![Curve2D::circle(center, radius)])
    }

    /// Rectangle with every corner filleted by `radius`.
    ///
    /// A radius of half the smaller side gives a slot with round ends.
    pub fn rounded_rectangle(
        center: Point2D,
        width: f64,
        height: f64,
        radius: f64,
    ) -> BlueprintResult<Self> {
        if !(radius >= 0.0) || 2.0 * radius > width.min(height) {
            return Err(BlueprintError::InvalidDimension(format!(
                "corner radius {radius} for rectangle {width} x {height}"
            )));
        }
        let rectangle = Self::rectangle(center, width, height)?;
        Ok(crate::corner::fillet_blueprint(&rectangle, radius))
    }

    /// Curves in loop order
    pub fn curves(&self) -> &[Curve2D] {
        &self.curves
    }

    /// Number of curves
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Check whether the loop has no curves (only possible for unchecked loops)
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Start point of the loop
    pub fn first_point(&self) -> Option<Point2D> {
        self.curves.first().map(Curve2D::first_point)
    }

    /// Bounds of every curve
    pub fn bounding_box(&self) -> BoundingBox2D {
        self.curves
            .iter()
            .map(Curve2D::bounding_box)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| BoundingBox2D::new(DVec2::ZERO, DVec2::ZERO))
    }

    /// Signed enclosed area, positive for counter-clockwise loops
    pub fn signed_area(&self) -> f64 {
        0.5 * self
            .curves
            .iter()
            .map(|curve| match *curve {
                Curve2D::Segment { start, end } => cross(start, end),
                Curve2D::Arc {
                    center,
                    radius,
                    sweep,
                    ..
                } => radius * radius * sweep + cross(center, curve.last_point() - curve.first_point()),
            })
            .sum::<f64>()
    }

    /// Winding direction
    pub fn orientation(&self) -> Orientation {
        if self.signed_area() >= 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        }
    }

    /// The same loop traversed backwards
    pub fn reversed(&self) -> Self {
        Self::new_unchecked(self.curves.iter().rev().map(Curve2D::reverse).collect())
    }

    /// The loop moved by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        Self::new_unchecked(self.curves.iter().map(|c| c.translated(offset)).collect())
    }

    /// Check whether `point` lies on one of the curves
    pub fn is_on_boundary(&self, point: Point2D, tolerance: f64) -> bool {
        self.curves.iter().any(|c| c.is_on_curve(point, tolerance))
    }

    /// Check whether `point` lies strictly inside the loop.
    ///
    /// Points on the boundary are not inside.
    pub fn is_inside(&self, point: Point2D) -> bool {
        if self.bounding_box().is_out(point, PRECISION_INTERSECTION)
            || self.is_on_boundary(point, PRECISION_INTERSECTION)
        {
            return false;
        }
        let winding: f64 = self
            .curves
            .iter()
            .map(|curve| curve.subtended_angle(point))
            .sum();
        (winding / TAU).round() != 0.0
    }

    /// Point used to classify the loop against other loops: halfway through
    /// its first curve's parameter range.
    pub(crate) fn sample_point(&self) -> Option<Point2D> {
        self.curves.first().map(|curve| {
            curve.value((curve.first_parameter() + curve.last_parameter()) / 2.0)
        })
    }
}
