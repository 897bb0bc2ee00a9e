//! Parametric 2D curves
//!
//! Profiles are built from two analytic curve families: straight segments
//! and circular arcs. Both are parametrized over `[0, 1]`, which keeps the
//! splitting and trimming code independent of the curve kind.

mod intersect;

pub use intersect::{CurveIntersections, intersect_curves};

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox2D, Point2D, cross, same_point};

/// A bounded 2D curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Curve2D {
    /// Straight line segment
    Segment {
        /// Start point
        start: Point2D,
        /// End point
        end: Point2D,
    },

    /// Circular arc
    Arc {
        /// Circle center
        center: Point2D,
        /// Circle radius
        radius: f64,
        /// Angle of the first point, in radians
        start_angle: f64,
        /// Signed swept angle (positive = counter-clockwise). A magnitude of
        /// `TAU` describes a full circle.
        sweep: f64,
    },
}

impl Curve2D {
    /// Create a straight segment
    pub fn segment(start: Point2D, end: Point2D) -> Self {
        Self::Segment { start, end }
    }

    /// Create an arc from its circle and angular range
    pub fn arc(center: Point2D, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self::Arc {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    /// Create a full counter-clockwise circle starting at angle 0
    pub fn circle(center: Point2D, radius: f64) -> Self {
        Self::arc(center, radius, 0.0, TAU)
    }

    /// Create the arc of the circle around `center` going from `start` to
    /// `end` in the given direction.
    ///
    /// The radius is taken from `start`; `end` only contributes its angle.
    pub fn arc_from_center(center: Point2D, start: Point2D, end: Point2D, ccw: bool) -> Self {
        let radius = (start - center).length();
        let start_angle = angle_of(start - center);
        let end_angle = angle_of(end - center);
        let sweep = if ccw {
            (end_angle - start_angle).rem_euclid(TAU)
        } else {
            -(start_angle - end_angle).rem_euclid(TAU)
        };
        Self::arc(center, radius, start_angle, sweep)
    }

    /// Parameter of the first point
    pub fn first_parameter(&self) -> f64 {
        0.0
    }

    /// Parameter of the last point
    pub fn last_parameter(&self) -> f64 {
        1.0
    }

    /// Evaluate the curve at parameter `t`
    pub fn value(&self, t: f64) -> Point2D {
        match *self {
            Self::Segment { start, end } => start.lerp(end, t),
            Self::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => center + DVec2::from_angle(start_angle + sweep * t) * radius,
        }
    }

    /// Unit tangent in the direction of travel at parameter `t`
    pub fn tangent_at(&self, t: f64) -> DVec2 {
        match *self {
            Self::Segment { start, end } => (end - start).normalize_or_zero(),
            Self::Arc {
                start_angle, sweep, ..
            } => DVec2::from_angle(start_angle + sweep * t).perp() * sweep.signum(),
        }
    }

    /// First point of the curve
    pub fn first_point(&self) -> Point2D {
        match *self {
            Self::Segment { start, .. } => start,
            _ => self.value(self.first_parameter()),
        }
    }

    /// Last point of the curve
    pub fn last_point(&self) -> Point2D {
        match *self {
            Self::Segment { end, .. } => end,
            _ => self.value(self.last_parameter()),
        }
    }

    /// Point halfway through the parameter range
    pub fn midpoint(&self) -> Point2D {
        self.value((self.first_parameter() + self.last_parameter()) * 0.5)
    }

    /// Arc length
    pub fn length(&self) -> f64 {
        match *self {
            Self::Segment { start, end } => start.distance(end),
            Self::Arc { radius, sweep, .. } => radius * sweep.abs(),
        }
    }

    /// Check whether the curve returns to its first point on its own
    pub fn is_closed(&self) -> bool {
        match *self {
            Self::Segment { .. } => false,
            Self::Arc { sweep, .. } => sweep.abs() >= TAU - 1e-12,
        }
    }

    /// The same curve traversed in the opposite direction
    pub fn reverse(&self) -> Self {
        match *self {
            Self::Segment { start, end } => Self::segment(end, start),
            Self::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => Self::arc(center, radius, start_angle + sweep, -sweep),
        }
    }

    /// The curve moved by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        match *self {
            Self::Segment { start, end } => Self::segment(start + offset, end + offset),
            Self::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => Self::arc(center + offset, radius, start_angle, sweep),
        }
    }

    /// Axis-aligned bounds of the curve
    pub fn bounding_box(&self) -> BoundingBox2D {
        let bbox = BoundingBox2D::new(self.first_point(), self.last_point());
        match *self {
            Self::Segment { .. } => bbox,
            Self::Arc { center, radius, .. } => [0.0, 0.25, 0.5, 0.75]
                .into_iter()
                .map(|quarter| quarter * TAU)
                .filter(|angle| {
                    let t = self.parameter_of(center + DVec2::from_angle(*angle) * radius);
                    (0.0..=1.0).contains(&t)
                })
                .fold(bbox, |bbox, angle| {
                    bbox.with_point(center + DVec2::from_angle(angle) * radius)
                }),
        }
    }

    /// Parameter of the projection of `point` onto the curve's carrier.
    ///
    /// For segments this is the unclamped line parameter. For arcs, points
    /// outside the swept range map below `0` or above `1` depending on which
    /// end of the arc they are angularly closer to.
    pub fn parameter_of(&self, point: Point2D) -> f64 {
        match *self {
            Self::Segment { start, end } => {
                let d = end - start;
                let len2 = d.length_squared();
                if len2 == 0.0 {
                    0.0
                } else {
                    (point - start).dot(d) / len2
                }
            }
            Self::Arc {
                center,
                start_angle,
                sweep,
                ..
            } => {
                if sweep == 0.0 {
                    return 0.0;
                }
                let angle = angle_of(point - center);
                let span = sweep.abs();
                let delta = if sweep > 0.0 {
                    (angle - start_angle).rem_euclid(TAU)
                } else {
                    (start_angle - angle).rem_euclid(TAU)
                };
                if delta <= span {
                    delta / span
                } else {
                    let before = TAU - delta;
                    let after = delta - span;
                    if before < after {
                        -before / span
                    } else {
                        delta / span
                    }
                }
            }
        }
    }

    /// Shortest distance from `point` to the curve
    pub fn distance_to(&self, point: Point2D) -> f64 {
        let t = self.parameter_of(point);
        match *self {
            Self::Segment { .. } => point.distance(self.value(t.clamp(0.0, 1.0))),
            Self::Arc { center, radius, .. } => {
                if (0.0..=1.0).contains(&t) {
                    (point.distance(center) - radius).abs()
                } else {
                    point
                        .distance(self.first_point())
                        .min(point.distance(self.last_point()))
                }
            }
        }
    }

    /// Check whether `point` lies on the curve within `tolerance`
    pub fn is_on_curve(&self, point: Point2D, tolerance: f64) -> bool {
        self.distance_to(point) <= tolerance
    }

    /// Check whether both curves cover the same geometry, in either direction
    pub fn is_same_curve(&self, other: &Self, tolerance: f64) -> bool {
        let (a0, a1) = (self.first_point(), self.last_point());
        let (b0, b1) = (other.first_point(), other.last_point());
        let ends_match = (same_point(a0, b0, tolerance) && same_point(a1, b1, tolerance))
            || (same_point(a0, b1, tolerance) && same_point(a1, b0, tolerance));
        ends_match
            && std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.is_on_curve(other.midpoint(), tolerance)
    }

    /// Split the curve at the given points.
    ///
    /// Points farther than `tolerance` from the curve, or within `tolerance`
    /// of one of its ends, are ignored. Without any usable point the curve is
    /// returned unchanged as a single piece.
    pub fn split_at(&self, points: &[Point2D], tolerance: f64) -> Vec<Curve2D> {
        let first = self.first_point();
        let last = self.last_point();

        let mut cuts: Vec<(f64, Point2D)> = points
            .iter()
            .filter(|p| self.is_on_curve(**p, tolerance))
            .filter(|p| !same_point(**p, first, tolerance) && !same_point(**p, last, tolerance))
            .map(|p| (self.parameter_of(*p).clamp(0.0, 1.0), *p))
            .collect();
        cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
        cuts.dedup_by(|b, a| same_point(a.1, b.1, tolerance));

        if cuts.is_empty() {
            return vec![*self];
        }

        let mut pieces = Vec::with_capacity(cuts.len() + 1);
        let mut from = (0.0, first);
        for cut in cuts.into_iter().chain(std::iter::once((1.0, last))) {
            pieces.push(self.sub_curve(from, cut));
            from = cut;
        }
        pieces
    }

    /// Piece of the curve between two `(parameter, point)` bounds
    fn sub_curve(&self, from: (f64, Point2D), to: (f64, Point2D)) -> Curve2D {
        match *self {
            Self::Segment { .. } => Self::segment(from.1, to.1),
            Self::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => Self::arc(
                center,
                radius,
                start_angle + sweep * from.0,
                sweep * (to.0 - from.0),
            ),
        }
    }

    /// Signed angle this curve sweeps as seen from `point`.
    ///
    /// Summed over a closed loop this is `TAU` times the winding number.
    pub(crate) fn subtended_angle(&self, point: Point2D) -> f64 {
        let a = self.first_point() - point;
        let b = self.last_point() - point;
        let chord = cross(a, b).atan2(a.dot(b));
        match *self {
            Self::Segment { .. } => chord,
            Self::Arc {
                center,
                radius,
                sweep,
                ..
            } => {
                if point.distance(center) >= radius {
                    return chord;
                }
                let inside_cap = if self.is_closed() {
                    true
                } else {
                    let base = self.last_point() - self.first_point();
                    let side = cross(base, point - self.first_point());
                    if side == 0.0 {
                        // On the chord itself: the arc covers exactly half a turn around it
                        return PI * sweep.signum();
                    }
                    let bulge = cross(base, self.midpoint() - self.first_point());
                    side * bulge > 0.0
                };
                if inside_cap {
                    chord + TAU * sweep.signum()
                } else {
                    chord
                }
            }
        }
    }
}

/// Polar angle of a vector in `(-PI, PI]`
pub(crate) fn angle_of(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}
