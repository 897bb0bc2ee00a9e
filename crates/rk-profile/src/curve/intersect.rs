//! Curve-curve intersection
//!
//! Computes isolated crossing points and coincident overlaps ("common
//! segments") between two curves.

use std::f64::consts::TAU;

use glam::DVec2;

use super::Curve2D;
use crate::geometry::{Point2D, cross, remove_duplicate_points, same_point};

/// Result of intersecting two curves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveIntersections {
    /// Isolated intersection points
    pub intersections: Vec<Point2D>,
    /// Portions where both curves coincide, oriented like the first curve
    pub common_segments: Vec<Curve2D>,
    /// `[first_point, last_point]` of every common segment
    pub common_segments_points: Vec<[Point2D; 2]>,
}

impl CurveIntersections {
    /// Check whether the curves do not meet at all
    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty() && self.common_segments.is_empty()
    }

    fn push_common(&mut self, curve: Curve2D) {
        self.common_segments_points
            .push([curve.first_point(), curve.last_point()]);
        self.common_segments.push(curve);
    }
}

/// Intersect two curves within `tolerance`.
///
/// Points landing within `tolerance` of a curve endpoint are snapped onto
/// that endpoint so that later splitting sees exact coordinates.
pub fn intersect_curves(a: &Curve2D, b: &Curve2D, tolerance: f64) -> CurveIntersections {
    if !a
        .bounding_box()
        .expanded(tolerance)
        .overlaps(&b.bounding_box().expanded(tolerance))
    {
        return CurveIntersections::default();
    }

    let mut result = match (a, b) {
        (Curve2D::Segment { start: s1, end: e1 }, Curve2D::Segment { start: s2, end: e2 }) => {
            segment_segment(*s1, *e1, *s2, *e2, tolerance)
        }
        (Curve2D::Segment { .. }, Curve2D::Arc { .. }) => CurveIntersections {
            intersections: segment_arc(a, b, tolerance),
            ..Default::default()
        },
        (Curve2D::Arc { .. }, Curve2D::Segment { .. }) => CurveIntersections {
            intersections: segment_arc(b, a, tolerance),
            ..Default::default()
        },
        (Curve2D::Arc { .. }, Curve2D::Arc { .. }) => arc_arc(a, b, tolerance),
    };

    let snapped: Vec<Point2D> = result
        .intersections
        .iter()
        .map(|p| snap_to_ends(*p, a, b, tolerance))
        .collect();
    result.intersections = remove_duplicate_points(&snapped, tolerance);
    result
}

fn snap_to_ends(point: Point2D, a: &Curve2D, b: &Curve2D, tolerance: f64) -> Point2D {
    [a.first_point(), a.last_point(), b.first_point(), b.last_point()]
        .into_iter()
        .find(|end| same_point(*end, point, tolerance))
        .unwrap_or(point)
}

fn segment_segment(
    s1: Point2D,
    e1: Point2D,
    s2: Point2D,
    e2: Point2D,
    tolerance: f64,
) -> CurveIntersections {
    let mut result = CurveIntersections::default();
    let d1 = e1 - s1;
    let d2 = e2 - s2;
    let len1 = d1.length();
    let len2 = d2.length();
    if len1 <= tolerance || len2 <= tolerance {
        return result;
    }

    let off_line = |p: Point2D| cross(d1, p - s1).abs() / len1;
    if off_line(s2) <= tolerance && off_line(e2) <= tolerance {
        // Collinear: overlap of the projected parameter ranges on the first segment
        let t0 = (s2 - s1).dot(d1) / (len1 * len1);
        let t1 = (e2 - s1).dot(d1) / (len1 * len1);
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(1.0);
        let overlap = (hi - lo) * len1;
        if overlap > tolerance {
            result.push_common(Curve2D::segment(s1 + d1 * lo, s1 + d1 * hi));
        } else if overlap >= -tolerance {
            result.intersections.push(s1 + d1 * lo.clamp(0.0, 1.0));
        }
        return result;
    }

    let denom = cross(d1, d2);
    if denom.abs() <= f64::EPSILON * len1 * len2 {
        return result;
    }

    let r = s2 - s1;
    let t = cross(r, d2) / denom;
    let u = cross(r, d1) / denom;
    let eps1 = tolerance / len1;
    let eps2 = tolerance / len2;
    if (-eps1..=1.0 + eps1).contains(&t) && (-eps2..=1.0 + eps2).contains(&u) {
        result.intersections.push(s1 + d1 * t.clamp(0.0, 1.0));
    }
    result
}

/// Points where a segment meets an arc
fn segment_arc(segment: &Curve2D, arc: &Curve2D, tolerance: f64) -> Vec<Point2D> {
    let (Curve2D::Segment { start, end }, Curve2D::Arc { center, radius, .. }) = (segment, arc)
    else {
        return Vec::new();
    };

    let d = *end - *start;
    let len = d.length();
    if len <= tolerance {
        return Vec::new();
    }
    let dir = d / len;
    let foot_t = (*center - *start).dot(dir);
    let foot = *start + dir * foot_t;
    let h = foot.distance(*center);

    let candidates: Vec<Point2D> = if (h - radius).abs() <= tolerance {
        vec![foot]
    } else if h > *radius {
        Vec::new()
    } else {
        let half_chord = (radius * radius - h * h).sqrt();
        vec![foot - dir * half_chord, foot + dir * half_chord]
    };

    candidates
        .into_iter()
        .filter(|p| segment.is_on_curve(*p, tolerance) && arc.is_on_curve(*p, tolerance))
        .collect()
}

fn arc_arc(a: &Curve2D, b: &Curve2D, tolerance: f64) -> CurveIntersections {
    let (
        Curve2D::Arc {
            center: c1,
            radius: r1,
            ..
        },
        Curve2D::Arc {
            center: c2,
            radius: r2,
            ..
        },
    ) = (a, b)
    else {
        return CurveIntersections::default();
    };
    let (c1, r1, c2, r2) = (*c1, *r1, *c2, *r2);

    let d = c1.distance(c2);
    if d <= tolerance && (r1 - r2).abs() <= tolerance {
        return same_circle_overlap(a, b, tolerance);
    }

    let mut result = CurveIntersections::default();
    if d <= tolerance || d > r1 + r2 + tolerance || d < (r1 - r2).abs() - tolerance {
        return result;
    }

    let u = (c2 - c1) / d;
    let candidates = if (d - (r1 + r2)).abs() <= tolerance {
        vec![c1 + u * r1]
    } else if (d - (r1 - r2).abs()).abs() <= tolerance {
        let side = if r1 < r2 { -1.0 } else { 1.0 };
        vec![c1 + u * r1 * side]
    } else {
        let along = (d * d + r1 * r1 - r2 * r2) / (2.0 * d);
        let h = (r1 * r1 - along * along).max(0.0).sqrt();
        let base = c1 + u * along;
        vec![base + u.perp() * h, base - u.perp() * h]
    };

    result.intersections = candidates
        .into_iter()
        .filter(|p| a.is_on_curve(*p, tolerance) && b.is_on_curve(*p, tolerance))
        .collect();
    result
}

/// Overlap of two arcs lying on the same circle, expressed in angles
/// measured counter-clockwise from the start of `a`'s angular interval.
fn same_circle_overlap(a: &Curve2D, b: &Curve2D, tolerance: f64) -> CurveIntersections {
    let mut result = CurveIntersections::default();
    let (
        Curve2D::Arc {
            center,
            radius,
            start_angle: sa,
            sweep: wa,
        },
        Curve2D::Arc {
            start_angle: sb,
            sweep: wb,
            ..
        },
    ) = (a, b)
    else {
        return result;
    };
    if *radius <= tolerance {
        return result;
    }

    let a_from = if *wa > 0.0 { *sa } else { sa + wa };
    let b_from = if *wb > 0.0 { *sb } else { sb + wb };
    let a_span = wa.abs().min(TAU);
    let b_span = wb.abs().min(TAU);
    let offset = (b_from - a_from).rem_euclid(TAU);
    let angular_tolerance = tolerance / radius;

    for shift in [offset, offset - TAU] {
        let lo = shift.max(0.0);
        let hi = (shift + b_span).min(a_span);
        if hi - lo > angular_tolerance {
            let piece = if *wa > 0.0 {
                Curve2D::arc(*center, *radius, a_from + lo, hi - lo)
            } else {
                Curve2D::arc(*center, *radius, a_from + hi, lo - hi)
            };
            result.push_common(piece);
        } else if hi - lo >= -angular_tolerance {
            let angle = a_from + lo.clamp(0.0, a_span);
            result
                .intersections
                .push(*center + DVec2::from_angle(angle) * *radius);
        }
    }
    result
}
