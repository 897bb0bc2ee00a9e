//! Fillet and chamfer corner makers
//!
//! A corner maker receives the two curves meeting at a junction (the first
//! ends where the second starts) and returns the curves replacing them. The
//! last returned curve must start where the untouched part of the loop
//! continues, so both makers return `[first', inserted, second']`. A curve
//! used up entirely by the corner is left out of the output.

use std::f64::consts::PI;

use glam::DVec2;

use crate::constants::{PRECISION_ANGLE, PRECISION_INTERSECTION, PRECISION_POINT};
use crate::curve::Curve2D;
use crate::geometry::{Point2D, cross, same_point};

/// Infinite support of a curve: the line through a segment or the circle
/// of an arc
#[derive(Debug, Clone, Copy)]
enum Carrier {
    Line { origin: Point2D, direction: DVec2 },
    Circle { center: Point2D, radius: f64 },
}

impl Carrier {
    fn of(curve: &Curve2D) -> Self {
        match *curve {
            Curve2D::Segment { start, end } => Self::Line {
                origin: start,
                direction: (end - start).normalize_or_zero(),
            },
            Curve2D::Arc { center, radius, .. } => Self::Circle { center, radius },
        }
    }

    /// Offset by `distance` to the left of the curve's direction of travel.
    ///
    /// `None` when a circle would shrink to nothing.
    fn offset(&self, curve: &Curve2D, distance: f64) -> Option<Self> {
        match (*self, *curve) {
            (Self::Line { origin, direction }, _) => Some(Self::Line {
                origin: origin + direction.perp() * distance,
                direction,
            }),
            (Self::Circle { center, radius }, Curve2D::Arc { sweep, .. }) => {
                let radius = radius - distance * sweep.signum();
                (radius > PRECISION_POINT).then_some(Self::Circle { center, radius })
            }
            (Self::Circle { .. }, Curve2D::Segment { .. }) => None,
        }
    }

    /// Closest point of the carrier to `point`
    fn project(&self, point: Point2D) -> Point2D {
        match *self {
            Self::Line { origin, direction } => origin + direction * (point - origin).dot(direction),
            Self::Circle { center, radius } => {
                center + (point - center).normalize_or_zero() * radius
            }
        }
    }

    fn intersect(&self, other: &Self) -> Vec<Point2D> {
        match (*self, *other) {
            (Self::Line { origin: p, direction: d }, Self::Line { origin: q, direction: e }) => {
                let denom = cross(d, e);
                if denom.abs() < PRECISION_ANGLE {
                    return Vec::new();
                }
                vec![p + d * (cross(q - p, e) / denom)]
            }
            (Self::Line { origin, direction }, Self::Circle { center, radius })
            | (Self::Circle { center, radius }, Self::Line { origin, direction }) => {
                let foot = origin + direction * (center - origin).dot(direction);
                let h = foot.distance(center);
                if h > radius + PRECISION_INTERSECTION {
                    Vec::new()
                } else if (h - radius).abs() <= PRECISION_INTERSECTION {
                    vec![foot]
                } else {
                    let k = (radius * radius - h * h).sqrt();
                    vec![foot + direction * k, foot - direction * k]
                }
            }
            (
                Self::Circle { center: c1, radius: r1 },
                Self::Circle { center: c2, radius: r2 },
            ) => {
                let d = c1.distance(c2);
                if d < PRECISION_INTERSECTION
                    || d > r1 + r2 + PRECISION_INTERSECTION
                    || d < (r1 - r2).abs() - PRECISION_INTERSECTION
                {
                    return Vec::new();
                }
                let u = (c2 - c1) / d;
                let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
                let h2 = r1 * r1 - a * a;
                let base = c1 + u * a;
                if h2 <= 0.0 {
                    vec![base]
                } else {
                    let h = h2.sqrt();
                    vec![base + u.perp() * h, base - u.perp() * h]
                }
            }
        }
    }
}

/// Signed turn at the junction, `None` for a smooth junction
fn turn_direction(first: &Curve2D, second: &Curve2D) -> Option<f64> {
    let turn = cross(
        first.tangent_at(first.last_parameter()),
        second.tangent_at(second.first_parameter()),
    );
    (turn.abs() >= PRECISION_ANGLE).then(|| turn.signum())
}

/// What is left of the curves on both sides of a corner once they are cut
struct Trimmed {
    /// Part of the first curve before its cut, `None` if it is used up
    head: Option<Curve2D>,
    /// Part of the second curve after its cut, `None` if it is used up
    tail: Option<Curve2D>,
    /// Where the inserted curve starts
    start: Point2D,
    /// Where the inserted curve ends
    end: Point2D,
}

impl Trimmed {
    /// Cut both curves. A cut landing on a curve's far end consumes the
    /// whole curve, so the far end itself becomes the inserted curve's end.
    fn cut(
        first: &Curve2D,
        first_cut: Point2D,
        second: &Curve2D,
        second_cut: Point2D,
    ) -> Self {
        let first_start = first.first_point();
        let second_end = second.last_point();
        let head = (!same_point(first_cut, first_start, PRECISION_POINT))
            .then(|| first.split_at(&[first_cut], PRECISION_POINT).first().copied())
            .flatten();
        let tail = (!same_point(second_cut, second_end, PRECISION_POINT))
            .then(|| second.split_at(&[second_cut], PRECISION_POINT).last().copied())
            .flatten();
        Self {
            start: head.map_or(first_start, |c| c.last_point()),
            end: tail.map_or(second_end, |c| c.first_point()),
            head,
            tail,
        }
    }

    fn around(self, inserted: Curve2D) -> Vec<Curve2D> {
        self.head
            .into_iter()
            .chain(std::iter::once(inserted))
            .chain(self.tail)
            .collect()
    }
}

/// Round the junction of two curves with an arc of `radius`.
///
/// Returns `[first', arc, second']`, or the two curves unchanged when the
/// junction is smooth, the radius is not a positive number, or the arc does
/// not fit on the curves. A curve whose whole length the arc needs is
/// replaced by the arc.
pub fn fillet_corner(first: &Curve2D, second: &Curve2D, radius: f64) -> Vec<Curve2D> {
    let unchanged = vec![*first, *second];
    if !(radius > 0.0) || !radius.is_finite() {
        return unchanged;
    }
    let Some(side) = turn_direction(first, second) else {
        tracing::trace!("Skipping fillet on smooth junction");
        return unchanged;
    };

    let corner = first.last_point();
    let carrier_first = Carrier::of(first);
    let carrier_second = Carrier::of(second);
    let (Some(offset_first), Some(offset_second)) = (
        carrier_first.offset(first, side * radius),
        carrier_second.offset(second, side * radius),
    ) else {
        return unchanged;
    };

    let Some(center) = offset_first
        .intersect(&offset_second)
        .into_iter()
        .min_by(|a, b| a.distance_squared(corner).total_cmp(&b.distance_squared(corner)))
    else {
        return unchanged;
    };

    let start = carrier_first.project(center);
    let end = carrier_second.project(center);
    if !first.is_on_curve(start, PRECISION_POINT) || !second.is_on_curve(end, PRECISION_POINT) {
        tracing::debug!("Fillet radius {} does not fit at corner {}", radius, corner);
        return unchanged;
    }

    let trimmed = Trimmed::cut(first, start, second, end);
    let arc = Curve2D::arc_from_center(center, trimmed.start, trimmed.end, side > 0.0);
    trimmed.around(arc)
}

/// Point on `curve` at straight-line distance `distance` from its first
/// point, `None` if the curve does not reach that far. A distance matching
/// the far end within tolerance gives the far end itself.
fn point_at_chord(curve: &Curve2D, distance: f64) -> Option<Point2D> {
    match *curve {
        Curve2D::Segment { start, end } => {
            let length = start.distance(end);
            if (distance - length).abs() <= PRECISION_POINT {
                return Some(end);
            }
            (distance < length).then(|| start.lerp(end, distance / length))
        }
        Curve2D::Arc { radius, sweep, .. } => {
            let reach = curve.first_point().distance(curve.last_point());
            if sweep.abs() <= PI && (distance - reach).abs() <= PRECISION_POINT {
                return Some(curve.last_point());
            }
            if distance >= 2.0 * radius {
                return None;
            }
            let angle = 2.0 * (distance / (2.0 * radius)).asin();
            (angle * radius < sweep.abs() * radius - PRECISION_POINT)
                .then(|| curve.value(angle / sweep.abs()))
        }
    }
}

/// Bevel the junction of two curves with a straight segment whose ends are
/// `distance` away from the corner.
///
/// Returns `[first', bevel, second']`, or the two curves unchanged when the
/// junction is smooth, the distance is not a positive number, or a curve is
/// too short for it. A curve exactly `distance` long is consumed.
pub fn chamfer_corner(first: &Curve2D, second: &Curve2D, distance: f64) -> Vec<Curve2D> {
    let unchanged = vec![*first, *second];
    if !(distance > 0.0) || !distance.is_finite() {
        return unchanged;
    }
    if turn_direction(first, second).is_none() {
        tracing::trace!("Skipping chamfer on smooth junction");
        return unchanged;
    }

    let (Some(start), Some(end)) = (
        point_at_chord(&first.reverse(), distance),
        point_at_chord(second, distance),
    ) else {
        tracing::debug!(
            "Chamfer distance {} does not fit at corner {}",
            distance,
            first.last_point()
        );
        return unchanged;
    };

    let trimmed = Trimmed::cut(first, start, second, end);
    let bevel = Curve2D::segment(trimmed.start, trimmed.end);
    trimmed.around(bevel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2D {
        DVec2::new(x, y)
    }

    #[test]
    fn test_fillet_right_angle() {
        let first = Curve2D::segment(p(0.0, 0.0), p(10.0, 0.0));
        let second = Curve2D::segment(p(10.0, 0.0), p(10.0, 10.0));
        let made = fillet_corner(&first, &second, 2.0);

        assert_eq!(made.len(), 3);
        assert_eq!(made[0], Curve2D::segment(p(0.0, 0.0), p(8.0, 0.0)));
        assert_eq!(made[2], Curve2D::segment(p(10.0, 2.0), p(10.0, 10.0)));
        match made[1] {
            Curve2D::Arc {
                center,
                radius,
                sweep,
                ..
            } => {
                assert_relative_eq!(center.x, 8.0, epsilon = 1e-12);
                assert_relative_eq!(center.y, 2.0, epsilon = 1e-12);
                assert_relative_eq!(radius, 2.0, epsilon = 1e-12);
                assert_relative_eq!(sweep, PI / 2.0, epsilon = 1e-12);
            }
            other => panic!("expected an arc, got {:?}", other),
        }
    }

    #[test]
    fn test_fillet_right_turn() {
        let first = Curve2D::segment(p(0.0, 0.0), p(10.0, 0.0));
        let second = Curve2D::segment(p(10.0, 0.0), p(10.0, -10.0));
        let made = fillet_corner(&first, &second, 1.0);

        assert_eq!(made.len(), 3);
        match made[1] {
            Curve2D::Arc { center, sweep, .. } => {
                assert_relative_eq!(center.y, -1.0, epsilon = 1e-12);
                assert!(sweep < 0.0, "right turn rounds clockwise");
            }
            other => panic!("expected an arc, got {:?}", other),
        }
    }

    #[test]
    fn test_fillet_segment_into_arc() {
        let first = Curve2D::segment(p(-5.0, 0.0), p(5.0, 0.0));
        let second = Curve2D::arc(DVec2::ZERO, 5.0, 0.0, PI);
        let made = fillet_corner(&first, &second, 1.0);

        assert_eq!(made.len(), 3);
        let fillet = made[1];
        assert_relative_eq!(made[0].last_point().x, 15.0_f64.sqrt(), epsilon = 1e-9);
        assert_relative_eq!(
            made[0].tangent_at(1.0).dot(fillet.tangent_at(0.0)),
            1.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            fillet.tangent_at(1.0).dot(made[2].tangent_at(0.0)),
            1.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(made[2].last_point().x, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fillet_unchanged_cases() {
        let first = Curve2D::segment(p(0.0, 0.0), p(10.0, 0.0));
        let second = Curve2D::segment(p(10.0, 0.0), p(10.0, 10.0));
        let straight = Curve2D::segment(p(10.0, 0.0), p(20.0, 0.0));

        assert_eq!(fillet_corner(&first, &second, 0.0), vec![first, second]);
        assert_eq!(fillet_corner(&first, &second, -1.0), vec![first, second]);
        assert_eq!(fillet_corner(&first, &second, f64::NAN), vec![first, second]);
        assert_eq!(fillet_corner(&first, &second, 11.0), vec![first, second]);
        assert_eq!(fillet_corner(&first, &straight, 1.0), vec![first, straight]);
    }

    #[test]
    fn test_chamfer_right_angle() {
        let first = Curve2D::segment(p(0.0, 0.0), p(10.0, 0.0));
        let second = Curve2D::segment(p(10.0, 0.0), p(10.0, 10.0));
        let made = chamfer_corner(&first, &second, 3.0);

        assert_eq!(made.len(), 3);
        assert_relative_eq!(made[0].last_point().x, 7.0, epsilon = 1e-12);
        assert_relative_eq!(made[2].first_point().y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(made[1].length(), 18.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_chamfer_on_arc() {
        let first = Curve2D::segment(p(-5.0, 0.0), p(5.0, 0.0));
        let second = Curve2D::arc(DVec2::ZERO, 5.0, 0.0, PI);
        let made = chamfer_corner(&first, &second, 1.0);

        assert_eq!(made.len(), 3);
        let corner = p(5.0, 0.0);
        assert_relative_eq!(made[1].first_point().distance(corner), 1.0, epsilon = 1e-9);
        assert_relative_eq!(made[1].last_point().distance(corner), 1.0, epsilon = 1e-9);
        assert_relative_eq!(made[2].first_point().length(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(made[2].last_point().x, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_chamfer_too_long() {
        let first = Curve2D::segment(p(0.0, 0.0), p(10.0, 0.0));
        let second = Curve2D::segment(p(10.0, 0.0), p(10.0, 2.0));
        assert_eq!(chamfer_corner(&first, &second, 2.5), vec![first, second]);
        assert_eq!(chamfer_corner(&first, &second, 0.0), vec![first, second]);
    }

    #[test]
    fn test_chamfer_consumes_exact_length() {
        let first = Curve2D::segment(p(0.0, 0.0), p(10.0, 0.0));
        let second = Curve2D::segment(p(10.0, 0.0), p(10.0, 2.0));
        let made = chamfer_corner(&first, &second, 2.0);

        assert_eq!(made.len(), 2);
        assert_relative_eq!(made[0].last_point().x, 8.0, epsilon = 1e-12);
        assert_eq!(made[1].last_point(), second.last_point());
    }

    #[test]
    fn test_fillet_consumes_both_curves() {
        // Radius equal to both side lengths leaves only the arc
        let first = Curve2D::segment(p(5.0, 0.0), p(10.0, 0.0));
        let second = Curve2D::segment(p(10.0, 0.0), p(10.0, 5.0));
        let made = fillet_corner(&first, &second, 5.0);

        assert_eq!(made.len(), 1);
        assert!(same_point(made[0].first_point(), first.first_point(), 1e-12));
        assert!(same_point(made[0].last_point(), second.last_point(), 1e-12));
        match made[0] {
            Curve2D::Arc { center, radius, .. } => {
                assert_relative_eq!(center.x, 5.0, epsilon = 1e-12);
                assert_relative_eq!(center.y, 5.0, epsilon = 1e-12);
                assert_relative_eq!(radius, 5.0, epsilon = 1e-12);
            }
            other => panic!("expected an arc, got {:?}", other),
        }
    }

    #[test]
    fn test_offset_carriers() {
        let segment = Curve2D::segment(p(0.0, 0.0), p(1.0, 0.0));
        match Carrier::of(&segment).offset(&segment, 2.0) {
            Some(Carrier::Line { origin, .. }) => assert_relative_eq!(origin.y, 2.0),
            other => panic!("unexpected offset {:?}", other),
        }

        let arc = Curve2D::arc(DVec2::ZERO, 3.0, 0.0, -PI);
        match Carrier::of(&arc).offset(&arc, 1.0) {
            Some(Carrier::Circle { radius, .. }) => assert_relative_eq!(radius, 4.0),
            other => panic!("unexpected offset {:?}", other),
        }
        assert!(Carrier::of(&arc).offset(&arc, -3.0).is_none());
    }
}
