//! Corner Modification
//!
//! Walks the junctions of every loop in a shape and lets a corner maker
//! replace the two curves meeting at each selected junction. Fillets and
//! chamfers are the two makers shipped with the crate; any function with
//! the same signature can be plugged in.

mod makers;

pub use makers::{chamfer_corner, fillet_corner};

use crate::blueprint::{Blueprint, Blueprints, CompoundBlueprint, Shape2D};
use crate::constants::PRECISION_POINT;
use crate::curve::Curve2D;
use crate::geometry::{Point2D, same_point};
use crate::invariant_violation;

/// A junction between two consecutive curves of a loop
#[derive(Debug, Clone, Copy)]
pub struct Corner<'a> {
    /// Curve ending at the corner
    pub first_curve: &'a Curve2D,
    /// Curve starting at the corner
    pub second_curve: &'a Curve2D,
    /// Location of the corner
    pub point: Point2D,
}

/// Selects which corners get modified
pub trait CornerFilter {
    /// Whether the corner should be handed to the corner maker
    fn should_keep(&self, corner: &Corner<'_>) -> bool;
}

impl<F> CornerFilter for F
where
    F: Fn(&Corner<'_>) -> bool,
{
    fn should_keep(&self, corner: &Corner<'_>) -> bool {
        self(corner)
    }
}

/// Filter selecting every corner
#[derive(Debug, Clone, Copy, Default)]
pub struct AllCorners;

impl CornerFilter for AllCorners {
    fn should_keep(&self, _corner: &Corner<'_>) -> bool {
        true
    }
}

/// Apply `corner_maker` to every corner of `shape` accepted by `filter`.
///
/// Compounds have their outer loop and each hole modified independently.
/// A modified hole is not checked against the outer loop.
pub fn modify<M, F>(shape: Shape2D, size: f64, corner_maker: M, filter: &F) -> Shape2D
where
    M: Fn(&Curve2D, &Curve2D, f64) -> Vec<Curve2D>,
    F: CornerFilter + ?Sized,
{
    modify_shape(shape, size, &corner_maker, filter)
}

/// Round the selected corners of `shape` with arcs of `radius`
pub fn fillet_2d<F>(shape: Shape2D, radius: f64, filter: &F) -> Shape2D
where
    F: CornerFilter + ?Sized,
{
    modify(shape, radius, fillet_corner, filter)
}

/// Bevel the selected corners of `shape`, cutting `distance` off each side
pub fn chamfer_2d<F>(shape: Shape2D, distance: f64, filter: &F) -> Shape2D
where
    F: CornerFilter + ?Sized,
{
    modify(shape, distance, chamfer_corner, filter)
}

/// Round every corner of a single loop
pub(crate) fn fillet_blueprint(blueprint: &Blueprint, radius: f64) -> Blueprint {
    modify_blueprint(blueprint, radius, &fillet_corner, &AllCorners)
}

fn modify_shape<M, F>(shape: Shape2D, size: f64, corner_maker: &M, filter: &F) -> Shape2D
where
    M: Fn(&Curve2D, &Curve2D, f64) -> Vec<Curve2D>,
    F: CornerFilter + ?Sized,
{
    match shape {
        Shape2D::Blueprint(blueprint) => {
            Shape2D::Blueprint(modify_blueprint(&blueprint, size, corner_maker, filter))
        }
        Shape2D::Compound(compound) => {
            let (outer, holes) = compound.into_parts();
            Shape2D::Compound(CompoundBlueprint::new(
                modify_blueprint(&outer, size, corner_maker, filter),
                holes
                    .iter()
                    .map(|hole| modify_blueprint(hole, size, corner_maker, filter))
                    .collect(),
            ))
        }
        Shape2D::Blueprints(collection) => Shape2D::Blueprints(
            collection
                .into_iter()
                .flat_map(|region| {
                    modify_shape(region.into(), size, corner_maker, filter).into_regions()
                })
                .collect::<Blueprints>(),
        ),
        Shape2D::Empty => Shape2D::Empty,
    }
}

fn make_corner<M>(corner_maker: &M, first: &Curve2D, second: &Curve2D, size: f64) -> Vec<Curve2D>
where
    M: Fn(&Curve2D, &Curve2D, f64) -> Vec<Curve2D>,
{
    let made = corner_maker(first, second, size);
    if made.is_empty() {
        invariant_violation("corner maker returned no curves");
    }
    made
}

/// Walk the loop keeping one pending curve: each accepted corner replaces
/// the pending curve and its successor with the maker's output, whose last
/// curve becomes pending again.
fn modify_blueprint<M, F>(
    blueprint: &Blueprint,
    size: f64,
    corner_maker: &M,
    filter: &F,
) -> Blueprint
where
    M: Fn(&Curve2D, &Curve2D, f64) -> Vec<Curve2D>,
    F: CornerFilter + ?Sized,
{
    let Some((first, rest)) = blueprint.curves().split_first() else {
        invariant_violation("cannot modify corners of a loop without curves");
    };

    let mut done: Vec<Curve2D> = Vec::with_capacity(blueprint.len() * 3);
    let mut pending = *first;
    for next in rest {
        let corner = Corner {
            first_curve: &pending,
            second_curve: next,
            point: pending.last_point(),
        };
        if filter.should_keep(&corner) {
            let mut made = make_corner(corner_maker, &pending, next, size);
            tracing::trace!(
                "Corner at {} replaced by {} curves",
                pending.last_point(),
                made.len()
            );
            let Some(last) = made.pop() else {
                invariant_violation("corner maker returned no curves");
            };
            done.extend(made);
            pending = last;
        } else {
            done.push(pending);
            pending = *next;
        }
    }
    done.push(pending);

    let (head, tail) = (done[0], done[done.len() - 1]);
    if done.len() < 2 || !same_point(tail.last_point(), head.first_point(), PRECISION_POINT) {
        return Blueprint::new_unchecked(done);
    }

    let seam = Corner {
        first_curve: &tail,
        second_curve: &head,
        point: tail.last_point(),
    };
    if !filter.should_keep(&seam) {
        return Blueprint::new_unchecked(done);
    }

    // The maker's last curve is the loop's new first curve
    let mut made = make_corner(corner_maker, &tail, &head, size);
    let Some(new_head) = made.pop() else {
        invariant_violation("corner maker returned no curves");
    };
    let mut curves = Vec::with_capacity(done.len() + made.len());
    curves.push(new_head);
    curves.extend_from_slice(&done[1..done.len() - 1]);
    curves.extend(made);
    Blueprint::new_unchecked(curves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DVec2;
    use std::f64::consts::PI;

    fn square(x: f64, y: f64, size: f64) -> Blueprint {
        Blueprint::polygon(&[
            DVec2::new(x, y),
            DVec2::new(x + size, y),
            DVec2::new(x + size, y + size),
            DVec2::new(x, y + size),
        ])
        .unwrap()
    }

    fn reject_all(_: &Corner<'_>) -> bool {
        false
    }

    fn assert_closed_loop(curves: &[Curve2D]) {
        for (i, curve) in curves.iter().enumerate() {
            let next = &curves[(i + 1) % curves.len()];
            assert!(
                same_point(curve.last_point(), next.first_point(), 1e-9),
                "curve {} ends at {} but the next starts at {}",
                i,
                curve.last_point(),
                next.first_point()
            );
        }
    }

    fn assert_tangent_continuous(curves: &[Curve2D]) {
        for (i, curve) in curves.iter().enumerate() {
            let next = &curves[(i + 1) % curves.len()];
            assert_relative_eq!(
                curve.tangent_at(1.0).dot(next.tangent_at(0.0)),
                1.0,
                epsilon = 1e-9
            );
        }
    }

    fn into_blueprint(shape: Shape2D) -> Blueprint {
        match shape {
            Shape2D::Blueprint(bp) => bp,
            other => panic!("expected a blueprint, got {:?}", other),
        }
    }

    #[test]
    fn test_fillet_square() {
        let bp = into_blueprint(fillet_2d(square(0.0, 0.0, 10.0).into(), 1.0, &AllCorners));

        assert_eq!(bp.len(), 8);
        assert_closed_loop(bp.curves());
        assert_tangent_continuous(bp.curves());
        for curve in bp.curves() {
            if let Curve2D::Arc { radius, .. } = curve {
                assert_relative_eq!(*radius, 1.0, epsilon = 1e-12);
            }
        }
        assert_relative_eq!(bp.signed_area(), 100.0 - (4.0 - PI), epsilon = 1e-9);
        assert!(same_point(bp.first_point().unwrap(), DVec2::new(1.0, 0.0), 1e-9));
    }

    #[test]
    fn test_chamfer_square() {
        let bp = into_blueprint(chamfer_2d(square(0.0, 0.0, 10.0).into(), 2.0, &AllCorners));

        assert_eq!(bp.len(), 8);
        assert_closed_loop(bp.curves());
        for bevel in bp.curves().iter().skip(1).step_by(2) {
            assert_relative_eq!(bevel.length(), 8.0_f64.sqrt(), epsilon = 1e-9);
        }
        assert_relative_eq!(bp.signed_area(), 92.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reject_all_keeps_curves() {
        let bp = square(0.0, 0.0, 10.0);
        let result = into_blueprint(fillet_2d(bp.clone().into(), 1.0, &reject_all));
        assert_eq!(result, bp);
    }

    #[test]
    fn test_filter_selects_one_corner() {
        let target = DVec2::new(10.0, 10.0);
        let filter = |corner: &Corner<'_>| same_point(corner.point, target, 1e-9);
        let bp = into_blueprint(fillet_2d(square(0.0, 0.0, 10.0).into(), 2.0, &filter));

        assert_eq!(bp.len(), 5);
        assert_closed_loop(bp.curves());
        let arcs: Vec<&Curve2D> = bp
            .curves()
            .iter()
            .filter(|c| matches!(c, Curve2D::Arc { .. }))
            .collect();
        assert_eq!(arcs.len(), 1);
        let expected = DVec2::new(8.0, 8.0) + DVec2::splat(2.0_f64.sqrt());
        assert!(same_point(arcs[0].midpoint(), expected, 1e-9));
    }

    #[test]
    fn test_seam_corner_only() {
        let origin = DVec2::ZERO;
        let filter = |corner: &Corner<'_>| same_point(corner.point, origin, 1e-9);
        let bp = into_blueprint(chamfer_2d(square(0.0, 0.0, 10.0).into(), 1.0, &filter));

        assert_eq!(bp.len(), 5);
        assert_closed_loop(bp.curves());
        assert!(same_point(bp.first_point().unwrap(), DVec2::new(1.0, 0.0), 1e-9));
        assert_eq!(
            bp.curves()[4],
            Curve2D::segment(DVec2::new(0.0, 1.0), DVec2::new(1.0, 0.0))
        );
    }

    #[test]
    fn test_size_zero_and_oversize() {
        let bp = square(0.0, 0.0, 10.0);
        assert_eq!(into_blueprint(fillet_2d(bp.clone().into(), 0.0, &AllCorners)), bp);
        assert_eq!(into_blueprint(fillet_2d(bp.clone().into(), 11.0, &AllCorners)), bp);
        assert_eq!(into_blueprint(chamfer_2d(bp.clone().into(), 10.5, &AllCorners)), bp);
    }

    #[test]
    fn test_fillet_half_side_rounds_every_corner() {
        let bp = into_blueprint(fillet_2d(square(0.0, 0.0, 10.0).into(), 5.0, &AllCorners));

        assert_eq!(bp.len(), 4);
        assert!(bp.curves().iter().all(|c| matches!(c, Curve2D::Arc { .. })));
        assert_closed_loop(bp.curves());
        assert_tangent_continuous(bp.curves());
        assert_relative_eq!(bp.signed_area(), 25.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_chamfer_half_side_bevels_every_corner() {
        let bp = into_blueprint(chamfer_2d(square(0.0, 0.0, 10.0).into(), 5.0, &AllCorners));

        assert_eq!(bp.len(), 4);
        assert_closed_loop(bp.curves());
        for bevel in bp.curves() {
            assert_relative_eq!(bevel.length(), 50.0_f64.sqrt(), epsilon = 1e-9);
        }
        assert_relative_eq!(bp.signed_area(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fillet_slot() {
        let rectangle = Blueprint::polygon(&[
            DVec2::new(0.0, 0.0),
            DVec2::new(20.0, 0.0),
            DVec2::new(20.0, 10.0),
            DVec2::new(0.0, 10.0),
        ])
        .unwrap();
        let bp = into_blueprint(fillet_2d(rectangle.into(), 5.0, &AllCorners));

        assert_eq!(bp.len(), 6);
        assert_closed_loop(bp.curves());
        assert_tangent_continuous(bp.curves());
        assert_relative_eq!(bp.signed_area(), 100.0 + 25.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_smooth_junctions_untouched() {
        let rounded = Blueprint::rounded_rectangle(DVec2::ZERO, 10.0, 6.0, 1.0).unwrap();
        let result = into_blueprint(fillet_2d(rounded.clone().into(), 0.5, &AllCorners));
        assert_eq!(result, rounded);
    }

    #[test]
    fn test_circle_has_no_corner() {
        let circle = Blueprint::circle(DVec2::ZERO, 3.0).unwrap();
        let result = into_blueprint(chamfer_2d(circle.clone().into(), 1.0, &AllCorners));
        assert_eq!(result, circle);
    }

    #[test]
    fn test_compound_dispatch() {
        let compound = CompoundBlueprint::new(square(0.0, 0.0, 20.0), vec![square(5.0, 5.0, 10.0)]);
        let result = fillet_2d(compound.into(), 1.0, &AllCorners);

        let Shape2D::Compound(compound) = result else {
            panic!("expected a compound");
        };
        assert_eq!(compound.outer().len(), 8);
        assert_eq!(compound.holes().len(), 1);
        assert_eq!(compound.holes()[0].len(), 8);
        assert_closed_loop(compound.holes()[0].curves());
    }

    #[test]
    fn test_collection_dispatch() {
        let collection = Blueprints::new(vec![
            square(0.0, 0.0, 4.0).into(),
            CompoundBlueprint::new(square(10.0, 0.0, 10.0), vec![square(12.0, 2.0, 2.0)]).into(),
        ]);
        let result = chamfer_2d(collection.into(), 0.5, &AllCorners);

        let Shape2D::Blueprints(collection) = result else {
            panic!("expected a collection");
        };
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.regions()[0].as_blueprint().unwrap().len(), 8);
        let compound = collection.regions()[1].as_compound().unwrap();
        assert_eq!(compound.outer().len(), 8);
        assert_eq!(compound.holes()[0].len(), 8);
    }

    #[test]
    fn test_empty_passes_through() {
        assert_eq!(fillet_2d(Shape2D::Empty, 1.0, &AllCorners), Shape2D::Empty);
    }

    #[test]
    fn test_custom_maker() {
        let keep = |a: &Curve2D, b: &Curve2D, _: f64| vec![*a, *b];
        let bp = square(0.0, 0.0, 3.0);
        let result = modify(bp.clone().into(), 1.0, keep, &AllCorners);
        assert_eq!(into_blueprint(result), bp);
    }

    #[test]
    #[should_panic(expected = "corner maker returned no curves")]
    fn test_empty_maker_output_panics() {
        let nothing = |_: &Curve2D, _: &Curve2D, _: f64| Vec::new();
        modify(square(0.0, 0.0, 1.0).into(), 1.0, nothing, &AllCorners);
    }

    #[test]
    #[should_panic(expected = "without curves")]
    fn test_empty_loop_panics() {
        fillet_blueprint(&Blueprint::new_unchecked(Vec::new()), 1.0);
    }
}
