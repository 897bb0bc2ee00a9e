//! Loop Intersection
//!
//! Finds where two blueprints cross or share boundary, splits both loops
//! there and pairs the resulting boundary runs. The pairing is what boolean
//! composition (union, difference, intersection) consumes to pick the
//! pieces of each loop it keeps.

use serde::{Deserialize, Serialize};

use crate::blueprint::Blueprint;
use crate::constants::Tolerance;
use crate::curve::{Curve2D, intersect_curves};
use crate::geometry::{Point2D, remove_duplicate_points, same_point};
use crate::invariant_violation;

/// What a run of the first loop is paired with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SegmentPairing {
    /// The run is boundary shared by both loops
    Same,
    /// The matching run of the second loop, between the same landmarks
    Other(Vec<Curve2D>),
}

/// A run of the first loop and its counterpart on the second loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionSegment {
    /// Curves of the first loop between two consecutive landmarks
    pub first: Vec<Curve2D>,
    /// Counterpart from the second loop
    pub second: SegmentPairing,
}

impl IntersectionSegment {
    /// Check whether this run is shared boundary
    pub fn is_same(&self) -> bool {
        matches!(self.second, SegmentPairing::Same)
    }

    /// The second loop's run, unless the boundary is shared
    pub fn second_run(&self) -> Option<&[Curve2D]> {
        match &self.second {
            SegmentPairing::Same => None,
            SegmentPairing::Other(run) => Some(run),
        }
    }
}

/// Computes paired boundary runs of two loops
#[derive(Debug, Clone, Default)]
pub struct IntersectionFinder {
    tolerance: Tolerance,
}

impl IntersectionFinder {
    /// Create a finder with default tolerances
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tolerances
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Pair the boundary runs of two loops.
    ///
    /// Returns `None` when the loops do not meet, or only touch without
    /// crossing and without sharing any boundary.
    pub fn find(&self, first: &Blueprint, second: &Blueprint) -> Option<Vec<IntersectionSegment>> {
        let precision = self.tolerance.intersection;
        let curve_tolerance = self.tolerance.curve_intersection();

        let mut all_points: Vec<Point2D> = Vec::new();
        let mut common_segments: Vec<Curve2D> = Vec::new();
        let mut common_points: Vec<[Point2D; 2]> = Vec::new();
        let mut first_points: Vec<Vec<Point2D>> = vec![Vec::new(); first.len()];
        let mut second_points: Vec<Vec<Point2D>> = vec![Vec::new(); second.len()];

        for (i, curve_a) in first.curves().iter().enumerate() {
            for (j, curve_b) in second.curves().iter().enumerate() {
                let found = intersect_curves(curve_a, curve_b, curve_tolerance);
                if found.is_empty() {
                    continue;
                }
                let hits: Vec<Point2D> = found
                    .intersections
                    .iter()
                    .chain(found.common_segments_points.iter().flatten())
                    .copied()
                    .collect();
                first_points[i].extend_from_slice(&hits);
                second_points[j].extend_from_slice(&hits);
                all_points.extend(hits);
                common_segments.extend(found.common_segments);
                common_points.extend(found.common_segments_points);
            }
        }

        let candidates = remove_duplicate_points(&all_points, precision);
        if candidates.len() < 2 {
            tracing::debug!(points = candidates.len(), "Blueprints do not intersect");
            return None;
        }

        let first_split = split_loop(first, &first_points, curve_tolerance);
        let second_split = split_loop(second, &second_points, curve_tolerance);

        let crossings = crossing_points(&candidates, &first_split, second, precision);
        tracing::debug!(
            candidates = candidates.len(),
            crossings = crossings.len(),
            common = common_segments.len(),
            "Classified blueprint intersections"
        );
        if crossings.is_empty() && common_segments.is_empty() {
            return None;
        }

        let landmark = match (common_points.first(), crossings.first()) {
            (Some([start, _]), _) => *start,
            (None, Some(point)) => *point,
            (None, None) => return None,
        };
        let first_rotated = start_on(first_split, landmark, precision);
        let second_rotated = start_on(second_split, landmark, precision);

        let first_runs = split_runs(&first_rotated, &crossings, &common_segments, precision);
        let second_runs = split_runs(&second_rotated, &crossings, &common_segments, precision);
        let segments = pair_runs(
            first_runs,
            second_runs,
            !common_segments.is_empty(),
            &common_points,
            precision,
        );
        Some(segments)
    }
}

/// Pair the boundary runs of two loops with default tolerances
pub fn find(first: &Blueprint, second: &Blueprint) -> Option<Vec<IntersectionSegment>> {
    IntersectionFinder::new().find(first, second)
}

fn split_loop(blueprint: &Blueprint, points: &[Vec<Point2D>], tolerance: f64) -> Vec<Curve2D> {
    blueprint
        .curves()
        .iter()
        .zip(points)
        .flat_map(|(curve, points)| {
            if points.is_empty() {
                vec![*curve]
            } else {
                curve.split_at(points, tolerance)
            }
        })
        .collect()
}

/// Keep the candidates where the first loop actually passes from one side
/// of the second loop to the other.
fn crossing_points(
    candidates: &[Point2D],
    first_split: &[Curve2D],
    second: &Blueprint,
    precision: f64,
) -> Vec<Point2D> {
    candidates
        .iter()
        .copied()
        .filter(|point| {
            let mut incidences = 0;
            let mut incident: Vec<&Curve2D> = Vec::new();
            for curve in first_split {
                let starts = same_point(curve.first_point(), *point, precision);
                let ends = same_point(curve.last_point(), *point, precision);
                incidences += usize::from(starts) + usize::from(ends);
                if starts || ends {
                    incident.push(curve);
                }
            }
            if incidences % 2 != 0 {
                invariant_violation(&format!(
                    "odd number of curve ends ({incidences}) at intersection {point}"
                ));
            }

            let inside = incident
                .iter()
                .filter(|curve| second.is_inside(curve.midpoint()))
                .count();
            inside != 0 && inside != incident.len()
        })
        .collect()
}

/// Rotate a closed curve sequence so that it starts at `point`
fn start_on(mut curves: Vec<Curve2D>, point: Point2D, precision: f64) -> Vec<Curve2D> {
    let Some(index) = curves
        .iter()
        .position(|c| same_point(c.first_point(), point, precision))
    else {
        invariant_violation(&format!("no curve starts at landmark {point}"));
    };
    curves.rotate_left(index);
    curves
}

/// Group consecutive curves into runs ending at landmarks. Curves that are
/// shared boundary always form their own run.
fn split_runs(
    curves: &[Curve2D],
    landmarks: &[Point2D],
    common_segments: &[Curve2D],
    precision: f64,
) -> Vec<Vec<Curve2D>> {
    let mut runs = Vec::new();
    let mut current: Vec<Curve2D> = Vec::new();

    for curve in curves {
        if common_segments
            .iter()
            .any(|common| common.is_same_curve(curve, precision))
        {
            if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
            runs.push(vec![*curve]);
            continue;
        }

        current.push(*curve);
        if landmarks
            .iter()
            .any(|p| same_point(*p, curve.last_point(), precision))
        {
            runs.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Pair the runs of both loops, walking the second loop the same way round
/// as the first.
fn pair_runs(
    first_runs: Vec<Vec<Curve2D>>,
    mut second_runs: Vec<Vec<Curve2D>>,
    has_common: bool,
    common_points: &[[Point2D; 2]],
    precision: f64,
) -> Vec<IntersectionSegment> {
    if first_runs.len() != second_runs.len() {
        invariant_violation(&format!(
            "loops split into {} and {} runs",
            first_runs.len(),
            second_runs.len()
        ));
    }

    let needs_reverse = match (first_runs.first(), second_runs.first()) {
        (Some(run_a), Some(run_b)) => {
            !same_point(run_end(run_a), run_end(run_b), precision)
                || (has_common && run_b.len() != 1)
        }
        _ => invariant_violation("no boundary runs after splitting"),
    };
    if needs_reverse {
        second_runs = reverse_runs(second_runs);
    }

    first_runs
        .into_iter()
        .zip(second_runs)
        .map(|(run_a, run_b)| {
            let second = if is_common_run(&run_a, common_points, precision) {
                SegmentPairing::Same
            } else {
                SegmentPairing::Other(run_b)
            };
            IntersectionSegment { first: run_a, second }
        })
        .collect()
}

/// Traverse runs backwards: run order, curve order and curve direction
fn reverse_runs(runs: Vec<Vec<Curve2D>>) -> Vec<Vec<Curve2D>> {
    runs.into_iter()
        .rev()
        .map(|run| run.iter().rev().map(Curve2D::reverse).collect())
        .collect()
}

fn run_end(run: &[Curve2D]) -> Point2D {
    match run.last() {
        Some(curve) => curve.last_point(),
        None => invariant_violation("empty boundary run"),
    }
}

/// A run is shared boundary when it is a single curve spanning the ends of
/// a common segment, in either direction.
fn is_common_run(run: &[Curve2D], common_points: &[[Point2D; 2]], precision: f64) -> bool {
    let [curve] = run else {
        return false;
    };
    let (start, end) = (curve.first_point(), curve.last_point());
    common_points.iter().any(|[a, b]| {
        (same_point(*a, start, precision) && same_point(*b, end, precision))
            || (same_point(*a, end, precision) && same_point(*b, start, precision))
    })
}
