//! Loop Nesting
//!
//! Organizes loose closed loops into regions: each outer boundary collects
//! the loops directly inside it as holes, and loops nested inside a hole
//! start new regions of their own (islands).
//!
//! Loops whose boundaries cross each other are not supported. The result
//! for them is unspecified, but organizing always terminates.

mod spatial;

use crate::blueprint::{Blueprint, Blueprints, CompoundBlueprint, Region};
use crate::constants::Tolerance;
use crate::invariant_violation;

/// A loop of a group together with the loops of that group containing it
#[derive(Debug, Clone, PartialEq)]
struct ContainedBlueprint {
    /// Index into the organizer input
    index: usize,
    /// Input indices of the loops that contain this one
    is_in: Vec<usize>,
}

/// Builds regions with holes out of loose loops
#[derive(Debug, Clone, Default)]
pub struct NestingOrganizer {
    tolerance: Tolerance,
}

impl NestingOrganizer {
    /// Create an organizer with default tolerances
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tolerances
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sort loops into plain blueprints and compounds with holes
    pub fn organize(&self, loops: Vec<Blueprint>) -> Blueprints {
        let bounds: Vec<_> = loops
            .iter()
            .map(|bp| bp.bounding_box().expanded(self.tolerance.point))
            .collect();
        let groups = spatial::overlap_groups(&bounds);

        let clusters: Vec<Vec<ContainedBlueprint>> = groups
            .iter()
            .flat_map(|group| resolve(&loops, annotate(&loops, group)))
            .collect();
        tracing::debug!(
            loops = loops.len(),
            groups = groups.len(),
            regions = clusters.len(),
            "Organized loops"
        );

        clusters
            .into_iter()
            .map(|cluster| build_region(&loops, cluster))
            .collect()
    }
}

/// Organize loops into regions with default tolerances
pub fn organize(loops: Vec<Blueprint>) -> Blueprints {
    NestingOrganizer::new().organize(loops)
}

/// Record, for each member, which other members contain its sample point
fn annotate(loops: &[Blueprint], members: &[usize]) -> Vec<ContainedBlueprint> {
    members
        .iter()
        .map(|&index| {
            let sample = loops[index].sample_point();
            let is_in = members
                .iter()
                .copied()
                .filter(|&other| other != index)
                .filter(|&other| sample.is_some_and(|p| loops[other].is_inside(p)))
                .collect();
            ContainedBlueprint { index, is_in }
        })
        .collect()
}

/// Split a group into clusters of one outer loop plus its direct holes
fn resolve(loops: &[Blueprint], group: Vec<ContainedBlueprint>) -> Vec<Vec<ContainedBlueprint>> {
    if group.is_empty() {
        return Vec::new();
    }

    let outers: Vec<usize> = group
        .iter()
        .filter(|c| c.is_in.is_empty())
        .map(|c| c.index)
        .collect();
    let has_deep = group.iter().any(|c| c.is_in.len() > 1);

    if outers.len() == 1 && !has_deep {
        return vec![group];
    }

    if outers.len() > 1 {
        return outers
            .iter()
            .flat_map(|outer| {
                let subset = group
                    .iter()
                    .filter(|c| c.index == *outer || c.is_in.contains(outer))
                    .cloned()
                    .collect();
                resolve(loops, subset)
            })
            .collect();
    }

    let (first_level, deep): (Vec<_>, Vec<_>) =
        group.into_iter().partition(|c| c.is_in.len() <= 1);
    if first_level.is_empty() {
        // Only reachable with crossing loops; re-annotating would loop forever
        tracing::warn!(
            "{} loops all contain each other, leaving them as one region",
            deep.len()
        );
        return vec![deep];
    }

    let deep_indices: Vec<usize> = deep.iter().map(|c| c.index).collect();
    let mut clusters = vec![first_level];
    clusters.extend(resolve(loops, annotate(loops, &deep_indices)));
    clusters
}

fn build_region(loops: &[Blueprint], mut cluster: Vec<ContainedBlueprint>) -> Region {
    cluster.sort_by_key(|c| c.is_in.len());
    let mut members = cluster.iter().map(|c| loops[c.index].clone());
    let Some(outer) = members.next() else {
        invariant_violation("empty nesting cluster");
    };
    let holes: Vec<Blueprint> = members.collect();
    if holes.is_empty() {
        Region::Blueprint(outer)
    } else {
        Region::Compound(CompoundBlueprint::new(outer, holes))
    }
}
