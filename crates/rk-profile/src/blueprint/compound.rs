//! Outer loop minus holes

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::Blueprint;
use crate::geometry::{BoundingBox2D, Point2D};

/// An outer loop with zero or more holes cut out of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundBlueprint {
    outer: Blueprint,
    holes: Vec<Blueprint>,
}

impl CompoundBlueprint {
    /// Create a compound from its outer loop and holes.
    ///
    /// Holes are expected to lie strictly inside `outer` without overlapping
    /// each other; this is not checked.
    pub fn new(outer: Blueprint, holes: Vec<Blueprint>) -> Self {
        Self { outer, holes }
    }

    /// The outer boundary
    pub fn outer(&self) -> &Blueprint {
        &self.outer
    }

    /// The holes, in the order they were given
    pub fn holes(&self) -> &[Blueprint] {
        &self.holes
    }

    /// Split into outer boundary and holes
    pub fn into_parts(self) -> (Blueprint, Vec<Blueprint>) {
        (self.outer, self.holes)
    }

    /// Bounds of the outer boundary
    pub fn bounding_box(&self) -> BoundingBox2D {
        self.outer.bounding_box()
    }

    /// Check whether `point` is inside the outer loop and outside every hole
    pub fn is_inside(&self, point: Point2D) -> bool {
        self.outer.is_inside(point) && !self.holes.iter().any(|hole| hole.is_inside(point))
    }

    /// The compound moved by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        Self::new(
            self.outer.translated(offset),
            self.holes.iter().map(|h| h.translated(offset)).collect(),
        )
    }
}
