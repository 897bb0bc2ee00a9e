//! Collections of disjoint regions

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{Blueprint, CompoundBlueprint};
use crate::geometry::{BoundingBox2D, Point2D};

/// One top-level region of a [`Blueprints`] collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Region {
    /// A loop without holes
    Blueprint(Blueprint),
    /// A loop with holes
    Compound(CompoundBlueprint),
}

impl Region {
    /// Bounds of the region
    pub fn bounding_box(&self) -> BoundingBox2D {
        match self {
            Self::Blueprint(bp) => bp.bounding_box(),
            Self::Compound(compound) => compound.bounding_box(),
        }
    }

    /// Check whether `point` is inside the filled part of the region
    pub fn is_inside(&self, point: Point2D) -> bool {
        match self {
            Self::Blueprint(bp) => bp.is_inside(point),
            Self::Compound(compound) => compound.is_inside(point),
        }
    }

    /// The region moved by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        match self {
            Self::Blueprint(bp) => Self::Blueprint(bp.translated(offset)),
            Self::Compound(compound) => Self::Compound(compound.translated(offset)),
        }
    }

    /// The plain loop, if the region has no holes
    pub fn as_blueprint(&self) -> Option<&Blueprint> {
        match self {
            Self::Blueprint(bp) => Some(bp),
            Self::Compound(_) => None,
        }
    }

    /// The compound, if the region has holes
    pub fn as_compound(&self) -> Option<&CompoundBlueprint> {
        match self {
            Self::Blueprint(_) => None,
            Self::Compound(compound) => Some(compound),
        }
    }
}

impl From<Blueprint> for Region {
    fn from(bp: Blueprint) -> Self {
        Self::Blueprint(bp)
    }
}

impl From<CompoundBlueprint> for Region {
    fn from(compound: CompoundBlueprint) -> Self {
        Self::Compound(compound)
    }
}

/// Several disjoint regions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blueprints {
    regions: Vec<Region>,
}

impl Blueprints {
    /// Create a collection from its regions
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check whether the collection has no region
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The regions
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Iterate over the regions
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Bounds of all regions, `None` when empty
    pub fn bounding_box(&self) -> Option<BoundingBox2D> {
        self.regions
            .iter()
            .map(Region::bounding_box)
            .reduce(|a, b| a.union(&b))
    }

    /// Check whether `point` is inside any region
    pub fn is_inside(&self, point: Point2D) -> bool {
        self.regions.iter().any(|region| region.is_inside(point))
    }

    /// The collection moved by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        Self::new(self.regions.iter().map(|r| r.translated(offset)).collect())
    }
}

impl IntoIterator for Blueprints {
    type Item = Region;
    type IntoIter = std::vec::IntoIter<Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.into_iter()
    }
}

impl<'a> IntoIterator for &'a Blueprints {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

impl FromIterator<Region> for Blueprints {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_bounds_and_inside() {
        let left = Blueprint::rectangle(DVec2::new(-5.0, 0.0), 2.0, 2.0).unwrap();
        let right = Blueprint::circle(DVec2::new(5.0, 0.0), 1.0).unwrap();
        let collection: Blueprints = [Region::from(left), Region::from(right)].into_iter().collect();

        assert_eq!(collection.len(), 2);
        let bbox = collection.bounding_box().unwrap();
        assert!((bbox.min.x + 6.0).abs() < 1e-12);
        assert!((bbox.max.x - 6.0).abs() < 1e-12);
        assert!(collection.is_inside(DVec2::new(5.0, 0.5)));
        assert!(!collection.is_inside(DVec2::ZERO));
        assert!(Blueprints::default().bounding_box().is_none());
    }
}
