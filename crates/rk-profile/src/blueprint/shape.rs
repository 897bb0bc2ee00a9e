//! Any 2D shape produced by the profile algorithms

use serde::{Deserialize, Serialize};

use super::{Blueprint, Blueprints, CompoundBlueprint, Region};
use crate::geometry::{BoundingBox2D, Point2D};

/// A 2D shape, possibly empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Shape2D {
    /// A single loop
    Blueprint(Blueprint),
    /// A loop with holes
    Compound(CompoundBlueprint),
    /// Several disjoint regions
    Blueprints(Blueprints),
    /// Nothing (degenerate or empty result)
    #[default]
    Empty,
}

impl Shape2D {
    /// Check whether the shape holds no geometry
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Blueprints(collection) => collection.is_empty(),
            _ => false,
        }
    }

    /// Bounds of the shape, `None` when empty
    pub fn bounding_box(&self) -> Option<BoundingBox2D> {
        match self {
            Self::Blueprint(bp) => Some(bp.bounding_box()),
            Self::Compound(compound) => Some(compound.bounding_box()),
            Self::Blueprints(collection) => collection.bounding_box(),
            Self::Empty => None,
        }
    }

    /// Check whether `point` is inside the filled part of the shape
    pub fn is_inside(&self, point: Point2D) -> bool {
        match self {
            Self::Blueprint(bp) => bp.is_inside(point),
            Self::Compound(compound) => compound.is_inside(point),
            Self::Blueprints(collection) => collection.is_inside(point),
            Self::Empty => false,
        }
    }

    /// Top-level regions of the shape.
    ///
    /// A collection is flattened into its members; the empty shape has none.
    pub fn into_regions(self) -> Vec<Region> {
        match self {
            Self::Blueprint(bp) => vec![Region::Blueprint(bp)],
            Self::Compound(compound) => vec![Region::Compound(compound)],
            Self::Blueprints(collection) => collection.into_iter().collect(),
            Self::Empty => Vec::new(),
        }
    }
}

impl From<Blueprint> for Shape2D {
    fn from(bp: Blueprint) -> Self {
        Self::Blueprint(bp)
    }
}

impl From<CompoundBlueprint> for Shape2D {
    fn from(compound: CompoundBlueprint) -> Self {
        Self::Compound(compound)
    }
}

impl From<Blueprints> for Shape2D {
    fn from(collection: Blueprints) -> Self {
        Self::Blueprints(collection)
    }
}

impl From<Region> for Shape2D {
    fn from(region: Region) -> Self {
        match region {
            Region::Blueprint(bp) => Self::Blueprint(bp),
            Region::Compound(compound) => Self::Compound(compound),
        }
    }
}

impl From<Option<Shape2D>> for Shape2D {
    fn from(shape: Option<Shape2D>) -> Self {
        shape.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_into_regions_flattens() {
        let a = Blueprint::rectangle(DVec2::ZERO, 1.0, 1.0).unwrap();
        let b = Blueprint::rectangle(DVec2::new(3.0, 0.0), 1.0, 1.0).unwrap();

        assert!(Shape2D::Empty.into_regions().is_empty());
        assert_eq!(Shape2D::from(a.clone()).into_regions().len(), 1);

        let collection = Blueprints::new(vec![a.into(), b.into()]);
        let shape = Shape2D::from(collection);
        assert!(!shape.is_empty());
        assert_eq!(shape.into_regions().len(), 2);
        assert!(Shape2D::from(Blueprints::default()).is_empty());
        assert!(Shape2D::from(None::<Shape2D>).bounding_box().is_none());
    }

    #[test]
    fn test_shape_serializes() {
        let shape = Shape2D::from(Blueprint::rectangle(DVec2::new(1.0, 2.0), 3.0, 4.0).unwrap());
        let json = serde_json::to_string(&shape).unwrap();
        let back: Shape2D = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);
    }
}
