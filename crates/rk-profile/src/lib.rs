//! 2D Profile Algebra for RK Sketches
//!
//! This crate provides:
//! - Closed 2D loops (blueprints) built from segments and circular arcs
//! - Loop intersection into paired boundary runs for boolean composition
//! - Nesting of loose loops into outer boundaries with holes
//! - Corner modification (fillets, chamfers) on any 2D shape

pub mod blueprint;
pub mod constants;
pub mod corner;
pub mod curve;
pub mod geometry;
pub mod intersection;
pub mod nesting;

// Re-exports for convenience
pub use blueprint::{
    Blueprint, BlueprintError, BlueprintResult, Blueprints, CompoundBlueprint, Orientation,
    Region, Shape2D,
};
pub use constants::{PRECISION_ANGLE, PRECISION_INTERSECTION, PRECISION_POINT, Tolerance};
pub use corner::{
    AllCorners, Corner, CornerFilter, chamfer_2d, chamfer_corner, fillet_2d, fillet_corner,
    modify,
};
pub use curve::{Curve2D, CurveIntersections, intersect_curves};
pub use geometry::{BoundingBox2D, Point2D};
pub use intersection::{IntersectionFinder, IntersectionSegment, SegmentPairing, find};
pub use nesting::{NestingOrganizer, organize};

/// Log and abort on a broken internal invariant
#[cold]
#[track_caller]
pub(crate) fn invariant_violation(context: &str) -> ! {
    tracing::error!("Profile invariant violated: {}", context);
    panic!("profile invariant violated: {context}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::{EnvFilter, fmt};

    #[test]
    #[should_panic(expected = "profile invariant violated: broken chain")]
    fn test_invariant_violation_logs_and_panics() {
        let _ = fmt()
            .with_env_filter(EnvFilter::new("error"))
            .with_test_writer()
            .try_init();
        invariant_violation("broken chain");
    }
}
