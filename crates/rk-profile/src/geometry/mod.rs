//! Point arithmetic and bounding boxes

mod bbox;
mod point;

pub use bbox::BoundingBox2D;
pub use point::{Point2D, cross, remove_duplicate_points, same_point};
