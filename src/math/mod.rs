mod coordinate;
pub mod distance_2d;
mod envelope;
pub mod intersect_2d;
pub mod polygon_2d;
mod precision;

pub use coordinate::Coordinate;
pub use envelope::Envelope;
pub use intersect_2d::{IntersectionResult, LineIntersector, SegmentIntersection};
pub use precision::PrecisionModel;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Homogeneous 2D coordinate (or line) type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
