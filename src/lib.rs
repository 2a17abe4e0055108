pub mod error;
pub mod geometry;
pub mod index;
pub mod math;
pub mod noding;
pub mod operations;
pub mod topology;

pub use error::{GeometryError, OverlayError, Result, TopologyError};
pub use geometry::{Geometry, LineString, LinearRing, Polygon};
pub use math::{Coordinate, PrecisionModel};
pub use operations::overlay::{overlay, overlay_with, OpCode, OverlayOp, OverlayOptions, SnapRetry};
pub use operations::relate::{relate, IntersectionMatrix};
pub use topology::{BoundaryNodeRule, BoundaryRule, Dimension, Location};
