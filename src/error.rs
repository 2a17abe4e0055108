use std::fmt;

use thiserror::Error;

use crate::math::Coordinate;

/// Top-level error type for overlay and relate computations.
#[derive(Debug, Clone, Error)]
pub enum OverlayError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Malformed input detected before any graph work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{kind} has {found} distinct points, at least {required} are required")]
    TooFewPoints {
        kind: &'static str,
        found: usize,
        required: usize,
    },

    #[error("ring is not closed: first point {first} differs from last point {last}")]
    UnclosedRing { first: Coordinate, last: Coordinate },

    #[error("{0} has an empty coordinate array")]
    EmptyCoordinates(&'static str),

    #[error("non-finite coordinate {0}")]
    NonFinite(Coordinate),

    #[error("invalid intersection matrix pattern: {0}")]
    InvalidPattern(String),

    #[error("precision scale must be finite and positive, got {0}")]
    InvalidPrecision(f64),

    #[error("heterogeneous geometry collections are not supported by {0}")]
    UnsupportedCollection(&'static str),
}

/// An inconsistency found while noding, labelling or assembling a planar graph.
///
/// Carries the offending coordinate when one is known.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct TopologyError {
    pub message: String,
    pub location: Option<Coordinate>,
}

impl TopologyError {
    /// Creates an error without a location.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Creates an error attached to a coordinate.
    #[must_use]
    pub fn at(message: impl Into<String>, location: Coordinate) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
        }
    }
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(pt) => write!(f, "topology error: {} [ {} ]", self.message, pt),
            None => write!(f, "topology error: {}", self.message),
        }
    }
}

/// Convenience type alias for results using [`OverlayError`].
pub type Result<T> = std::result::Result<T, OverlayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topology_error_display_includes_location() {
        let err = TopologyError::at("side location conflict", Coordinate::new(1.0, 2.5));
        assert_eq!(
            err.to_string(),
            "topology error: side location conflict [ (1 2.5) ]"
        );
        assert_eq!(
            TopologyError::new("no outgoing edge").to_string(),
            "topology error: no outgoing edge"
        );
    }

    #[test]
    fn geometry_error_converts_transparently() {
        let err: OverlayError = GeometryError::EmptyCoordinates("LineString").into();
        assert_eq!(err.to_string(), "LineString has an empty coordinate array");
    }
}
