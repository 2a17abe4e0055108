use std::cmp::Ordering;
use std::fmt;

use super::{Point2, Vector2};

/// A planar position with an optional elevation.
///
/// Equality and ordering only look at `x` and `y`, and are exact: two
/// coordinates identify the same graph node iff they are bitwise-equal in
/// value. Ordering is lexicographic on `(x, y)`, which gives node maps a
/// deterministic iteration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coordinate {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    #[must_use]
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Euclidean distance in the plane.
    #[must_use]
    pub fn distance(&self, other: &Coordinate) -> f64 {
        nalgebra::distance(&self.to_point(), &other.to_point())
    }

    /// Returns `true` if both ordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn to_point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Vector from `self` to `other`.
    #[must_use]
    pub fn vector_to(&self, other: &Coordinate) -> Vector2 {
        other.to_point() - self.to_point()
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point2> for Coordinate {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

// Coordinates entering a graph are validated as finite.
impl Eq for Coordinate {}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .partial_cmp(&other.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.y.partial_cmp(&other.y).unwrap_or(Ordering::Equal))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.z {
            Some(z) => write!(f, "({} {} {})", self.x, self.y, z),
            None => write!(f, "({} {})", self.x, self.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    #[test]
    fn equality_ignores_z() {
        assert_eq!(Coordinate::with_z(1.0, 2.0, 5.0), Coordinate::new(1.0, 2.0));
        assert_ne!(Coordinate::new(1.0, 2.0), Coordinate::new(1.0, 2.000_001));
    }

    #[test]
    fn negative_zero_equals_zero() {
        let a = Coordinate::new(-0.0, 0.0);
        let b = Coordinate::new(0.0, -0.0);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn ordering_is_x_then_y() {
        let mut pts = vec![
            Coordinate::new(1.0, 0.0),
            Coordinate::new(0.0, 5.0),
            Coordinate::new(0.0, 1.0),
        ];
        pts.sort();
        assert_eq!(pts[0], Coordinate::new(0.0, 1.0));
        assert_eq!(pts[1], Coordinate::new(0.0, 5.0));
        assert_eq!(pts[2], Coordinate::new(1.0, 0.0));
    }

    #[test]
    fn distance_basic() {
        let d = Coordinate::new(0.0, 0.0).distance(&Coordinate::new(3.0, 4.0));
        assert!((d - 5.0).abs() < TOLERANCE);
    }
}
