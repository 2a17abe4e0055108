use std::cmp::Ordering;

use super::Quadrant;
use crate::error::TopologyError;
use crate::math::polygon_2d::orientation_index;
use crate::math::Coordinate;

/// The first segment of an edge leaving a node, used to sort the edges
/// around the node by angle.
#[derive(Debug, Clone, Copy)]
pub struct EdgeEnd {
    p0: Coordinate,
    p1: Coordinate,
    dx: f64,
    dy: f64,
    quadrant: Quadrant,
}

impl EdgeEnd {
    /// # Errors
    ///
    /// Returns a `TopologyError` if the two points coincide, since such an end
    /// has no direction.
    pub fn new(p0: Coordinate, p1: Coordinate) -> Result<Self, TopologyError> {
        if p0 == p1 {
            return Err(TopologyError::at("edge end has zero length", p0));
        }
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        Ok(Self {
            p0,
            p1,
            dx,
            dy,
            quadrant: Quadrant::of(dx, dy),
        })
    }

    /// The node the end leaves from.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.p0
    }

    #[must_use]
    pub fn direction_point(&self) -> Coordinate {
        self.p1
    }

    #[must_use]
    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    /// Counter-clockwise angular order starting from the positive x axis.
    ///
    /// Ends in different quadrants compare by quadrant; within a quadrant the
    /// exact orientation predicate decides.
    #[must_use]
    pub fn compare_direction(&self, other: &EdgeEnd) -> Ordering {
        if self.dx == other.dx && self.dy == other.dy {
            return Ordering::Equal;
        }
        match self.quadrant.cmp(&other.quadrant) {
            Ordering::Equal => orientation_index(&other.p0, &other.p1, &self.p1).cmp(&0),
            ord => ord,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn end(x: f64, y: f64) -> EdgeEnd {
        EdgeEnd::new(Coordinate::new(0.0, 0.0), Coordinate::new(x, y)).unwrap()
    }

    #[test]
    fn ends_sort_counter_clockwise() {
        let mut ends = vec![end(0.0, -1.0), end(-1.0, 0.0), end(1.0, 2.0), end(2.0, 1.0)];
        ends.sort_by(EdgeEnd::compare_direction);
        let dirs: Vec<(f64, f64)> = ends.iter().map(|e| (e.p1.x, e.p1.y)).collect();
        assert_eq!(dirs, vec![(2.0, 1.0), (1.0, 2.0), (-1.0, 0.0), (0.0, -1.0)]);
    }

    #[test]
    fn collinear_ends_compare_equal() {
        assert_eq!(end(1.0, 1.0).compare_direction(&end(2.0, 2.0)), Ordering::Equal);
        assert_eq!(end(1.0, 1.0).compare_direction(&end(-1.0, -1.0)), Ordering::Less);
    }

    #[test]
    fn zero_length_end_is_rejected() {
        let p = Coordinate::new(3.0, 3.0);
        assert!(EdgeEnd::new(p, p).is_err());
    }
}
