/// Quadrant of a direction vector, numbered counter-clockwise from the
/// positive x axis.
///
/// Directions on an axis belong to the quadrant counter-clockwise of it,
/// except that the negative y axis belongs to `SouthEast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quadrant {
    NorthEast,
    NorthWest,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    /// Quadrant of the vector `(dx, dy)`. A zero vector maps to `NorthEast`.
    #[must_use]
    pub fn of(dx: f64, dy: f64) -> Self {
        match (dx >= 0.0, dy >= 0.0) {
            (true, true) => Self::NorthEast,
            (true, false) => Self::SouthEast,
            (false, true) => Self::NorthWest,
            (false, false) => Self::SouthWest,
        }
    }

    #[must_use]
    pub fn is_northern(self) -> bool {
        matches!(self, Self::NorthEast | Self::NorthWest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrants_of_axes_and_diagonals() {
        assert_eq!(Quadrant::of(1.0, 1.0), Quadrant::NorthEast);
        assert_eq!(Quadrant::of(-1.0, 1.0), Quadrant::NorthWest);
        assert_eq!(Quadrant::of(-1.0, -1.0), Quadrant::SouthWest);
        assert_eq!(Quadrant::of(1.0, -1.0), Quadrant::SouthEast);
        assert_eq!(Quadrant::of(1.0, 0.0), Quadrant::NorthEast);
        assert_eq!(Quadrant::of(0.0, -1.0), Quadrant::SouthEast);
        assert_eq!(Quadrant::of(-1.0, 0.0), Quadrant::NorthWest);
        assert!(Quadrant::NorthWest.is_northern());
        assert!(Quadrant::NorthEast < Quadrant::SouthEast);
    }
}
