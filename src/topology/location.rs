use std::fmt;

/// Topological location of a point relative to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl Location {
    /// Row/column index in an intersection matrix.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Interior => 0,
            Self::Boundary => 1,
            Self::Exterior => 2,
        }
    }

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Interior => 'i',
            Self::Boundary => 'b',
            Self::Exterior => 'e',
        }
    }
}

/// Side of a directed edge a location applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    On,
    Left,
    Right,
}

impl Position {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::On => 0,
            Self::Left => 1,
            Self::Right => 2,
        }
    }

    /// Swaps left and right; `On` is its own opposite.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::On => Self::On,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Dimension of a point set, as used in intersection matrices.
///
/// Ordered so that `max` gives the larger dimension, with `False` (empty)
/// below everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Dimension {
    #[default]
    False,
    Point,
    Line,
    Area,
}

impl Dimension {
    /// Matrix symbol: `F`, `0`, `1` or `2`.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::False => 'F',
            Self::Point => '0',
            Self::Line => '1',
            Self::Area => '2',
        }
    }

    /// Parses a dimension symbol. `T` and `*` are pattern symbols, not values.
    #[must_use]
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'F' | 'f' => Some(Self::False),
            '0' => Some(Self::Point),
            '1' => Some(Self::Line),
            '2' => Some(Self::Area),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_order_and_symbols() {
        assert!(Dimension::False < Dimension::Point);
        assert!(Dimension::Line < Dimension::Area);
        assert_eq!(Dimension::Line.max(Dimension::Point), Dimension::Line);
        for d in [Dimension::False, Dimension::Point, Dimension::Line, Dimension::Area] {
            assert_eq!(Dimension::from_symbol(d.symbol()), Some(d));
        }
        assert_eq!(Dimension::from_symbol('T'), None);
    }

    #[test]
    fn position_opposite() {
        assert_eq!(Position::Left.opposite(), Position::Right);
        assert_eq!(Position::On.opposite(), Position::On);
    }
}
