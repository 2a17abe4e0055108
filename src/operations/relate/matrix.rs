use std::fmt;
use std::str::FromStr;

use crate::error::GeometryError;
use crate::topology::{Dimension, Location};

const LOCATIONS: [Location; 3] = [Location::Interior, Location::Boundary, Location::Exterior];

/// A DE-9IM matrix: the dimension of the intersection of the interior,
/// boundary and exterior of geometry A (rows) with those of geometry B
/// (columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntersectionMatrix {
    m: [[Dimension; 3]; 3],
}

impl IntersectionMatrix {
    /// A matrix with every entry `F`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, a: Location, b: Location) -> Dimension {
        self.m[a.index()][b.index()]
    }

    pub fn set(&mut self, a: Location, b: Location, dim: Dimension) {
        self.m[a.index()][b.index()] = dim;
    }

    /// Raises an entry to `dim` if it is currently smaller.
    pub fn set_at_least(&mut self, a: Location, b: Location, dim: Dimension) {
        let entry = &mut self.m[a.index()][b.index()];
        if *entry < dim {
            *entry = dim;
        }
    }

    /// As [`set_at_least`](Self::set_at_least), ignoring unknown locations.
    pub fn set_at_least_if_valid(&mut self, a: Option<Location>, b: Option<Location>, dim: Dimension) {
        if let (Some(a), Some(b)) = (a, b) {
            self.set_at_least(a, b, dim);
        }
    }

    /// Raises every entry to the minimum given by a 9-character pattern.
    /// `F`, `T` and `*` impose no minimum.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidPattern` for a malformed pattern.
    pub fn set_at_least_pattern(&mut self, pattern: &str) -> Result<(), GeometryError> {
        let symbols = pattern_symbols(pattern)?;
        for (i, c) in symbols.into_iter().enumerate() {
            if let Some(dim) = Dimension::from_symbol(c) {
                self.set_at_least(LOCATIONS[i / 3], LOCATIONS[i % 3], dim);
            }
        }
        Ok(())
    }

    /// The matrix with the roles of A and B swapped.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut t = Self::new();
        for a in LOCATIONS {
            for b in LOCATIONS {
                t.set(b, a, self.get(a, b));
            }
        }
        t
    }

    /// Tests the matrix against a pattern over `T`, `F`, `*`, `0`, `1`, `2`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidPattern` for a malformed pattern.
    pub fn matches(&self, pattern: &str) -> Result<bool, GeometryError> {
        let symbols = pattern_symbols(pattern)?;
        Ok(symbols
            .into_iter()
            .enumerate()
            .all(|(i, c)| matches_symbol(self.m[i / 3][i % 3], c)))
    }

    fn is_true(&self, a: Location, b: Location) -> bool {
        self.get(a, b) != Dimension::False
    }

    fn is_false(&self, a: Location, b: Location) -> bool {
        self.get(a, b) == Dimension::False
    }

    /// `FF*FF****`
    #[must_use]
    pub fn is_disjoint(&self) -> bool {
        use Location::{Boundary, Interior};
        self.is_false(Interior, Interior)
            && self.is_false(Interior, Boundary)
            && self.is_false(Boundary, Interior)
            && self.is_false(Boundary, Boundary)
    }

    #[must_use]
    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    /// The geometries meet only at their boundaries. Undefined, and so
    /// `false`, when both are points.
    #[must_use]
    pub fn is_touches(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::{Boundary, Interior};
        if dim_a > dim_b {
            return self.transpose().is_touches(dim_b, dim_a);
        }
        let defined = matches!(
            (dim_a, dim_b),
            (Dimension::Area, Dimension::Area)
                | (Dimension::Line, Dimension::Line | Dimension::Area)
                | (Dimension::Point, Dimension::Line | Dimension::Area)
        );
        defined
            && self.is_false(Interior, Interior)
            && (self.is_true(Interior, Boundary)
                || self.is_true(Boundary, Interior)
                || self.is_true(Boundary, Boundary))
    }

    #[must_use]
    pub fn is_crosses(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Dimension::{Area, Line, Point};
        use Location::{Exterior, Interior};
        match (dim_a, dim_b) {
            (Point, Line | Area) | (Line, Area) => {
                self.is_true(Interior, Interior) && self.is_true(Interior, Exterior)
            }
            (Line | Area, Point) | (Area, Line) => {
                self.is_true(Interior, Interior) && self.is_true(Exterior, Interior)
            }
            (Line, Line) => self.get(Interior, Interior) == Point,
            _ => false,
        }
    }

    /// `T*F**F***`
    #[must_use]
    pub fn is_within(&self) -> bool {
        use Location::{Boundary, Exterior, Interior};
        self.is_true(Interior, Interior)
            && self.is_false(Interior, Exterior)
            && self.is_false(Boundary, Exterior)
    }

    /// `T*****FF*`
    #[must_use]
    pub fn is_contains(&self) -> bool {
        use Location::{Boundary, Exterior, Interior};
        self.is_true(Interior, Interior)
            && self.is_false(Exterior, Interior)
            && self.is_false(Exterior, Boundary)
    }

    fn has_point_in_common(&self) -> bool {
        use Location::{Boundary, Interior};
        self.is_true(Interior, Interior)
            || self.is_true(Interior, Boundary)
            || self.is_true(Boundary, Interior)
            || self.is_true(Boundary, Boundary)
    }

    #[must_use]
    pub fn is_covers(&self) -> bool {
        use Location::{Boundary, Exterior, Interior};
        self.has_point_in_common()
            && self.is_false(Exterior, Interior)
            && self.is_false(Exterior, Boundary)
    }

    #[must_use]
    pub fn is_covered_by(&self) -> bool {
        use Location::{Boundary, Exterior, Interior};
        self.has_point_in_common()
            && self.is_false(Interior, Exterior)
            && self.is_false(Boundary, Exterior)
    }

    /// Topological equality; `false` for geometries of different dimension.
    #[must_use]
    pub fn is_equals(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        dim_a == dim_b && self.is_within() && self.is_contains()
    }

    #[must_use]
    pub fn is_overlaps(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::{Exterior, Interior};
        let outside_each_other =
            self.is_true(Interior, Exterior) && self.is_true(Exterior, Interior);
        match (dim_a, dim_b) {
            (Dimension::Point, Dimension::Point) | (Dimension::Area, Dimension::Area) => {
                self.is_true(Interior, Interior) && outside_each_other
            }
            (Dimension::Line, Dimension::Line) => {
                self.get(Interior, Interior) == Dimension::Line && outside_each_other
            }
            _ => false,
        }
    }
}

fn pattern_symbols(pattern: &str) -> Result<Vec<char>, GeometryError> {
    let symbols: Vec<char> = pattern.chars().map(|c| c.to_ascii_uppercase()).collect();
    if symbols.len() != 9 || !symbols.iter().all(|c| "TF*012".contains(*c)) {
        return Err(GeometryError::InvalidPattern(pattern.to_owned()));
    }
    Ok(symbols)
}

fn matches_symbol(actual: Dimension, required: char) -> bool {
    match required {
        '*' => true,
        'T' => actual != Dimension::False,
        c => Dimension::from_symbol(c) == Some(actual),
    }
}

impl fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.m {
            for dim in row {
                write!(f, "{dim}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for IntersectionMatrix {
    type Err = GeometryError;

    /// Parses a 9-character matrix over `F`, `0`, `1`, `2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols = pattern_symbols(s)?;
        let mut im = Self::new();
        for (i, c) in symbols.into_iter().enumerate() {
            let dim = Dimension::from_symbol(c)
                .ok_or_else(|| GeometryError::InvalidPattern(s.to_owned()))?;
            im.m[i / 3][i % 3] = dim;
        }
        Ok(im)
    }
}
