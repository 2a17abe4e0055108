use rstar::AABB;

use super::Coordinate;

/// Axis-aligned bounding box with a representable empty ("null") state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::null()
    }
}

impl Envelope {
    /// The empty envelope; it contains and intersects nothing.
    #[must_use]
    pub fn null() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Envelope spanning two corner points given in any order.
    #[must_use]
    pub fn from_points(p: &Coordinate, q: &Coordinate) -> Self {
        Self {
            min_x: p.x.min(q.x),
            min_y: p.y.min(q.y),
            max_x: p.x.max(q.x),
            max_y: p.y.max(q.y),
        }
    }

    /// Smallest envelope containing every coordinate.
    pub fn of_coords<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Self {
        let mut env = Self::null();
        for c in coords {
            env.expand_to_include(c);
        }
        env
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.max_x < self.min_x
    }

    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Area of the box, zero when null.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn expand_to_include(&mut self, c: &Coordinate) {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
    }

    pub fn expand_to_include_envelope(&mut self, other: &Envelope) {
        if other.is_null() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Grows the box by `distance` on every side.
    #[must_use]
    pub fn expanded_by(&self, distance: f64) -> Self {
        if self.is_null() {
            return *self;
        }
        Self {
            min_x: self.min_x - distance,
            min_y: self.min_y - distance,
            max_x: self.max_x + distance,
            max_y: self.max_y + distance,
        }
    }

    /// Closed-box intersection test.
    #[must_use]
    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    /// Returns `true` if `c` lies in the closed box.
    #[must_use]
    pub fn covers_point(&self, c: &Coordinate) -> bool {
        !self.is_null()
            && c.x >= self.min_x
            && c.x <= self.max_x
            && c.y >= self.min_y
            && c.y <= self.max_y
    }

    /// Returns `true` if `other` lies entirely in the closed box.
    #[must_use]
    pub fn covers(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Largest absolute ordinate value in the box.
    #[must_use]
    pub fn max_magnitude(&self) -> f64 {
        if self.is_null() {
            return 0.0;
        }
        self.min_x
            .abs()
            .max(self.max_x.abs())
            .max(self.min_y.abs())
            .max(self.max_y.abs())
    }

    /// Tests whether `q` lies in the box spanned by segment `p1`-`p2`.
    #[must_use]
    pub fn segment_covers(p1: &Coordinate, p2: &Coordinate, q: &Coordinate) -> bool {
        q.x >= p1.x.min(p2.x) && q.x <= p1.x.max(p2.x) && q.y >= p1.y.min(p2.y) && q.y <= p1.y.max(p2.y)
    }

    /// Tests whether the boxes of segments `p1`-`p2` and `q1`-`q2` meet.
    #[must_use]
    pub fn segments_overlap(
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) -> bool {
        let min_q = q1.x.min(q2.x);
        let max_q = q1.x.max(q2.x);
        let min_p = p1.x.min(p2.x);
        let max_p = p1.x.max(p2.x);
        if min_p > max_q || max_p < min_q {
            return false;
        }
        let min_q = q1.y.min(q2.y);
        let max_q = q1.y.max(q2.y);
        let min_p = p1.y.min(p2.y);
        let max_p = p1.y.max(p2.y);
        !(min_p > max_q || max_p < min_q)
    }

    /// Converts to an R-tree bounding box. A null envelope maps to an inverted box
    /// that intersects nothing.
    #[must_use]
    pub fn to_aabb(&self) -> AABB<[f64; 2]> {
        if self.is_null() {
            return AABB::from_corners([f64::MAX, f64::MAX], [f64::MAX, f64::MAX]);
        }
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn null_envelope_intersects_nothing() {
        let null = Envelope::null();
        let unit = Envelope::from_points(&c(0.0, 0.0), &c(1.0, 1.0));
        assert!(null.is_null());
        assert!(!null.intersects(&unit));
        assert!(!unit.intersects(&null));
        assert!(!null.covers_point(&c(0.0, 0.0)));
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = Envelope::from_points(&c(0.0, 0.0), &c(1.0, 1.0));
        let b = Envelope::from_points(&c(1.0, 0.0), &c(2.0, 1.0));
        let far = Envelope::from_points(&c(1.5, 0.0), &c(2.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&far));
    }

    #[test]
    fn expand_and_cover() {
        let env = Envelope::of_coords(&[c(2.0, 3.0), c(-1.0, 5.0), c(0.0, 0.0)]);
        assert!((env.width() - 3.0).abs() < f64::EPSILON);
        assert!((env.height() - 5.0).abs() < f64::EPSILON);
        assert!(env.covers(&Envelope::from_points(&c(0.0, 1.0), &c(1.0, 2.0))));
        assert!(!env.covers(&Envelope::from_points(&c(0.0, 1.0), &c(3.0, 2.0))));
        assert!((env.max_magnitude() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn segment_box_tests() {
        assert!(Envelope::segment_covers(&c(0.0, 0.0), &c(2.0, 2.0), &c(1.0, 0.5)));
        assert!(!Envelope::segment_covers(&c(0.0, 0.0), &c(2.0, 2.0), &c(3.0, 0.5)));
        assert!(Envelope::segments_overlap(
            &c(0.0, 0.0),
            &c(2.0, 2.0),
            &c(2.0, 0.0),
            &c(0.0, 2.0)
        ));
        assert!(!Envelope::segments_overlap(
            &c(0.0, 0.0),
            &c(1.0, 1.0),
            &c(2.0, 0.0),
            &c(3.0, 2.0)
        ));
    }
}
