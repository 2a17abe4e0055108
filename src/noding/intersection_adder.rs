use super::{is_trivial_intersection, segment, SegmentIntersector, SegmentString};
use crate::math::{Coordinate, LineIntersector};

/// Computes the intersection of each candidate pair and records the points as
/// nodes on both strings.
#[derive(Debug, Default)]
pub struct IntersectionAdder {
    li: LineIntersector,
    tests: usize,
    intersections: usize,
    interior_intersections: Vec<Coordinate>,
    proper_intersections: usize,
}

impl IntersectionAdder {
    #[must_use]
    pub fn new(li: LineIntersector) -> Self {
        Self {
            li,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests
    }

    #[must_use]
    pub fn intersection_count(&self) -> usize {
        self.intersections
    }

    #[must_use]
    pub fn proper_intersection_count(&self) -> usize {
        self.proper_intersections
    }

    /// Points found strictly inside at least one of their segments.
    #[must_use]
    pub fn interior_intersections(&self) -> &[Coordinate] {
        &self.interior_intersections
    }

    #[must_use]
    pub fn has_proper_intersection(&self) -> bool {
        self.proper_intersections > 0
    }
}

impl<S: SegmentString> SegmentIntersector<S> for IntersectionAdder {
    fn process_intersections(
        &mut self,
        strings: &mut [S],
        a: usize,
        seg_a: usize,
        b: usize,
        seg_b: usize,
    ) {
        if a == b && seg_a == seg_b {
            return;
        }
        self.tests += 1;
        let (p0, p1) = segment(strings, a, seg_a);
        let (q0, q1) = segment(strings, b, seg_b);
        let si = self.li.compute(&p0, &p1, &q0, &q1);
        if !si.has_intersection() {
            return;
        }
        self.intersections += 1;
        if si.is_interior_intersection() {
            self.interior_intersections.extend_from_slice(si.points());
        }
        if is_trivial_intersection(strings[a].coordinates(), a == b, si.points().len(), seg_a, seg_b)
        {
            return;
        }
        strings[a].add_intersections(&si, seg_a);
        strings[b].add_intersections(&si, seg_b);
        if si.is_proper() {
            self.proper_intersections += 1;
        }
    }
}

/// Looks for an intersection point that is not a shared endpoint, i.e. a sign
/// that a set of strings is not fully noded.
#[derive(Debug, Default)]
pub struct InteriorIntersectionFinder {
    li: LineIntersector,
    find_all: bool,
    found: Vec<Coordinate>,
}

impl InteriorIntersectionFinder {
    /// Finder that stops at the first interior intersection.
    #[must_use]
    pub fn new(li: LineIntersector) -> Self {
        Self {
            li,
            find_all: false,
            found: Vec::new(),
        }
    }

    /// Finder that collects every interior intersection.
    #[must_use]
    pub fn find_all(li: LineIntersector) -> Self {
        Self {
            li,
            find_all: true,
            found: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_intersection(&self) -> bool {
        !self.found.is_empty()
    }

    #[must_use]
    pub fn intersections(&self) -> &[Coordinate] {
        &self.found
    }
}

impl<S: SegmentString> SegmentIntersector<S> for InteriorIntersectionFinder {
    fn process_intersections(
        &mut self,
        strings: &mut [S],
        a: usize,
        seg_a: usize,
        b: usize,
        seg_b: usize,
    ) {
        if a == b && seg_a == seg_b {
            return;
        }
        let (p0, p1) = segment(strings, a, seg_a);
        let (q0, q1) = segment(strings, b, seg_b);
        let si = self.li.compute(&p0, &p1, &q0, &q1);
        if si.has_intersection() && si.is_interior_intersection() {
            self.found.extend_from_slice(si.points());
        }
    }

    fn is_done(&self) -> bool {
        !self.find_all && self.has_intersection()
    }
}
