use super::Edge;
use crate::math::{Coordinate, LineIntersector};
use crate::noding::{is_trivial_intersection, segment, SegmentIntersector, SegmentString};

/// Which edge pairs an intersector looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Edges of one graph against each other; with `test_all` an edge is also
    /// tested against itself.
    SelfNodes { test_all: bool },
    /// Edges `[0, split)` of one graph against edges `[split, ..)` of the other.
    Across { split: usize },
}

/// What an intersection pass found.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntersectionSummary {
    pub intersections: usize,
    pub has_proper: bool,
    /// A proper intersection that is not at a boundary node of either graph.
    pub has_proper_interior: bool,
    pub proper_point: Option<Coordinate>,
}

/// Records intersections between graph edges as edge nodes.
#[derive(Debug)]
pub struct GraphIntersector {
    li: LineIntersector,
    include_proper: bool,
    record_isolated: bool,
    pairing: Pairing,
    boundary_nodes: Vec<Coordinate>,
    tests: usize,
    summary: IntersectionSummary,
}

impl GraphIntersector {
    #[must_use]
    pub fn new(
        li: LineIntersector,
        include_proper: bool,
        record_isolated: bool,
        pairing: Pairing,
    ) -> Self {
        Self {
            li,
            include_proper,
            record_isolated,
            pairing,
            boundary_nodes: Vec::new(),
            tests: 0,
            summary: IntersectionSummary::default(),
        }
    }

    #[must_use]
    pub fn with_boundary_nodes(mut self, nodes: Vec<Coordinate>) -> Self {
        self.boundary_nodes = nodes;
        self
    }

    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests
    }

    #[must_use]
    pub fn summary(&self) -> IntersectionSummary {
        self.summary
    }

    fn is_boundary_point(&self, pts: &[Coordinate]) -> bool {
        pts.iter().any(|p| self.boundary_nodes.contains(p))
    }
}

impl SegmentIntersector<Edge> for GraphIntersector {
    fn process_intersections(
        &mut self,
        edges: &mut [Edge],
        a: usize,
        seg_a: usize,
        b: usize,
        seg_b: usize,
    ) {
        if a == b && seg_a == seg_b {
            return;
        }
        self.tests += 1;
        let (p0, p1) = segment(edges, a, seg_a);
        let (q0, q1) = segment(edges, b, seg_b);
        let si = self.li.compute(&p0, &p1, &q0, &q1);
        if !si.has_intersection() {
            return;
        }
        if self.record_isolated {
            edges[a].set_isolated(false);
            edges[b].set_isolated(false);
        }
        self.summary.intersections += 1;
        if is_trivial_intersection(edges[a].coordinates(), a == b, si.points().len(), seg_a, seg_b) {
            return;
        }
        if self.include_proper || !si.is_proper() {
            edges[a].add_intersections(&si, seg_a);
            edges[b].add_intersections(&si, seg_b);
        }
        if si.is_proper() {
            self.summary.has_proper = true;
            self.summary.proper_point = si.points().first().copied();
            if !self.is_boundary_point(si.points()) {
                self.summary.has_proper_interior = true;
            }
        }
    }

    fn accepts_pair(&self, a: usize, b: usize) -> bool {
        match self.pairing {
            Pairing::SelfNodes { test_all } => test_all || a != b,
            Pairing::Across { split } => (a < split) != (b < split),
        }
    }
}
