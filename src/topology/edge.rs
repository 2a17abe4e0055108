use super::{Depth, Label};
use crate::math::{Coordinate, Envelope};
use crate::noding::{normalized_segment_index, SegmentNodeList, SegmentString};

/// A chain of segments from one input geometry, with the nodes found on it
/// during noding and its location relative to both inputs.
#[derive(Debug, Clone)]
pub struct Edge {
    pts: Vec<Coordinate>,
    pub label: Label,
    nodes: SegmentNodeList,
    pub depth: Depth,
    isolated: bool,
    covered: Option<bool>,
    in_result: bool,
}

impl Edge {
    #[must_use]
    pub fn new(pts: Vec<Coordinate>, label: Label) -> Self {
        Self {
            pts,
            label,
            nodes: SegmentNodeList::new(),
            depth: Depth::new(),
            isolated: true,
            covered: None,
            in_result: false,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.pts[0]
    }

    #[must_use]
    pub fn nodes(&self) -> &SegmentNodeList {
        &self.nodes
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::of_coords(&self.pts)
    }

    /// An edge is isolated until it meets an edge of the other geometry.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    pub fn set_isolated(&mut self, isolated: bool) {
        self.isolated = isolated;
    }

    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.covered.unwrap_or(false)
    }

    #[must_use]
    pub fn is_covered_set(&self) -> bool {
        self.covered.is_some()
    }

    pub fn set_covered(&mut self, covered: bool) {
        self.covered = Some(covered);
    }

    #[must_use]
    pub fn is_in_result(&self) -> bool {
        self.in_result
    }

    pub fn set_in_result(&mut self, in_result: bool) {
        self.in_result = in_result;
    }

    /// Splits the edge at its nodes. Every piece inherits this edge's label.
    pub fn split_at_nodes(&mut self) -> Vec<Edge> {
        let label = self.label;
        self.nodes
            .split_at_nodes(&self.pts)
            .into_iter()
            .map(|pts| Edge::new(pts, label))
            .collect()
    }

    /// Coordinates of the pieces between nodes, leaving the edge untouched.
    #[must_use]
    pub fn node_pieces(&self) -> Vec<Vec<Coordinate>> {
        self.nodes.clone().split_at_nodes(&self.pts)
    }

    /// An area edge that runs out and straight back (`a-b-a`) has collapsed
    /// to a line.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.label.is_area() && self.pts.len() == 3 && self.pts[0] == self.pts[2]
    }

    /// The line edge replacing a collapsed area edge.
    #[must_use]
    pub fn collapsed_edge(&self) -> Edge {
        Edge::new(self.pts[..2].to_vec(), Label::to_line_label(&self.label))
    }

    #[must_use]
    pub fn is_pointwise_equal(&self, other: &Edge) -> bool {
        self.pts == other.pts
    }

    /// The coordinates read in their canonical direction, so that an edge and
    /// its reverse produce the same key.
    #[must_use]
    pub fn oriented_key(&self) -> Vec<Coordinate> {
        let n = self.pts.len();
        let forward = (0..n / 2)
            .map(|i| self.pts[i].cmp(&self.pts[n - 1 - i]))
            .find(|ord| ord.is_ne())
            .map_or(true, std::cmp::Ordering::is_lt);
        if forward {
            self.pts.clone()
        } else {
            self.pts.iter().rev().copied().collect()
        }
    }
}

impl SegmentString for Edge {
    fn coordinates(&self) -> &[Coordinate] {
        &self.pts
    }

    fn add_intersection(&mut self, pt: Coordinate, segment_index: usize) {
        let index = normalized_segment_index(&self.pts, &pt, segment_index);
        self.nodes.add(&self.pts, pt, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Location;

    fn pts(v: &[(f64, f64)]) -> Vec<Coordinate> {
        v.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn split_pieces_inherit_label() {
        let label = Label::line_for(1, Location::Interior);
        let mut edge = Edge::new(pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]), label);
        edge.add_intersection(Coordinate::new(2.0, 0.0), 0);
        edge.add_intersection(Coordinate::new(4.0, 0.0), 0);
        assert_eq!(edge.node_pieces().len(), 3);
        let pieces = edge.split_at_nodes();
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[1].coordinates(), pts(&[(2.0, 0.0), (4.0, 0.0)]).as_slice());
        assert!(pieces.iter().all(|e| e.label == label));
    }

    #[test]
    fn oriented_key_ignores_direction() {
        let label = Label::line(None);
        let a = Edge::new(pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]), label);
        let b = Edge::new(pts(&[(2.0, 0.0), (1.0, 1.0), (0.0, 0.0)]), label);
        assert_eq!(a.oriented_key(), b.oriented_key());
        assert!(!a.is_pointwise_equal(&b));
    }

    #[test]
    fn collapsed_area_edge_becomes_line() {
        let label = Label::area_for(0, Location::Boundary, Location::Exterior, Location::Interior);
        let edge = Edge::new(pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]), label);
        assert!(edge.is_collapsed());
        let line = edge.collapsed_edge();
        assert!(!line.label.is_area());
        assert_eq!(line.label.on(0), Some(Location::Boundary));
        assert_eq!(line.coordinates().len(), 2);
    }
}
