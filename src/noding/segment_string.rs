use super::SegmentNodeList;
use crate::math::{Coordinate, SegmentIntersection};

/// A polyline that can have intersection nodes recorded on it.
pub trait SegmentString {
    fn coordinates(&self) -> &[Coordinate];

    /// Records `pt` as a node on segment `segment_index`.
    ///
    /// Implementations must treat a point equal to the segment's end vertex as
    /// lying on the following segment; see [`normalized_segment_index`].
    fn add_intersection(&mut self, pt: Coordinate, segment_index: usize);

    fn is_closed(&self) -> bool {
        let pts = self.coordinates();
        pts.len() > 1 && pts[0] == pts[pts.len() - 1]
    }

    /// Records every point of `si` that lies on segment `segment_index`.
    fn add_intersections(&mut self, si: &SegmentIntersection, segment_index: usize) {
        for pt in si.points() {
            self.add_intersection(*pt, segment_index);
        }
    }
}

/// Index of the segment a node at `pt` belongs to: a point at the end vertex
/// of segment `i` is filed under segment `i + 1`.
#[must_use]
pub fn normalized_segment_index(pts: &[Coordinate], pt: &Coordinate, segment_index: usize) -> usize {
    match pts.get(segment_index + 1) {
        Some(next) if next == pt => segment_index + 1,
        _ => segment_index,
    }
}

/// A segment string owned by a noder, tagged with the index of whatever it
/// was created from.
#[derive(Debug, Clone)]
pub struct NodedSegmentString {
    pts: Vec<Coordinate>,
    context: usize,
    nodes: SegmentNodeList,
}

impl NodedSegmentString {
    #[must_use]
    pub fn new(pts: Vec<Coordinate>, context: usize) -> Self {
        Self {
            pts,
            context,
            nodes: SegmentNodeList::new(),
        }
    }

    /// The tag given at construction, inherited by every substring.
    #[must_use]
    pub fn context(&self) -> usize {
        self.context
    }

    #[must_use]
    pub fn nodes(&self) -> &SegmentNodeList {
        &self.nodes
    }

    #[must_use]
    pub fn into_coordinates(self) -> Vec<Coordinate> {
        self.pts
    }

    /// Splits this string at its nodes.
    #[must_use]
    pub fn into_substrings(mut self) -> Vec<NodedSegmentString> {
        let context = self.context;
        self.nodes
            .split(&self.pts)
            .into_iter()
            .map(|pts| NodedSegmentString::new(pts, context))
            .collect()
    }

    /// Splits every string at its nodes.
    #[must_use]
    pub fn noded_substrings(strings: Vec<NodedSegmentString>) -> Vec<NodedSegmentString> {
        strings
            .into_iter()
            .flat_map(NodedSegmentString::into_substrings)
            .collect()
    }
}

impl SegmentString for NodedSegmentString {
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

    fn pts(v: &[(f64, f64)]) -> Vec<Coordinate> {
        v.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn intersection_at_segment_end_is_normalized() {
        let mut ss = NodedSegmentString::new(pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]), 3);
        ss.add_intersection(Coordinate::new(2.0, 0.0), 0);
        let node = ss.nodes().iter().next().copied();
        assert_eq!(node.map(|n| n.segment_index), Some(1));
        assert_eq!(node.map(|n| n.is_interior()), Some(false));
    }

    #[test]
    fn substrings_inherit_context() {
        let mut ss = NodedSegmentString::new(pts(&[(0.0, 0.0), (4.0, 0.0)]), 9);
        ss.add_intersection(Coordinate::new(1.0, 0.0), 0);
        assert!(!ss.is_closed());
        let subs = ss.into_substrings();
        assert_eq!(subs.len(), 2);
        assert!(subs.iter().all(|s| s.context() == 9));
        assert_eq!(subs[1].coordinates(), pts(&[(1.0, 0.0), (4.0, 0.0)]).as_slice());
    }
}
