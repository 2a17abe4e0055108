use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::math::Coordinate;

/// Octant (0..8) of a segment direction, numbered counter-clockwise from the
/// positive x axis with each quadrant split at its diagonal.
#[must_use]
pub fn octant(dx: f64, dy: f64) -> u8 {
    let adx = dx.abs();
    let ady = dy.abs();
    match (dx >= 0.0, dy >= 0.0, adx >= ady) {
        (true, true, true) => 0,
        (true, true, false) => 1,
        (false, true, false) => 2,
        (false, true, true) => 3,
        (false, false, true) => 4,
        (false, false, false) => 5,
        (true, false, false) => 6,
        (true, false, true) => 7,
    }
}

/// Octant of the segment starting at `pts[index]`, `None` past the last segment.
fn segment_octant(pts: &[Coordinate], index: usize) -> Option<u8> {
    let next = pts.get(index + 1)?;
    let p = pts[index];
    if p == *next {
        return Some(0);
    }
    Some(octant(next.x - p.x, next.y - p.y))
}

fn relative_sign(a: f64, b: f64) -> i8 {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => -1,
        Some(Ordering::Greater) => 1,
        _ => 0,
    }
}

fn compare_signs(primary: i8, secondary: i8) -> Ordering {
    primary.cmp(&0).then(secondary.cmp(&0))
}

/// Orders two distinct points lying on one segment by their distance along
/// the segment direction.
///
/// Uses only ordinate comparisons, keyed by the segment octant, so the order
/// is exact and needs no distance computation.
#[must_use]
pub fn compare_along_segment(octant: u8, p0: &Coordinate, p1: &Coordinate) -> Ordering {
    if p0 == p1 {
        return Ordering::Equal;
    }
    let xs = relative_sign(p0.x, p1.x);
    let ys = relative_sign(p0.y, p1.y);
    match octant {
        0 => compare_signs(xs, ys),
        1 => compare_signs(ys, xs),
        2 => compare_signs(ys, -xs),
        3 => compare_signs(-xs, ys),
        4 => compare_signs(-xs, -ys),
        5 => compare_signs(-ys, -xs),
        6 => compare_signs(-ys, xs),
        _ => compare_signs(xs, -ys),
    }
}

/// An intersection point recorded on a segment string.
#[derive(Debug, Clone, Copy)]
pub struct SegmentNode {
    pub coord: Coordinate,
    /// Index of the segment containing the node; a node at a vertex uses the
    /// index of the segment starting there.
    pub segment_index: usize,
    octant: Option<u8>,
    interior: bool,
}

impl SegmentNode {
    /// Returns `true` if the node lies strictly inside its segment.
    #[must_use]
    pub fn is_interior(&self) -> bool {
        self.interior
    }
}

impl PartialEq for SegmentNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SegmentNode {}

impl PartialOrd for SegmentNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SegmentNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segment_index
            .cmp(&other.segment_index)
            .then_with(|| {
                if self.coord == other.coord {
                    Ordering::Equal
                } else if !self.interior {
                    Ordering::Less
                } else if !other.interior {
                    Ordering::Greater
                } else {
                    compare_along_segment(self.octant.unwrap_or(0), &self.coord, &other.coord)
                }
            })
    }
}

/// The ordered set of nodes on one segment string.
#[derive(Debug, Clone, Default)]
pub struct SegmentNodeList {
    nodes: BTreeSet<SegmentNode>,
}

impl SegmentNodeList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a node on segment `segment_index` of `pts`. Duplicates are ignored.
    pub fn add(&mut self, pts: &[Coordinate], coord: Coordinate, segment_index: usize) {
        let node = SegmentNode {
            coord,
            segment_index,
            octant: segment_octant(pts, segment_index),
            interior: pts.get(segment_index) != Some(&coord),
        };
        self.nodes.insert(node);
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentNode> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Splits `pts` at every node, returning the coordinate lists of the pieces.
    ///
    /// The endpoints are always nodes, and so is any vertex where the string
    /// folds back on itself (`a-b-a`), which keeps every piece free of
    /// zero-area spikes.
    pub fn split(&mut self, pts: &[Coordinate]) -> Vec<Vec<Coordinate>> {
        if pts.len() < 2 {
            return Vec::new();
        }
        let last = pts.len() - 1;
        self.add(pts, pts[0], 0);
        self.add(pts, pts[last], last);
        for index in self.collapsed_vertex_indexes(pts) {
            self.add(pts, pts[index], index);
        }
        self.split_at_nodes(pts)
    }

    /// Splits `pts` at its endpoints and recorded nodes only.
    pub fn split_at_nodes(&mut self, pts: &[Coordinate]) -> Vec<Vec<Coordinate>> {
        if pts.len() < 2 {
            return Vec::new();
        }
        let last = pts.len() - 1;
        self.add(pts, pts[0], 0);
        self.add(pts, pts[last], last);
        let nodes: Vec<SegmentNode> = self.nodes.iter().copied().collect();
        nodes
            .windows(2)
            .map(|pair| split_piece(pts, &pair[0], &pair[1]))
            .collect()
    }

    fn collapsed_vertex_indexes(&self, pts: &[Coordinate]) -> Vec<usize> {
        let mut indexes = Vec::new();
        let nodes: Vec<&SegmentNode> = self.nodes.iter().collect();
        for pair in nodes.windows(2) {
            let (n0, n1) = (pair[0], pair[1]);
            if n0.coord != n1.coord {
                continue;
            }
            let mut between = n1.segment_index - n0.segment_index;
            if !n1.interior {
                between = between.saturating_sub(1);
            }
            if between == 1 {
                indexes.push(n0.segment_index + 1);
            }
        }
        for i in 0..pts.len().saturating_sub(2) {
            if pts[i] == pts[i + 2] {
                indexes.push(i + 1);
            }
        }
        indexes
    }
}

fn split_piece(pts: &[Coordinate], n0: &SegmentNode, n1: &SegmentNode) -> Vec<Coordinate> {
    let last_seg_start = pts[n1.segment_index];
    let use_end = n1.interior || n1.coord != last_seg_start;
    let mut piece = Vec::with_capacity(n1.segment_index - n0.segment_index + 2);
    piece.push(n0.coord);
    piece.extend_from_slice(&pts[n0.segment_index + 1..=n1.segment_index]);
    if use_end {
        piece.push(n1.coord);
    }
    piece
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(f64, f64)]) -> Vec<Coordinate> {
        v.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn octants_cover_all_directions() {
        assert_eq!(octant(2.0, 1.0), 0);
        assert_eq!(octant(1.0, 2.0), 1);
        assert_eq!(octant(-1.0, 2.0), 2);
        assert_eq!(octant(-2.0, 1.0), 3);
        assert_eq!(octant(-2.0, -1.0), 4);
        assert_eq!(octant(-1.0, -2.0), 5);
        assert_eq!(octant(1.0, -2.0), 6);
        assert_eq!(octant(2.0, -1.0), 7);
    }

    #[test]
    fn comparator_follows_segment_direction() {
        let a = Coordinate::new(1.0, 1.0);
        let b = Coordinate::new(2.0, 2.0);
        // Heading north-east: a comes first.
        assert_eq!(compare_along_segment(0, &a, &b), Ordering::Less);
        // Heading south-west: b comes first.
        assert_eq!(compare_along_segment(4, &a, &b), Ordering::Greater);
        let c = Coordinate::new(0.0, 5.0);
        let d = Coordinate::new(0.0, 3.0);
        // Heading south (octant 5): c is reached first.
        assert_eq!(compare_along_segment(5, &c, &d), Ordering::Less);
    }

    #[test]
    fn split_at_interior_nodes() {
        let line = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, Coordinate::new(7.0, 0.0), 0);
        nodes.add(&line, Coordinate::new(3.0, 0.0), 0);
        nodes.add(&line, Coordinate::new(10.0, 5.0), 1);
        let pieces = nodes.split(&line);
        assert_eq!(pieces.len(), 4);
        assert_eq!(pieces[0], pts(&[(0.0, 0.0), (3.0, 0.0)]));
        assert_eq!(pieces[1], pts(&[(3.0, 0.0), (7.0, 0.0)]));
        assert_eq!(pieces[2], pts(&[(7.0, 0.0), (10.0, 0.0), (10.0, 5.0)]));
        assert_eq!(pieces[3], pts(&[(10.0, 5.0), (10.0, 10.0)]));
    }

    #[test]
    fn vertex_node_does_not_duplicate_point() {
        let line = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, Coordinate::new(5.0, 0.0), 1);
        let pieces = nodes.split(&line);
        assert_eq!(pieces, vec![pts(&[(0.0, 0.0), (5.0, 0.0)]), pts(&[(5.0, 0.0), (10.0, 0.0)])]);
    }

    #[test]
    fn duplicate_nodes_collapse() {
        let line = pts(&[(0.0, 0.0), (10.0, 0.0)]);
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, Coordinate::new(4.0, 0.0), 0);
        nodes.add(&line, Coordinate::new(4.0, 0.0), 0);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn fold_back_vertex_becomes_node() {
        let line = pts(&[(0.0, 0.0), (5.0, 0.0), (0.0, 0.0), (0.0, 5.0)]);
        let mut nodes = SegmentNodeList::new();
        let pieces = nodes.split(&line);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], pts(&[(0.0, 0.0), (5.0, 0.0)]));
        assert_eq!(pieces[1], pts(&[(5.0, 0.0), (0.0, 0.0), (0.0, 5.0)]));
    }

    #[test]
    fn split_at_nodes_keeps_fold_backs() {
        let line = pts(&[(0.0, 0.0), (5.0, 0.0), (0.0, 0.0), (0.0, 5.0)]);
        let mut nodes = SegmentNodeList::new();
        let pieces = nodes.split_at_nodes(&line);
        assert_eq!(pieces, vec![line.clone()]);
    }
}
