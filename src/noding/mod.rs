//! Segment noding: finding every intersection among a set of segment strings
//! and splitting the strings there, so that segments only meet at endpoints.

mod intersection_adder;
mod mc_noder;
mod segment_node;
mod segment_string;
mod snap_round;
mod validator;

pub use intersection_adder::{IntersectionAdder, InteriorIntersectionFinder};
pub use mc_noder::{McIndexNoder, SimpleNoder};
pub use segment_node::{compare_along_segment, octant, SegmentNode, SegmentNodeList};
pub use segment_string::{normalized_segment_index, NodedSegmentString, SegmentString};
pub use snap_round::{HotPixel, SnapRoundingNoder};
pub use validator::NodingValidator;

use crate::error::TopologyError;

/// Visits candidate segment pairs found by a noder.
///
/// Segments are identified by string index into `strings` and segment index
/// within that string.
pub trait SegmentIntersector<S: SegmentString> {
    fn process_intersections(
        &mut self,
        strings: &mut [S],
        a: usize,
        seg_a: usize,
        b: usize,
        seg_b: usize,
    );

    /// Stops the search early once `true`.
    fn is_done(&self) -> bool {
        false
    }

    /// String-level filter applied before any segments of `a` and `b` are tested.
    fn accepts_pair(&self, _a: usize, _b: usize) -> bool {
        true
    }
}

/// Turns a set of segment strings into a fully noded set.
pub trait Noder {
    /// Nodes `strings`, returning the split substrings. Each substring keeps the
    /// context tag of the string it came from.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if the noder cannot produce a consistent result.
    fn node(
        &mut self,
        strings: Vec<NodedSegmentString>,
    ) -> Result<Vec<NodedSegmentString>, TopologyError>;
}

/// Returns `true` if the intersection of two segments of the same string is
/// just the vertex they share.
pub(crate) fn is_trivial_intersection(
    pts: &[crate::math::Coordinate],
    same_string: bool,
    point_count: usize,
    seg_a: usize,
    seg_b: usize,
) -> bool {
    if !same_string || point_count != 1 {
        return false;
    }
    if seg_a.abs_diff(seg_b) == 1 {
        return true;
    }
    let closed = pts.len() > 1 && pts[0] == pts[pts.len() - 1];
    if closed {
        let last = pts.len() - 2;
        if (seg_a == 0 && seg_b == last) || (seg_b == 0 && seg_a == last) {
            return true;
        }
    }
    false
}

/// Reads the two endpoints of segment `seg` of a string.
pub(crate) fn segment<S: SegmentString>(
    strings: &[S],
    string: usize,
    seg: usize,
) -> (crate::math::Coordinate, crate::math::Coordinate) {
    let pts = strings[string].coordinates();
    (pts[seg], pts[seg + 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Coordinate;

    #[test]
    fn trivial_intersections() {
        let ring: Vec<Coordinate> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]
            .iter()
            .map(|&p| p.into())
            .collect();
        assert!(is_trivial_intersection(&ring, true, 1, 0, 1));
        assert!(is_trivial_intersection(&ring, true, 1, 2, 0));
        assert!(!is_trivial_intersection(&ring, false, 1, 0, 1));
        assert!(!is_trivial_intersection(&ring, true, 2, 0, 1));
    }
}
