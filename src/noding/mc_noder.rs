use tracing::debug;

use super::{
    IntersectionAdder, NodedSegmentString, Noder, SegmentIntersector, SegmentString,
};
use crate::error::TopologyError;
use crate::index::{build_chains, EnvelopeIndex, MonotoneChain};
use crate::math::LineIntersector;

/// Noder that prunes segment pairs with monotone chains held in a spatial index.
#[derive(Debug, Default)]
pub struct McIndexNoder {
    li: LineIntersector,
    overlap_tests: usize,
}

impl McIndexNoder {
    #[must_use]
    pub fn new(li: LineIntersector) -> Self {
        Self { li, overlap_tests: 0 }
    }

    /// Number of candidate segment pairs handed to intersectors so far.
    #[must_use]
    pub fn overlap_tests(&self) -> usize {
        self.overlap_tests
    }

    /// Feeds every segment pair with overlapping envelopes to `intersector`.
    ///
    /// Nodes are recorded in place; nothing is split.
    pub fn compute_nodes<S, I>(&mut self, strings: &mut [S], intersector: &mut I)
    where
        S: SegmentString,
        I: SegmentIntersector<S>,
    {
        let chains: Vec<MonotoneChain> = strings
            .iter()
            .enumerate()
            .flat_map(|(i, s)| build_chains(s.coordinates(), i))
            .collect();
        let index = EnvelopeIndex::bulk_load(
            chains
                .iter()
                .enumerate()
                .map(|(id, chain)| (*chain.envelope(), id))
                .collect(),
        );

        let mut pairs = Vec::new();
        for (query_id, query) in chains.iter().enumerate() {
            for &test_id in index.query(query.envelope()) {
                // Each unordered chain pair is tested once.
                if test_id <= query_id {
                    continue;
                }
                let test = &chains[test_id];
                if !intersector.accepts_pair(query.string, test.string) {
                    continue;
                }
                pairs.clear();
                query.overlapping_segments(
                    strings[query.string].coordinates(),
                    test,
                    strings[test.string].coordinates(),
                    &mut pairs,
                );
                for &(seg_a, seg_b) in &pairs {
                    self.overlap_tests += 1;
                    intersector.process_intersections(strings, query.string, seg_a, test.string, seg_b);
                    if intersector.is_done() {
                        return;
                    }
                }
            }
        }
    }
}

impl Noder for McIndexNoder {
    fn node(
        &mut self,
        mut strings: Vec<NodedSegmentString>,
    ) -> Result<Vec<NodedSegmentString>, TopologyError> {
        let mut adder = IntersectionAdder::new(self.li);
        self.compute_nodes(&mut strings, &mut adder);
        debug!(
            strings = strings.len(),
            intersections = adder.intersection_count(),
            proper = adder.proper_intersection_count(),
            "monotone chain noding complete"
        );
        Ok(NodedSegmentString::noded_substrings(strings))
    }
}

/// Brute-force noder testing every segment pair. Quadratic; meant for small
/// inputs and for cross-checking the indexed noder.
#[derive(Debug, Default)]
pub struct SimpleNoder {
    li: LineIntersector,
}

impl SimpleNoder {
    #[must_use]
    pub fn new(li: LineIntersector) -> Self {
        Self { li }
    }

    /// Feeds every segment pair to `intersector`.
    pub fn compute_nodes<S, I>(strings: &mut [S], intersector: &mut I)
    where
        S: SegmentString,
        I: SegmentIntersector<S>,
    {
        for a in 0..strings.len() {
            for b in a..strings.len() {
                if !intersector.accepts_pair(a, b) {
                    continue;
                }
                let na = strings[a].coordinates().len().saturating_sub(1);
                let nb = strings[b].coordinates().len().saturating_sub(1);
                for seg_a in 0..na {
                    let first_b = if a == b { seg_a + 1 } else { 0 };
                    for seg_b in first_b..nb {
                        intersector.process_intersections(strings, a, seg_a, b, seg_b);
                        if intersector.is_done() {
                            return;
                        }
                    }
                }
            }
        }
    }
}

impl Noder for SimpleNoder {
    fn node(
        &mut self,
        mut strings: Vec<NodedSegmentString>,
    ) -> Result<Vec<NodedSegmentString>, TopologyError> {
        let mut adder = IntersectionAdder::new(self.li);
        Self::compute_nodes(&mut strings, &mut adder);
        Ok(NodedSegmentString::noded_substrings(strings))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Coordinate;
    use crate::noding::NodingValidator;

    fn string(v: &[(f64, f64)], context: usize) -> NodedSegmentString {
        NodedSegmentString::new(v.iter().map(|&p| p.into()).collect(), context)
    }

    fn grid() -> Vec<NodedSegmentString> {
        vec![
            string(&[(0.0, 1.0), (4.0, 1.0)], 0),
            string(&[(0.0, 3.0), (4.0, 3.0)], 1),
            string(&[(1.0, 0.0), (1.0, 4.0)], 2),
            string(&[(3.0, 0.0), (3.0, 4.0)], 3),
        ]
    }

    #[test]
    fn grid_is_split_at_every_crossing() {
        let noded = McIndexNoder::default().node(grid()).unwrap();
        // Each line is crossed twice, giving three pieces.
        assert_eq!(noded.len(), 12);
        for ctx in 0..4 {
            assert_eq!(noded.iter().filter(|s| s.context() == ctx).count(), 3);
        }
        let validator = NodingValidator::default();
        assert!(validator
            .check_valid(noded.iter().map(SegmentString::coordinates))
            .is_ok());
    }

    #[test]
    fn indexed_and_brute_force_agree() {
        let input = vec![
            string(&[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0), (0.0, 2.0)], 0),
            string(&[(0.0, 4.0), (10.0, 4.0)], 1),
        ];
        let mut a = McIndexNoder::default().node(input.clone()).unwrap();
        let mut b = SimpleNoder::default().node(input).unwrap();
        let key = |s: &NodedSegmentString| s.coordinates().to_vec();
        a.sort_by_key(|s| key(s).first().copied().unwrap_or_default());
        b.sort_by_key(|s| key(s).first().copied().unwrap_or_default());
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.coordinates(), y.coordinates());
        }
    }

    #[test]
    fn noding_is_idempotent() {
        let once = McIndexNoder::default().node(grid()).unwrap();
        let snapshot: Vec<Vec<Coordinate>> = once.iter().map(|s| s.coordinates().to_vec()).collect();
        let twice = McIndexNoder::default().node(once).unwrap();
        let again: Vec<Vec<Coordinate>> = twice.iter().map(|s| s.coordinates().to_vec()).collect();
        assert_eq!(snapshot, again);
    }

    #[test]
    fn self_crossing_string_is_noded() {
        let bowtie = string(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)], 0);
        let noded = McIndexNoder::default().node(vec![bowtie]).unwrap();
        assert_eq!(noded.len(), 3);
        assert_eq!(noded[0].coordinates()[1], Coordinate::new(1.0, 1.0));
    }
}
