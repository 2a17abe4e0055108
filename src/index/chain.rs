use crate::math::{Coordinate, Envelope};
use crate::topology::Quadrant;

/// A run of consecutive segments of one segment string whose directions all
/// fall in the same quadrant.
///
/// Monotonicity means the envelope of any sub-run is spanned by its two end
/// vertices, which makes overlap searches a cheap binary subdivision.
#[derive(Debug, Clone)]
pub struct MonotoneChain {
    /// Index of the segment string the chain belongs to.
    pub string: usize,
    start: usize,
    end: usize,
    env: Envelope,
}

/// Splits a coordinate sequence into monotone chains.
#[must_use]
pub fn build_chains(pts: &[Coordinate], string: usize) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    if pts.len() < 2 {
        return chains;
    }
    let mut start = 0;
    while start < pts.len() - 1 {
        let end = find_chain_end(pts, start);
        chains.push(MonotoneChain {
            string,
            start,
            end,
            env: Envelope::of_coords(&pts[start..=end]),
        });
        start = end;
    }
    chains
}

fn find_chain_end(pts: &[Coordinate], start: usize) -> usize {
    // Zero-length segments have no direction; skip them to find the chain quadrant.
    let mut safe_start = start;
    while safe_start < pts.len() - 1 && pts[safe_start] == pts[safe_start + 1] {
        safe_start += 1;
    }
    if safe_start >= pts.len() - 1 {
        return pts.len() - 1;
    }
    let quadrant = segment_quadrant(&pts[safe_start], &pts[safe_start + 1]);
    let mut last = start + 1;
    while last < pts.len() {
        if pts[last - 1] != pts[last] && segment_quadrant(&pts[last - 1], &pts[last]) != quadrant {
            break;
        }
        last += 1;
    }
    last - 1
}

fn segment_quadrant(p0: &Coordinate, p1: &Coordinate) -> Quadrant {
    Quadrant::of(p1.x - p0.x, p1.y - p0.y)
}

impl MonotoneChain {
    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    /// First vertex index of the chain.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last vertex index of the chain.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Collects `(segment, other_segment)` index pairs whose envelopes may meet.
    ///
    /// `pts` and `other_pts` are the coordinates of the strings the two chains
    /// belong to.
    pub fn overlapping_segments(
        &self,
        pts: &[Coordinate],
        other: &MonotoneChain,
        other_pts: &[Coordinate],
        out: &mut Vec<(usize, usize)>,
    ) {
        compute_overlaps(
            pts,
            (self.start, self.end),
            other_pts,
            (other.start, other.end),
            out,
        );
    }

    /// Collects the segments whose envelopes may meet `search`.
    pub fn select_segments(&self, pts: &[Coordinate], search: &Envelope, out: &mut Vec<usize>) {
        compute_select(pts, search, self.start, self.end, out);
    }
}

fn compute_overlaps(
    pts0: &[Coordinate],
    (start0, end0): (usize, usize),
    pts1: &[Coordinate],
    (start1, end1): (usize, usize),
    out: &mut Vec<(usize, usize)>,
) {
    if end0 - start0 == 1 && end1 - start1 == 1 {
        out.push((start0, start1));
        return;
    }
    if !Envelope::segments_overlap(&pts0[start0], &pts0[end0], &pts1[start1], &pts1[end1]) {
        return;
    }
    let mid0 = (start0 + end0) / 2;
    let mid1 = (start1 + end1) / 2;
    if start0 < mid0 {
        if start1 < mid1 {
            compute_overlaps(pts0, (start0, mid0), pts1, (start1, mid1), out);
        }
        if mid1 < end1 {
            compute_overlaps(pts0, (start0, mid0), pts1, (mid1, end1), out);
        }
    }
    if mid0 < end0 {
        if start1 < mid1 {
            compute_overlaps(pts0, (mid0, end0), pts1, (start1, mid1), out);
        }
        if mid1 < end1 {
            compute_overlaps(pts0, (mid0, end0), pts1, (mid1, end1), out);
        }
    }
}

fn compute_select(
    pts: &[Coordinate],
    search: &Envelope,
    start: usize,
    end: usize,
    out: &mut Vec<usize>,
) {
    if end - start == 1 {
        out.push(start);
        return;
    }
    if !search.intersects(&Envelope::from_points(&pts[start], &pts[end])) {
        return;
    }
    let mid = (start + end) / 2;
    if start < mid {
        compute_select(pts, search, start, mid, out);
    }
    if mid < end {
        compute_select(pts, search, mid, end, out);
    }
}
