use super::distance_2d::nearest_endpoint;
use super::polygon_2d::orientation_index;
use super::{Coordinate, Envelope, PrecisionModel, Vector3};

/// A computed proper intersection this close to a segment endpoint (relative
/// to the longer segment) is replaced by the endpoint itself.
///
/// Only the intersection-versus-endpoint case is merged. Two distinct interior
/// intersections on one segment are kept however close they are, so floating
/// noding can still produce very short edges; fixed precision merges them by
/// rounding both to the same grid point.
const NEAR_ENDPOINT_FACTOR: f64 = 1e-12;

/// Classification of a segment-segment intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntersectionResult {
    None,
    Point(Coordinate),
    /// The segments overlap along a sub-segment, clipped to both inputs.
    Collinear(Coordinate, Coordinate),
}

/// Full outcome of intersecting two segments, with the inputs retained for
/// endpoint queries.
#[derive(Debug, Clone, Copy)]
pub struct SegmentIntersection {
    input: [[Coordinate; 2]; 2],
    points: [Coordinate; 2],
    count: usize,
    collinear: bool,
    proper: bool,
}

impl SegmentIntersection {
    fn none(input: [[Coordinate; 2]; 2]) -> Self {
        Self {
            input,
            points: [Coordinate::default(); 2],
            count: 0,
            collinear: false,
            proper: false,
        }
    }

    fn point(input: [[Coordinate; 2]; 2], pt: Coordinate, proper: bool) -> Self {
        Self {
            input,
            points: [pt, pt],
            count: 1,
            collinear: false,
            proper,
        }
    }

    fn collinear(input: [[Coordinate; 2]; 2], a: Coordinate, b: Coordinate) -> Self {
        Self {
            input,
            points: [a, b],
            count: 2,
            collinear: true,
            proper: false,
        }
    }

    #[must_use]
    pub fn result(&self) -> IntersectionResult {
        match self.count {
            0 => IntersectionResult::None,
            1 => IntersectionResult::Point(self.points[0]),
            _ => IntersectionResult::Collinear(self.points[0], self.points[1]),
        }
    }

    #[must_use]
    pub fn has_intersection(&self) -> bool {
        self.count > 0
    }

    /// The intersection points: none, one, or the two ends of a collinear overlap.
    #[must_use]
    pub fn points(&self) -> &[Coordinate] {
        &self.points[..self.count]
    }

    #[must_use]
    pub fn is_collinear(&self) -> bool {
        self.collinear
    }

    /// A proper intersection is a single point interior to both segments.
    #[must_use]
    pub fn is_proper(&self) -> bool {
        self.proper
    }

    /// Returns `true` if some intersection point is not an endpoint of its segment.
    #[must_use]
    pub fn is_interior_intersection(&self) -> bool {
        self.is_interior_intersection_on(0) || self.is_interior_intersection_on(1)
    }

    /// Like [`Self::is_interior_intersection`] but for input segment `index` only.
    #[must_use]
    pub fn is_interior_intersection_on(&self, index: usize) -> bool {
        let [a, b] = self.input[index];
        self.points().iter().any(|pt| *pt != a && *pt != b)
    }
}

/// Robust segment intersector.
///
/// All side tests go through the exact orientation predicate, so an
/// "on segment" answer here always agrees with the orientation used by the
/// rest of the noding and labelling code.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineIntersector {
    precision: PrecisionModel,
}

impl LineIntersector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intersector whose computed points are rounded to `precision`.
    #[must_use]
    pub fn with_precision(precision: PrecisionModel) -> Self {
        Self { precision }
    }

    #[must_use]
    pub fn precision(&self) -> PrecisionModel {
        self.precision
    }

    /// Classifies the intersection of `p1`-`p2` with `q1`-`q2`.
    #[must_use]
    pub fn compute_intersection(
        &self,
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) -> IntersectionResult {
        self.compute(p1, p2, q1, q2).result()
    }

    /// Computes the intersection with proper/interior flags.
    #[must_use]
    pub fn compute(
        &self,
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) -> SegmentIntersection {
        let input = [[*p1, *p2], [*q1, *q2]];
        if !Envelope::segments_overlap(p1, p2, q1, q2) {
            return SegmentIntersection::none(input);
        }

        let pq1 = orientation_index(p1, p2, q1);
        let pq2 = orientation_index(p1, p2, q2);
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return SegmentIntersection::none(input);
        }
        let qp1 = orientation_index(q1, q2, p1);
        let qp2 = orientation_index(q1, q2, p2);
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return SegmentIntersection::none(input);
        }

        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            return collinear_intersection(input, p1, p2, q1, q2);
        }

        // An endpoint lies on the other segment; report that exact vertex.
        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            let pt = if p1 == q1 || p1 == q2 {
                *p1
            } else if p2 == q1 || p2 == q2 {
                *p2
            } else if pq1 == 0 {
                *q1
            } else if pq2 == 0 {
                *q2
            } else if qp1 == 0 {
                *p1
            } else {
                *p2
            };
            return SegmentIntersection::point(input, pt, false);
        }

        let pt = self.proper_intersection(p1, p2, q1, q2);
        let proper = pt != *p1 && pt != *p2 && pt != *q1 && pt != *q2;
        SegmentIntersection::point(input, pt, proper)
    }

    /// Returns `true` if `p` lies on the closed segment `a`-`b`.
    #[must_use]
    pub fn is_on_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> bool {
        Envelope::segment_covers(a, b, p) && orientation_index(a, b, p) == 0
    }

    fn proper_intersection(
        &self,
        p1: &Coordinate,
        p2: &Coordinate,
        q1: &Coordinate,
        q2: &Coordinate,
    ) -> Coordinate {
        let mut pt = match intersection_with_normalization(p1, p2, q1, q2) {
            Some(pt) if in_segment_envelopes(&pt, p1, p2, q1, q2) => pt,
            _ => nearest_endpoint(p1, p2, q1, q2),
        };

        let scale = p1.distance(p2).max(q1.distance(q2));
        let tolerance = scale * NEAR_ENDPOINT_FACTOR;
        if let Some(end) = [p1, p2, q1, q2]
            .into_iter()
            .find(|end| end.distance(&pt) <= tolerance)
        {
            pt = *end;
        }
        self.precision.make_precise(pt)
    }
}

fn collinear_intersection(
    input: [[Coordinate; 2]; 2],
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> SegmentIntersection {
    let p1q1p2 = Envelope::segment_covers(p1, p2, q1);
    let p1q2p2 = Envelope::segment_covers(p1, p2, q2);
    let q1p1q2 = Envelope::segment_covers(q1, q2, p1);
    let q1p2q2 = Envelope::segment_covers(q1, q2, p2);

    let overlap = |a: &Coordinate, b: &Coordinate, touch_only: bool| {
        if a == b && touch_only {
            SegmentIntersection::point(input, *a, false)
        } else {
            SegmentIntersection::collinear(input, *a, *b)
        }
    };

    if p1q1p2 && p1q2p2 {
        return SegmentIntersection::collinear(input, *q1, *q2);
    }
    if q1p1q2 && q1p2q2 {
        return SegmentIntersection::collinear(input, *p1, *p2);
    }
    if p1q1p2 && q1p1q2 {
        return overlap(q1, p1, !p1q2p2 && !q1p2q2);
    }
    if p1q1p2 && q1p2q2 {
        return overlap(q1, p2, !p1q2p2 && !q1p1q2);
    }
    if p1q2p2 && q1p1q2 {
        return overlap(q2, p1, !p1q1p2 && !q1p2q2);
    }
    if p1q2p2 && q1p2q2 {
        return overlap(q2, p2, !p1q1p2 && !q1p1q2);
    }
    SegmentIntersection::none(input)
}

/// Intersects the two lines in homogeneous form after translating the inputs
/// towards the origin, which keeps the cross products well conditioned.
fn intersection_with_normalization(
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> Option<Coordinate> {
    let ox = 0.5 * (p1.x.max(p2.x).min(q1.x.max(q2.x)) + p1.x.min(p2.x).max(q1.x.min(q2.x)));
    let oy = 0.5 * (p1.y.max(p2.y).min(q1.y.max(q2.y)) + p1.y.min(p2.y).max(q1.y.min(q2.y)));

    let h = |c: &Coordinate| Vector3::new(c.x - ox, c.y - oy, 1.0);
    let line_p = h(p1).cross(&h(p2));
    let line_q = h(q1).cross(&h(q2));
    let meet = line_p.cross(&line_q);

    let x = meet.x / meet.z;
    let y = meet.y / meet.z;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(Coordinate::new(x + ox, y + oy))
}

fn in_segment_envelopes(
    pt: &Coordinate,
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> bool {
    Envelope::segment_covers(p1, p2, pt) && Envelope::segment_covers(q1, q2, pt)
}
