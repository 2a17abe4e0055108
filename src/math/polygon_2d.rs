use super::Coordinate;
use crate::topology::Location;

/// Orientation of `q` relative to the directed line `p1 -> p2`.
///
/// Returns `1` if `q` is to the left (counter-clockwise turn), `-1` if to the
/// right, and `0` if the three points are collinear. The sign is computed with
/// an adaptive exact determinant, so it is always correct for finite input.
#[must_use]
pub fn orientation_index(p1: &Coordinate, p2: &Coordinate, q: &Coordinate) -> i32 {
    let det = robust::orient2d(
        robust::Coord { x: p1.x, y: p1.y },
        robust::Coord { x: p2.x, y: p2.y },
        robust::Coord { x: q.x, y: q.y },
    );
    if det > 0.0 {
        1
    } else if det < 0.0 {
        -1
    } else {
        0
    }
}

/// Signed area of a ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. The ring may be
/// given closed or open.
#[must_use]
pub fn signed_area(ring: &[Coordinate]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    // Shift to the first vertex to keep the products small.
    let x0 = ring[0].x;
    let y0 = ring[0].y;
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let (xi, yi) = (ring[i].x - x0, ring[i].y - y0);
        let (xj, yj) = (ring[j].x - x0, ring[j].y - y0);
        sum += xi * yj - xj * yi;
    }
    sum * 0.5
}

/// Tests whether a closed ring is oriented counter-clockwise.
///
/// Uses the orientation at the highest vertex, which is exact and tolerates
/// repeated points and flat spikes at the top. Degenerate rings (fewer than
/// three distinct vertices) report `false`.
#[must_use]
pub fn is_ccw(ring: &[Coordinate]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    let n = ring.len() - 1;

    let mut hi_index = 0;
    for i in 1..=n {
        if ring[i].y > ring[hi_index].y {
            hi_index = i;
        }
    }
    let hi = ring[hi_index];

    let mut i_prev = hi_index;
    loop {
        i_prev = if i_prev == 0 { n } else { i_prev - 1 };
        if ring[i_prev] != hi || i_prev == hi_index {
            break;
        }
    }
    let mut i_next = hi_index;
    loop {
        i_next = (i_next + 1) % n;
        if ring[i_next] != hi || i_next == hi_index {
            break;
        }
    }

    let prev = ring[i_prev];
    let next = ring[i_next];
    if prev == hi || next == hi || prev == next {
        return false;
    }

    match orientation_index(&prev, &hi, &next) {
        // Flat top: the ring is CCW if it runs right-to-left along it.
        0 => prev.x > next.x,
        disc => disc > 0,
    }
}

/// Counts crossings of a rightward ray from a point against ring segments.
///
/// Also detects the point lying exactly on a segment.
#[derive(Debug, Clone)]
pub struct RayCrossingCounter {
    p: Coordinate,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    #[must_use]
    pub fn new(p: Coordinate) -> Self {
        Self {
            p,
            crossings: 0,
            on_segment: false,
        }
    }

    /// Accounts for one ring segment.
    pub fn count_segment(&mut self, p1: &Coordinate, p2: &Coordinate) {
        let p = self.p;
        // Segment entirely left of the point.
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == *p2 {
            self.on_segment = true;
            return;
        }
        // Horizontal segment at the point's height.
        if p1.y == p.y && p2.y == p.y {
            if p.x >= p1.x.min(p2.x) && p.x <= p1.x.max(p2.x) {
                self.on_segment = true;
            }
            return;
        }
        // Upward edges include their start, downward edges their end.
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut sign = orientation_index(&p, p1, p2);
            if sign == 0 {
                self.on_segment = true;
                return;
            }
            if p2.y < p1.y {
                sign = -sign;
            }
            if sign > 0 {
                self.crossings += 1;
            }
        }
    }

    #[must_use]
    pub fn is_on_segment(&self) -> bool {
        self.on_segment
    }

    #[must_use]
    pub fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Locates a point relative to a closed ring.
#[must_use]
pub fn locate_point_in_ring(p: &Coordinate, ring: &[Coordinate]) -> Location {
    let mut counter = RayCrossingCounter::new(*p);
    for seg in ring.windows(2) {
        counter.count_segment(&seg[0], &seg[1]);
        if counter.is_on_segment() {
            break;
        }
    }
    counter.location()
}

/// Returns `true` if `p` lies inside or on the ring.
#[must_use]
pub fn is_point_in_ring(p: &Coordinate, ring: &[Coordinate]) -> bool {
    locate_point_in_ring(p, ring) != Location::Exterior
}

/// Returns `true` if `p` lies on any segment of the polyline.
#[must_use]
pub fn is_on_line(p: &Coordinate, line: &[Coordinate]) -> bool {
    line.windows(2).any(|seg| {
        super::Envelope::segment_covers(&seg[0], &seg[1], p)
            && orientation_index(&seg[0], &seg[1], p) == 0
    })
}

/// Copies `coords` dropping consecutive duplicates.
#[must_use]
pub fn remove_repeated_points(coords: &[Coordinate]) -> Vec<Coordinate> {
    let mut out: Vec<Coordinate> = Vec::with_capacity(coords.len());
    for c in coords {
        if out.last() != Some(c) {
            out.push(*c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn ring(pts: &[(f64, f64)]) -> Vec<Coordinate> {
        pts.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn orientation_basic() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        assert_eq!(orientation_index(&a, &b, &Coordinate::new(0.5, 1.0)), 1);
        assert_eq!(orientation_index(&a, &b, &Coordinate::new(0.5, -1.0)), -1);
        assert_eq!(orientation_index(&a, &b, &Coordinate::new(7.0, 0.0)), 0);
    }

    #[test]
    fn orientation_is_exact_for_nearly_collinear_points() {
        let p = Coordinate::new(0.5, 0.5);
        let q = Coordinate::new(12.0, 12.0);
        let r = Coordinate::new(24.0, 24.0);
        assert_eq!(orientation_index(&p, &q, &r), 0);
        let r = Coordinate::new(24.0, 24.000_000_000_000_004);
        assert_eq!(orientation_index(&p, &q, &r), 1);
    }

    #[test]
    fn signed_area_orientation() {
        let ccw = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert!((signed_area(&ccw) - 1.0).abs() < TOLERANCE);
        assert!((signed_area(&cw) + 1.0).abs() < TOLERANCE);
        assert!(is_ccw(&ccw));
        assert!(!is_ccw(&cw));
    }

    #[test]
    fn is_ccw_with_flat_top_and_repeated_points() {
        let r = ring(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (2.0, 2.0),
            (1.0, 2.0),
            (0.0, 2.0),
            (0.0, 0.0),
        ]);
        assert!(is_ccw(&r));
        let rev: Vec<_> = r.iter().rev().copied().collect();
        assert!(!is_ccw(&rev));
    }

    #[test]
    fn point_in_ring_locations() {
        let r = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        assert_eq!(locate_point_in_ring(&Coordinate::new(2.0, 2.0), &r), Location::Interior);
        assert_eq!(locate_point_in_ring(&Coordinate::new(4.0, 2.0), &r), Location::Boundary);
        assert_eq!(locate_point_in_ring(&Coordinate::new(0.0, 0.0), &r), Location::Boundary);
        assert_eq!(locate_point_in_ring(&Coordinate::new(5.0, 2.0), &r), Location::Exterior);
        // Ray passes exactly through a vertex.
        let diamond = ring(&[(0.0, 2.0), (2.0, 0.0), (4.0, 2.0), (2.0, 4.0), (0.0, 2.0)]);
        assert_eq!(
            locate_point_in_ring(&Coordinate::new(1.0, 2.0), &diamond),
            Location::Interior
        );
        assert_eq!(
            locate_point_in_ring(&Coordinate::new(-1.0, 2.0), &diamond),
            Location::Exterior
        );
    }

    #[test]
    fn on_line_and_repeated_points() {
        let line = ring(&[(0.0, 0.0), (2.0, 2.0), (4.0, 0.0)]);
        assert!(is_on_line(&Coordinate::new(1.0, 1.0), &line));
        assert!(is_on_line(&Coordinate::new(3.0, 1.0), &line));
        assert!(!is_on_line(&Coordinate::new(2.0, 1.0), &line));
        let dup = ring(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert_eq!(remove_repeated_points(&dup).len(), 3);
    }
}
