use super::Coordinate;

/// Returns the minimum distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn point_segment_distance(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    let ab = a.vector_to(b);
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        // Degenerate segment (zero length).
        return p.distance(a);
    }

    // Project onto the infinite line, clamp to [0, 1].
    let t = (a.vector_to(p).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a.to_point() + ab * t;
    nalgebra::distance(&p.to_point(), &closest)
}

/// Of the four segment endpoints, returns the one closest to the other segment.
///
/// Used as a fallback intersection point when the computed one is not
/// numerically trustworthy.
#[must_use]
pub fn nearest_endpoint(
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
) -> Coordinate {
    let candidates = [
        (*p1, point_segment_distance(p1, q1, q2)),
        (*p2, point_segment_distance(p2, q1, q2)),
        (*q1, point_segment_distance(q1, p1, p2)),
        (*q2, point_segment_distance(q2, p1, p2)),
    ];
    let mut best = candidates[0];
    for cand in &candidates[1..] {
        if cand.1 < best.1 {
            best = *cand;
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn distance_to_segment_interior() {
        let d = point_segment_distance(&c(1.0, 1.0), &c(0.0, 0.0), &c(2.0, 0.0));
        assert!((d - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn distance_beyond_endpoint() {
        let d = point_segment_distance(&c(5.0, 4.0), &c(0.0, 0.0), &c(2.0, 0.0));
        assert!((d - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn distance_degenerate_segment() {
        let d = point_segment_distance(&c(3.0, 4.0), &c(0.0, 0.0), &c(0.0, 0.0));
        assert!((d - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn nearest_endpoint_picks_touching_vertex() {
        let pt = nearest_endpoint(&c(0.0, 0.0), &c(2.0, 0.0), &c(1.0, 1e-9), &c(1.0, 5.0));
        assert_eq!(pt, c(1.0, 1e-9));
    }
}
