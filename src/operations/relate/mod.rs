//! DE-9IM relate: the intersection matrix of two geometries.

mod computer;
mod matrix;

pub use computer::RelateComputer;
pub use matrix::IntersectionMatrix;

use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::Geometry;
use crate::topology::BoundaryNodeRule;

/// Computes the intersection matrix of `a` and `b`, classifying line
/// endpoints with `rule`.
///
/// # Errors
///
/// Returns a `GeometryError` for malformed inputs or heterogeneous
/// geometry collections, and a `TopologyError` if the labelled graph is
/// inconsistent.
pub fn relate(a: &Geometry, b: &Geometry, rule: &dyn BoundaryNodeRule) -> Result<IntersectionMatrix> {
    check_not_collection(a, "relate")?;
    check_not_collection(b, "relate")?;
    let im = RelateComputer::new(a, b, rule)?.compute()?;
    debug!(matrix = %im, "relate computed");
    Ok(im)
}

pub(crate) fn check_not_collection(g: &Geometry, op: &'static str) -> std::result::Result<(), GeometryError> {
    match g {
        Geometry::GeometryCollection(_) => Err(GeometryError::UnsupportedCollection(op)),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::OverlayError;
    use crate::geometry::{LineString, Polygon};
    use crate::math::Coordinate;
    use crate::topology::{BoundaryRule, Dimension};

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Polygon::from(vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)]).into()
    }

    fn line(v: &[(f64, f64)]) -> Geometry {
        LineString::from(v.to_vec()).into()
    }

    fn mod2(a: &Geometry, b: &Geometry) -> String {
        relate(a, b, &BoundaryRule::Mod2).unwrap().to_string()
    }

    // Area / area

    #[test]
    fn overlapping_squares() {
        assert_eq!(mod2(&square(0.0, 0.0, 1.0), &square(0.5, 0.5, 1.0)), "212101212");
    }

    #[test]
    fn squares_sharing_an_edge() {
        let im = relate(&square(0.0, 0.0, 1.0), &square(1.0, 0.0, 1.0), &BoundaryRule::Mod2).unwrap();
        assert_eq!(im.to_string(), "FF2F11212");
        assert!(im.is_touches(Dimension::Area, Dimension::Area));
    }

    #[test]
    fn nested_squares() {
        let im = relate(&square(1.0, 1.0, 1.0), &square(0.0, 0.0, 4.0), &BoundaryRule::Mod2).unwrap();
        assert_eq!(im.to_string(), "2FF1FF212");
        assert!(im.is_within());
    }

    #[test]
    fn disjoint_envelopes_use_boundary_dimensions() {
        let a = square(0.0, 0.0, 1.0);
        let b = line(&[(5.0, 5.0), (6.0, 5.0)]);
        assert_eq!(mod2(&a, &b), "FF2FF1102");
        let closed = line(&[(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 5.0)]);
        assert_eq!(mod2(&a, &closed), "FF2FF11F2");
    }

    // Lines

    #[test]
    fn line_crossing_square() {
        let l = line(&[(-1.0, 0.5), (2.0, 0.5)]);
        assert_eq!(mod2(&l, &square(0.0, 0.0, 1.0)), "101FF0212");
    }

    #[test]
    fn transpose_symmetry() {
        let cases = [
            (line(&[(-1.0, 0.5), (2.0, 0.5)]), square(0.0, 0.0, 1.0)),
            (square(0.0, 0.0, 1.0), square(0.5, 0.5, 1.0)),
            (line(&[(0.0, 0.0), (2.0, 2.0)]), line(&[(0.0, 2.0), (2.0, 0.0)])),
            (Geometry::Point(Coordinate::new(0.5, 0.5)), square(0.0, 0.0, 1.0)),
        ];
        for (a, b) in &cases {
            let ab = relate(a, b, &BoundaryRule::Mod2).unwrap();
            let ba = relate(b, a, &BoundaryRule::Mod2).unwrap();
            assert_eq!(ab.transpose(), ba, "{ab} vs {ba}");
        }
    }

    #[test]
    fn figure_eight_depends_on_boundary_rule() {
        let eight = line(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]);
        let start = Geometry::Point(Coordinate::new(0.0, 0.0));
        // Two endpoints meet at the start: even, so interior under mod-2.
        assert_eq!(mod2(&eight, &start), "0F1FFFFF2");
        let im = relate(&eight, &start, &BoundaryRule::EndPoint).unwrap();
        assert_eq!(im.to_string(), "FF10FFFF2");
    }

    #[test]
    fn collections_are_rejected() {
        let gc = Geometry::GeometryCollection(vec![square(0.0, 0.0, 1.0)]);
        let err = relate(&gc, &square(0.0, 0.0, 1.0), &BoundaryRule::Mod2).unwrap_err();
        assert!(matches!(
            err,
            OverlayError::Geometry(GeometryError::UnsupportedCollection("relate"))
        ));
    }
}
