//! Boolean overlay of two geometries on a shared planar graph.

mod assemble;
mod edge_list;
mod edge_ring;
mod engine;
mod lines;
mod select;
mod snap;

pub use engine::{OverlayOp, OverlayState, OverlayStats};
pub use select::{is_result_of_op, result_dimension, OpCode};
pub use snap::SnapRetry;

use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::PrecisionModel;

/// Per-call overlay configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayOptions {
    /// Grid the inputs are rounded to. A fixed grid also switches noding to
    /// snap rounding.
    pub precision: PrecisionModel,
    /// Retry policy when the overlay fails on a robustness problem; `None`
    /// surfaces the first failure.
    pub snap_retry: Option<SnapRetry>,
}

impl OverlayOptions {
    #[must_use]
    pub fn with_precision(mut self, precision: PrecisionModel) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_snap_retry(mut self, retry: SnapRetry) -> Self {
        self.snap_retry = Some(retry);
        self
    }
}

/// Computes `a op b` in floating precision without retries.
///
/// # Errors
///
/// See [`OverlayOp::compute`].
pub fn overlay(a: &Geometry, b: &Geometry, op: OpCode) -> Result<Geometry> {
    OverlayOp::new(a, b).compute(op)
}

/// Computes `a op b` with the given options.
///
/// # Errors
///
/// See [`OverlayOp::compute`].
pub fn overlay_with(a: &Geometry, b: &Geometry, op: OpCode, options: OverlayOptions) -> Result<Geometry> {
    OverlayOp::with_options(a, b, options).compute(op)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::{GeometryError, OverlayError};
    use crate::geometry::{LineString, Polygon};
    use crate::math::Coordinate;
    use crate::operations::relate::relate;
    use crate::topology::{BoundaryRule, Dimension};

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Polygon::from(vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)]).into()
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn topo_equal(a: &Geometry, b: &Geometry) -> bool {
        relate(a, b, &BoundaryRule::Mod2)
            .unwrap()
            .is_equals(a.dimension(), b.dimension())
    }

    // Area / area

    #[test]
    fn overlapping_squares_areas() {
        init_tracing();
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.5, 1.0);
        let area = |op| overlay(&a, &b, op).unwrap().area();
        assert_relative_eq!(area(OpCode::Intersection), 0.25, epsilon = 1e-12);
        assert_relative_eq!(area(OpCode::Union), 1.75, epsilon = 1e-12);
        assert_relative_eq!(area(OpCode::Difference), 0.75, epsilon = 1e-12);
        assert_relative_eq!(area(OpCode::SymDifference), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn intersection_is_a_normalized_polygon() {
        let result = overlay(&square(0.0, 0.0, 1.0), &square(0.5, 0.5, 1.0), OpCode::Intersection).unwrap();
        let Geometry::Polygon(p) = &result else {
            panic!("expected a polygon, got {result:?}");
        };
        assert!(p.holes.is_empty());
        assert!(p.shell.is_ccw());
        assert_eq!(p.shell.coords.len(), 5);
    }

    #[test]
    fn disjoint_intersection_skips_noding() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);
        let mut op = OverlayOp::new(&a, &b);
        let result = op.compute(OpCode::Intersection).unwrap();
        assert_eq!(result, Geometry::empty(Dimension::Area));
        assert_eq!(op.stats().noding_passes, 0);
        assert!(matches!(op.state(), OverlayState::Done));
    }

    #[test]
    fn disjoint_union_keeps_both() {
        let result = overlay(&square(0.0, 0.0, 1.0), &square(5.0, 5.0, 1.0), OpCode::Union).unwrap();
        let Geometry::MultiPolygon(polys) = &result else {
            panic!("expected a multipolygon, got {result:?}");
        };
        assert_eq!(polys.len(), 2);
        assert_relative_eq!(result.area(), 2.0);
    }

    #[test]
    fn shared_edge_intersection_is_a_line() {
        let result = overlay(&square(0.0, 0.0, 1.0), &square(1.0, 0.0, 1.0), OpCode::Intersection).unwrap();
        let Geometry::LineString(line) = &result else {
            panic!("expected a line string, got {result:?}");
        };
        assert_relative_eq!(line.length(), 1.0);
        assert!(line.coords.iter().all(|c| c.x == 1.0));
    }

    #[test]
    fn shared_edge_union_merges_into_one_polygon() {
        let result = overlay(&square(0.0, 0.0, 1.0), &square(1.0, 0.0, 1.0), OpCode::Union).unwrap();
        assert!(matches!(result, Geometry::Polygon(_)));
        assert_relative_eq!(result.area(), 2.0);
    }

    #[test]
    fn hole_is_assigned_to_its_shell() {
        let outer = square(0.0, 0.0, 4.0);
        let inner = square(1.0, 1.0, 2.0);
        let result = overlay(&outer, &inner, OpCode::Difference).unwrap();
        let Geometry::Polygon(p) = &result else {
            panic!("expected a polygon, got {result:?}");
        };
        assert_eq!(p.holes.len(), 1);
        assert!(!p.holes[0].is_ccw());
        assert_relative_eq!(result.area(), 12.0);
    }

    // Algebra

    #[test]
    fn union_is_commutative() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.5, 1.0);
        let ab = overlay(&a, &b, OpCode::Union).unwrap();
        let ba = overlay(&b, &a, OpCode::Union).unwrap();
        assert!(topo_equal(&ab, &ba));
    }

    #[test]
    fn intersection_with_union_gives_back_the_input() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.5, 1.0);
        let union = overlay(&a, &b, OpCode::Union).unwrap();
        let back = overlay(&a, &union, OpCode::Intersection).unwrap();
        assert!(topo_equal(&back, &a));
    }

    #[test]
    fn union_and_intersection_areas_add_up() {
        let cases = [
            (square(0.0, 0.0, 1.0), square(0.5, 0.5, 1.0)),
            (square(0.0, 0.0, 2.0), square(1.0, -1.0, 0.5)),
            (square(0.0, 0.0, 4.0), square(1.0, 1.0, 2.0)),
        ];
        for (a, b) in &cases {
            let union = overlay(a, b, OpCode::Union).unwrap().area();
            let inter = overlay(a, b, OpCode::Intersection).unwrap().area();
            assert_relative_eq!(union + inter, a.area() + b.area(), epsilon = 1e-9);
        }
    }

    #[test]
    fn difference_then_intersection_has_no_area() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(0.5, 0.5, 1.0);
        let diff = overlay(&a, &b, OpCode::Difference).unwrap();
        let again = overlay(&diff, &b, OpCode::Intersection).unwrap();
        assert!(again.area().abs() < 1e-12);
    }

    // Mixed dimensions

    #[test]
    fn point_inside_area() {
        let p = Geometry::Point(Coordinate::new(0.5, 0.5));
        let sq = square(0.0, 0.0, 1.0);
        assert_eq!(overlay(&p, &sq, OpCode::Intersection).unwrap(), p);
        assert_eq!(overlay(&p, &sq, OpCode::Difference).unwrap(), Geometry::empty(Dimension::Point));
        assert!(matches!(overlay(&sq, &p, OpCode::Union).unwrap(), Geometry::Polygon(_)));
    }

    #[test]
    fn line_clipped_by_area() {
        let line: Geometry = LineString::from(vec![(-1.0, 0.5), (2.0, 0.5)]).into();
        let sq = square(0.0, 0.0, 1.0);
        let inside = overlay(&line, &sq, OpCode::Intersection).unwrap();
        assert_relative_eq!(inside.length(), 1.0, epsilon = 1e-12);
        let outside = overlay(&line, &sq, OpCode::Difference).unwrap();
        let Geometry::MultiLineString(parts) = &outside else {
            panic!("expected two line strings, got {outside:?}");
        };
        assert_eq!(parts.len(), 2);
        assert_relative_eq!(outside.length(), 2.0, epsilon = 1e-12);
    }

    // Configuration and failure

    #[test]
    fn fixed_precision_uses_snap_rounding() {
        init_tracing();
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 1.0, 2.0);
        let options = OverlayOptions::default().with_precision(PrecisionModel::fixed(1.0).unwrap());
        let mut op = OverlayOp::with_options(&a, &b, options);
        let result = op.compute(OpCode::Intersection).unwrap();
        assert_relative_eq!(result.area(), 1.0);
        // One snap-rounding round, then the graph noding pass.
        assert_eq!(op.stats().noding_passes, 2);
    }

    #[test]
    fn collections_are_rejected() {
        let gc = Geometry::GeometryCollection(vec![square(0.0, 0.0, 1.0)]);
        let sq = square(0.0, 0.0, 1.0);
        let mut op = OverlayOp::new(&gc, &sq);
        let err = op.compute(OpCode::Union).unwrap_err();
        assert!(matches!(
            err,
            OverlayError::Geometry(GeometryError::UnsupportedCollection("overlay"))
        ));
        assert!(matches!(op.state(), OverlayState::Failed(_)));
    }

    #[test]
    fn malformed_input_fails_fast() {
        let bad = Geometry::LineString(LineString::new(vec![Coordinate::new(0.0, 0.0)]));
        let options = OverlayOptions::default().with_snap_retry(SnapRetry::default());
        let err = overlay_with(&bad, &square(0.0, 0.0, 1.0), OpCode::Union, options).unwrap_err();
        assert!(matches!(err, OverlayError::Geometry(_)));
    }

    fn unclosed_triangle(x: f64, y: f64) -> Geometry {
        Polygon::from(vec![(x + 0.2, y + 0.2), (x + 0.8, y + 0.2), (x + 0.5, y + 0.9)]).into()
    }

    #[test]
    fn malformed_input_with_disjoint_envelope_is_rejected() {
        let bad = unclosed_triangle(5.0, 5.0);
        let sq = square(0.0, 0.0, 1.0);
        let mut op = OverlayOp::new(&bad, &sq);
        let err = op.compute(OpCode::Intersection).unwrap_err();
        assert!(matches!(
            err,
            OverlayError::Geometry(GeometryError::UnclosedRing { .. })
        ));
        assert_eq!(op.stats().noding_passes, 0);

        let nan: Geometry = Polygon::from(vec![(5.0, 5.0), (f64::NAN, 5.0), (6.0, 6.0), (5.0, 5.0)]).into();
        let err = overlay(&sq, &nan, OpCode::Intersection).unwrap_err();
        assert!(matches!(err, OverlayError::Geometry(GeometryError::NonFinite(_))));
    }

    #[test]
    fn malformed_input_is_rejected_before_precision_reduction() {
        let options = OverlayOptions::default().with_precision(PrecisionModel::fixed(10.0).unwrap());
        let sq = square(0.0, 0.0, 1.0);

        let err = overlay_with(&unclosed_triangle(0.0, 0.0), &sq, OpCode::Union, options).unwrap_err();
        assert!(matches!(
            err,
            OverlayError::Geometry(GeometryError::UnclosedRing { .. })
        ));

        let one_point = Geometry::LineString(LineString::new(vec![Coordinate::new(0.5, 0.5)]));
        let err = overlay_with(&one_point, &sq, OpCode::Union, options).unwrap_err();
        assert!(matches!(
            err,
            OverlayError::Geometry(GeometryError::TooFewPoints { .. })
        ));
    }
}
