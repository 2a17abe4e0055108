use crate::topology::{Dimension, Label, Location};

/// The boolean overlay operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

/// Decides whether a point with the given locations in A and B belongs to
/// the result of `op`. Boundary counts as interior; an unknown location
/// counts as exterior.
///
/// | in A | in B | Intersection | Union | Difference (A-B) | SymDifference |
/// |------|------|--------------|-------|------------------|---------------|
/// | yes  | yes  | keep         | keep  | drop             | drop          |
/// | yes  | no   | drop         | keep  | keep             | keep          |
/// | no   | yes  | drop         | keep  | drop             | keep          |
/// | no   | no   | drop         | drop  | drop             | drop          |
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn is_result_of_op(loc0: Option<Location>, loc1: Option<Location>, op: OpCode) -> bool {
    let inside = |loc: Option<Location>| matches!(loc, Some(Location::Interior | Location::Boundary));
    match (inside(loc0), inside(loc1), op) {
        (true, true, OpCode::Intersection) => true,
        (true, true, OpCode::Union) => true,
        (true, true, OpCode::Difference) => false,
        (true, true, OpCode::SymDifference) => false,

        (true, false, OpCode::Intersection) => false,
        (true, false, OpCode::Union) => true,
        (true, false, OpCode::Difference) => true,
        (true, false, OpCode::SymDifference) => true,

        (false, true, OpCode::Intersection) => false,
        (false, true, OpCode::Union) => true,
        (false, true, OpCode::Difference) => false,
        (false, true, OpCode::SymDifference) => true,

        (false, false, _) => false,
    }
}

/// [`is_result_of_op`] applied to the `On` locations of a label.
#[must_use]
pub fn is_label_in_result(label: &Label, op: OpCode) -> bool {
    is_result_of_op(label.on(0), label.on(1), op)
}

/// Dimension of an empty result, from the dimensions of the inputs.
#[must_use]
pub fn result_dimension(op: OpCode, dim0: Dimension, dim1: Dimension) -> Dimension {
    match op {
        OpCode::Intersection => dim0.min(dim1),
        OpCode::Union | OpCode::SymDifference => dim0.max(dim1),
        OpCode::Difference => dim0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_counts_as_inside() {
        let b = Some(Location::Boundary);
        let e = Some(Location::Exterior);
        assert!(is_result_of_op(b, b, OpCode::Intersection));
        assert!(is_result_of_op(b, e, OpCode::Difference));
        assert!(!is_result_of_op(e, b, OpCode::Difference));
        assert!(!is_result_of_op(None, None, OpCode::Union));
        assert!(is_result_of_op(None, b, OpCode::SymDifference));
    }

    #[test]
    fn empty_result_dimension() {
        use Dimension::{Area, Line, Point};
        assert_eq!(result_dimension(OpCode::Intersection, Area, Line), Line);
        assert_eq!(result_dimension(OpCode::Union, Point, Area), Area);
        assert_eq!(result_dimension(OpCode::Difference, Point, Area), Point);
        assert_eq!(result_dimension(OpCode::SymDifference, Line, Point), Line);
    }
}
