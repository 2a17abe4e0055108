use super::{InteriorIntersectionFinder, McIndexNoder, NodedSegmentString};
use crate::error::TopologyError;
use crate::math::{Coordinate, LineIntersector};

/// Checks that a set of strings only meet at shared endpoints.
#[derive(Debug, Default)]
pub struct NodingValidator {
    li: LineIntersector,
}

impl NodingValidator {
    #[must_use]
    pub fn new(li: LineIntersector) -> Self {
        Self { li }
    }

    /// Returns every interior intersection among `strings`.
    pub fn interior_intersections<'a>(
        &self,
        strings: impl IntoIterator<Item = &'a [Coordinate]>,
    ) -> Vec<Coordinate> {
        let mut copies: Vec<NodedSegmentString> = strings
            .into_iter()
            .enumerate()
            .map(|(i, pts)| NodedSegmentString::new(pts.to_vec(), i))
            .collect();
        let mut finder = InteriorIntersectionFinder::find_all(self.li);
        McIndexNoder::new(self.li).compute_nodes(&mut copies, &mut finder);
        finder.intersections().to_vec()
    }

    /// # Errors
    ///
    /// Returns a `TopologyError` located at the first interior intersection found.
    pub fn check_valid<'a>(
        &self,
        strings: impl IntoIterator<Item = &'a [Coordinate]>,
    ) -> Result<(), TopologyError> {
        let mut copies: Vec<NodedSegmentString> = strings
            .into_iter()
            .enumerate()
            .map(|(i, pts)| NodedSegmentString::new(pts.to_vec(), i))
            .collect();
        let mut finder = InteriorIntersectionFinder::new(self.li);
        McIndexNoder::new(self.li).compute_nodes(&mut copies, &mut finder);
        match finder.intersections().first() {
            Some(pt) => Err(TopologyError::at("found non-noded intersection", *pt)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn coords(v: &[(f64, f64)]) -> Vec<Coordinate> {
        v.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn crossing_strings_are_rejected() {
        let a = coords(&[(0.0, 0.0), (2.0, 2.0)]);
        let b = coords(&[(0.0, 2.0), (2.0, 0.0)]);
        let err = NodingValidator::default()
            .check_valid([a.as_slice(), b.as_slice()])
            .unwrap_err();
        assert_eq!(err.location, Some(Coordinate::new(1.0, 1.0)));
    }

    #[test]
    fn noded_strings_pass() {
        let a = coords(&[(0.0, 0.0), (1.0, 1.0)]);
        let b = coords(&[(1.0, 1.0), (2.0, 0.0)]);
        let validator = NodingValidator::default();
        assert!(validator.check_valid([a.as_slice(), b.as_slice()]).is_ok());
        assert!(validator.interior_intersections([a.as_slice(), b.as_slice()]).is_empty());
    }
}
