use tracing::warn;

use crate::error::{GeometryError, OverlayError, Result};
use crate::geometry::Geometry;
use crate::math::PrecisionModel;
use crate::noding::{NodedSegmentString, Noder, SegmentString, SnapRoundingNoder};
use crate::topology::{Edge, GeometryGraph, Label};

/// Retry policy for overlays that fail on a robustness problem.
///
/// Attempt `k` (from 0) snap-rounds the inputs to a grid keeping
/// `significant_digits - k * digits_step` significant decimal digits of the
/// largest input ordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapRetry {
    pub max_attempts: usize,
    pub significant_digits: i32,
    pub digits_step: i32,
}

impl Default for SnapRetry {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            significant_digits: 12,
            digits_step: 3,
        }
    }
}

impl SnapRetry {
    /// Grid used by retry `attempt` for inputs up to `magnitude`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidPrecision` if the grid scale is unusable.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn precision_for_attempt(
        &self,
        magnitude: f64,
        attempt: usize,
    ) -> std::result::Result<PrecisionModel, GeometryError> {
        let digits = self.significant_digits - attempt as i32 * self.digits_step;
        PrecisionModel::for_significant_digits(magnitude, digits)
    }
}

/// Runs `attempt` at the configured precision (`None`), then at each retry
/// grid in turn until one succeeds. Each attempt starts from the inputs, so
/// nothing from a failed attempt is seen by the next. Malformed input is
/// never retried. When every retry fails the first error is returned.
pub(crate) fn run_with_snap_retry(
    policy: SnapRetry,
    magnitude: f64,
    mut attempt: impl FnMut(Option<PrecisionModel>) -> Result<Geometry>,
) -> Result<Geometry> {
    let original = match attempt(None) {
        Ok(result) => return Ok(result),
        Err(err @ OverlayError::Geometry(_)) => return Err(err),
        Err(err) => err,
    };
    for k in 0..policy.max_attempts {
        let Ok(precision) = policy.precision_for_attempt(magnitude, k) else {
            break;
        };
        warn!(
            error = %original,
            attempt = k + 1,
            scale = precision.scale(),
            "overlay failed, retrying with snap rounding"
        );
        match attempt(Some(precision)) {
            Ok(result) => return Ok(result),
            Err(err) => warn!(attempt = k + 1, error = %err, "snap-rounded overlay attempt failed"),
        }
    }
    Err(original)
}

/// Nodes the edges of both graphs together with a snap-rounding noder and
/// puts the noded pieces back into their graphs. Returns the number of
/// snap-rounding rounds run.
pub(crate) fn snap_round_edges(
    arg0: &mut GeometryGraph<'_>,
    arg1: &mut GeometryGraph<'_>,
    scale: f64,
) -> std::result::Result<usize, OverlayError> {
    let split = arg0.edges().len();
    let labels: Vec<Label> = arg0.edges().iter().chain(arg1.edges()).map(|e| e.label).collect();
    let strings = arg0
        .edges()
        .iter()
        .chain(arg1.edges())
        .enumerate()
        .map(|(i, e)| NodedSegmentString::new(e.coordinates().to_vec(), i))
        .collect();

    let mut noder = SnapRoundingNoder::new(scale)?;
    let noded = noder.node(strings)?;

    let (mut edges0, mut edges1) = (Vec::new(), Vec::new());
    for s in noded {
        let context = s.context();
        let pts = s.into_coordinates();
        if pts.len() < 2 {
            continue;
        }
        let edge = Edge::new(pts, labels[context]);
        if context < split {
            edges0.push(edge);
        } else {
            edges1.push(edge);
        }
    }
    arg0.replace_edges(edges0);
    arg1.replace_edges(edges1);
    Ok(noder.rounds())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TopologyError;

    fn failure() -> OverlayError {
        TopologyError::new("found non-noded intersection").into()
    }

    #[test]
    fn retry_precisions_get_coarser() {
        let policy = SnapRetry::default();
        let scales: Vec<f64> = (0..3)
            .map(|k| policy.precision_for_attempt(1000.0, k).unwrap().scale().unwrap())
            .collect();
        assert_eq!(scales, vec![1e9, 1e6, 1e3]);
    }

    #[test]
    fn first_success_stops_the_retries() {
        let mut seen = Vec::new();
        let result = run_with_snap_retry(SnapRetry::default(), 1.0, |p| {
            seen.push(p);
            if seen.len() < 3 {
                Err(failure())
            } else {
                Ok(Geometry::Point((1.0, 1.0).into()))
            }
        });
        assert!(result.is_ok());
        assert_eq!(seen.len(), 3);
        assert!(seen[0].is_none() && seen[1].is_some());
    }

    #[test]
    fn exhausted_retries_return_the_first_error() {
        let mut calls = 0;
        let err = run_with_snap_retry(SnapRetry::default(), 1.0, |p| {
            calls += 1;
            Err(if p.is_none() {
                failure()
            } else {
                TopologyError::new("later").into()
            })
        })
        .unwrap_err();
        assert_eq!(calls, 4);
        assert_eq!(err.to_string(), failure().to_string());
    }

    #[test]
    fn malformed_input_is_not_retried() {
        let mut calls = 0;
        let err = run_with_snap_retry(SnapRetry::default(), 1.0, |_| {
            calls += 1;
            Err(GeometryError::EmptyCoordinates("LineString").into())
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, OverlayError::Geometry(_)));
    }
}
