use tracing::debug;

use super::{
    segment, IntersectionAdder, McIndexNoder, NodedSegmentString, Noder, NodingValidator,
    SegmentString,
};
use crate::error::{GeometryError, TopologyError};
use crate::index::{build_chains, EnvelopeIndex, MonotoneChain};
use crate::math::polygon_2d::remove_repeated_points;
use crate::math::{Coordinate, Envelope, LineIntersector, PrecisionModel};

/// The square of side `1 / scale` centred on a grid point. Any segment passing
/// through it gets snapped to the centre.
#[derive(Debug, Clone, Copy)]
pub struct HotPixel {
    center: Coordinate,
    scaled: Coordinate,
    scale: f64,
    // Corners in scaled space, counter-clockwise from the upper right.
    corners: [Coordinate; 4],
    li: LineIntersector,
}

impl HotPixel {
    #[must_use]
    pub fn new(pt: Coordinate, scale: f64) -> Self {
        let scaled = Coordinate::new((pt.x * scale + 0.5).floor(), (pt.y * scale + 0.5).floor());
        let (min_x, max_x) = (scaled.x - 0.5, scaled.x + 0.5);
        let (min_y, max_y) = (scaled.y - 0.5, scaled.y + 0.5);
        Self {
            center: Coordinate::new(scaled.x / scale, scaled.y / scale),
            scaled,
            scale,
            corners: [
                Coordinate::new(max_x, max_y),
                Coordinate::new(min_x, max_y),
                Coordinate::new(min_x, min_y),
                Coordinate::new(max_x, min_y),
            ],
            li: LineIntersector::new(),
        }
    }

    /// The grid point segments are snapped to.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.center
    }

    /// A slightly enlarged envelope of the pixel, for index queries.
    #[must_use]
    pub fn safe_envelope(&self) -> Envelope {
        let tolerance = 0.75 / self.scale;
        Envelope::from_points(&self.center, &self.center).expanded_by(tolerance)
    }

    /// Returns `true` if segment `p0`-`p1` passes through the pixel.
    ///
    /// The pixel is closed on its left and bottom sides and open on the others,
    /// so a segment touching only a shared corner belongs to a single pixel.
    #[must_use]
    pub fn intersects(&self, p0: &Coordinate, p1: &Coordinate) -> bool {
        let a = Coordinate::new(p0.x * self.scale, p0.y * self.scale);
        let b = Coordinate::new(p1.x * self.scale, p1.y * self.scale);
        let [upper_right, upper_left, lower_left, lower_right] = self.corners;
        if a.x.max(b.x) < lower_left.x
            || a.x.min(b.x) > upper_right.x
            || a.y.max(b.y) < lower_left.y
            || a.y.min(b.y) > upper_right.y
        {
            return false;
        }

        let top = self.li.compute(&a, &b, &upper_right, &upper_left);
        if top.is_proper() {
            return true;
        }
        let left = self.li.compute(&a, &b, &upper_left, &lower_left);
        if left.is_proper() {
            return true;
        }
        let bottom = self.li.compute(&a, &b, &lower_left, &lower_right);
        if bottom.is_proper() {
            return true;
        }
        let right = self.li.compute(&a, &b, &lower_right, &upper_right);
        if right.is_proper() {
            return true;
        }
        if left.has_intersection() && bottom.has_intersection() {
            return true;
        }
        a == self.scaled || b == self.scaled
    }

    /// Adds the pixel centre as a node on segment `seg` of `string` if the
    /// segment passes through the pixel.
    pub fn add_snapped_node<S: SegmentString>(&self, string: &mut S, seg: usize) -> bool {
        let pts = string.coordinates();
        if !self.intersects(&pts[seg], &pts[seg + 1]) {
            return false;
        }
        string.add_intersection(self.center, seg);
        true
    }
}

/// Noder producing output with every vertex on a fixed grid.
///
/// Runs rounds of intersect-and-snap until the output validates as fully
/// noded in floating precision. Snapping every segment through the hot
/// pixels of all vertices and intersections creates no new crossings, so a
/// single round suffices with exact arithmetic; later rounds only absorb
/// disagreements between the fixed-precision intersector and the floating
/// validator. Running out of rounds is a `TopologyError`.
#[derive(Debug)]
pub struct SnapRoundingNoder {
    precision: PrecisionModel,
    scale: f64,
    li: LineIntersector,
    max_rounds: usize,
    rounds: usize,
}

impl SnapRoundingNoder {
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidPrecision` for a non-positive or non-finite scale.
    pub fn new(scale: f64) -> Result<Self, GeometryError> {
        let precision = PrecisionModel::fixed(scale)?;
        Ok(Self {
            precision,
            scale,
            li: LineIntersector::with_precision(precision),
            max_rounds: 5,
            rounds: 0,
        })
    }

    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    #[must_use]
    pub fn precision(&self) -> PrecisionModel {
        self.precision
    }

    /// Rounds run by the last call to [`Noder::node`].
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    fn snap_round(&self, strings: &mut [NodedSegmentString]) {
        let mut adder = IntersectionAdder::new(self.li);
        McIndexNoder::new(self.li).compute_nodes(strings, &mut adder);

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
        let snapper = PixelSnapper {
            chains: &chains,
            index: &index,
        };

        for pt in adder.interior_intersections() {
            snapper.snap(&HotPixel::new(*pt, self.scale), strings, None);
        }

        for i in 0..strings.len() {
            let pts = strings[i].coordinates().to_vec();
            let count = if strings[i].is_closed() {
                pts.len() - 1
            } else {
                pts.len()
            };
            for (v, pt) in pts.iter().enumerate().take(count) {
                let pixel = HotPixel::new(*pt, self.scale);
                if snapper.snap(&pixel, strings, Some((i, v))) {
                    strings[i].add_intersection(*pt, v);
                }
            }
        }
    }
}

struct PixelSnapper<'a> {
    chains: &'a [MonotoneChain],
    index: &'a EnvelopeIndex<usize>,
}

impl PixelSnapper<'_> {
    /// Snaps every segment passing through `pixel`. When the pixel is built on
    /// vertex `v` of string `i`, the two segments of `i` meeting at `v` are
    /// skipped.
    fn snap(
        &self,
        pixel: &HotPixel,
        strings: &mut [NodedSegmentString],
        vertex: Option<(usize, usize)>,
    ) -> bool {
        let env = pixel.safe_envelope();
        let mut added = false;
        let mut segments = Vec::new();
        for &chain_id in self.index.query(&env) {
            let chain = &self.chains[chain_id];
            segments.clear();
            chain.select_segments(strings[chain.string].coordinates(), &env, &mut segments);
            for &seg in &segments {
                if let Some((parent, v)) = vertex {
                    if parent == chain.string && is_adjacent(&strings[parent], v, seg) {
                        continue;
                    }
                }
                let (p0, p1) = segment(strings, chain.string, seg);
                if pixel.intersects(&p0, &p1) {
                    strings[chain.string].add_intersection(pixel.coordinate(), seg);
                    added = true;
                }
            }
        }
        added
    }
}

fn is_adjacent(string: &NodedSegmentString, vertex: usize, seg: usize) -> bool {
    if seg == vertex || seg + 1 == vertex {
        return true;
    }
    let n = string.coordinates().len();
    string.is_closed() && vertex == 0 && seg + 2 == n
}

impl Noder for SnapRoundingNoder {
    fn node(
        &mut self,
        strings: Vec<NodedSegmentString>,
    ) -> Result<Vec<NodedSegmentString>, TopologyError> {
        let mut strings: Vec<NodedSegmentString> = strings
            .into_iter()
            .filter_map(|s| {
                let context = s.context();
                let rounded: Vec<Coordinate> = s
                    .coordinates()
                    .iter()
                    .map(|c| self.precision.make_precise(*c))
                    .collect();
                let pts = remove_repeated_points(&rounded);
                (pts.len() >= 2).then(|| NodedSegmentString::new(pts, context))
            })
            .collect();

        let validator = NodingValidator::default();
        let mut remaining = Vec::new();
        for round in 1..=self.max_rounds {
            self.rounds = round;
            self.snap_round(&mut strings);
            strings = NodedSegmentString::noded_substrings(strings)
                .into_iter()
                .filter_map(|s| {
                    let context = s.context();
                    let pts = remove_repeated_points(s.coordinates());
                    (pts.len() >= 2).then(|| NodedSegmentString::new(pts, context))
                })
                .collect();
            remaining =
                validator.interior_intersections(strings.iter().map(SegmentString::coordinates));
            if remaining.is_empty() {
                debug!(round, strings = strings.len(), "snap rounding converged");
                return Ok(strings);
            }
            debug!(
                round,
                remaining = remaining.len(),
                "snap rounding left interior intersections, running another round"
            );
        }
        Err(not_converged(&remaining))
    }
}

fn not_converged(remaining: &[Coordinate]) -> TopologyError {
    match remaining.first() {
        Some(pt) => TopologyError::at("snap rounding did not converge", *pt),
        None => TopologyError::new("snap rounding did not converge"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn string(v: &[(f64, f64)], context: usize) -> NodedSegmentString {
        NodedSegmentString::new(v.iter().map(|&p| p.into()).collect(), context)
    }

    fn on_grid(strings: &[NodedSegmentString]) -> bool {
        strings
            .iter()
            .flat_map(SegmentString::coordinates)
            .all(|c| c.x.fract() == 0.0 && c.y.fract() == 0.0)
    }

    #[test]
    fn pixel_centre_rounds_half_up() {
        let pixel = HotPixel::new(Coordinate::new(5.0, 0.5), 1.0);
        assert_eq!(pixel.coordinate(), Coordinate::new(5.0, 1.0));
        assert!(pixel.intersects(&Coordinate::new(0.0, 0.0), &Coordinate::new(10.0, 1.0)));
        assert!(!pixel.intersects(&Coordinate::new(0.0, 3.0), &Coordinate::new(10.0, 3.0)));
    }

    #[test]
    fn crossing_lines_snap_to_shared_grid_node() {
        let input = vec![
            string(&[(0.0, 0.0), (10.0, 1.0)], 0),
            string(&[(0.0, 1.0), (10.0, 0.0)], 1),
        ];
        let mut noder = SnapRoundingNoder::new(1.0).unwrap();
        let noded = noder.node(input).unwrap();
        assert_eq!(noder.rounds(), 1);
        assert_eq!(noded.len(), 4);
        assert!(on_grid(&noded));
        let centre = Coordinate::new(5.0, 1.0);
        assert!(noded
            .iter()
            .all(|s| s.coordinates().first() == Some(&centre) || s.coordinates().last() == Some(&centre)));
    }

    #[test]
    fn segment_through_vertex_pixel_is_snapped() {
        let input = vec![
            string(&[(0.0, 0.0), (10.0, 1.0)], 0),
            string(&[(5.0, 1.0), (5.0, 5.0)], 1),
        ];
        let noded = SnapRoundingNoder::new(1.0).unwrap().node(input).unwrap();
        assert_eq!(noded.len(), 3);
        let pieces: Vec<&NodedSegmentString> = noded.iter().filter(|s| s.context() == 0).collect();
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].coordinates().last(), Some(&Coordinate::new(5.0, 1.0)));
    }

    #[test]
    fn input_vertices_are_rounded() {
        let input = vec![string(&[(0.2, 0.2), (0.4, 0.1), (3.7, 0.2)], 7)];
        let noded = SnapRoundingNoder::new(1.0).unwrap().node(input).unwrap();
        assert_eq!(noded.len(), 1);
        assert_eq!(noded[0].context(), 7);
        assert_eq!(
            noded[0].coordinates(),
            &[Coordinate::new(0.0, 0.0), Coordinate::new(4.0, 0.0)]
        );
    }

    #[test]
    fn single_round_budget_is_enough_for_crossings() {
        let input = vec![
            string(&[(0.0, 0.0), (10.0, 1.0)], 0),
            string(&[(0.0, 1.0), (10.0, 0.0)], 1),
            string(&[(3.0, -2.0), (3.2, 4.0)], 2),
        ];
        let mut noder = SnapRoundingNoder::new(1.0).unwrap().with_max_rounds(1);
        let noded = noder.node(input).unwrap();
        assert_eq!(noder.rounds(), 1);
        assert!(on_grid(&noded));
        let validator = NodingValidator::default();
        assert!(validator
            .interior_intersections(noded.iter().map(SegmentString::coordinates))
            .is_empty());
    }

    #[test]
    fn zero_round_budget_is_raised_to_one() {
        let mut noder = SnapRoundingNoder::new(1.0).unwrap().with_max_rounds(0);
        noder.node(vec![string(&[(0.0, 0.0), (4.0, 0.0)], 0)]).unwrap();
        assert_eq!(noder.rounds(), 1);
    }

    #[test]
    fn non_convergence_reports_a_remaining_intersection() {
        let err = not_converged(&[Coordinate::new(2.0, 3.0), Coordinate::new(4.0, 4.0)]);
        assert_eq!(err.message, "snap rounding did not converge");
        assert_eq!(err.location, Some(Coordinate::new(2.0, 3.0)));
        assert_eq!(not_converged(&[]).location, None);
    }

    #[test]
    fn invalid_scale_is_rejected() {
        assert!(SnapRoundingNoder::new(0.0).is_err());
    }
}
