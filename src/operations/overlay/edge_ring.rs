use crate::error::TopologyError;
use crate::geometry::LinearRing;
use crate::math::polygon_2d::is_ccw;
use crate::math::{Coordinate, Envelope};
use crate::topology::{DirEdgeId, PlanarGraph};

/// Which links a ring follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RingKind {
    /// Follows `next`; may pass through a node more than once.
    Maximal,
    /// Follows `next_min`; one face.
    Minimal,
}

/// A closed cycle of result directed edges.
///
/// Result edges carry the result interior on their right, so a shell runs
/// clockwise and a hole counter-clockwise.
#[derive(Debug, Clone)]
pub(crate) struct EdgeRing {
    id: usize,
    edges: Vec<DirEdgeId>,
    pts: Vec<Coordinate>,
    is_hole: bool,
    env: Envelope,
}

impl EdgeRing {
    /// Walks the ring starting at `start` and tags its edges with `id`.
    pub(crate) fn build(
        graph: &mut PlanarGraph,
        start: DirEdgeId,
        kind: RingKind,
        id: usize,
    ) -> Result<Self, TopologyError> {
        let mut edges = Vec::new();
        let mut pts: Vec<Coordinate> = Vec::new();
        let mut de = start;
        loop {
            let d = graph.dir_edge(de);
            let coord = d.end.coordinate();
            let tag = match kind {
                RingKind::Maximal => d.edge_ring,
                RingKind::Minimal => d.min_edge_ring,
            };
            if tag == Some(id) {
                return Err(TopologyError::at("directed edge visited twice during ring-building", coord));
            }
            if !d.label.is_area() {
                return Err(TopologyError::at("ring edge is not an area edge", coord));
            }
            let next = match kind {
                RingKind::Maximal => d.next,
                RingKind::Minimal => d.next_min,
            };

            let coords = graph.dir_edge_coordinates(de);
            let skip = usize::from(!pts.is_empty());
            pts.extend(coords.into_iter().skip(skip));
            edges.push(de);

            let d = graph.dir_edge_mut(de);
            match kind {
                RingKind::Maximal => d.edge_ring = Some(id),
                RingKind::Minimal => d.min_edge_ring = Some(id),
            }

            de = next.ok_or_else(|| TopologyError::at("found null directed edge", coord))?;
            if de == start {
                break;
            }
        }
        let is_hole = is_ccw(&pts);
        let env = Envelope::of_coords(&pts);
        Ok(Self {
            id,
            edges,
            pts,
            is_hole,
            env,
        })
    }

    pub(crate) fn is_hole(&self) -> bool {
        self.is_hole
    }

    pub(crate) fn coordinates(&self) -> &[Coordinate] {
        &self.pts
    }

    pub(crate) fn envelope(&self) -> &Envelope {
        &self.env
    }

    pub(crate) fn to_linear_ring(&self) -> LinearRing {
        LinearRing::new(self.pts.clone())
    }

    /// Marks the underlying edges as part of the result.
    pub(crate) fn set_in_result(&self, graph: &mut PlanarGraph) {
        for &de in &self.edges {
            let edge = graph.dir_edge(de).edge;
            graph.edge_mut(edge).set_in_result(true);
        }
    }

    /// Twice the largest number of this ring's edges leaving any one node.
    pub(crate) fn max_node_degree(&self, graph: &PlanarGraph) -> usize {
        self.edges
            .iter()
            .map(|&de| graph.outgoing_degree(graph.dir_edge(de).node, self.id))
            .max()
            .unwrap_or(0)
            * 2
    }

    /// Splits a maximal ring into the minimal rings it is made of, numbering
    /// them from `next_id`.
    pub(crate) fn build_minimal_rings(
        &self,
        graph: &mut PlanarGraph,
        next_id: &mut usize,
    ) -> Result<Vec<EdgeRing>, TopologyError> {
        for &de in &self.edges {
            let node = graph.dir_edge(de).node;
            graph.link_minimal_directed_edges(node, self.id)?;
        }
        let mut rings = Vec::new();
        for &de in &self.edges {
            if graph.dir_edge(de).min_edge_ring.is_none() {
                rings.push(EdgeRing::build(graph, de, RingKind::Minimal, *next_id)?);
                *next_id += 1;
            }
        }
        Ok(rings)
    }
}
