use std::collections::BTreeMap;

use slotmap::SlotMap;

use super::{label_star, Edge, EdgeEnd, Label, Location, Position};
use crate::error::TopologyError;
use crate::math::Coordinate;
use crate::noding::SegmentString;

slotmap::new_key_type! {
    /// Unique identifier for a node in a planar graph.
    pub struct NodeId;
}

slotmap::new_key_type! {
    /// Unique identifier for an edge in a planar graph.
    pub struct EdgeId;
}

slotmap::new_key_type! {
    /// Unique identifier for a directed edge in a planar graph.
    pub struct DirEdgeId;
}

/// A graph vertex: a distinct coordinate with the directed edges leaving it.
#[derive(Debug, Clone)]
pub struct Node {
    pub coord: Coordinate,
    pub label: Label,
    /// Outgoing directed edges in counter-clockwise order.
    star: Vec<DirEdgeId>,
}

impl Node {
    #[must_use]
    pub fn star(&self) -> &[DirEdgeId] {
        &self.star
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.star.len()
    }

    /// A node is isolated when only one input contributed to it.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.label.geometry_count() == 1
    }
}

/// One traversal direction of an edge.
#[derive(Debug, Clone)]
pub struct DirectedEdge {
    pub edge: EdgeId,
    pub forward: bool,
    /// Origin node.
    pub node: NodeId,
    pub end: EdgeEnd,
    /// Copy of the edge label, flipped for the reverse direction.
    pub label: Label,
    pub sym: DirEdgeId,
    pub next: Option<DirEdgeId>,
    pub next_min: Option<DirEdgeId>,
    pub edge_ring: Option<usize>,
    pub min_edge_ring: Option<usize>,
    pub in_result: bool,
    pub visited: bool,
}

impl DirectedEdge {
    /// A line edge of some input that is not inside any input area.
    #[must_use]
    pub fn is_line_edge(&self) -> bool {
        let is_line = self.label.is_line(0) || self.label.is_line(1);
        let exterior_if_area = |geom: usize| {
            !self.label.is_area_for(geom) || self.label.all_positions_equal(geom, Location::Exterior)
        };
        is_line && exterior_if_area(0) && exterior_if_area(1)
    }

    /// An area edge with the interior of both inputs on both sides, i.e. a
    /// collapsed piece of area boundary.
    #[must_use]
    pub fn is_interior_area_edge(&self) -> bool {
        (0..2).all(|geom| {
            self.label.is_area_for(geom)
                && self.label.location(geom, Position::Left) == Some(Location::Interior)
                && self.label.location(geom, Position::Right) == Some(Location::Interior)
        })
    }
}

/// Arena-backed planar graph of nodes, edges and directed edges.
///
/// Nodes are keyed by coordinate, so iteration is in coordinate order; edges
/// and directed edges iterate in insertion order.
#[derive(Debug, Default)]
pub struct PlanarGraph {
    nodes: SlotMap<NodeId, Node>,
    node_map: BTreeMap<Coordinate, NodeId>,
    edges: SlotMap<EdgeId, Edge>,
    edge_order: Vec<EdgeId>,
    dir_edges: SlotMap<DirEdgeId, DirectedEdge>,
    dir_edge_order: Vec<DirEdgeId>,
}

impl PlanarGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node at `coord`, creating it with an empty label if needed.
    pub fn add_node(&mut self, coord: Coordinate) -> NodeId {
        if let Some(&id) = self.node_map.get(&coord) {
            return id;
        }
        let id = self.nodes.insert(Node {
            coord,
            label: Label::line(None),
            star: Vec::new(),
        });
        self.node_map.insert(coord, id);
        id
    }

    #[must_use]
    pub fn find(&self, coord: &Coordinate) -> Option<NodeId> {
        self.node_map.get(coord).copied()
    }

    /// Adds edges with a directed edge pair each, creating their end nodes.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if an edge starts or ends with a zero-length
    /// segment.
    pub fn add_edges(&mut self, edges: Vec<Edge>) -> Result<(), TopologyError> {
        for edge in edges {
            self.add_edge(edge)?;
        }
        Ok(())
    }

    fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, TopologyError> {
        let pts = edge.coordinates();
        let n = pts.len();
        if n < 2 {
            return Err(TopologyError::new("edge has fewer than two points"));
        }
        let forward_end = EdgeEnd::new(pts[0], pts[1])?;
        let backward_end = EdgeEnd::new(pts[n - 1], pts[n - 2])?;
        let label = edge.label;
        let mut flipped = label;
        flipped.flip();

        let edge_id = self.edges.insert(edge);
        self.edge_order.push(edge_id);

        let start = self.add_node(forward_end.coordinate());
        let end = self.add_node(backward_end.coordinate());
        let forward = self.dir_edges.insert(new_dir_edge(edge_id, true, start, forward_end, label));
        let backward =
            self.dir_edges.insert(new_dir_edge(edge_id, false, end, backward_end, flipped));
        self.dir_edges[forward].sym = backward;
        self.dir_edges[backward].sym = forward;
        self.dir_edge_order.extend([forward, backward]);
        self.insert_into_star(start, forward);
        self.insert_into_star(end, backward);
        Ok(edge_id)
    }

    fn insert_into_star(&mut self, node: NodeId, de: DirEdgeId) {
        let end = self.dir_edges[de].end;
        let dir_edges = &self.dir_edges;
        let star = &mut self.nodes[node].star;
        let pos = star.partition_point(|other| dir_edges[*other].end.compare_direction(&end).is_le());
        star.insert(pos, de);
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Node ids in coordinate order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.node_map.values().copied().collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_map.values().map(|id| &self.nodes[*id])
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id]
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edge_order.iter().map(|id| &self.edges[*id])
    }

    #[must_use]
    pub fn dir_edge(&self, id: DirEdgeId) -> &DirectedEdge {
        &self.dir_edges[id]
    }

    pub fn dir_edge_mut(&mut self, id: DirEdgeId) -> &mut DirectedEdge {
        &mut self.dir_edges[id]
    }

    /// Directed edge ids in insertion order, each edge's forward direction first.
    #[must_use]
    pub fn dir_edge_ids(&self) -> &[DirEdgeId] {
        &self.dir_edge_order
    }

    /// The edge coordinates in the direction of `de`.
    #[must_use]
    pub fn dir_edge_coordinates(&self, de: DirEdgeId) -> Vec<Coordinate> {
        let de = &self.dir_edges[de];
        let pts = self.edges[de.edge].coordinates();
        if de.forward {
            pts.to_vec()
        } else {
            pts.iter().rev().copied().collect()
        }
    }

    /// Labels the directed edges around `node`; see [`label_star`].
    ///
    /// # Errors
    ///
    /// Propagates side location conflicts from the star.
    pub fn label_node_star(
        &mut self,
        node: NodeId,
        mut locate_in_area: impl FnMut(usize, &Coordinate) -> Location,
    ) -> Result<(), TopologyError> {
        let coord = self.nodes[node].coord;
        let star = self.nodes[node].star.clone();
        let mut labels: Vec<Label> = star.iter().map(|de| self.dir_edges[*de].label).collect();
        label_star(&mut labels, coord, |geom| locate_in_area(geom, &coord))?;
        for (de, label) in star.iter().zip(labels) {
            self.dir_edges[*de].label = label;
        }
        Ok(())
    }

    /// Node location implied by the incident edges: interior of an input if
    /// any incident edge lies in its interior or on its boundary.
    #[must_use]
    pub fn star_label(&self, node: NodeId) -> Label {
        let mut label = Label::line(None);
        for de in &self.nodes[node].star {
            let edge_label = self.edges[self.dir_edges[*de].edge].label;
            for geom in 0..2 {
                if matches!(edge_label.on(geom), Some(Location::Interior | Location::Boundary)) {
                    label.set_on(geom, Location::Interior);
                }
            }
        }
        label
    }

    /// Completes each directed edge label with its opposite's.
    pub fn merge_sym_labels(&mut self) {
        for id in self.node_ids() {
            for de in self.nodes[id].star.clone() {
                let sym_label = self.dir_edges[self.dir_edges[de].sym].label;
                self.dir_edges[de].label.merge(&sym_label);
            }
        }
    }

    /// Fills unknown locations of the star's edges from the node label.
    pub fn update_star_labelling(&mut self, node: NodeId) {
        let node_label = self.nodes[node].label;
        for de in &self.nodes[node].star {
            let label = &mut self.dir_edges[*de].label;
            for geom in 0..2 {
                if let Some(loc) = node_label.on(geom) {
                    label.set_all_locations_if_null(geom, loc);
                }
            }
        }
    }

    /// Returns `true` if an edge through `node` has been put in the result.
    #[must_use]
    pub fn is_incident_edge_in_result(&self, node: NodeId) -> bool {
        self.nodes[node]
            .star
            .iter()
            .any(|de| self.edges[self.dir_edges[*de].edge].is_in_result())
    }

    fn result_area_edges(&self, node: NodeId) -> Vec<DirEdgeId> {
        self.nodes[node]
            .star
            .iter()
            .copied()
            .filter(|de| {
                let de = &self.dir_edges[*de];
                de.in_result || self.dir_edges[de.sym].in_result
            })
            .collect()
    }

    /// Links each incoming result edge at `node` to the next outgoing result
    /// edge clockwise, forming maximal rings.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if an incoming result edge has no outgoing
    /// partner.
    pub fn link_result_directed_edges(&mut self, node: NodeId) -> Result<(), TopologyError> {
        let mut first_out = None;
        let mut incoming: Option<DirEdgeId> = None;
        for out in self.result_area_edges(node) {
            let sym = self.dir_edges[out].sym;
            if !self.dir_edges[out].label.is_area() {
                continue;
            }
            if first_out.is_none() && self.dir_edges[out].in_result {
                first_out = Some(out);
            }
            match incoming {
                None => {
                    if self.dir_edges[sym].in_result {
                        incoming = Some(sym);
                    }
                }
                Some(inc) => {
                    if self.dir_edges[out].in_result {
                        self.dir_edges[inc].next = Some(out);
                        incoming = None;
                    }
                }
            }
        }
        if let Some(inc) = incoming {
            let coord = self.nodes[node].coord;
            let out = first_out.ok_or_else(|| TopologyError::at("no outgoing dirEdge found", coord))?;
            self.dir_edges[inc].next = Some(out);
        }
        Ok(())
    }

    /// Links the edges of maximal ring `ring` at `node` into minimal rings,
    /// turning counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if the ring has an incoming edge at the node
    /// but no outgoing one.
    pub fn link_minimal_directed_edges(
        &mut self,
        node: NodeId,
        ring: usize,
    ) -> Result<(), TopologyError> {
        let mut first_out = None;
        let mut incoming: Option<DirEdgeId> = None;
        for out in self.result_area_edges(node).into_iter().rev() {
            let sym = self.dir_edges[out].sym;
            if first_out.is_none() && self.dir_edges[out].edge_ring == Some(ring) {
                first_out = Some(out);
            }
            match incoming {
                None => {
                    if self.dir_edges[sym].edge_ring == Some(ring) {
                        incoming = Some(sym);
                    }
                }
                Some(inc) => {
                    if self.dir_edges[out].edge_ring == Some(ring) {
                        self.dir_edges[inc].next_min = Some(out);
                        incoming = None;
                    }
                }
            }
        }
        if let Some(inc) = incoming {
            let coord = self.nodes[node].coord;
            let out = first_out
                .ok_or_else(|| TopologyError::at("found no outgoing edge of minimal ring", coord))?;
            self.dir_edges[inc].next_min = Some(out);
        }
        Ok(())
    }

    /// Number of directed edges leaving `node` that belong to maximal ring `ring`.
    #[must_use]
    pub fn outgoing_degree(&self, node: NodeId, ring: usize) -> usize {
        self.nodes[node]
            .star
            .iter()
            .filter(|de| self.dir_edges[**de].edge_ring == Some(ring))
            .count()
    }
}

fn new_dir_edge(
    edge: EdgeId,
    forward: bool,
    node: NodeId,
    end: EdgeEnd,
    label: Label,
) -> DirectedEdge {
    DirectedEdge {
        edge,
        forward,
        node,
        end,
        label,
        sym: DirEdgeId::default(),
        next: None,
        next_min: None,
        edge_ring: None,
        min_edge_ring: None,
        in_result: false,
        visited: false,
    }
}
