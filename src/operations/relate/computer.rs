use std::collections::BTreeMap;

use tracing::debug;

use super::IntersectionMatrix;
use crate::error::{GeometryError, TopologyError};
use crate::geometry::{locate_point_in_area, Geometry, PointLocator};
use crate::math::{Coordinate, LineIntersector};
use crate::topology::{
    label_star, BoundaryNodeRule, Dimension, EdgeEnd, GeometryGraph, IntersectionSummary, Label,
    Location, Position,
};

/// Edge ends leaving a node in the same direction, summarised by one label.
#[derive(Debug, Clone)]
struct EdgeEndBundle {
    end: EdgeEnd,
    labels: Vec<Label>,
    label: Label,
}

impl EdgeEndBundle {
    fn new(end: EdgeEnd, label: Label) -> Self {
        Self {
            end,
            labels: vec![label],
            label: Label::line(None),
        }
    }

    /// Boundary ends are counted through the boundary node rule; otherwise
    /// the bundle is interior if any end is.
    fn compute_label(&mut self, rule: &dyn BoundaryNodeRule) {
        let is_area = self.labels.iter().any(Label::is_area);
        let mut label = if is_area {
            Label::area(None, None, None)
        } else {
            Label::line(None)
        };
        for geom in 0..2 {
            let boundaries = self
                .labels
                .iter()
                .filter(|l| l.on(geom) == Some(Location::Boundary))
                .count();
            let on = if boundaries > 0 {
                Some(if rule.is_in_boundary(boundaries) {
                    Location::Boundary
                } else {
                    Location::Interior
                })
            } else if self.labels.iter().any(|l| l.on(geom) == Some(Location::Interior)) {
                Some(Location::Interior)
            } else {
                None
            };
            if let Some(on) = on {
                label.set_on(geom, on);
            }
            if is_area {
                for side in [Position::Left, Position::Right] {
                    label.set_location(geom, side, self.side_location(geom, side));
                }
            }
        }
        self.label = label;
    }

    fn side_location(&self, geom: usize, side: Position) -> Option<Location> {
        let mut found = None;
        for l in self.labels.iter().filter(|l| l.is_area()) {
            match l.location(geom, side) {
                Some(Location::Interior) => return Some(Location::Interior),
                Some(Location::Exterior) => found = Some(Location::Exterior),
                _ => {}
            }
        }
        found
    }
}

#[derive(Debug, Clone)]
struct RelateNode {
    label: Label,
    /// Counter-clockwise around the node.
    bundles: Vec<EdgeEndBundle>,
}

impl RelateNode {
    fn new() -> Self {
        Self {
            label: Label::line(None),
            bundles: Vec::new(),
        }
    }

    fn insert(&mut self, end: EdgeEnd, label: Label) {
        let pos = self
            .bundles
            .partition_point(|b| b.end.compare_direction(&end).is_lt());
        match self.bundles.get_mut(pos) {
            Some(bundle) if bundle.end.compare_direction(&end).is_eq() => bundle.labels.push(label),
            _ => self.bundles.insert(pos, EdgeEndBundle::new(end, label)),
        }
    }
}

/// Computes the intersection matrix of two geometries from the graph of
/// their noded edges. Proper intersections are not inserted as nodes: their
/// contribution to the matrix follows from the dimensions of the inputs.
pub struct RelateComputer<'a> {
    arg: [GeometryGraph<'a>; 2],
    rule: &'a dyn BoundaryNodeRule,
    nodes: BTreeMap<Coordinate, RelateNode>,
    li: LineIntersector,
}

impl std::fmt::Debug for RelateComputer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelateComputer")
            .field("arg", &self.arg)
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl<'a> RelateComputer<'a> {
    /// # Errors
    ///
    /// Returns a `GeometryError` if either input is malformed.
    pub fn new(
        a: &'a Geometry,
        b: &'a Geometry,
        rule: &'a dyn BoundaryNodeRule,
    ) -> Result<Self, GeometryError> {
        Ok(Self {
            arg: [GeometryGraph::new(0, a, rule)?, GeometryGraph::new(1, b, rule)?],
            rule,
            nodes: BTreeMap::new(),
            li: LineIntersector::new(),
        })
    }

    /// # Errors
    ///
    /// Returns a `TopologyError` if the edge labels around a node are
    /// inconsistent.
    pub fn compute(mut self) -> Result<IntersectionMatrix, TopologyError> {
        let mut im = IntersectionMatrix::new();
        im.set(Location::Exterior, Location::Exterior, Dimension::Area);

        let (ga, gb) = (self.arg[0].geometry(), self.arg[1].geometry());
        if !ga.envelope().intersects(&gb.envelope()) {
            self.compute_disjoint_im(&mut im);
            return Ok(im);
        }

        let [a, b] = &mut self.arg;
        a.compute_self_nodes(self.li, false);
        b.compute_self_nodes(self.li, false);
        let summary = a.compute_edge_intersections(b, self.li, false);
        debug!(
            intersections = summary.intersections,
            proper = summary.has_proper,
            "relate noding done"
        );

        for arg in 0..2 {
            self.compute_intersection_nodes(arg);
        }
        for arg in 0..2 {
            self.copy_nodes_and_labels(arg);
        }
        self.label_isolated_nodes();
        self.compute_proper_intersection_im(&summary, &mut im);

        for arg in 0..2 {
            self.insert_edge_ends(arg)?;
        }
        self.label_node_edges()?;
        self.label_isolated_edges(0, 1);
        self.label_isolated_edges(1, 0);
        self.update_im(&mut im);
        Ok(im)
    }

    fn compute_disjoint_im(&self, im: &mut IntersectionMatrix) {
        let (ga, gb) = (self.arg[0].geometry(), self.arg[1].geometry());
        if !ga.is_empty() {
            im.set(Location::Interior, Location::Exterior, ga.dimension());
            im.set(Location::Boundary, Location::Exterior, ga.boundary_dimension(self.rule));
        }
        if !gb.is_empty() {
            im.set(Location::Exterior, Location::Interior, gb.dimension());
            im.set(Location::Exterior, Location::Boundary, gb.boundary_dimension(self.rule));
        }
    }

    /// A proper intersection fixes some entries outright. Area/area is
    /// `212101212`; a line properly crossing an area boundary away from any
    /// boundary node has parts in both the area's interior and exterior.
    fn compute_proper_intersection_im(&self, summary: &IntersectionSummary, im: &mut IntersectionMatrix) {
        let dim_a = self.arg[0].geometry().dimension();
        let dim_b = self.arg[1].geometry().dimension();
        let (proper, proper_interior) = match (dim_a, dim_b) {
            (Dimension::Area, Dimension::Area) => (Some("212101212"), None),
            (Dimension::Area, Dimension::Line) => (Some("FFF0FFFF2"), Some("1FFFFF1FF")),
            (Dimension::Line, Dimension::Area) => (Some("F0FFFFFF2"), Some("1F1FFFFFF")),
            (Dimension::Line, Dimension::Line) => (None, Some("0FFFFFFFF")),
            _ => return,
        };
        let mut apply = |pattern: Option<&str>, found: bool| {
            if let (Some(pattern), true) = (pattern, found) {
                let applied = im.set_at_least_pattern(pattern).is_ok();
                debug_assert!(applied, "constant pattern {pattern} rejected");
            }
        };
        apply(proper, summary.has_proper);
        apply(proper_interior, summary.has_proper_interior);
    }

    /// Creates nodes for the intersections found on the edges of `arg`.
    fn compute_intersection_nodes(&mut self, arg: usize) {
        for edge in self.arg[arg].edges() {
            let on_boundary = edge.label.on(arg) == Some(Location::Boundary);
            for node in edge.nodes().iter() {
                let rn = self.nodes.entry(node.coord).or_insert_with(RelateNode::new);
                if on_boundary {
                    rn.label.set_on(arg, Location::Boundary);
                } else if rn.label.is_null(arg) {
                    rn.label.set_on(arg, Location::Interior);
                }
            }
        }
    }

    /// Input nodes carry the authoritative location for their own geometry.
    fn copy_nodes_and_labels(&mut self, arg: usize) {
        for (coord, loc) in self.arg[arg].nodes() {
            self.nodes
                .entry(coord)
                .or_insert_with(RelateNode::new)
                .label
                .set_on(arg, loc);
        }
    }

    /// A node known to only one input is located in the other directly.
    fn label_isolated_nodes(&mut self) {
        let locator = PointLocator::new(self.rule);
        for (coord, node) in &mut self.nodes {
            if node.label.geometry_count() != 1 {
                continue;
            }
            let target = usize::from(!node.label.is_null(0));
            let loc = locator.locate(coord, self.arg[target].geometry());
            node.label.set_all_locations(target, loc);
        }
    }

    fn insert_edge_ends(&mut self, arg: usize) -> Result<(), TopologyError> {
        for edge in self.arg[arg].edges() {
            let mut flipped = edge.label;
            flipped.flip();
            for piece in edge.node_pieces() {
                let n = piece.len();
                if n < 2 {
                    continue;
                }
                let forward = EdgeEnd::new(piece[0], piece[1])?;
                let backward = EdgeEnd::new(piece[n - 1], piece[n - 2])?;
                self.nodes
                    .entry(piece[0])
                    .or_insert_with(RelateNode::new)
                    .insert(forward, edge.label);
                self.nodes
                    .entry(piece[n - 1])
                    .or_insert_with(RelateNode::new)
                    .insert(backward, flipped);
            }
        }
        Ok(())
    }

    fn label_node_edges(&mut self) -> Result<(), TopologyError> {
        let geoms = [self.arg[0].geometry(), self.arg[1].geometry()];
        for (coord, node) in &mut self.nodes {
            for bundle in &mut node.bundles {
                bundle.compute_label(self.rule);
            }
            let mut labels: Vec<Label> = node.bundles.iter().map(|b| b.label).collect();
            label_star(&mut labels, *coord, |geom| locate_point_in_area(coord, geoms[geom]))?;
            for (bundle, label) in node.bundles.iter_mut().zip(labels) {
                bundle.label = label;
            }
        }
        Ok(())
    }

    /// An edge that met nothing of the other input lies wholly in one of
    /// its interior or exterior.
    fn label_isolated_edges(&mut self, this: usize, target: usize) {
        let target_geom = self.arg[target].geometry();
        let locator = PointLocator::new(self.rule);
        for edge in self.arg[this].edges_mut() {
            if !edge.is_isolated() {
                continue;
            }
            let loc = if target_geom.dimension() > Dimension::Point {
                locator.locate(&edge.coordinate(), target_geom)
            } else {
                Location::Exterior
            };
            edge.label.set_all_locations(target, loc);
        }
    }

    fn update_im(&self, im: &mut IntersectionMatrix) {
        for graph in &self.arg {
            for edge in graph.edges().iter().filter(|e| e.is_isolated()) {
                update_im_from_edge_label(&edge.label, im);
            }
        }
        for node in self.nodes.values() {
            im.set_at_least_if_valid(node.label.on(0), node.label.on(1), Dimension::Point);
            for bundle in &node.bundles {
                update_im_from_edge_label(&bundle.label, im);
            }
        }
    }
}

fn update_im_from_edge_label(label: &Label, im: &mut IntersectionMatrix) {
    im.set_at_least_if_valid(label.on(0), label.on(1), Dimension::Line);
    if label.is_area() {
        for side in [Position::Left, Position::Right] {
            im.set_at_least_if_valid(label.location(0, side), label.location(1, side), Dimension::Area);
        }
    }
}
