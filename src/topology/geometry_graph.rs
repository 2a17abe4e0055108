use std::collections::BTreeMap;
use std::mem;

use super::{
    BoundaryNodeRule, Edge, GraphIntersector, IntersectionSummary, Label, Location, Pairing,
};
use crate::error::GeometryError;
use crate::geometry::{Geometry, Polygon};
use crate::math::polygon_2d::{is_ccw, remove_repeated_points};
use crate::math::{Coordinate, LineIntersector};
use crate::noding::McIndexNoder;

#[derive(Debug, Clone, Copy)]
struct NodeInfo {
    location: Location,
    endpoints: usize,
    on_ring: bool,
}

/// The edges and nodes of one input geometry, labelled for that input only.
///
/// Polygon rings become area edges with the interior on the side given by
/// the ring's role, whatever its orientation; line strings become line edges.
/// Nodes record the location of ring starts, line endpoints, points and,
/// after noding, self-intersections.
pub struct GeometryGraph<'a> {
    arg_index: usize,
    geometry: &'a Geometry,
    rule: &'a dyn BoundaryNodeRule,
    edges: Vec<Edge>,
    nodes: BTreeMap<Coordinate, NodeInfo>,
}

impl std::fmt::Debug for GeometryGraph<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryGraph")
            .field("arg_index", &self.arg_index)
            .field("edges", &self.edges.len())
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl<'a> GeometryGraph<'a> {
    /// Builds the graph of input `arg_index` (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns a `GeometryError` if the geometry is malformed.
    pub fn new(
        arg_index: usize,
        geometry: &'a Geometry,
        rule: &'a dyn BoundaryNodeRule,
    ) -> Result<Self, GeometryError> {
        geometry.validate()?;
        let mut graph = Self {
            arg_index,
            geometry,
            rule,
            edges: Vec::new(),
            nodes: BTreeMap::new(),
        };
        graph.add(geometry);
        Ok(graph)
    }

    #[must_use]
    pub fn arg_index(&self) -> usize {
        self.arg_index
    }

    #[must_use]
    pub fn geometry(&self) -> &'a Geometry {
        self.geometry
    }

    #[must_use]
    pub fn rule(&self) -> &'a dyn BoundaryNodeRule {
        self.rule
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    /// Swaps in an externally noded edge set.
    pub fn replace_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
    }

    /// Node coordinates with their location in this input.
    pub fn nodes(&self) -> impl Iterator<Item = (Coordinate, Location)> + '_ {
        self.nodes.iter().map(|(c, info)| (*c, info.location))
    }

    #[must_use]
    pub fn node_location(&self, coord: &Coordinate) -> Option<Location> {
        self.nodes.get(coord).map(|info| info.location)
    }

    #[must_use]
    pub fn boundary_nodes(&self) -> Vec<Coordinate> {
        self.nodes
            .iter()
            .filter(|(_, info)| info.location == Location::Boundary)
            .map(|(c, _)| *c)
            .collect()
    }

    fn add(&mut self, geometry: &Geometry) {
        match geometry {
            Geometry::Point(c) => self.insert_point(*c, Location::Interior),
            Geometry::MultiPoint(pts) => {
                for c in pts {
                    self.insert_point(*c, Location::Interior);
                }
            }
            Geometry::LineString(l) => self.add_line(&l.coords),
            Geometry::LinearRing(r) => self.add_line(&r.coords),
            Geometry::MultiLineString(lines) => {
                for l in lines {
                    self.add_line(&l.coords);
                }
            }
            Geometry::Polygon(p) => self.add_polygon(p),
            Geometry::MultiPolygon(polys) => {
                for p in polys {
                    self.add_polygon(p);
                }
            }
            Geometry::GeometryCollection(geoms) => {
                for g in geoms {
                    self.add(g);
                }
            }
        }
    }

    fn add_polygon(&mut self, polygon: &Polygon) {
        self.add_ring(&polygon.shell.coords, Location::Exterior, Location::Interior);
        for hole in &polygon.holes {
            self.add_ring(&hole.coords, Location::Interior, Location::Exterior);
        }
    }

    /// `cw_left` and `cw_right` are the sides of the ring when it runs clockwise.
    fn add_ring(&mut self, coords: &[Coordinate], cw_left: Location, cw_right: Location) {
        let pts = remove_repeated_points(coords);
        if pts.len() < 4 {
            return;
        }
        let (left, right) = if is_ccw(&pts) {
            (cw_right, cw_left)
        } else {
            (cw_left, cw_right)
        };
        let start = pts[0];
        self.edges.push(Edge::new(
            pts,
            Label::area_for(self.arg_index, Location::Boundary, left, right),
        ));
        let info = self.node_entry(start);
        info.on_ring = true;
        info.location = Location::Boundary;
    }

    fn add_line(&mut self, coords: &[Coordinate]) {
        let pts = remove_repeated_points(coords);
        let (Some(&first), Some(&last)) = (pts.first(), pts.last()) else {
            return;
        };
        if pts.len() < 2 {
            return;
        }
        self.edges
            .push(Edge::new(pts, Label::line_for(self.arg_index, Location::Interior)));
        self.insert_endpoint(first);
        self.insert_endpoint(last);
    }

    fn node_entry(&mut self, coord: Coordinate) -> &mut NodeInfo {
        self.nodes.entry(coord).or_insert(NodeInfo {
            location: Location::Interior,
            endpoints: 0,
            on_ring: false,
        })
    }

    fn insert_point(&mut self, coord: Coordinate, location: Location) {
        self.node_entry(coord).location = location;
    }

    /// Line endpoints are counted; the rule decides from the total count.
    fn insert_endpoint(&mut self, coord: Coordinate) {
        let rule = self.rule;
        let info = self.node_entry(coord);
        info.endpoints += 1;
        info.location = if info.on_ring || rule.is_in_boundary(info.endpoints) {
            Location::Boundary
        } else {
            Location::Interior
        };
    }

    /// Nodes the edges of this graph against each other.
    ///
    /// Rings of valid areas do not self-intersect, so unless
    /// `compute_ring_self_nodes` is set an area edge is only tested against
    /// other edges.
    pub fn compute_self_nodes(
        &mut self,
        li: LineIntersector,
        compute_ring_self_nodes: bool,
    ) -> IntersectionSummary {
        let is_area = matches!(
            self.geometry,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::LinearRing(_)
        );
        let test_all = compute_ring_self_nodes || !is_area;
        let mut si = GraphIntersector::new(li, true, false, Pairing::SelfNodes { test_all });
        McIndexNoder::new(li).compute_nodes(&mut self.edges, &mut si);
        self.add_self_intersection_nodes();
        si.summary()
    }

    fn add_self_intersection_nodes(&mut self) {
        let found: Vec<(Coordinate, Option<Location>)> = self
            .edges
            .iter()
            .flat_map(|e| {
                let loc = e.label.on(self.arg_index);
                e.nodes().iter().map(move |n| (n.coord, loc))
            })
            .collect();
        for (coord, loc) in found {
            if self.node_location(&coord) == Some(Location::Boundary) {
                continue;
            }
            match loc {
                Some(Location::Boundary) => self.node_entry(coord).location = Location::Boundary,
                Some(loc) => self.insert_point(coord, loc),
                None => {}
            }
        }
    }

    /// Nodes the edges of this graph against those of `other`, recording the
    /// intersection points on both edge sets. Edges that meet the other graph
    /// stop being isolated.
    pub fn compute_edge_intersections(
        &mut self,
        other: &mut GeometryGraph<'_>,
        li: LineIntersector,
        include_proper: bool,
    ) -> IntersectionSummary {
        let mut boundary = self.boundary_nodes();
        boundary.extend(other.boundary_nodes());

        let split = self.edges.len();
        let mut all = mem::take(&mut self.edges);
        all.append(&mut other.edges);
        let mut si = GraphIntersector::new(li, include_proper, true, Pairing::Across { split })
            .with_boundary_nodes(boundary);
        McIndexNoder::new(li).compute_nodes(&mut all, &mut si);
        other.edges = all.split_off(split);
        self.edges = all;
        si.summary()
    }

    /// Splits every edge at its nodes.
    pub fn split_edges(&mut self) -> Vec<Edge> {
        self.edges.iter_mut().flat_map(Edge::split_at_nodes).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, LinearRing};
    use crate::noding::SegmentString;
    use crate::topology::{BoundaryRule, Position};

    fn square(x: f64, y: f64, size: f64, ccw: bool) -> Polygon {
        let mut pts = vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)];
        if !ccw {
            pts.reverse();
        }
        Polygon::from(pts)
    }

    #[test]
    fn ring_sides_do_not_depend_on_orientation() {
        let rule = BoundaryRule::Mod2;
        for ccw in [true, false] {
            let mut poly = square(0.0, 0.0, 10.0, ccw);
            poly.holes.push(square(2.0, 2.0, 2.0, ccw).shell);
            let geom = Geometry::Polygon(poly);
            let graph = GeometryGraph::new(0, &geom, &rule).unwrap();
            let (shell, hole) = (&graph.edges()[0], &graph.edges()[1]);
            let shell_interior_left = shell.label.location(0, Position::Left) == Some(Location::Interior);
            let hole_interior_left = hole.label.location(0, Position::Left) == Some(Location::Interior);
            // Going CCW the interior is on the left of a shell, on the right of a hole.
            assert_eq!(shell_interior_left, ccw);
            assert_eq!(hole_interior_left, !ccw);
            assert_eq!(
                graph.node_location(&Coordinate::new(0.0, 0.0)),
                Some(Location::Boundary)
            );
        }
    }

    #[test]
    fn endpoint_locations_follow_the_rule() {
        let geom = Geometry::MultiLineString(vec![
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]),
            LineString::from(vec![(1.0, 0.0), (2.0, 0.0)]),
        ]);
        let mod2 = BoundaryRule::Mod2;
        let graph = GeometryGraph::new(0, &geom, &mod2).unwrap();
        assert_eq!(graph.node_location(&Coordinate::new(1.0, 0.0)), Some(Location::Interior));
        assert_eq!(graph.node_location(&Coordinate::new(2.0, 0.0)), Some(Location::Boundary));
        let endpoint = BoundaryRule::EndPoint;
        let graph = GeometryGraph::new(0, &geom, &endpoint).unwrap();
        assert_eq!(graph.node_location(&Coordinate::new(1.0, 0.0)), Some(Location::Boundary));
        assert_eq!(graph.boundary_nodes().len(), 3);
    }

    #[test]
    fn self_crossing_line_gets_an_interior_node() {
        let geom = Geometry::LineString(LineString::from(vec![
            (0.0, 0.0),
            (2.0, 2.0),
            (2.0, 0.0),
            (0.0, 2.0),
        ]));
        let rule = BoundaryRule::Mod2;
        let mut graph = GeometryGraph::new(0, &geom, &rule).unwrap();
        graph.compute_self_nodes(LineIntersector::new(), false);
        assert_eq!(graph.node_location(&Coordinate::new(1.0, 1.0)), Some(Location::Interior));
        assert_eq!(graph.split_edges().len(), 3);
    }

    #[test]
    fn cross_intersections_split_both_graphs() {
        let a = Geometry::Polygon(square(0.0, 0.0, 2.0, true));
        let b = Geometry::LineString(LineString::from(vec![(1.0, -1.0), (1.0, 3.0)]));
        let rule = BoundaryRule::Mod2;
        let mut ga = GeometryGraph::new(0, &a, &rule).unwrap();
        let mut gb = GeometryGraph::new(1, &b, &rule).unwrap();
        let summary = ga.compute_edge_intersections(&mut gb, LineIntersector::new(), true);
        assert_eq!(summary.intersections, 2);
        assert!(summary.has_proper_interior);
        assert!(!gb.edges()[0].is_isolated());
        let pieces = gb.split_edges();
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[1].coordinates()[0], Coordinate::new(1.0, 0.0));
        assert_eq!(ga.split_edges().len(), 3);
    }

    #[test]
    fn malformed_input_is_rejected() {
        let geom = Geometry::Polygon(Polygon::new(
            LinearRing::from(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]),
            Vec::new(),
        ));
        let rule = BoundaryRule::Mod2;
        assert!(GeometryGraph::new(0, &geom, &rule).is_err());
    }
}
