use std::borrow::Cow;

use tracing::debug;

use super::assemble::build_polygons;
use super::edge_list::EdgeList;
use super::lines::{build_lines, build_points};
use super::select::{is_result_of_op, result_dimension, OpCode};
use super::snap::{run_with_snap_retry, snap_round_edges};
use super::OverlayOptions;
use crate::error::{OverlayError, Result, TopologyError};
use crate::geometry::{locate_point_in_area, Geometry, PointLocator};
use crate::math::{Coordinate, LineIntersector, PrecisionModel};
use crate::noding::NodingValidator;
use crate::operations::relate::check_not_collection;
use crate::topology::{BoundaryRule, Dimension, GeometryGraph, PlanarGraph, Position};

/// Progress of an overlay computation.
#[derive(Debug, Clone)]
pub enum OverlayState {
    Init,
    Noding,
    GraphBuilt,
    Labeled,
    RingsAssembled,
    Done,
    Failed(OverlayError),
}

/// Counters from the last call to [`OverlayOp::compute`], summed over all
/// attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayStats {
    /// Noding passes run; a snap-rounded attempt counts each of its rounds.
    pub noding_passes: usize,
    /// Segment intersections found by the graph noding passes.
    pub intersections: usize,
}

/// Computes a boolean overlay of two geometries.
///
/// Both inputs are noded together into one planar graph whose edges are
/// labelled with their location in each input. The result is read off the
/// labels: area edges bounding the result are linked into rings, then the
/// remaining line edges and isolated nodes in the result are collected.
#[derive(Debug)]
pub struct OverlayOp<'a> {
    geoms: [&'a Geometry; 2],
    options: OverlayOptions,
    state: OverlayState,
    stats: OverlayStats,
}

impl<'a> OverlayOp<'a> {
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry) -> Self {
        Self::with_options(a, b, OverlayOptions::default())
    }

    #[must_use]
    pub fn with_options(a: &'a Geometry, b: &'a Geometry, options: OverlayOptions) -> Self {
        Self {
            geoms: [a, b],
            options,
            state: OverlayState::Init,
            stats: OverlayStats::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    #[must_use]
    pub fn stats(&self) -> OverlayStats {
        self.stats
    }

    /// Runs the overlay, retrying with snap rounding if the options allow it.
    ///
    /// # Errors
    ///
    /// Returns a `GeometryError` for malformed inputs or heterogeneous
    /// collections, and a `TopologyError` if noding, labelling or ring
    /// assembly fails on every attempt.
    pub fn compute(&mut self, op: OpCode) -> Result<Geometry> {
        self.stats = OverlayStats::default();
        let result = self.run(op);
        match &result {
            Ok(_) => self.transition(OverlayState::Done),
            Err(err) => self.transition(OverlayState::Failed(err.clone())),
        }
        result
    }

    fn run(&mut self, op: OpCode) -> Result<Geometry> {
        // Raw inputs are checked before the envelope short-circuit and before
        // precision reduction, which drops collapsed components.
        for g in self.geoms {
            check_not_collection(g, "overlay")?;
            g.validate()?;
        }
        let precision = self.options.precision;
        let Some(policy) = self.options.snap_retry else {
            return self.attempt(op, precision);
        };
        let magnitude = self.geoms[0].max_magnitude().max(self.geoms[1].max_magnitude());
        run_with_snap_retry(policy, magnitude, |snap| {
            self.attempt(op, snap.unwrap_or(precision))
        })
    }

    fn transition(&mut self, state: OverlayState) {
        debug!(from = ?self.state, to = ?state, "overlay state");
        self.state = state;
    }

    /// One full pass of the pipeline. Everything it builds is local, so a
    /// failed attempt leaves nothing behind.
    fn attempt(&mut self, op: OpCode, precision: PrecisionModel) -> Result<Geometry> {
        self.transition(OverlayState::Init);
        let (a, b) = if precision.is_floating() {
            (Cow::Borrowed(self.geoms[0]), Cow::Borrowed(self.geoms[1]))
        } else {
            (
                Cow::Owned(self.geoms[0].reduce_precision(precision)),
                Cow::Owned(self.geoms[1].reduce_precision(precision)),
            )
        };
        let empty_dim = result_dimension(op, a.dimension(), b.dimension());
        if op == OpCode::Intersection && !a.envelope().intersects(&b.envelope()) {
            debug!("input envelopes are disjoint, skipping noding");
            return Ok(Geometry::empty(empty_dim));
        }

        let rule = BoundaryRule::Mod2;
        let mut arg0 = GeometryGraph::new(0, &a, &rule)?;
        let mut arg1 = GeometryGraph::new(1, &b, &rule)?;
        let mut graph = PlanarGraph::new();
        for arg in [&arg0, &arg1] {
            for (coord, loc) in arg.nodes() {
                let id = graph.add_node(coord);
                graph.node_mut(id).label.set_on(arg.arg_index(), loc);
            }
        }

        self.transition(OverlayState::Noding);
        if let Some(scale) = precision.scale() {
            self.stats.noding_passes += snap_round_edges(&mut arg0, &mut arg1, scale)?;
        }
        let li = LineIntersector::new();
        let self0 = arg0.compute_self_nodes(li, false);
        let self1 = arg1.compute_self_nodes(li, false);
        let cross = arg0.compute_edge_intersections(&mut arg1, li, true);
        self.stats.noding_passes += 1;
        self.stats.intersections += self0.intersections + self1.intersections + cross.intersections;

        let mut edges = EdgeList::new();
        for edge in arg0.split_edges().into_iter().chain(arg1.split_edges()) {
            edges.insert_unique(edge);
        }
        edges.compute_labels_from_depths();
        edges.replace_collapsed();
        NodingValidator::default().check_valid(edges.coordinates())?;
        debug!(
            edges = edges.len(),
            intersections = cross.intersections,
            "overlay noding done"
        );
        graph.add_edges(edges.into_edges())?;
        self.transition(OverlayState::GraphBuilt);

        let geoms = [a.as_ref(), b.as_ref()];
        compute_labelling(&mut graph, geoms)?;
        label_incomplete_nodes(&mut graph, geoms);
        self.transition(OverlayState::Labeled);

        find_result_area_edges(&mut graph, op);
        cancel_duplicate_result_edges(&mut graph);
        let areas = Geometry::MultiPolygon(build_polygons(&mut graph)?);
        self.transition(OverlayState::RingsAssembled);

        let lines = Geometry::MultiLineString(build_lines(&mut graph, op, &areas));
        let points = build_points(&graph, op, &lines, &areas);
        Ok(result_geometry(points, lines, areas, empty_dim))
    }
}

/// Labels every node star, then completes edge labels from their opposite
/// directions and node labels from their edges.
fn compute_labelling(graph: &mut PlanarGraph, geoms: [&Geometry; 2]) -> std::result::Result<(), TopologyError> {
    for node in graph.node_ids() {
        graph.label_node_star(node, |geom, coord| locate_point_in_area(coord, geoms[geom]))?;
    }
    graph.merge_sym_labels();
    for node in graph.node_ids() {
        let star_label = graph.star_label(node);
        graph.node_mut(node).label.merge(&star_label);
    }
    Ok(())
}

/// A node seen by one input only is located in the other directly; then
/// every star picks up what its node knows.
fn label_incomplete_nodes(graph: &mut PlanarGraph, geoms: [&Geometry; 2]) {
    let locator = PointLocator::default();
    for node in graph.node_ids() {
        let n = graph.node(node);
        if n.is_isolated() {
            let target = usize::from(!n.label.is_null(0));
            let loc = locator.locate(&n.coord, geoms[target]);
            graph.node_mut(node).label.set_on(target, loc);
        }
        graph.update_star_labelling(node);
    }
}

/// Area edges with the result interior on their right go in the result.
fn find_result_area_edges(graph: &mut PlanarGraph, op: OpCode) {
    for de in graph.dir_edge_ids().to_vec() {
        let d = graph.dir_edge(de);
        let label = d.label;
        if label.is_area()
            && !d.is_interior_area_edge()
            && is_result_of_op(
                label.location(0, Position::Right),
                label.location(1, Position::Right),
                op,
            )
        {
            graph.dir_edge_mut(de).in_result = true;
        }
    }
}

/// Both directions of an edge in the result means the result lies on both
/// sides of it, so it bounds nothing.
fn cancel_duplicate_result_edges(graph: &mut PlanarGraph) {
    for de in graph.dir_edge_ids().to_vec() {
        let sym = graph.dir_edge(de).sym;
        if graph.dir_edge(de).in_result && graph.dir_edge(sym).in_result {
            graph.dir_edge_mut(de).in_result = false;
            graph.dir_edge_mut(sym).in_result = false;
        }
    }
}

/// Points, then lines, then polygons, as the most specific geometry type.
fn result_geometry(points: Vec<Coordinate>, lines: Geometry, areas: Geometry, empty: Dimension) -> Geometry {
    let mut parts: Vec<Geometry> = points.into_iter().map(Geometry::Point).collect();
    for g in [lines, areas] {
        match g {
            Geometry::MultiLineString(ls) => parts.extend(ls.into_iter().map(Geometry::LineString)),
            Geometry::MultiPolygon(ps) => parts.extend(ps.into_iter().map(Geometry::Polygon)),
            other => parts.push(other),
        }
    }
    if parts.len() <= 1 {
        return parts.pop().unwrap_or_else(|| Geometry::empty(empty));
    }
    if parts.iter().all(|g| matches!(g, Geometry::Point(_))) {
        return Geometry::MultiPoint(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Point(c) => Some(c),
                    _ => None,
                })
                .collect(),
        );
    }
    if parts.iter().all(|g| matches!(g, Geometry::LineString(_))) {
        return Geometry::MultiLineString(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::LineString(l) => Some(l),
                    _ => None,
                })
                .collect(),
        );
    }
    if parts.iter().all(|g| matches!(g, Geometry::Polygon(_))) {
        return Geometry::MultiPolygon(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Polygon(p) => Some(p),
                    _ => None,
                })
                .collect(),
        );
    }
    Geometry::GeometryCollection(parts)
}
