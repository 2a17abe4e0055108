use super::select::{is_label_in_result, OpCode};
use crate::geometry::{Geometry, LineString, PointLocator};
use crate::math::Coordinate;
use crate::noding::SegmentString;
use crate::topology::{DirEdgeId, EdgeId, Location, PlanarGraph};

/// Collects the line edges of the result, skipping those covered by the
/// result area. For an intersection, area boundary edges that only touch
/// are kept as lines too.
pub(crate) fn build_lines(graph: &mut PlanarGraph, op: OpCode, areas: &Geometry) -> Vec<LineString> {
    find_covered_line_edges(graph, areas);
    let mut result_edges = Vec::new();
    for de in graph.dir_edge_ids().to_vec() {
        if let Some(edge) = collect_line_edge(graph, de, op) {
            result_edges.push(edge);
        } else if let Some(edge) = collect_boundary_touch_edge(graph, de, op) {
            result_edges.push(edge);
        }
    }
    result_edges
        .into_iter()
        .map(|id| {
            let edge = graph.edge_mut(id);
            edge.set_in_result(true);
            LineString::new(edge.coordinates().to_vec())
        })
        .collect()
}

/// Decides for each line edge whether it lies inside the result area.
///
/// Around a node, result area edges tell which sectors are inside the
/// result, so line edges in those sectors are covered. Line edges at nodes
/// with no result area edge are located directly.
fn find_covered_line_edges(graph: &mut PlanarGraph, areas: &Geometry) {
    for node in graph.node_ids() {
        let star = graph.node(node).star().to_vec();
        let start = star.iter().find_map(|&de| {
            let d = graph.dir_edge(de);
            if d.is_line_edge() {
                None
            } else if d.in_result {
                Some(Location::Interior)
            } else if graph.dir_edge(d.sym).in_result {
                Some(Location::Exterior)
            } else {
                None
            }
        });
        let Some(mut curr) = start else {
            continue;
        };
        for de in star {
            let d = graph.dir_edge(de);
            if d.is_line_edge() {
                let edge = d.edge;
                graph.edge_mut(edge).set_covered(curr == Location::Interior);
                continue;
            }
            let sym_in_result = graph.dir_edge(d.sym).in_result;
            if d.in_result {
                curr = Location::Exterior;
            }
            if sym_in_result {
                curr = Location::Interior;
            }
        }
    }

    let locator = PointLocator::default();
    for de in graph.dir_edge_ids().to_vec() {
        let d = graph.dir_edge(de);
        let edge = d.edge;
        if d.is_line_edge() && !graph.edge(edge).is_covered_set() {
            let covered = locator.locate(&d.end.coordinate(), areas) != Location::Exterior;
            graph.edge_mut(edge).set_covered(covered);
        }
    }
}

fn mark_visited(graph: &mut PlanarGraph, de: DirEdgeId) {
    let sym = graph.dir_edge(de).sym;
    graph.dir_edge_mut(de).visited = true;
    graph.dir_edge_mut(sym).visited = true;
}

fn collect_line_edge(graph: &mut PlanarGraph, de: DirEdgeId, op: OpCode) -> Option<EdgeId> {
    let d = graph.dir_edge(de);
    let edge = d.edge;
    let keep = d.is_line_edge()
        && !d.visited
        && is_label_in_result(&d.label, op)
        && !graph.edge(edge).is_covered();
    if !keep {
        return None;
    }
    mark_visited(graph, de);
    Some(edge)
}

/// An area boundary edge in the result of an intersection whose sides are
/// not: the inputs touch along it.
fn collect_boundary_touch_edge(graph: &mut PlanarGraph, de: DirEdgeId, op: OpCode) -> Option<EdgeId> {
    let d = graph.dir_edge(de);
    let edge = d.edge;
    if op != OpCode::Intersection
        || d.is_line_edge()
        || d.visited
        || d.is_interior_area_edge()
        || graph.edge(edge).is_in_result()
        || !is_label_in_result(&d.label, op)
    {
        return None;
    }
    mark_visited(graph, de);
    Some(edge)
}

/// Collects result nodes not already part of a result edge or covered by
/// the result lines or areas.
pub(crate) fn build_points(
    graph: &PlanarGraph,
    op: OpCode,
    lines: &Geometry,
    areas: &Geometry,
) -> Vec<Coordinate> {
    let locator = PointLocator::default();
    let mut points = Vec::new();
    for node in graph.node_ids() {
        if graph.is_incident_edge_in_result(node) {
            continue;
        }
        let n = graph.node(node);
        if n.degree() != 0 && op != OpCode::Intersection {
            continue;
        }
        if !is_label_in_result(&n.label, op) {
            continue;
        }
        let covered = locator.locate(&n.coord, lines) != Location::Exterior
            || locator.locate(&n.coord, areas) != Location::Exterior;
        if !covered {
            points.push(n.coord);
        }
    }
    points
}
