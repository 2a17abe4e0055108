use tracing::trace;

use super::edge_ring::{EdgeRing, RingKind};
use crate::error::TopologyError;
use crate::geometry::Polygon;
use crate::index::EnvelopeIndex;
use crate::math::polygon_2d::is_point_in_ring;
use crate::math::Coordinate;
use crate::topology::PlanarGraph;

/// A shell with the holes assigned to it so far.
#[derive(Debug)]
struct ShellAssembly {
    shell: EdgeRing,
    holes: Vec<EdgeRing>,
}

/// Assembles the result area edges of `graph` into polygons.
///
/// Result edges are linked into maximal rings; a maximal ring touching
/// itself at a node is split into minimal rings, at most one of which may
/// be a shell. Holes not found next to their shell are placed in the
/// smallest shell containing them.
///
/// # Errors
///
/// Returns a `TopologyError` if the result edges do not form closed rings
/// or a hole lies outside every shell.
pub(crate) fn build_polygons(graph: &mut PlanarGraph) -> Result<Vec<Polygon>, TopologyError> {
    for node in graph.node_ids() {
        graph.link_result_directed_edges(node)?;
    }

    let mut maximal = Vec::new();
    for de in graph.dir_edge_ids().to_vec() {
        let d = graph.dir_edge(de);
        if d.in_result && d.label.is_area() && d.edge_ring.is_none() {
            let ring = EdgeRing::build(graph, de, RingKind::Maximal, maximal.len())?;
            ring.set_in_result(graph);
            maximal.push(ring);
        }
    }

    let mut shells = Vec::new();
    let mut free_holes = Vec::new();
    let mut next_min_id = 0;
    for ring in maximal {
        if ring.max_node_degree(graph) <= 2 {
            if ring.is_hole() {
                free_holes.push(ring);
            } else {
                shells.push(ShellAssembly {
                    shell: ring,
                    holes: Vec::new(),
                });
            }
            continue;
        }
        let minimal = ring.build_minimal_rings(graph, &mut next_min_id)?;
        let (mut minimal_shells, holes): (Vec<_>, Vec<_>) =
            minimal.into_iter().partition(|r| !r.is_hole());
        if minimal_shells.len() > 1 {
            let at = minimal_shells[1].coordinates()[0];
            return Err(TopologyError::at("found two shells in minimal edge ring list", at));
        }
        match minimal_shells.pop() {
            Some(shell) => shells.push(ShellAssembly { shell, holes }),
            None => free_holes.extend(holes),
        }
    }

    place_free_holes(&mut shells, free_holes)?;
    trace!(polygons = shells.len(), "assembled result rings");
    Ok(shells
        .into_iter()
        .map(|s| {
            let holes = s.holes.iter().map(EdgeRing::to_linear_ring).collect();
            Polygon::new(s.shell.to_linear_ring(), holes).normalized()
        })
        .collect())
}

fn place_free_holes(shells: &mut [ShellAssembly], holes: Vec<EdgeRing>) -> Result<(), TopologyError> {
    if holes.is_empty() {
        return Ok(());
    }
    let index = EnvelopeIndex::bulk_load(
        shells
            .iter()
            .enumerate()
            .map(|(i, s)| (*s.shell.envelope(), i))
            .collect(),
    );
    for hole in holes {
        let Some(i) = find_containing_shell(shells, &index, &hole) else {
            let at = hole.coordinates()[0];
            return Err(TopologyError::at("unable to assign hole to a shell", at));
        };
        shells[i].holes.push(hole);
    }
    Ok(())
}

/// The smallest shell whose ring contains `hole`.
fn find_containing_shell(
    shells: &[ShellAssembly],
    index: &EnvelopeIndex<usize>,
    hole: &EdgeRing,
) -> Option<usize> {
    let hole_env = hole.envelope();
    let mut best: Option<usize> = None;
    for &i in index.query(hole_env) {
        let shell = &shells[i].shell;
        let env = shell.envelope();
        if env == hole_env || !env.covers(hole_env) {
            continue;
        }
        let pt = point_not_in(hole.coordinates(), shell.coordinates());
        if !is_point_in_ring(&pt, shell.coordinates()) {
            continue;
        }
        if best.map_or(true, |b| shells[b].shell.envelope().covers(env)) {
            best = Some(i);
        }
    }
    best
}

fn point_not_in(pts: &[Coordinate], other: &[Coordinate]) -> Coordinate {
    pts.iter()
        .find(|p| !other.contains(p))
        .copied()
        .unwrap_or(pts[0])
}
