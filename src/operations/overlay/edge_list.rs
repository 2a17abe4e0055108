use std::collections::BTreeMap;

use crate::math::Coordinate;
use crate::noding::SegmentString;
use crate::topology::{Edge, Position};

/// The split edges of both inputs with coincident edges merged.
///
/// Two edges are the same if they have the same coordinates in either
/// direction. Merging one edge into another accumulates side depths, so
/// that coincident area edges can later be resolved into a single label.
#[derive(Debug, Default)]
pub(crate) struct EdgeList {
    edges: Vec<Edge>,
    index: BTreeMap<Vec<Coordinate>, usize>,
}

impl EdgeList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_unique(&mut self, edge: Edge) {
        let key = edge.oriented_key();
        let Some(&i) = self.index.get(&key) else {
            self.index.insert(key, self.edges.len());
            self.edges.push(edge);
            return;
        };
        let existing = &mut self.edges[i];
        let mut to_merge = edge.label;
        if !existing.is_pointwise_equal(&edge) {
            to_merge.flip();
        }
        if existing.depth.is_null() {
            let own = existing.label;
            existing.depth.add(&own);
        }
        existing.depth.add(&to_merge);
        existing.label.merge(&to_merge);
    }

    /// Replaces the side locations of merged area edges by those implied by
    /// their depths. An edge whose depths cancel out has collapsed to a line.
    pub(crate) fn compute_labels_from_depths(&mut self) {
        for edge in &mut self.edges {
            if edge.depth.is_null() {
                continue;
            }
            edge.depth.normalize();
            for geom in 0..2 {
                if edge.label.is_null(geom) || !edge.label.is_area() || edge.depth.is_null_for(geom) {
                    continue;
                }
                if edge.depth.delta(geom) == 0 {
                    edge.label.to_line(geom);
                } else {
                    for side in [Position::Left, Position::Right] {
                        let loc = edge.depth.location(geom, side);
                        edge.label.set_location(geom, side, Some(loc));
                    }
                }
            }
        }
    }

    /// Area edges of the form `a-b-a` become line edges `a-b`.
    pub(crate) fn replace_collapsed(&mut self) {
        for edge in &mut self.edges {
            if edge.is_collapsed() {
                *edge = edge.collapsed_edge();
            }
        }
    }

    pub(crate) fn coordinates(&self) -> impl Iterator<Item = &[Coordinate]> {
        self.edges.iter().map(SegmentString::coordinates)
    }

    pub(crate) fn len(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}
