use tracing::trace;

use super::{Label, Location, Position};
use crate::error::TopologyError;
use crate::math::Coordinate;

/// Completes the labels of the edge ends around one node.
///
/// `labels` must be in counter-clockwise order. Side locations of area edges
/// are carried around the star, and anything still unknown afterwards is
/// filled from `locate_in_area(geom)`, the area location of the node in input
/// `geom`. A line edge on the boundary of an input means that input's area
/// collapsed here, so its unknown locations become exterior instead.
///
/// # Errors
///
/// Returns a `TopologyError` if the side locations of consecutive edges
/// disagree.
pub fn label_star(
    labels: &mut [Label],
    node: Coordinate,
    mut locate_in_area: impl FnMut(usize) -> Location,
) -> Result<(), TopologyError> {
    for geom in 0..2 {
        propagate_side_labels(labels, geom, node)?;
    }

    for geom in 0..2 {
        let collapsed = labels
            .iter()
            .any(|l| l.is_line(geom) && l.on(geom) == Some(Location::Boundary));
        let mut fill = None;
        for label in labels.iter_mut() {
            if !label.is_any_null(geom) {
                continue;
            }
            let loc = *fill.get_or_insert_with(|| {
                if collapsed {
                    Location::Exterior
                } else {
                    locate_in_area(geom)
                }
            });
            label.set_all_locations_if_null(geom, loc);
        }
    }
    trace!(%node, ends = labels.len(), "labelled node star");
    Ok(())
}

fn propagate_side_labels(
    labels: &mut [Label],
    geom: usize,
    node: Coordinate,
) -> Result<(), TopologyError> {
    let Some(start) = labels
        .iter()
        .filter(|l| l.is_area_for(geom))
        .filter_map(|l| l.location(geom, Position::Left))
        .last()
    else {
        return Ok(());
    };

    let mut curr = start;
    for label in labels.iter_mut() {
        if label.on(geom).is_none() {
            label.set_on(geom, curr);
        }
        if !label.is_area_for(geom) {
            continue;
        }
        let left = label.location(geom, Position::Left);
        match label.location(geom, Position::Right) {
            Some(right) => {
                if right != curr {
                    return Err(TopologyError::at("side location conflict", node));
                }
                curr = left.ok_or_else(|| TopologyError::at("found single null side", node))?;
            }
            None => {
                if left.is_some() {
                    return Err(TopologyError::at("found single null side", node));
                }
                label.set_location(geom, Position::Right, Some(curr));
                label.set_location(geom, Position::Left, Some(curr));
            }
        }
    }
    Ok(())
}
