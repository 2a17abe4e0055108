use super::{Geometry, LineString, LinearRing, Polygon};
use crate::math::polygon_2d::{is_on_line, is_point_in_ring, locate_point_in_ring};
use crate::math::{Coordinate, Envelope};
use crate::topology::{BoundaryNodeRule, BoundaryRule, Location};

/// Locates points against arbitrary geometries.
///
/// Line endpoints are counted across all linear components and classified
/// by the boundary node rule; a point inside any component is interior.
#[derive(Clone, Copy)]
pub struct PointLocator<'a> {
    rule: &'a dyn BoundaryNodeRule,
}

impl std::fmt::Debug for PointLocator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointLocator").finish_non_exhaustive()
    }
}

impl Default for PointLocator<'_> {
    fn default() -> Self {
        Self {
            rule: &BoundaryRule::Mod2,
        }
    }
}

#[derive(Default)]
struct LocationTally {
    interior: bool,
    boundaries: usize,
}

impl LocationTally {
    fn update(&mut self, loc: Location) {
        match loc {
            Location::Interior => self.interior = true,
            Location::Boundary => self.boundaries += 1,
            Location::Exterior => {}
        }
    }
}

impl<'a> PointLocator<'a> {
    #[must_use]
    pub fn new(rule: &'a dyn BoundaryNodeRule) -> Self {
        Self { rule }
    }

    #[must_use]
    pub fn locate(&self, p: &Coordinate, geom: &Geometry) -> Location {
        if geom.is_empty() {
            return Location::Exterior;
        }
        if let Geometry::Polygon(poly) = geom {
            return locate_in_polygon(p, poly);
        }
        let mut tally = LocationTally::default();
        compute_location(p, geom, &mut tally);
        if self.rule.is_in_boundary(tally.boundaries) {
            Location::Boundary
        } else if tally.boundaries > 0 || tally.interior {
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    /// Returns `true` unless `p` is exterior to `geom`.
    #[must_use]
    pub fn intersects(&self, p: &Coordinate, geom: &Geometry) -> bool {
        self.locate(p, geom) != Location::Exterior
    }
}

fn compute_location(p: &Coordinate, geom: &Geometry, tally: &mut LocationTally) {
    match geom {
        Geometry::Point(c) => tally.update(locate_on_point(p, c)),
        Geometry::MultiPoint(pts) => pts.iter().for_each(|c| tally.update(locate_on_point(p, c))),
        Geometry::LineString(l) => tally.update(locate_on_line(p, &l.coords)),
        Geometry::LinearRing(r) => tally.update(locate_on_line(p, &r.coords)),
        Geometry::MultiLineString(lines) => lines
            .iter()
            .for_each(|l: &LineString| tally.update(locate_on_line(p, &l.coords))),
        Geometry::Polygon(poly) => tally.update(locate_in_polygon(p, poly)),
        Geometry::MultiPolygon(polys) => polys
            .iter()
            .for_each(|poly| tally.update(locate_in_polygon(p, poly))),
        Geometry::GeometryCollection(geoms) => {
            for g in geoms {
                compute_location(p, g, tally);
            }
        }
    }
}

fn locate_on_point(p: &Coordinate, c: &Coordinate) -> Location {
    if p == c {
        Location::Interior
    } else {
        Location::Exterior
    }
}

fn locate_on_line(p: &Coordinate, coords: &[Coordinate]) -> Location {
    if !Envelope::of_coords(coords).covers_point(p) {
        return Location::Exterior;
    }
    let (Some(first), Some(last)) = (coords.first(), coords.last()) else {
        return Location::Exterior;
    };
    if first != last && (p == first || p == last) {
        return Location::Boundary;
    }
    if is_on_line(p, coords) {
        Location::Interior
    } else {
        Location::Exterior
    }
}

fn locate_in_polygon(p: &Coordinate, poly: &Polygon) -> Location {
    if poly.shell.coords.is_empty() {
        return Location::Exterior;
    }
    match locate_in_ring(p, &poly.shell) {
        Location::Interior => {}
        other => return other,
    }
    for hole in &poly.holes {
        match locate_in_ring(p, hole) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

fn locate_in_ring(p: &Coordinate, ring: &LinearRing) -> Location {
    if !ring.envelope().covers_point(p) {
        return Location::Exterior;
    }
    locate_point_in_ring(p, &ring.coords)
}

/// Interior/exterior location of `p` against the polygonal components of
/// `geom`. Points on a shell count as interior and points on a hole as
/// exterior; non-areal components are ignored.
#[must_use]
pub fn locate_point_in_area(p: &Coordinate, geom: &Geometry) -> Location {
    if contains_point(p, geom) {
        Location::Interior
    } else {
        Location::Exterior
    }
}

fn contains_point(p: &Coordinate, geom: &Geometry) -> bool {
    match geom {
        Geometry::Polygon(poly) => contains_point_in_polygon(p, poly),
        Geometry::MultiPolygon(polys) => polys.iter().any(|poly| contains_point_in_polygon(p, poly)),
        Geometry::GeometryCollection(geoms) => geoms.iter().any(|g| contains_point(p, g)),
        _ => false,
    }
}

fn contains_point_in_polygon(p: &Coordinate, poly: &Polygon) -> bool {
    if poly.shell.coords.is_empty() || !is_point_in_ring(p, &poly.shell.coords) {
        return false;
    }
    !poly.holes.iter().any(|h| is_point_in_ring(p, &h.coords))
}
