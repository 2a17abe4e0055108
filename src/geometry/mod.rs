//! Planar geometry values consumed and produced by the overlay engine.
//!
//! Each component owns its coordinate vector; cloning is always a deep copy.

mod locate;
mod ops;

pub use locate::{locate_point_in_area, PointLocator};

use std::collections::BTreeMap;

use crate::error::GeometryError;
use crate::math::polygon_2d::{is_ccw, remove_repeated_points, signed_area};
use crate::math::{Coordinate, Envelope, PrecisionModel};
use crate::topology::{BoundaryNodeRule, Dimension};

/// An open or closed polyline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    pub coords: Vec<Coordinate>,
}

impl LineString {
    #[must_use]
    pub fn new(coords: Vec<Coordinate>) -> Self {
        Self { coords }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        is_closed(&self.coords)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        polyline_length(&self.coords)
    }

    fn validate(&self, kind: &'static str) -> Result<(), GeometryError> {
        check_coordinates(&self.coords, kind)?;
        let distinct = remove_repeated_points(&self.coords).len();
        if distinct < 2 {
            return Err(GeometryError::TooFewPoints {
                kind,
                found: distinct,
                required: 2,
            });
        }
        Ok(())
    }
}

impl From<Vec<(f64, f64)>> for LineString {
    fn from(v: Vec<(f64, f64)>) -> Self {
        Self::new(v.into_iter().map(Coordinate::from).collect())
    }
}

/// A closed, simple polyline bounding an area. The first and last
/// coordinates are equal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearRing {
    pub coords: Vec<Coordinate>,
}

impl LinearRing {
    #[must_use]
    pub fn new(coords: Vec<Coordinate>) -> Self {
        Self { coords }
    }

    /// Area enclosed by the ring, regardless of orientation.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area(&self.coords).abs()
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        is_ccw(&self.coords)
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.coords.iter().rev().copied().collect())
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::of_coords(&self.coords)
    }

    fn validate(&self, kind: &'static str) -> Result<(), GeometryError> {
        check_coordinates(&self.coords, kind)?;
        let first = self.coords[0];
        let last = self.coords[self.coords.len() - 1];
        if first != last {
            return Err(GeometryError::UnclosedRing { first, last });
        }
        let distinct = remove_repeated_points(&self.coords).len();
        if distinct < 4 {
            return Err(GeometryError::TooFewPoints {
                kind,
                found: distinct,
                required: 4,
            });
        }
        Ok(())
    }
}

impl From<Vec<(f64, f64)>> for LinearRing {
    fn from(v: Vec<(f64, f64)>) -> Self {
        Self::new(v.into_iter().map(Coordinate::from).collect())
    }
}

/// A shell with zero or more holes. Ring orientation is not significant on
/// input; output polygons have counter-clockwise shells and clockwise holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub shell: LinearRing,
    pub holes: Vec<LinearRing>,
}

impl Polygon {
    #[must_use]
    pub fn new(shell: LinearRing, holes: Vec<LinearRing>) -> Self {
        Self { shell, holes }
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(LinearRing::area).sum();
        self.shell.area() - holes
    }

    /// Total length of all rings.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        polyline_length(&self.shell.coords)
            + self
                .holes
                .iter()
                .map(|h| polyline_length(&h.coords))
                .sum::<f64>()
    }

    /// Copy with a counter-clockwise shell and clockwise holes.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let shell = if self.shell.is_ccw() {
            self.shell.clone()
        } else {
            self.shell.reversed()
        };
        let holes = self
            .holes
            .iter()
            .map(|h| if h.is_ccw() { h.reversed() } else { h.clone() })
            .collect();
        Self { shell, holes }
    }

    fn validate(&self) -> Result<(), GeometryError> {
        self.shell.validate("polygon shell")?;
        for hole in &self.holes {
            hole.validate("polygon hole")?;
        }
        Ok(())
    }
}

impl From<Vec<(f64, f64)>> for Polygon {
    fn from(v: Vec<(f64, f64)>) -> Self {
        Self::new(LinearRing::from(v), Vec::new())
    }
}

/// The closed set of planar geometry variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
    MultiPoint(Vec<Coordinate>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// An empty geometry of the given dimension.
    #[must_use]
    pub fn empty(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Point => Self::MultiPoint(Vec::new()),
            Dimension::Line => Self::MultiLineString(Vec::new()),
            Dimension::Area => Self::MultiPolygon(Vec::new()),
            Dimension::False => Self::GeometryCollection(Vec::new()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::LineString(l) => l.coords.is_empty(),
            Self::LinearRing(r) => r.coords.is_empty(),
            Self::Polygon(p) => p.shell.coords.is_empty(),
            Self::MultiPoint(pts) => pts.is_empty(),
            Self::MultiLineString(lines) => lines.iter().all(|l| l.coords.is_empty()),
            Self::MultiPolygon(polys) => polys.iter().all(|p| p.shell.coords.is_empty()),
            Self::GeometryCollection(geoms) => geoms.iter().all(Geometry::is_empty),
        }
    }

    /// Topological dimension of the geometry type. A collection takes the
    /// largest dimension of its members.
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => Dimension::Point,
            Self::LineString(_) | Self::LinearRing(_) | Self::MultiLineString(_) => {
                Dimension::Line
            }
            Self::Polygon(_) | Self::MultiPolygon(_) => Dimension::Area,
            Self::GeometryCollection(geoms) => geoms
                .iter()
                .map(Geometry::dimension)
                .max()
                .unwrap_or(Dimension::False),
        }
    }

    /// Dimension of the boundary under `rule`.
    ///
    /// Lines have a point boundary only where the rule puts some endpoint on
    /// the boundary, so a closed line under the mod-2 rule has none.
    #[must_use]
    pub fn boundary_dimension(&self, rule: &dyn BoundaryNodeRule) -> Dimension {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => Dimension::False,
            Self::LineString(l) => line_boundary_dimension([l.coords.as_slice()], rule),
            Self::LinearRing(r) => line_boundary_dimension([r.coords.as_slice()], rule),
            Self::MultiLineString(lines) => {
                line_boundary_dimension(lines.iter().map(|l| l.coords.as_slice()), rule)
            }
            Self::Polygon(_) | Self::MultiPolygon(_) => {
                if self.is_empty() {
                    Dimension::False
                } else {
                    Dimension::Line
                }
            }
            Self::GeometryCollection(geoms) => geoms
                .iter()
                .map(|g| g.boundary_dimension(rule))
                .max()
                .unwrap_or(Dimension::False),
        }
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        self.for_each_coordinate(&mut |c| env.expand_to_include(c));
        env
    }

    /// Enclosed area of all polygonal components.
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Self::Polygon(p) => p.area(),
            Self::MultiPolygon(polys) => polys.iter().map(Polygon::area).sum(),
            Self::GeometryCollection(geoms) => geoms.iter().map(Geometry::area).sum(),
            _ => 0.0,
        }
    }

    /// Length of all linear components, including polygon rings.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => 0.0,
            Self::LineString(l) => l.length(),
            Self::LinearRing(r) => polyline_length(&r.coords),
            Self::Polygon(p) => p.perimeter(),
            Self::MultiLineString(lines) => lines.iter().map(LineString::length).sum(),
            Self::MultiPolygon(polys) => polys.iter().map(Polygon::perimeter).sum(),
            Self::GeometryCollection(geoms) => geoms.iter().map(Geometry::length).sum(),
        }
    }

    /// Calls `f` on every coordinate, in component order.
    pub fn for_each_coordinate(&self, f: &mut dyn FnMut(&Coordinate)) {
        match self {
            Self::Point(c) => f(c),
            Self::LineString(l) => l.coords.iter().for_each(f),
            Self::LinearRing(r) => r.coords.iter().for_each(f),
            Self::Polygon(p) => polygon_coords(p).for_each(f),
            Self::MultiPoint(pts) => pts.iter().for_each(f),
            Self::MultiLineString(lines) => lines.iter().flat_map(|l| &l.coords).for_each(f),
            Self::MultiPolygon(polys) => polys.iter().flat_map(polygon_coords).for_each(f),
            Self::GeometryCollection(geoms) => {
                for g in geoms {
                    g.for_each_coordinate(f);
                }
            }
        }
    }

    /// Checks the structural requirements the graph builder relies on.
    ///
    /// # Errors
    ///
    /// Returns the first `GeometryError` found: a non-finite ordinate, an
    /// empty component, an unclosed ring, or a component with too few
    /// distinct points.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Self::Point(c) => check_finite(c),
            Self::LineString(l) => l.validate("line string"),
            Self::LinearRing(r) => r.validate("linear ring"),
            Self::Polygon(p) => p.validate(),
            Self::MultiPoint(pts) => pts.iter().try_for_each(check_finite),
            Self::MultiLineString(lines) => {
                lines.iter().try_for_each(|l| l.validate("line string"))
            }
            Self::MultiPolygon(polys) => polys.iter().try_for_each(Polygon::validate),
            Self::GeometryCollection(geoms) => geoms.iter().try_for_each(Geometry::validate),
        }
    }

    /// Copy with every coordinate rounded to `precision`.
    ///
    /// Components that collapse are dropped: lines with fewer than two distinct
    /// points, rings with fewer than four. A polygon whose shell collapses is
    /// dropped with its holes.
    #[must_use]
    pub fn reduce_precision(&self, precision: PrecisionModel) -> Self {
        let round = |coords: &[Coordinate]| -> Vec<Coordinate> {
            let rounded: Vec<Coordinate> =
                coords.iter().map(|c| precision.make_precise(*c)).collect();
            remove_repeated_points(&rounded)
        };
        let line = |l: &LineString| -> Option<LineString> {
            let coords = round(&l.coords);
            (coords.len() >= 2).then(|| LineString::new(coords))
        };
        let ring = |r: &LinearRing| -> Option<LinearRing> {
            let coords = round(&r.coords);
            (coords.len() >= 4).then(|| LinearRing::new(coords))
        };
        let polygon = |p: &Polygon| -> Option<Polygon> {
            let shell = ring(&p.shell)?;
            Some(Polygon::new(shell, p.holes.iter().filter_map(ring).collect()))
        };

        match self {
            Self::Point(c) => Self::Point(precision.make_precise(*c)),
            Self::LineString(l) => line(l).map_or_else(
                || Self::MultiLineString(Vec::new()),
                Self::LineString,
            ),
            Self::LinearRing(r) => ring(r).map_or_else(
                || Self::MultiLineString(Vec::new()),
                Self::LinearRing,
            ),
            Self::Polygon(p) => {
                polygon(p).map_or_else(|| Self::MultiPolygon(Vec::new()), Self::Polygon)
            }
            Self::MultiPoint(pts) => {
                let mut rounded: Vec<Coordinate> =
                    pts.iter().map(|c| precision.make_precise(*c)).collect();
                rounded.sort();
                rounded.dedup();
                Self::MultiPoint(rounded)
            }
            Self::MultiLineString(lines) => {
                Self::MultiLineString(lines.iter().filter_map(line).collect())
            }
            Self::MultiPolygon(polys) => {
                Self::MultiPolygon(polys.iter().filter_map(polygon).collect())
            }
            Self::GeometryCollection(geoms) => Self::GeometryCollection(
                geoms.iter().map(|g| g.reduce_precision(precision)).collect(),
            ),
        }
    }

    /// Largest absolute ordinate value, used to pick a snapping grid.
    #[must_use]
    pub fn max_magnitude(&self) -> f64 {
        self.envelope().max_magnitude()
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

impl From<LineString> for Geometry {
    fn from(l: LineString) -> Self {
        Self::LineString(l)
    }
}

impl From<Coordinate> for Geometry {
    fn from(c: Coordinate) -> Self {
        Self::Point(c)
    }
}

fn polygon_coords(p: &Polygon) -> impl Iterator<Item = &Coordinate> {
    p.shell.coords.iter().chain(p.holes.iter().flat_map(|h| &h.coords))
}

fn is_closed(coords: &[Coordinate]) -> bool {
    coords.len() > 1 && coords[0] == coords[coords.len() - 1]
}

fn polyline_length(coords: &[Coordinate]) -> f64 {
    coords.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

fn check_finite(c: &Coordinate) -> Result<(), GeometryError> {
    if c.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFinite(*c))
    }
}

fn check_coordinates(coords: &[Coordinate], kind: &'static str) -> Result<(), GeometryError> {
    if coords.is_empty() {
        return Err(GeometryError::EmptyCoordinates(kind));
    }
    coords.iter().try_for_each(check_finite)
}

/// Counts how many line endpoints meet at each point.
pub(crate) fn endpoint_counts<'a>(
    lines: impl IntoIterator<Item = &'a [Coordinate]>,
) -> BTreeMap<Coordinate, usize> {
    let mut counts = BTreeMap::new();
    for coords in lines {
        if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
            *counts.entry(*first).or_insert(0) += 1;
            *counts.entry(*last).or_insert(0) += 1;
        }
    }
    counts
}

fn line_boundary_dimension<'a>(
    lines: impl IntoIterator<Item = &'a [Coordinate]>,
    rule: &dyn BoundaryNodeRule,
) -> Dimension {
    let counts = endpoint_counts(lines);
    if counts.values().any(|&n| rule.is_in_boundary(n)) {
        Dimension::Point
    } else {
        Dimension::False
    }
}
