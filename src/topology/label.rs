use std::fmt;

use super::{Location, Position};

/// Locations of the on/left/right positions of a graph component relative to
/// one input geometry.
///
/// Line-type locations only carry `On`; area-type locations carry all three.
/// `None` means "not yet determined".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopologyLocation {
    locs: [Option<Location>; 3],
    area: bool,
}

impl TopologyLocation {
    #[must_use]
    pub fn line(on: Option<Location>) -> Self {
        Self {
            locs: [on, None, None],
            area: false,
        }
    }

    #[must_use]
    pub fn area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        Self {
            locs: [on, left, right],
            area: true,
        }
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Location> {
        if !self.area && pos != Position::On {
            return None;
        }
        self.locs[pos.index()]
    }

    #[must_use]
    pub fn is_area(&self) -> bool {
        self.area
    }

    #[must_use]
    pub fn is_line(&self) -> bool {
        !self.area
    }

    /// Returns `true` if no position is set.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.positions().iter().all(Option::is_none)
    }

    /// Returns `true` if some position is unset.
    #[must_use]
    pub fn is_any_null(&self) -> bool {
        self.positions().iter().any(Option::is_none)
    }

    #[must_use]
    pub fn is_equal_on_side(&self, other: &TopologyLocation, pos: Position) -> bool {
        self.get(pos) == other.get(pos)
    }

    #[must_use]
    pub fn all_positions_equal(&self, loc: Location) -> bool {
        self.positions().iter().all(|l| *l == Some(loc))
    }

    pub fn flip(&mut self) {
        if self.area {
            self.locs.swap(1, 2);
        }
    }

    pub fn set(&mut self, pos: Position, loc: Option<Location>) {
        if self.area || pos == Position::On {
            self.locs[pos.index()] = loc;
        }
    }

    pub fn set_all(&mut self, loc: Location) {
        let n = self.positions().len();
        for l in &mut self.locs[..n] {
            *l = Some(loc);
        }
    }

    pub fn set_all_if_null(&mut self, loc: Location) {
        let n = self.positions().len();
        for l in &mut self.locs[..n] {
            l.get_or_insert(loc);
        }
    }

    /// Drops the side locations, keeping `On`.
    pub fn to_line(&mut self) {
        self.area = false;
        self.locs[1] = None;
        self.locs[2] = None;
    }

    /// Fills unset positions from `other`, upgrading to area type if `other` is one.
    pub fn merge(&mut self, other: &TopologyLocation) {
        if other.area && !self.area {
            self.area = true;
        }
        let n = self.positions().len().min(other.positions().len());
        for i in 0..n {
            if self.locs[i].is_none() {
                self.locs[i] = other.locs[i];
            }
        }
    }

    fn positions(&self) -> &[Option<Location>] {
        if self.area {
            &self.locs
        } else {
            &self.locs[..1]
        }
    }
}

/// Per-input-geometry topological locations of a node or edge.
///
/// A node or line edge only uses `On`; an area edge also records which side
/// of the edge the geometry's interior and exterior lie on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Label {
    elt: [TopologyLocation; 2],
}

impl Label {
    /// Line label with the same `On` location for both geometries.
    #[must_use]
    pub fn line(on: Option<Location>) -> Self {
        Self {
            elt: [TopologyLocation::line(on), TopologyLocation::line(on)],
        }
    }

    /// Area label with the same locations for both geometries.
    #[must_use]
    pub fn area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        Self {
            elt: [
                TopologyLocation::area(on, left, right),
                TopologyLocation::area(on, left, right),
            ],
        }
    }

    /// Line label set for geometry `geom` only.
    #[must_use]
    pub fn line_for(geom: usize, on: Location) -> Self {
        let mut label = Self::line(None);
        label.elt[geom].set(Position::On, Some(on));
        label
    }

    /// Area label set for geometry `geom` only.
    #[must_use]
    pub fn area_for(geom: usize, on: Location, left: Location, right: Location) -> Self {
        let mut label = Self {
            elt: [
                TopologyLocation::area(None, None, None),
                TopologyLocation::area(None, None, None),
            ],
        };
        label.elt[geom] = TopologyLocation::area(Some(on), Some(left), Some(right));
        label
    }

    /// Line label carrying only the `On` locations of `label`.
    #[must_use]
    pub fn to_line_label(label: &Label) -> Self {
        Self {
            elt: [
                TopologyLocation::line(label.location(0, Position::On)),
                TopologyLocation::line(label.location(1, Position::On)),
            ],
        }
    }

    #[must_use]
    pub fn location(&self, geom: usize, pos: Position) -> Option<Location> {
        self.elt[geom].get(pos)
    }

    #[must_use]
    pub fn on(&self, geom: usize) -> Option<Location> {
        self.location(geom, Position::On)
    }

    #[must_use]
    pub fn topology(&self, geom: usize) -> &TopologyLocation {
        &self.elt[geom]
    }

    pub fn set_location(&mut self, geom: usize, pos: Position, loc: Option<Location>) {
        self.elt[geom].set(pos, loc);
    }

    pub fn set_on(&mut self, geom: usize, loc: Location) {
        self.elt[geom].set(Position::On, Some(loc));
    }

    pub fn set_all_locations(&mut self, geom: usize, loc: Location) {
        self.elt[geom].set_all(loc);
    }

    pub fn set_all_locations_if_null(&mut self, geom: usize, loc: Location) {
        self.elt[geom].set_all_if_null(loc);
    }

    pub fn flip(&mut self) {
        self.elt[0].flip();
        self.elt[1].flip();
    }

    /// Fills unset locations from `other`.
    pub fn merge(&mut self, other: &Label) {
        self.elt[0].merge(&other.elt[0]);
        self.elt[1].merge(&other.elt[1]);
    }

    /// Number of geometries this label carries any location for.
    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.elt.iter().filter(|e| !e.is_null()).count()
    }

    #[must_use]
    pub fn is_null(&self, geom: usize) -> bool {
        self.elt[geom].is_null()
    }

    #[must_use]
    pub fn is_any_null(&self, geom: usize) -> bool {
        self.elt[geom].is_any_null()
    }

    /// Returns `true` if either geometry has area-type locations.
    #[must_use]
    pub fn is_area(&self) -> bool {
        self.elt[0].is_area() || self.elt[1].is_area()
    }

    #[must_use]
    pub fn is_area_for(&self, geom: usize) -> bool {
        self.elt[geom].is_area()
    }

    #[must_use]
    pub fn is_line(&self, geom: usize) -> bool {
        self.elt[geom].is_line()
    }

    #[must_use]
    pub fn is_equal_on_side(&self, other: &Label, pos: Position) -> bool {
        self.elt[0].is_equal_on_side(&other.elt[0], pos)
            && self.elt[1].is_equal_on_side(&other.elt[1], pos)
    }

    #[must_use]
    pub fn all_positions_equal(&self, geom: usize, loc: Location) -> bool {
        self.elt[geom].all_positions_equal(loc)
    }

    pub fn to_line(&mut self, geom: usize) {
        if self.elt[geom].is_area() {
            self.elt[geom].to_line();
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = |l: Option<Location>| l.map_or('-', Location::symbol);
        for (i, e) in self.elt.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "A{}:", i)?;
            if e.is_area() {
                write!(
                    f,
                    "{}{}{}",
                    sym(e.get(Position::Left)),
                    sym(e.get(Position::On)),
                    sym(e.get(Position::Right))
                )?;
            } else {
                write!(f, "{}", sym(e.get(Position::On)))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_label_flip_swaps_sides() {
        let mut label = Label::area_for(0, Location::Boundary, Location::Exterior, Location::Interior);
        label.flip();
        assert_eq!(label.location(0, Position::Left), Some(Location::Interior));
        assert_eq!(label.location(0, Position::Right), Some(Location::Exterior));
        assert_eq!(label.on(0), Some(Location::Boundary));
        assert!(label.is_null(1));
        assert_eq!(label.geometry_count(), 1);
    }

    #[test]
    fn merge_fills_nulls_and_upgrades_to_area() {
        let mut line = Label::line_for(1, Location::Interior);
        let area = Label::area_for(0, Location::Boundary, Location::Interior, Location::Exterior);
        line.merge(&area);
        assert!(line.is_area_for(0));
        assert_eq!(line.location(0, Position::Right), Some(Location::Exterior));
        assert_eq!(line.on(1), Some(Location::Interior));
        assert_eq!(line.geometry_count(), 2);
    }

    #[test]
    fn merge_keeps_existing_locations() {
        let mut a = Label::line_for(0, Location::Boundary);
        a.merge(&Label::line_for(0, Location::Interior));
        assert_eq!(a.on(0), Some(Location::Boundary));
    }

    #[test]
    fn to_line_drops_sides() {
        let mut label = Label::area_for(0, Location::Boundary, Location::Interior, Location::Interior);
        label.to_line(0);
        assert!(label.is_line(0));
        assert_eq!(label.location(0, Position::Left), None);
        let line = Label::to_line_label(&Label::area_for(1, Location::Interior, Location::Exterior, Location::Exterior));
        assert_eq!(line.on(1), Some(Location::Interior));
        assert!(!line.is_area());
    }

    #[test]
    fn null_checks_and_fill() {
        let mut label = Label::area_for(0, Location::Boundary, Location::Exterior, Location::Interior);
        assert!(!label.is_any_null(0));
        assert!(label.is_any_null(1));
        label.set_all_locations_if_null(1, Location::Exterior);
        assert!(label.all_positions_equal(1, Location::Exterior));
        assert_eq!(label.to_string(), "A0:ebi A1:eee");
    }
}
