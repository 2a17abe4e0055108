use super::{Label, Location, Position};

/// Depth counts of the two sides of coincident area edges, per geometry.
///
/// When several area edges of one geometry are collapsed onto the same line,
/// summing their side locations as depths tells whether the merged edge still
/// separates interior from exterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    depth: [[Option<i32>; 3]; 2],
}

impl Default for Depth {
    fn default() -> Self {
        Self {
            depth: [[None; 3]; 2],
        }
    }
}

fn depth_at_location(loc: Location) -> Option<i32> {
    match loc {
        Location::Exterior => Some(0),
        Location::Interior => Some(1),
        Location::Boundary => None,
    }
}

impl Depth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, geom: usize, pos: Position) -> Option<i32> {
        self.depth[geom][pos.index()]
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.depth.iter().flatten().all(Option::is_none)
    }

    #[must_use]
    pub fn is_null_for(&self, geom: usize) -> bool {
        self.depth[geom][Position::Left.index()].is_none()
    }

    /// Accumulates the side locations of an area label.
    pub fn add(&mut self, label: &Label) {
        for geom in 0..2 {
            for pos in [Position::Left, Position::Right] {
                let Some(d) = label.location(geom, pos).and_then(depth_at_location) else {
                    continue;
                };
                let slot = &mut self.depth[geom][pos.index()];
                *slot = Some(slot.map_or(d, |cur| cur + d));
            }
        }
    }

    /// Right depth minus left depth for `geom`.
    #[must_use]
    pub fn delta(&self, geom: usize) -> i32 {
        let left = self.depth[geom][Position::Left.index()].unwrap_or(0);
        let right = self.depth[geom][Position::Right.index()].unwrap_or(0);
        right - left
    }

    /// Location implied by a side depth.
    #[must_use]
    pub fn location(&self, geom: usize, pos: Position) -> Location {
        match self.depth[geom][pos.index()] {
            Some(d) if d > 0 => Location::Interior,
            _ => Location::Exterior,
        }
    }

    /// Reduces each geometry's side depths to 0/1, keeping their relative order.
    pub fn normalize(&mut self) {
        for geom in &mut self.depth {
            if geom[1].is_none() {
                continue;
            }
            let min = geom[1]
                .unwrap_or(0)
                .min(geom[2].unwrap_or(0))
                .max(0);
            for slot in &mut geom[1..] {
                let d = slot.unwrap_or(0);
                *slot = Some(i32::from(d > min));
            }
        }
    }
}
