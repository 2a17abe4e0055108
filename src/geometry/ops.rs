use super::Geometry;
use crate::error::Result;
use crate::operations::overlay::{overlay, OpCode};
use crate::operations::relate::{relate, IntersectionMatrix};
use crate::topology::BoundaryRule;

/// Named spatial predicates and set operations. Predicates evaluate the
/// DE-9IM of the pair under the mod-2 boundary rule.
impl Geometry {
    /// The DE-9IM of `self` against `other` under the mod-2 rule.
    ///
    /// # Errors
    ///
    /// See [`relate`].
    pub fn relate(&self, other: &Geometry) -> Result<IntersectionMatrix> {
        relate(self, other, &BoundaryRule::Mod2)
    }

    /// # Errors
    ///
    /// See [`relate`].
    pub fn intersects(&self, other: &Geometry) -> Result<bool> {
        if !self.envelope().intersects(&other.envelope()) {
            return Ok(false);
        }
        Ok(self.relate(other)?.is_intersects())
    }

    /// # Errors
    ///
    /// See [`relate`].
    pub fn disjoint(&self, other: &Geometry) -> Result<bool> {
        Ok(!self.intersects(other)?)
    }

    /// # Errors
    ///
    /// See [`relate`].
    pub fn touches(&self, other: &Geometry) -> Result<bool> {
        Ok(self
            .relate(other)?
            .is_touches(self.dimension(), other.dimension()))
    }

    /// # Errors
    ///
    /// See [`relate`].
    pub fn crosses(&self, other: &Geometry) -> Result<bool> {
        Ok(self
            .relate(other)?
            .is_crosses(self.dimension(), other.dimension()))
    }

    /// # Errors
    ///
    /// See [`relate`].
    pub fn within(&self, other: &Geometry) -> Result<bool> {
        Ok(self.relate(other)?.is_within())
    }

    /// # Errors
    ///
    /// See [`relate`].
    pub fn contains(&self, other: &Geometry) -> Result<bool> {
        if !self.envelope().covers(&other.envelope()) {
            return Ok(false);
        }
        Ok(self.relate(other)?.is_contains())
    }

    /// # Errors
    ///
    /// See [`relate`].
    pub fn overlaps(&self, other: &Geometry) -> Result<bool> {
        Ok(self
            .relate(other)?
            .is_overlaps(self.dimension(), other.dimension()))
    }

    /// # Errors
    ///
    /// See [`relate`].
    pub fn covers(&self, other: &Geometry) -> Result<bool> {
        if !self.envelope().covers(&other.envelope()) {
            return Ok(false);
        }
        Ok(self.relate(other)?.is_covers())
    }

    /// # Errors
    ///
    /// See [`relate`].
    pub fn covered_by(&self, other: &Geometry) -> Result<bool> {
        other.covers(self)
    }

    /// Point-set equality, ignoring vertex order and repeated vertices.
    ///
    /// # Errors
    ///
    /// See [`relate`].
    pub fn equals_topo(&self, other: &Geometry) -> Result<bool> {
        if self.envelope() != other.envelope() {
            return Ok(false);
        }
        Ok(self
            .relate(other)?
            .is_equals(self.dimension(), other.dimension()))
    }

    /// # Errors
    ///
    /// See [`overlay`].
    pub fn intersection(&self, other: &Geometry) -> Result<Geometry> {
        overlay(self, other, OpCode::Intersection)
    }

    /// # Errors
    ///
    /// See [`overlay`].
    pub fn union(&self, other: &Geometry) -> Result<Geometry> {
        overlay(self, other, OpCode::Union)
    }

    /// # Errors
    ///
    /// See [`overlay`].
    pub fn difference(&self, other: &Geometry) -> Result<Geometry> {
        overlay(self, other, OpCode::Difference)
    }

    /// # Errors
    ///
    /// See [`overlay`].
    pub fn sym_difference(&self, other: &Geometry) -> Result<Geometry> {
        overlay(self, other, OpCode::SymDifference)
    }
}
