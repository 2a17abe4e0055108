use super::Coordinate;
use crate::error::GeometryError;

/// Numeric model that coordinates are rounded to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PrecisionModel {
    /// Full double precision; nothing is rounded.
    #[default]
    Floating,
    /// A grid with `1 / scale` spacing.
    Fixed { scale: f64 },
}

impl PrecisionModel {
    /// Creates a fixed grid model.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidPrecision` unless `scale` is finite and positive.
    pub fn fixed(scale: f64) -> Result<Self, GeometryError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GeometryError::InvalidPrecision(scale));
        }
        Ok(Self::Fixed { scale })
    }

    /// Fixed model keeping `digits` significant decimal digits for ordinates up to `magnitude`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidPrecision` if the resulting scale is not usable.
    #[allow(clippy::cast_possible_truncation)]
    pub fn for_significant_digits(magnitude: f64, digits: i32) -> Result<Self, GeometryError> {
        let order = if magnitude > 0.0 {
            magnitude.log10().ceil() as i32
        } else {
            0
        };
        Self::fixed(10f64.powi(digits - order))
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating)
    }

    /// Grid scale, or `None` for floating precision.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        match *self {
            Self::Floating => None,
            Self::Fixed { scale } => Some(scale),
        }
    }

    /// Rounds one ordinate to the grid, halves rounding towards positive infinity.
    #[must_use]
    pub fn make_precise_value(&self, value: f64) -> f64 {
        match *self {
            Self::Floating => value,
            Self::Fixed { scale } => (value * scale + 0.5).floor() / scale,
        }
    }

    #[must_use]
    pub fn make_precise(&self, c: Coordinate) -> Coordinate {
        Coordinate {
            x: self.make_precise_value(c.x),
            y: self.make_precise_value(c.y),
            z: c.z,
        }
    }
}
