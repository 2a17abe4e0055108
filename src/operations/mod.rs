//! Operations over pairs of geometries: the DE-9IM relate and the boolean
//! overlay.

pub mod overlay;
pub mod relate;
