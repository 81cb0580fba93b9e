//! Prism math - value types shared by the scene description and the renderer.
//!
//! Vectors come from `glam` and are re-exported so downstream crates
//! never need to name `glam` directly.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Index of an axis (0=X, 1=Y, 2=Z) in a `Vec3`.
pub type Axis = usize;
