//! Records produced by ray queries and light sampling.

use prism_core::{Color, Material};
use prism_math::{Vec2, Vec3};

use crate::Triangle;

/// Nearest hit of a ray against a primitive.
///
/// Borrowed from the scene for the duration of one shading step.
#[derive(Clone, Copy, Debug)]
pub struct Intersection<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Unit face normal of the hit triangle
    pub normal: Vec3,
    /// Ray parameter of the hit. Rays are normalized, so this is the distance.
    pub distance: f32,
    /// Barycentric coordinates (u, v) of the hit inside the triangle
    pub uv: Vec2,
    pub triangle: &'a Triangle,
    pub material: &'a Material,
}

/// A point drawn on an emissive surface.
#[derive(Clone, Copy, Debug)]
pub struct LightSample<'a> {
    pub point: Vec3,
    pub normal: Vec3,
    pub emission: Color,
    /// Density with respect to surface area
    pub pdf: f32,
    pub triangle: &'a Triangle,
}
