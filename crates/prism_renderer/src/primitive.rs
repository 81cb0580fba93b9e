//! The capability set a BVH needs from what it stores.

use prism_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::{Intersection, LightSample, Mesh, Triangle};

/// Anything that can live in a BVH leaf.
///
/// `Triangle` and `Mesh` implement it directly; `Object` dispatches between them.
pub trait Primitive: Send + Sync {
    /// Nearest hit with a ray parameter inside `ray_t`.
    fn intersect<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'a>>;

    fn bounds(&self) -> Aabb;

    /// Total surface area.
    fn area(&self) -> f32;

    /// Surface area that emits light.
    fn emissive_area(&self) -> f32;

    fn has_emission(&self) -> bool {
        self.emissive_area() > 0.0
    }

    /// Pick a point on the emissive surface, uniformly by area.
    fn sample<'a>(&'a self, rng: &mut dyn RngCore) -> Option<LightSample<'a>>;
}

/// A scene-level object: a lone triangle or a whole mesh with its own BVH.
pub enum Object {
    Triangle(Triangle),
    Mesh(Mesh),
}

impl From<Triangle> for Object {
    fn from(triangle: Triangle) -> Self {
        Object::Triangle(triangle)
    }
}

impl From<Mesh> for Object {
    fn from(mesh: Mesh) -> Self {
        Object::Mesh(mesh)
    }
}

impl Primitive for Object {
    fn intersect<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'a>> {
        match self {
            Object::Triangle(triangle) => triangle.intersect(ray, ray_t),
            Object::Mesh(mesh) => mesh.intersect(ray, ray_t),
        }
    }

    fn bounds(&self) -> Aabb {
        match self {
            Object::Triangle(triangle) => triangle.bounds(),
            Object::Mesh(mesh) => mesh.bounds(),
        }
    }

    fn area(&self) -> f32 {
        match self {
            Object::Triangle(triangle) => triangle.area(),
            Object::Mesh(mesh) => mesh.area(),
        }
    }

    fn emissive_area(&self) -> f32 {
        match self {
            Object::Triangle(triangle) => triangle.emissive_area(),
            Object::Mesh(mesh) => mesh.emissive_area(),
        }
    }

    fn sample<'a>(&'a self, rng: &mut dyn RngCore) -> Option<LightSample<'a>> {
        match self {
            Object::Triangle(triangle) => triangle.sample(rng),
            Object::Mesh(mesh) => mesh.sample(rng),
        }
    }
}
