//! Triangle meshes as a single primitive.
//!
//! A `Mesh` owns a private BVH over its triangles. To the scene BVH it looks
//! like one large primitive; intersection and sampling forward into the
//! inner tree.

use std::sync::Arc;

use prism_core::{Material, MeshData, SplitMethod};
use prism_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::{Bvh, Intersection, LightSample, Primitive, Triangle};

pub struct Mesh {
    bvh: Bvh<Triangle>,
    bounds: Aabb,
    area: f32,
}

impl Mesh {
    /// Wrap already-built triangles.
    pub fn new(triangles: Vec<Triangle>, split_method: SplitMethod) -> Self {
        let bounds = triangles
            .iter()
            .fold(Aabb::EMPTY, |acc, t| acc.union(&t.bounds()));
        let bvh = Bvh::new(triangles, split_method);

        log::info!(
            "Created mesh with {} triangles ({} BVH nodes)",
            bvh.len(),
            bvh.node_count()
        );

        Self {
            area: bvh.area(),
            bvh,
            bounds,
        }
    }

    /// Build triangles from indexed geometry. Zero-area faces are dropped.
    pub fn from_mesh_data(data: &MeshData, material: Arc<Material>, split_method: SplitMethod) -> Self {
        let mut skipped = 0usize;
        let triangles: Vec<Triangle> = data
            .faces()
            .into_iter()
            .filter_map(|([v0, v1, v2], uvs)| {
                let triangle = Triangle::try_new(v0, v1, v2, material.clone());
                if triangle.is_none() {
                    skipped += 1;
                }
                triangle.map(|t| match uvs {
                    Some(uvs) => t.with_uvs(uvs),
                    None => t,
                })
            })
            .collect();

        if skipped > 0 {
            log::warn!("Skipped {} degenerate triangles", skipped);
        }

        Self::new(triangles, split_method)
    }

    pub fn triangle_count(&self) -> usize {
        self.bvh.len()
    }
}

impl Primitive for Mesh {
    fn intersect<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'a>> {
        self.bvh.intersect_within(ray, ray_t)
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn emissive_area(&self) -> f32 {
        self.bvh.emissive_area()
    }

    fn sample<'a>(&'a self, rng: &mut dyn RngCore) -> Option<LightSample<'a>> {
        self.bvh.sample(rng)
    }
}
