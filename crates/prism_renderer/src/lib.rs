//! Prism renderer - CPU ray tracing over triangle scenes
//!
//! Scenes are flat lists of triangles and meshes behind a bounding volume
//! hierarchy; each mesh carries its own nested hierarchy over its triangles.
//! Two integrators share the same traversal code: a Whitted-style recursive
//! ray tracer and a Monte Carlo path tracer with explicit light sampling.

pub mod bsdf;
mod bucket;
mod bvh;
mod camera;
mod intersection;
mod mesh;
mod primitive;
mod renderer;
mod scene;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{Bvh, BvhNode};
pub use camera::Camera;
pub use intersection::{Intersection, LightSample};
pub use mesh::Mesh;
pub use primitive::{Object, Primitive};
pub use renderer::{color_to_rgba, linear_to_gamma, render, render_pixel, ImageBuffer, RenderConfig};
pub use scene::Scene;
pub use triangle::Triangle;

/// Re-export common math and scene types
pub use prism_core::{Color, SplitMethod};
pub use prism_math::{Aabb, Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let x = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&x));
        }
    }
}
