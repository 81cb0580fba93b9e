//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use prism_core::{Color, Material};
use prism_math::{Aabb, Interval, Ray, Vec2, Vec3};
use rand::RngCore;

use crate::{gen_f32, Intersection, LightSample, Primitive};

/// Determinants below this are treated as a ray parallel to the triangle plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A single-sided triangle.
///
/// The front face is the side `e1 x e2` points to; rays arriving from
/// behind pass through.
#[derive(Clone, Debug)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    /// v1 - v0
    pub e1: Vec3,
    /// v2 - v0
    pub e2: Vec3,
    /// Pre-computed face normal (unit length)
    pub normal: Vec3,
    pub area: f32,
    /// Per-vertex texture coordinates
    pub uvs: Option<[Vec2; 3]>,
    pub material: Arc<Material>,
    bounds: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The vertices must not be collinear; use `try_new` for untrusted input.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let cross = e1.cross(e2);

        Self {
            v0,
            v1,
            v2,
            e1,
            e2,
            normal: cross.normalize(),
            area: cross.length() * 0.5,
            uvs: None,
            material,
            bounds: Aabb::from_point_iter([v0, v1, v2]),
        }
    }

    /// Like `new`, but returns `None` for a zero-area triangle.
    pub fn try_new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Option<Self> {
        let area = (v1 - v0).cross(v2 - v0).length() * 0.5;
        if area > f32::EPSILON * f32::EPSILON && area.is_finite() {
            Some(Self::new(v0, v1, v2, material))
        } else {
            None
        }
    }

    pub fn with_uvs(mut self, uvs: [Vec2; 3]) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Position at barycentric coordinates `(u, v)`.
    pub fn point_at(&self, uv: Vec2) -> Vec3 {
        self.v0 + uv.x * self.e1 + uv.y * self.e2
    }

    /// Diffuse albedo at barycentric coordinates `(u, v)`.
    ///
    /// Vertex UVs are interpolated when present; otherwise the barycentrics
    /// themselves drive the pattern.
    pub fn eval_diffuse_color(&self, uv: Vec2) -> Color {
        let st = match self.uvs {
            Some([t0, t1, t2]) => t0 * (1.0 - uv.x - uv.y) + t1 * uv.x + t2 * uv.y,
            None => uv,
        };
        self.material.albedo.eval(st)
    }
}

impl Primitive for Triangle {
    fn intersect<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'a>> {
        let dir = ray.direction;

        // Single-sided: hits from behind are ignored
        if dir.dot(self.normal) > 0.0 {
            return None;
        }

        let pvec = dir.cross(self.e2);
        let det = self.e1.dot(pvec);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin - self.v0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(self.e1);
        let v = dir.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = self.e2.dot(qvec) * inv_det;
        if t <= ray_t.min.max(0.0) || t > ray_t.max {
            return None;
        }

        Some(Intersection {
            point: ray.at(t),
            normal: self.normal,
            distance: t,
            uv: Vec2::new(u, v),
            triangle: self,
            material: &self.material,
        })
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn emissive_area(&self) -> f32 {
        if self.material.has_emission() {
            self.area
        } else {
            0.0
        }
    }

    fn sample<'a>(&'a self, rng: &mut dyn RngCore) -> Option<LightSample<'a>> {
        let x = gen_f32(rng).sqrt();
        let y = gen_f32(rng);
        let point = self.v0 * (1.0 - x) + self.v1 * (x * (1.0 - y)) + self.v2 * (x * y);

        Some(LightSample {
            point,
            normal: self.normal,
            emission: self.material.emission,
            pdf: 1.0 / self.area,
            triangle: self,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Unit right triangle in the z=0 plane facing +Z.
    fn facing_z() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Arc::new(Material::default()),
        )
    }

    #[test]
    fn test_triangle_precomputed_fields() {
        let triangle = facing_z();

        assert_eq!(triangle.normal, Vec3::Z);
        assert_eq!(triangle.area, 0.5);
        assert_eq!(triangle.e1, Vec3::X);
        assert_eq!(triangle.e2, Vec3::Y);
        assert_eq!(triangle.bounds().min, Vec3::ZERO);
        assert_eq!(triangle.bounds().max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_triangle_hit() {
        let triangle = facing_z();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 2.0), Vec3::NEG_Z);

        let hit = triangle.intersect(&ray, Interval::FORWARD).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-6);
        assert_eq!(hit.normal, Vec3::Z);
        assert!((hit.uv - Vec2::new(0.25, 0.25)).length() < 1e-6);

        // Hit point lies on the ray and in the plane
        assert!((hit.point - ray.at(hit.distance)).length() < 1e-6);
        assert!(hit.point.z.abs() < 1e-6);
        assert!((triangle.point_at(hit.uv) - hit.point).length() < 1e-6);
    }

    #[test]
    fn test_triangle_miss_outside_barycentric_domain() {
        let triangle = facing_z();

        let ray = Ray::new(Vec3::new(0.8, 0.8, 2.0), Vec3::NEG_Z);
        assert!(triangle.intersect(&ray, Interval::FORWARD).is_none());

        let ray = Ray::new(Vec3::new(-0.1, 0.5, 2.0), Vec3::NEG_Z);
        assert!(triangle.intersect(&ray, Interval::FORWARD).is_none());
    }

    #[test]
    fn test_triangle_miss_behind_origin() {
        let triangle = facing_z();
        // Plane is behind the ray: t would be negative
        let ray = Ray::new(Vec3::new(0.25, 0.25, -2.0), Vec3::NEG_Z);

        assert!(triangle.intersect(&ray, Interval::FORWARD).is_none());
    }

    #[test]
    fn test_triangle_miss_back_face() {
        let triangle = facing_z();
        let ray = Ray::new(Vec3::new(0.25, 0.25, -2.0), Vec3::Z);

        assert!(triangle.intersect(&ray, Interval::FORWARD).is_none());
    }

    #[test]
    fn test_triangle_miss_parallel() {
        let triangle = facing_z();
        let ray = Ray::new(Vec3::new(-1.0, 0.25, 0.0), Vec3::X);

        assert!(triangle.intersect(&ray, Interval::FORWARD).is_none());
    }

    #[test]
    fn test_triangle_respects_max_distance() {
        let triangle = facing_z();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 2.0), Vec3::NEG_Z);

        assert!(triangle.intersect(&ray, Interval::new(0.0, 1.5)).is_none());
        assert!(triangle.intersect(&ray, Interval::new(0.0, 2.5)).is_some());
    }

    #[test]
    fn test_try_new_rejects_collinear() {
        let material = Arc::new(Material::default());
        let degenerate = Triangle::try_new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, material);

        assert!(degenerate.is_none());
    }

    #[test]
    fn test_sample_lies_on_triangle() {
        let triangle = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Arc::new(Material::emissive(Color::ONE)),
        );
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let sample = triangle.sample(&mut rng).unwrap();
            let p = sample.point;
            assert!(p.x >= -1e-6 && p.y >= -1e-6 && p.x + p.y <= 2.0 + 1e-5);
            assert_eq!(sample.pdf, 0.5);
            assert_eq!(sample.emission, Color::ONE);
        }
        assert_eq!(triangle.emissive_area(), 2.0);
    }

    #[test]
    fn test_eval_diffuse_color_interpolates_uvs() {
        let material = Material::default().with_albedo(prism_core::Albedo::Checker {
            a: Color::ONE,
            b: Color::ZERO,
            scale: 1.0,
        });
        let triangle = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, Arc::new(material)).with_uvs([
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 1.0),
        ]);

        // Texture space (1.2, 0.2) falls in an odd checker cell
        assert_eq!(triangle.eval_diffuse_color(Vec2::new(0.2, 0.2)), Color::ZERO);
    }
}
