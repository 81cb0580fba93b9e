//! Camera for ray generation.

use prism_core::CameraDescription;
use prism_math::{Ray, Vec2, Vec3};
use rand::RngCore;

use crate::gen_f32;

/// Pinhole camera generating one ray per pixel sample.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached computed values (set by initialize())
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 400,
            image_height: 400,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        }
    }

    /// Camera placed as a scene file describes it, already initialized.
    pub fn from_description(description: &CameraDescription, vfov: f32) -> Self {
        let mut camera = Self::new()
            .with_resolution(description.width, description.height)
            .with_position(description.position, description.look_at, description.up)
            .with_fov(vfov);
        camera.initialize();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        // Image plane sits one unit in front of the eye
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left = self.look_from - self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Ray through pixel (i, j), shifted from the pixel center by `offset`
    /// pixels (each component in `[-0.5, 0.5]`).
    pub fn get_ray(&self, i: u32, j: u32, offset: Vec2) -> Ray {
        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        Ray::new(self.look_from, pixel_sample - self.look_from)
    }

    /// Ray through a uniformly random point of pixel (i, j).
    pub fn get_jittered_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        self.get_ray(i, j, sample_square(rng))
    }

    pub fn position(&self) -> Vec3 {
        self.look_from
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec2 {
    Vec2::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_fov(90.0);

        camera.initialize();

        assert_eq!(camera.position(), Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
        assert!((camera.u - Vec3::X).length() < 0.001);
    }

    #[test]
    fn test_center_ray_looks_at_target() {
        let mut camera = Camera::new()
            .with_resolution(101, 101)
            .with_position(Vec3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
            .with_fov(40.0);
        camera.initialize();

        let ray = camera.get_ray(50, 50, Vec2::ZERO);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(ray.origin, Vec3::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn test_corner_rays_span_fov() {
        let mut camera = Camera::new()
            .with_resolution(2, 2)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_fov(90.0);
        camera.initialize();

        // Top-left edge of the image sits at 45 degrees up and left
        let ray = camera.get_ray(0, 0, Vec2::new(-0.5, -0.5));
        let expected = Vec3::new(-1.0, 1.0, -1.0).normalize();
        assert!((ray.direction - expected).length() < 1e-5);
    }

    #[test]
    fn test_jittered_ray_stays_in_pixel() {
        let mut camera = Camera::new().with_resolution(100, 100);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        let center = camera.get_ray(50, 50, Vec2::ZERO);
        for _ in 0..16 {
            let ray = camera.get_jittered_ray(50, 50, &mut rng);
            assert!(ray.direction.z < 0.0);
            // Half a pixel of a 2-unit-wide viewport at unit distance
            assert!((ray.direction - center.direction).length() < 0.02);
        }
    }

    #[test]
    fn test_from_description() {
        let description = CameraDescription {
            width: 64,
            height: 32,
            ..Default::default()
        };
        let camera = Camera::from_description(&description, 60.0);

        assert_eq!(camera.image_width, 64);
        assert_eq!(camera.image_height, 32);
        assert_eq!(camera.position(), description.position);
    }
}
