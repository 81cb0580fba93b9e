//! Global render parameters.

use prism_math::Mat4;
use serde::{Deserialize, Serialize};

use crate::material::Color;

/// Light transport algorithm used by `cast_ray`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// Direct lighting plus specular recursion
    #[default]
    Whitted,
    /// Unbiased path tracing with explicit light sampling and Russian roulette
    PathTracing,
}

/// How a BVH chooses where to split a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    /// Median of the centroids along the widest axis
    #[default]
    Naive,
    /// Bucketed surface area heuristic
    Sah,
}

/// Scene-wide settings. Every field has a default, so a scene file only
/// needs to spell out what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Radiance returned for rays that escape the scene
    pub background: Color,

    /// Deepest recursion level that still shades; deeper rays return black
    pub max_depth: u32,

    /// Vertical field of view in degrees
    pub fov: f32,

    /// Width over height of the projection
    pub aspect: f32,

    /// Near clip distance of the projection
    pub near: f32,

    /// Far clip distance of the projection
    pub far: f32,

    pub integrator: Integrator,

    /// Split strategy for the scene and mesh BVHs
    pub split_method: SplitMethod,

    /// Offset applied to secondary ray origins along the surface normal
    pub ray_bias: f32,

    /// Survival probability for indirect bounces (path tracing)
    pub russian_roulette: f32,

    /// Samples per area light when shading diffuse surfaces
    pub area_light_samples: u32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            background: Color::new(0.235294, 0.67451, 0.843137),
            max_depth: 5,
            fov: 90.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
            integrator: Integrator::Whitted,
            split_method: SplitMethod::Naive,
            ray_bias: 1e-4,
            russian_roulette: 0.8,
            area_light_samples: 16,
        }
    }
}

impl SceneSettings {
    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_split_method(mut self, split_method: SplitMethod) -> Self {
        self.split_method = split_method;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Right-handed perspective projection built from `fov`, `aspect`, `near` and `far`.
    ///
    /// The ray tracer itself works in world space; this is for rasterizing
    /// previews of the same scene.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }
}
