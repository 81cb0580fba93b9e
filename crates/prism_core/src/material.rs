//! Surface materials.
//!
//! A material is built once and then shared (through `Arc`) by every
//! triangle that uses it.

use prism_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Linear RGB color.
pub type Color = Vec3;

/// How a surface scatters light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Lambert diffuse plus a Phong highlight
    #[default]
    DiffuseGlossy,
    /// Perfect mirror
    Reflection,
    /// Dielectric: Fresnel-weighted reflection and refraction
    ReflectionRefraction,
}

/// Diffuse albedo as a function of surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Albedo {
    Solid { color: Color },
    /// Alternating squares, `scale` squares per unit of texture space
    Checker { a: Color, b: Color, scale: f32 },
}

impl Default for Albedo {
    fn default() -> Self {
        Albedo::Solid {
            color: Color::splat(0.8),
        }
    }
}

impl Albedo {
    pub fn eval(&self, uv: Vec2) -> Color {
        match *self {
            Albedo::Solid { color } => color,
            Albedo::Checker { a, b, scale } => {
                let cell = (uv.x * scale).floor() as i64 + (uv.y * scale).floor() as i64;
                if cell.rem_euclid(2) == 0 {
                    a
                } else {
                    b
                }
            }
        }
    }
}

/// Surface description consumed by the integrators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub kind: MaterialKind,

    /// Diffuse coefficient
    pub kd: f32,

    /// Specular coefficient
    pub ks: f32,

    /// Phong exponent
    pub specular_exponent: f32,

    /// Index of refraction
    pub ior: f32,

    /// Emitted radiance; zero for non-emitters
    pub emission: Color,

    pub albedo: Albedo,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::DiffuseGlossy,
            kd: 0.8,
            ks: 0.2,
            specular_exponent: 25.0,
            ior: 1.3,
            emission: Color::ZERO,
            albedo: Albedo::default(),
        }
    }
}

impl Material {
    /// Create a diffuse/glossy material with a solid albedo.
    pub fn diffuse(color: Color) -> Self {
        Self {
            albedo: Albedo::Solid { color },
            ..Default::default()
        }
    }

    pub fn mirror() -> Self {
        Self {
            kind: MaterialKind::Reflection,
            kd: 0.0,
            ks: 0.0,
            ior: 1e4,
            ..Default::default()
        }
    }

    pub fn glass(ior: f32) -> Self {
        Self {
            kind: MaterialKind::ReflectionRefraction,
            kd: 0.0,
            ks: 0.0,
            ior,
            ..Default::default()
        }
    }

    /// An emitter with a black, non-reflective surface.
    pub fn emissive(emission: Color) -> Self {
        Self {
            kd: 0.0,
            ks: 0.0,
            emission,
            albedo: Albedo::Solid { color: Color::ZERO },
            ..Default::default()
        }
    }

    pub fn with_coefficients(mut self, kd: f32, ks: f32) -> Self {
        self.kd = kd;
        self.ks = ks;
        self
    }

    pub fn with_specular_exponent(mut self, exponent: f32) -> Self {
        self.specular_exponent = exponent;
        self
    }

    pub fn with_albedo(mut self, albedo: Albedo) -> Self {
        self.albedo = albedo;
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn has_emission(&self) -> bool {
        self.emission.max_element() > 0.0
    }
}
