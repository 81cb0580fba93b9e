//! Analytic light sources.

use prism_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::material::Color;

/// An isotropic point emitter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: Color,
}

/// A one-sided parallelogram emitter.
///
/// The lit region is `position + length * (s * u + t * v)` for `s, t` in `[0, 1]`.
/// It emits toward `u x v`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaLight {
    pub position: Vec3,
    pub u: Vec3,
    pub v: Vec3,
    pub length: f32,
    pub intensity: Color,
}

impl AreaLight {
    /// Square light spanning X and Z that shines down, `length` on a side.
    pub fn square(position: Vec3, length: f32, intensity: Color) -> Self {
        Self {
            position,
            u: Vec3::X,
            v: Vec3::Z,
            length,
            intensity,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.u.cross(self.v).normalize_or_zero()
    }

    /// Whether `point` lies on the emitting side of the light's plane.
    pub fn illuminates(&self, point: Vec3) -> bool {
        (point - self.position).dot(self.normal()) > 0.0
    }

    /// Point at surface coordinates `(s, t)` in `[0, 1]^2`.
    pub fn point_at(&self, s: f32, t: f32) -> Vec3 {
        self.position + self.length * (s * self.u + t * self.v)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Light {
    Point(PointLight),
    Area(AreaLight),
}
