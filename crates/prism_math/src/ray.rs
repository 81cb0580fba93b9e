use crate::Vec3;

/// A ray in 3D space with an origin and a unit direction.
///
/// The reciprocal direction and the per-axis sign are computed once here so
/// that slab tests in the BVH never divide.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Normalized direction of the ray
    pub direction: Vec3,
    /// Componentwise inverse of the direction.
    /// Zero components become positive infinity regardless of the sign of the zero.
    pub inv_direction: Vec3,
    /// `direction[axis] < 0` for each axis
    pub dir_is_neg: [bool; 3],
}

impl Ray {
    /// Create a new ray. The direction is normalized here.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.normalize();
        let inv = |x: f32| if x == 0.0 { f32::INFINITY } else { 1.0 / x };
        let inv_direction = Vec3::new(inv(direction.x), inv(direction.y), inv(direction.z));

        Self {
            origin,
            direction,
            inv_direction,
            dir_is_neg: [direction.x < 0.0, direction.y < 0.0, direction.z < 0.0],
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
