use crate::{Axis, Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Stored as two corners. A non-empty box has `min <= max` on every axis.
/// Boxes are never padded, so a flat triangle keeps a zero-width box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// The empty box. Identity element for `union`.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point of the iterator.
    pub fn from_point_iter<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |bounds, p| bounds.union_point(p))
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow the box to include a point.
    pub fn union_point(&self, p: Vec3) -> Aabb {
        Aabb {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn diagonal(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn max_extent(&self) -> Axis {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Surface area, zero for an empty box.
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Relative position of `p` inside the box, 0 at `min` and 1 at `max`.
    /// Axes with zero extent report 0.
    pub fn offset(&self, p: Vec3) -> Vec3 {
        let d = self.diagonal();
        let o = p - self.min;
        Vec3::new(
            if d.x > 0.0 { o.x / d.x } else { 0.0 },
            if d.y > 0.0 { o.y / d.y } else { 0.0 },
            if d.z > 0.0 { o.z / d.z } else { 0.0 },
        )
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        other.is_empty()
            || (self.min.cmple(other.min).all() && self.max.cmpge(other.max).all())
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.min.cmple(p).all() && self.max.cmpge(p).all()
    }

    /// Slab test with a precomputed reciprocal direction.
    ///
    /// Returns the `[t_enter, t_exit]` range of the ray inside the box, or
    /// `None` when the ray misses it or the box lies entirely behind the origin.
    pub fn intersect_p(&self, ray: &Ray, inv_dir: Vec3, dir_is_neg: [bool; 3]) -> Option<Interval> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let (near, far) = if dir_is_neg[axis] {
                (self.max[axis], self.min[axis])
            } else {
                (self.min[axis], self.max[axis])
            };
            let t_near = (near - ray.origin[axis]) * inv_dir[axis];
            let t_far = (far - ray.origin[axis]) * inv_dir[axis];

            // f32::max/min drop a NaN operand (origin on a slab plane, zero direction)
            t_enter = t_enter.max(t_near);
            t_exit = t_exit.min(t_far);
        }

        if t_enter <= t_exit && t_exit >= 0.0 {
            Some(Interval::new(t_enter, t_exit))
        } else {
            None
        }
    }

    /// Test a ray against the box using the ray's cached reciprocal direction.
    pub fn hit(&self, ray: &Ray) -> bool {
        self.intersect_p(ray, ray.inv_direction, ray.dir_is_neg).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(1.0, 5.0, -2.0), Vec3::new(-1.0, 2.0, 3.0));

        assert_eq!(aabb.min, Vec3::new(-1.0, 2.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn test_aabb_empty_is_union_identity() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);

        assert!(Aabb::EMPTY.is_empty());
        assert_eq!(Aabb::EMPTY.union(&aabb), aabb);
        assert_eq!(aabb.union(&Aabb::EMPTY), aabb);
        assert_eq!(Aabb::EMPTY.surface_area(), 0.0);
    }

    #[test]
    fn test_aabb_flat_box_is_not_padded() {
        let aabb = Aabb::from_point_iter([
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]);

        assert_eq!(aabb.min.y, 0.0);
        assert_eq!(aabb.max.y, 0.0);
        assert!(!aabb.is_empty());
    }

    #[test]
    fn test_aabb_max_extent() {
        let x_long = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0));
        assert_eq!(x_long.max_extent(), 0);

        let y_long = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(y_long.max_extent(), 1);

        let z_long = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(z_long.max_extent(), 2);
    }

    #[test]
    fn test_aabb_surface_area_and_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(aabb.surface_area(), 22.0);
        assert_eq!(aabb.centroid(), Vec3::new(0.5, 1.0, 1.5));
        assert_eq!(aabb.offset(Vec3::new(0.5, 2.0, 0.0)), Vec3::new(0.5, 1.0, 0.0));
    }

    #[test]
    fn test_aabb_hit_and_miss() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));

        let toward = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let interval = aabb.intersect_p(&toward, toward.inv_direction, toward.dir_is_neg);
        assert_eq!(interval, Some(Interval::new(4.0, 6.0)));

        let away = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z);
        assert!(!aabb.hit(&away));

        let beside = Ray::new(Vec3::new(3.0, 0.0, -5.0), Vec3::Z);
        assert!(!aabb.hit(&beside));
    }

    #[test]
    fn test_aabb_hit_from_inside() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));

        let range = aabb.intersect_p(&ray, ray.inv_direction, ray.dir_is_neg);
        assert!(range.is_some_and(|r| r.min < 0.0 && r.max > 0.0));
    }

    #[test]
    fn test_aabb_contains() {
        let outer = Aabb::from_points(Vec3::splat(-2.0), Vec3::splat(2.0));
        let inner = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(inner.contains(&Aabb::EMPTY));
    }

    /// Clip the ray against each slab with plain division.
    fn clip_reference(aabb: &Aabb, ray: &Ray) -> Interval {
        let mut range = Interval::FORWARD;
        for axis in 0..3 {
            let o = ray.origin[axis];
            let d = ray.direction[axis];
            if d.abs() < 1e-12 {
                if o < aabb.min[axis] || o > aabb.max[axis] {
                    return Interval::EMPTY;
                }
                continue;
            }
            let t0 = (aabb.min[axis] - o) / d;
            let t1 = (aabb.max[axis] - o) / d;
            range = range.intersect(&Interval::new(t0.min(t1), t0.max(t1)));
        }
        range
    }

    fn vec3_in(range: std::ops::Range<f32>) -> impl Strategy<Value = Vec3> {
        (range.clone(), range.clone(), range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn prop_union_contains_both(
            a0 in vec3_in(-10.0..10.0), a1 in vec3_in(-10.0..10.0),
            b0 in vec3_in(-10.0..10.0), b1 in vec3_in(-10.0..10.0),
        ) {
            let a = Aabb::from_points(a0, a1);
            let b = Aabb::from_points(b0, b1);
            let u = a.union(&b);
            prop_assert!(u.contains(&a));
            prop_assert!(u.contains(&b));
        }

        #[test]
        fn prop_slab_agrees_with_clipping(
            c0 in vec3_in(-3.0..3.0), c1 in vec3_in(-3.0..3.0),
            origin in vec3_in(-6.0..6.0), dir in vec3_in(-1.0..1.0),
        ) {
            prop_assume!(dir.length() > 0.1);
            let aabb = Aabb::from_points(c0, c1);
            let ray = Ray::new(origin, dir);
            let reference = clip_reference(&aabb, &ray);
            let ours = aabb.intersect_p(&ray, ray.inv_direction, ray.dir_is_neg);

            // clear hits must be found
            if reference.size() > 1e-3 {
                prop_assert!(ours.is_some());
            }
            // and every reported range must actually lie inside the box
            if let Some(range) = ours {
                let t = 0.5 * (range.min.max(0.0) + range.max);
                let p = ray.at(t);
                let slack = Aabb::from_points(aabb.min - Vec3::splat(1e-3), aabb.max + Vec3::splat(1e-3));
                prop_assert!(slack.contains_point(p));
            }
        }
    }
}
