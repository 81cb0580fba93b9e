//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over any `Primitive`. The scene keeps one over its objects
//! and every mesh keeps one over its triangles, so a mesh is a single leaf
//! of the scene tree.

use std::time::Instant;

use prism_core::SplitMethod;
use prism_math::{Aabb, Axis, Interval, Ray, Vec3};
use rand::RngCore;

use crate::{gen_f32, Intersection, LightSample, Primitive};

/// Bucket count for the surface area heuristic.
const SAH_BUCKETS: usize = 12;

/// BVH node - either a branch with two children or a leaf with one primitive.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        bounds: Aabb,
        /// Axis the children were split along
        axis: Axis,
        /// Sum of the emissive area below this node
        emissive_area: f32,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
    /// Leaf node holding the index of a single primitive.
    Leaf { index: usize, bounds: Aabb },
    /// Only used as the root of an empty tree.
    Empty,
}

impl BvhNode {
    pub fn bounds(&self) -> Aabb {
        match self {
            BvhNode::Branch { bounds, .. } | BvhNode::Leaf { bounds, .. } => *bounds,
            BvhNode::Empty => Aabb::EMPTY,
        }
    }
}

/// Per-primitive data used only while building.
#[derive(Clone, Copy)]
struct BuildItem {
    index: usize,
    bounds: Aabb,
    centroid: Vec3,
}

/// A BVH that owns its primitives.
pub struct Bvh<P> {
    primitives: Vec<P>,
    root: BvhNode,
    split_method: SplitMethod,
    node_count: usize,
    area: f32,
    emissive_area: f32,
}

impl<P: Primitive> Bvh<P> {
    /// Build a BVH over `primitives`. The tree only depends on input order
    /// and split method.
    pub fn new(primitives: Vec<P>, split_method: SplitMethod) -> Self {
        let start = Instant::now();

        let items: Vec<BuildItem> = primitives
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let bounds = p.bounds();
                BuildItem {
                    index,
                    bounds,
                    centroid: bounds.centroid(),
                }
            })
            .collect();

        let mut bvh = Self {
            area: primitives.iter().map(|p| p.area()).sum(),
            emissive_area: 0.0,
            primitives,
            root: BvhNode::Empty,
            split_method,
            node_count: 0,
        };

        if !items.is_empty() {
            bvh.root = bvh.build(items);
        }
        bvh.emissive_area = bvh.node_emissive_area(&bvh.root);

        log::debug!(
            "BVH built: {} primitives, {} nodes, {:?} split in {:.2?}",
            bvh.primitives.len(),
            bvh.node_count,
            split_method,
            start.elapsed()
        );

        bvh
    }

    /// Recursive top-down construction. `items` is never empty.
    fn build(&mut self, mut items: Vec<BuildItem>) -> BvhNode {
        self.node_count += 1;

        if items.len() == 1 {
            return BvhNode::Leaf {
                index: items[0].index,
                bounds: items[0].bounds,
            };
        }

        let bounds = items
            .iter()
            .fold(Aabb::EMPTY, |acc, item| acc.union(&item.bounds));
        let centroid_bounds = items
            .iter()
            .fold(Aabb::EMPTY, |acc, item| acc.union_point(item.centroid));
        let axis = centroid_bounds.max_extent();

        let right_items = match self.split_method {
            SplitMethod::Naive => split_median(&mut items, axis),
            SplitMethod::Sah => split_sah(&mut items, axis, &bounds, &centroid_bounds)
                .unwrap_or_else(|| split_median(&mut items, axis)),
        };

        let left = self.build(items);
        let right = self.build(right_items);
        let emissive_area = self.node_emissive_area(&left) + self.node_emissive_area(&right);

        BvhNode::Branch {
            bounds: left.bounds().union(&right.bounds()),
            axis,
            emissive_area,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn node_emissive_area(&self, node: &BvhNode) -> f32 {
        match node {
            BvhNode::Branch { emissive_area, .. } => *emissive_area,
            BvhNode::Leaf { index, .. } => self.primitives[*index].emissive_area(),
            BvhNode::Empty => 0.0,
        }
    }

    /// Nearest hit along the ray, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.intersect_within(ray, Interval::FORWARD)
    }

    /// Nearest hit with a ray parameter inside `ray_t`.
    pub fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>> {
        self.intersect_node(&self.root, ray, ray_t)
    }

    fn intersect_node<'a>(
        &'a self,
        node: &'a BvhNode,
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<Intersection<'a>> {
        match node {
            BvhNode::Empty => None,

            BvhNode::Leaf { index, bounds } => {
                let range = bounds.intersect_p(ray, ray.inv_direction, ray.dir_is_neg)?;
                if range.intersect(&ray_t).is_empty() {
                    return None;
                }
                self.primitives[*index].intersect(ray, ray_t)
            }

            BvhNode::Branch {
                bounds,
                axis,
                left,
                right,
                ..
            } => {
                let range = bounds.intersect_p(ray, ray.inv_direction, ray.dir_is_neg)?;
                if range.intersect(&ray_t).is_empty() {
                    return None;
                }

                // Visit the child on the near side of the split first
                let (near, far) = if ray.dir_is_neg[*axis] {
                    (right, left)
                } else {
                    (left, right)
                };

                let near_hit = self.intersect_node(near, ray, ray_t);
                let closest = near_hit.as_ref().map_or(ray_t.max, |hit| hit.distance);
                let far_hit = self.intersect_node(far, ray, Interval::new(ray_t.min, closest));

                far_hit.or(near_hit)
            }
        }
    }

    /// Pick a point on an emissive primitive with probability proportional
    /// to its area. `None` when nothing in the tree emits.
    pub fn sample<'a>(&'a self, rng: &mut dyn RngCore) -> Option<LightSample<'a>> {
        if self.emissive_area <= 0.0 {
            return None;
        }
        let p = gen_f32(rng) * self.emissive_area;
        self.sample_at(p, rng)
    }

    /// Descend towards the leaf covering `p` in `[0, emissive_area)`.
    ///
    /// A child with no emissive area is never entered, so rounding that
    /// pushes `p` past the last emitter still lands on an emitter.
    fn sample_at<'a>(&'a self, mut p: f32, rng: &mut dyn RngCore) -> Option<LightSample<'a>> {
        let mut node = &self.root;

        loop {
            match node {
                BvhNode::Empty => return None,
                BvhNode::Branch { left, right, .. } => {
                    let left_area = self.node_emissive_area(left);
                    let right_area = self.node_emissive_area(right);
                    if left_area > 0.0 && (p < left_area || right_area <= 0.0) {
                        node = &**left;
                    } else {
                        p -= left_area;
                        node = &**right;
                    }
                }
                BvhNode::Leaf { index, .. } => {
                    let primitive = &self.primitives[*index];
                    let leaf_area = primitive.emissive_area();
                    if leaf_area <= 0.0 {
                        return None;
                    }
                    let mut sample = primitive.sample(rng)?;
                    sample.pdf *= leaf_area / self.emissive_area;
                    return Some(sample);
                }
            }
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.root.bounds()
    }

    /// Summed area of every primitive.
    pub fn area(&self) -> f32 {
        self.area
    }

    /// Summed area of the emissive primitives.
    pub fn emissive_area(&self) -> f32 {
        self.emissive_area
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn root(&self) -> &BvhNode {
        &self.root
    }
}

/// Sort by centroid along `axis` and split off the upper half.
fn split_median(items: &mut Vec<BuildItem>, axis: Axis) -> Vec<BuildItem> {
    items.sort_unstable_by(|a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));
    let mid = items.len() / 2;
    items.split_off(mid)
}

/// Bucketed SAH split. Returns `None` when the centroids coincide or no
/// bucket boundary separates the items, leaving the caller to fall back.
fn split_sah(
    items: &mut Vec<BuildItem>,
    axis: Axis,
    bounds: &Aabb,
    centroid_bounds: &Aabb,
) -> Option<Vec<BuildItem>> {
    let parent_area = bounds.surface_area();
    if centroid_bounds.diagonal()[axis] <= 0.0 || parent_area <= 0.0 {
        return None;
    }

    let bucket_of = |item: &BuildItem| -> usize {
        let b = (centroid_bounds.offset(item.centroid)[axis] * SAH_BUCKETS as f32) as usize;
        b.min(SAH_BUCKETS - 1)
    };

    let mut counts = [0usize; SAH_BUCKETS];
    let mut bucket_bounds = [Aabb::EMPTY; SAH_BUCKETS];
    for item in items.iter() {
        let b = bucket_of(item);
        counts[b] += 1;
        bucket_bounds[b] = bucket_bounds[b].union(&item.bounds);
    }

    // cost of splitting after bucket i
    let mut best: Option<(usize, f32)> = None;
    for i in 0..SAH_BUCKETS - 1 {
        let (left, right) = bucket_bounds.split_at(i + 1);
        let n_left: usize = counts[..=i].iter().sum();
        let n_right: usize = counts[i + 1..].iter().sum();
        if n_left == 0 || n_right == 0 {
            continue;
        }

        let area_left = left.iter().fold(Aabb::EMPTY, |acc, b| acc.union(b)).surface_area();
        let area_right = right.iter().fold(Aabb::EMPTY, |acc, b| acc.union(b)).surface_area();
        let cost = 1.0 + (n_left as f32 * area_left + n_right as f32 * area_right) / parent_area;

        if best.map_or(true, |(_, best_cost)| cost < best_cost) {
            best = Some((i, cost));
        }
    }

    let (split_bucket, _) = best?;
    let (left, right): (Vec<BuildItem>, Vec<BuildItem>) =
        items.drain(..).partition(|item| bucket_of(item) <= split_bucket);
    *items = left;
    Some(right)
}
