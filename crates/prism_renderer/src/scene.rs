//! The renderable scene and its light transport.
//!
//! `Scene::cast_ray` turns a ray into radiance. Two integrators are available:
//!
//! - **Whitted**: direct lighting on diffuse/glossy surfaces plus
//!   recursive mirror reflection and Fresnel-blended refraction.
//! - **Path tracing**: explicit sampling of emissive geometry and analytic
//!   lights, cosine-weighted indirect bounces, Russian roulette termination.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use prism_core::{
    obj, AreaLight, Color, Integrator, Light, LoadError, LoadResult, MaterialKind,
    SceneDescription, SceneSettings,
};
use prism_math::{Ray, Vec3};
use rand::RngCore;

use crate::bsdf::{
    eval_brdf, fresnel, offset_origin, reflect, refract, sample_cosine_hemisphere,
};
use crate::{gen_f32, Bvh, Intersection, LightSample, Mesh, Object, Triangle};

/// Immutable scene: geometry behind a BVH, analytic lights and settings.
pub struct Scene {
    pub settings: SceneSettings,
    pub lights: Vec<Light>,
    bvh: Bvh<Object>,
}

impl Scene {
    pub fn new(objects: Vec<Object>, lights: Vec<Light>, settings: SceneSettings) -> Self {
        let start = Instant::now();
        let bvh = Bvh::new(objects, settings.split_method);

        log::info!(
            "Scene ready: {} objects, {} lights, emissive area {:.3}, BVH built in {:.2?}",
            bvh.len(),
            lights.len(),
            bvh.emissive_area(),
            start.elapsed()
        );

        Self {
            settings,
            lights,
            bvh,
        }
    }

    /// Build a scene from a parsed scene file. OBJ paths resolve against `base_dir`.
    pub fn from_description(description: &SceneDescription, base_dir: &Path) -> LoadResult<Self> {
        let split_method = description.settings.split_method;
        let mut objects = Vec::with_capacity(description.meshes.len() + description.triangles.len());

        for entry in &description.meshes {
            let material = Arc::new(description.material(&entry.material)?.clone());
            let data = obj::load_single_mesh(base_dir.join(&entry.obj), entry.scale)?;
            objects.push(Object::Mesh(Mesh::from_mesh_data(&data, material, split_method)));
        }

        for (index, entry) in description.triangles.iter().enumerate() {
            let material = Arc::new(description.material(&entry.material)?.clone());
            let [v0, v1, v2] = entry.vertices;
            let triangle = Triangle::try_new(v0, v1, v2, material)
                .ok_or(LoadError::DegenerateTriangle(index))?;
            let triangle = match entry.uvs {
                Some(uvs) => triangle.with_uvs(uvs),
                None => triangle,
            };
            objects.push(Object::Triangle(triangle));
        }

        Ok(Self::new(
            objects,
            description.lights.clone(),
            description.settings.clone(),
        ))
    }

    /// Nearest intersection of the ray with any object.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.bvh.intersect(ray)
    }

    /// Point on emissive geometry, chosen proportionally to area.
    pub fn sample_light(&self, rng: &mut dyn RngCore) -> Option<LightSample<'_>> {
        self.bvh.sample(rng)
    }

    pub fn object_count(&self) -> usize {
        self.bvh.len()
    }

    /// Radiance arriving along `ray`. Camera rays start at depth 0.
    pub fn cast_ray(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        match self.settings.integrator {
            Integrator::Whitted => self.whitted(ray, depth, rng),
            Integrator::PathTracing => self.trace_path(ray, depth, true, rng),
        }
    }

    fn whitted(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        if depth > self.settings.max_depth {
            return Color::ZERO;
        }

        let Some(hit) = self.intersect(ray) else {
            return self.settings.background;
        };

        let material = hit.material;
        let bias = self.settings.ray_bias;
        let dir = ray.direction;
        let n = hit.normal;

        let shaded = match material.kind {
            MaterialKind::ReflectionRefraction => {
                let reflect_dir = reflect(dir, n).normalize();
                let reflect_ray = Ray::new(offset_origin(hit.point, n, reflect_dir, bias), reflect_dir);
                let reflect_color = self.whitted(&reflect_ray, depth + 1, rng);

                // Total internal reflection leaves nothing to refract
                let refract_color = match refract(dir, n, material.ior) {
                    Some(refract_dir) => {
                        let refract_dir = refract_dir.normalize();
                        let origin = offset_origin(hit.point, n, refract_dir, bias);
                        self.whitted(&Ray::new(origin, refract_dir), depth + 1, rng)
                    }
                    None => Color::ZERO,
                };

                let kr = fresnel(dir, n, material.ior);
                reflect_color * kr + refract_color * (1.0 - kr)
            }

            MaterialKind::Reflection => {
                let kr = fresnel(dir, n, material.ior);
                let reflect_dir = reflect(dir, n).normalize();
                let reflect_ray = Ray::new(offset_origin(hit.point, n, reflect_dir, bias), reflect_dir);
                self.whitted(&reflect_ray, depth + 1, rng) * kr
            }

            MaterialKind::DiffuseGlossy => {
                let (diffuse, specular) = self.phong_lighting(&hit, dir, rng);
                let albedo = hit.triangle.eval_diffuse_color(hit.uv);
                albedo * material.kd * diffuse + material.ks * specular
            }
        };

        material.emission + shaded
    }

    /// Sum of Lambert and Phong light amounts over every analytic light.
    fn phong_lighting(&self, hit: &Intersection<'_>, view_dir: Vec3, rng: &mut dyn RngCore) -> (Color, Color) {
        let shininess = hit.material.specular_exponent;
        let mut diffuse = Color::ZERO;
        let mut specular = Color::ZERO;

        let mut accumulate = |light_pos: Vec3, intensity: Color, weight: f32| {
            let Some((to_light, distance)) = self.unoccluded_direction(hit, light_pos) else {
                return;
            };
            let falloff = intensity * (weight / (distance * distance));
            diffuse += falloff * to_light.dot(hit.normal).max(0.0);
            let highlight = (-reflect(-to_light, hit.normal).dot(view_dir)).max(0.0);
            specular += falloff * highlight.powf(shininess);
        };

        for light in &self.lights {
            match light {
                Light::Point(point) => accumulate(point.position, point.intensity, 1.0),
                Light::Area(area) if area.illuminates(hit.point) => {
                    let points = self.area_light_points(area, rng);
                    let weight = 1.0 / points.len() as f32;
                    for p in points {
                        accumulate(p, area.intensity, weight);
                    }
                }
                Light::Area(_) => {}
            }
        }

        (diffuse, specular)
    }

    /// Direction and distance from the hit to `light_pos`, or `None` when
    /// something sits strictly between them.
    fn unoccluded_direction(&self, hit: &Intersection<'_>, light_pos: Vec3) -> Option<(Vec3, f32)> {
        let offset = light_pos - hit.point;
        let distance = offset.length();
        if distance <= 0.0 {
            return None;
        }
        let to_light = offset / distance;

        let origin = offset_origin(hit.point, hit.normal, to_light, self.settings.ray_bias);
        match self.intersect(&Ray::new(origin, to_light)) {
            Some(occluder) if occluder.distance < distance => None,
            _ => Some((to_light, distance)),
        }
    }

    /// Stratified points over an area light, `area_light_samples` of them.
    ///
    /// One jittered point per cell of a `columns x rows` grid that covers
    /// the light exactly, so every part of it is sampled evenly.
    fn area_light_points(&self, light: &AreaLight, rng: &mut dyn RngCore) -> Vec<Vec3> {
        let count = self.settings.area_light_samples.max(1);
        let (columns, rows) = stratum_grid(count);

        (0..count)
            .map(|i| {
                let s = ((i % columns) as f32 + gen_f32(rng)) / columns as f32;
                let t = ((i / columns) as f32 + gen_f32(rng)) / rows as f32;
                light.point_at(s, t)
            })
            .collect()
    }

    fn trace_path(&self, ray: &Ray, depth: u32, count_emission: bool, rng: &mut dyn RngCore) -> Color {
        if depth > self.settings.max_depth {
            return Color::ZERO;
        }

        let Some(hit) = self.intersect(ray) else {
            return self.settings.background;
        };

        let material = hit.material;
        let bias = self.settings.ray_bias;
        let dir = ray.direction;
        let n = hit.normal;

        let emitted = if count_emission {
            material.emission
        } else {
            Color::ZERO
        };

        let scattered = match material.kind {
            MaterialKind::Reflection => {
                let kr = fresnel(dir, n, material.ior);
                let reflect_dir = reflect(dir, n).normalize();
                let next = Ray::new(offset_origin(hit.point, n, reflect_dir, bias), reflect_dir);
                self.trace_path(&next, depth + 1, true, rng) * kr
            }

            MaterialKind::ReflectionRefraction => {
                let kr = fresnel(dir, n, material.ior);
                let reflect_dir = reflect(dir, n).normalize();
                let next_dir = if gen_f32(rng) < kr {
                    reflect_dir
                } else {
                    refract(dir, n, material.ior).map_or(reflect_dir, |d| d.normalize())
                };
                let next = Ray::new(offset_origin(hit.point, n, next_dir, bias), next_dir);
                self.trace_path(&next, depth + 1, true, rng)
            }

            MaterialKind::DiffuseGlossy => {
                let wo = -dir;
                let albedo = hit.triangle.eval_diffuse_color(hit.uv);
                self.direct_light(&hit, wo, albedo, rng) + self.indirect_light(&hit, wo, albedo, depth, rng)
            }
        };

        emitted + scattered
    }

    /// Light arriving straight from emissive geometry and analytic lights.
    fn direct_light(&self, hit: &Intersection<'_>, wo: Vec3, albedo: Color, rng: &mut dyn RngCore) -> Color {
        let material = hit.material;
        let n = hit.normal;
        let mut radiance = Color::ZERO;

        if let Some(sample) = self.sample_light(rng) {
            let offset = sample.point - hit.point;
            let dist2 = offset.length_squared();
            let distance = dist2.sqrt();

            if distance > 0.0 && sample.pdf > 0.0 {
                let wi = offset / distance;
                let cos_theta = wi.dot(n);
                let cos_light = (-wi).dot(sample.normal);

                if cos_theta > 0.0 && cos_light > 0.0 {
                    let origin = offset_origin(hit.point, n, wi, self.settings.ray_bias);
                    let visible = match self.intersect(&Ray::new(origin, wi)) {
                        None => true,
                        Some(blocker) => {
                            std::ptr::eq(blocker.triangle, sample.triangle)
                                || blocker.distance >= distance * (1.0 - 1e-4)
                        }
                    };

                    if visible {
                        let f_r = eval_brdf(material, albedo, wi, wo, n);
                        radiance += sample.emission * f_r * (cos_theta * cos_light / dist2 / sample.pdf);
                    }
                }
            }
        }

        let mut add_point = |light_pos: Vec3, intensity: Color, weight: f32| {
            if let Some((wi, distance)) = self.unoccluded_direction(hit, light_pos) {
                let cos_theta = wi.dot(n);
                if cos_theta > 0.0 {
                    let f_r = eval_brdf(material, albedo, wi, wo, n);
                    radiance += intensity * f_r * (weight * cos_theta / (distance * distance));
                }
            }
        };

        for light in &self.lights {
            match light {
                Light::Point(point) => add_point(point.position, point.intensity, 1.0),
                Light::Area(area) if area.illuminates(hit.point) => {
                    let points = self.area_light_points(area, rng);
                    let weight = 1.0 / points.len() as f32;
                    for p in points {
                        add_point(p, area.intensity, weight);
                    }
                }
                Light::Area(_) => {}
            }
        }

        radiance
    }

    /// One cosine-weighted bounce, continued with probability `russian_roulette`.
    fn indirect_light(
        &self,
        hit: &Intersection<'_>,
        wo: Vec3,
        albedo: Color,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let survival = self.settings.russian_roulette.clamp(0.0, 1.0);
        if survival <= 0.0 || gen_f32(rng) >= survival {
            return Color::ZERO;
        }

        let n = hit.normal;
        let (wi, pdf) = sample_cosine_hemisphere(n, rng);
        let cos_theta = wi.dot(n);
        if pdf <= 0.0 || cos_theta <= 0.0 {
            return Color::ZERO;
        }

        let next = Ray::new(offset_origin(hit.point, n, wi, self.settings.ray_bias), wi);
        // Emitters along this bounce are already covered by light sampling
        let incoming = self.trace_path(&next, depth + 1, false, rng);
        let f_r = eval_brdf(hit.material, albedo, wi, wo, n);

        incoming * f_r * (cos_theta / (pdf * survival))
    }
}

/// Split `count` into `columns * rows == count` with the grid as close to
/// square as the factors allow. A prime count becomes a single row.
fn stratum_grid(count: u32) -> (u32, u32) {
    let rows = (1..=count)
        .take_while(|r| r * r <= count)
        .filter(|r| count % r == 0)
        .last()
        .unwrap_or(1);
    (count / rows, rows)
}
