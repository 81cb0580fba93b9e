//! Scattering helpers shared by both integrators.

use std::f32::consts::PI;

use prism_core::{Color, Material};
use prism_math::Vec3;
use rand::RngCore;

use crate::gen_f32;

/// Mirror `incident` about `normal`.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Refract `incident` through a surface with index of refraction `ior`.
///
/// The side is inferred from `incident . normal`: negative means entering
/// the material. Returns `None` on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, ior: f32) -> Option<Vec3> {
    let mut cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (1.0, ior);
    let mut n = normal;

    if cos_i < 0.0 {
        cos_i = -cos_i;
    } else {
        std::mem::swap(&mut eta_i, &mut eta_t);
        n = -normal;
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        None
    } else {
        Some(eta * incident + (eta * cos_i - k.sqrt()) * n)
    }
}

/// Fraction of light reflected at a dielectric boundary.
pub fn fresnel(incident: Vec3, normal: Vec3, ior: f32) -> f32 {
    let cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let (eta_i, eta_t) = if cos_i > 0.0 { (ior, 1.0) } else { (1.0, ior) };

    // Snell's law
    let sin_t = eta_i / eta_t * (1.0 - cos_i * cos_i).max(0.0).sqrt();
    if sin_t >= 1.0 {
        return 1.0;
    }

    let cos_t = (1.0 - sin_t * sin_t).max(0.0).sqrt();
    let cos_i = cos_i.abs();
    let rs = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let rp = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    (rs * rs + rp * rp) / 2.0
}

/// Move `point` off the surface to the side `direction` leaves from.
#[inline]
pub fn offset_origin(point: Vec3, normal: Vec3, direction: Vec3, bias: f32) -> Vec3 {
    if direction.dot(normal) < 0.0 {
        point - normal * bias
    } else {
        point + normal * bias
    }
}

/// Cosine-weighted direction in the hemisphere around `normal`, with its pdf.
pub fn sample_cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> (Vec3, f32) {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let phi = 2.0 * PI * r1;
    let r = r2.sqrt();
    let z = (1.0 - r2).max(0.0).sqrt();

    let (tangent, bitangent) = normal.any_orthonormal_pair();
    let direction = (tangent * (r * phi.cos()) + bitangent * (r * phi.sin()) + normal * z).normalize();

    (direction, cosine_hemisphere_pdf(direction.dot(normal)))
}

#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: f32) -> f32 {
    cos_theta.max(0.0) / PI
}

/// Energy-normalized Phong BRDF.
///
/// `wi` points toward the light and `wo` toward the viewer; both are unit
/// vectors leaving the surface.
pub fn eval_brdf(material: &Material, albedo: Color, wi: Vec3, wo: Vec3, normal: Vec3) -> Color {
    let diffuse = albedo * (material.kd / PI);

    let n = material.specular_exponent;
    let mirrored = reflect(-wi, normal);
    let lobe = mirrored.dot(wo).max(0.0).powf(n);
    let specular = material.ks * (n + 2.0) / (2.0 * PI) * lobe;

    diffuse + Color::splat(specular)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reflect() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(d, Vec3::Y);

        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_refract_obeys_snell() {
        let ior = 1.5;
        let incident = Vec3::new(0.5, -1.0, 0.0).normalize();
        let refracted = refract(incident, Vec3::Y, ior).unwrap();

        let sin_i = incident.cross(Vec3::Y).length();
        let sin_t = refracted.cross(Vec3::Y).length();
        assert!((sin_i - ior * sin_t).abs() < 1e-5);
        assert!(refracted.y < 0.0);
        assert!((refracted.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_refract_straight_through() {
        let refracted = refract(Vec3::NEG_Y, Vec3::Y, 1.5).unwrap();
        assert!((refracted - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_total_internal_reflection() {
        // Leaving glass at a grazing angle
        let incident = Vec3::new(1.0, 0.2, 0.0).normalize();

        assert!(refract(incident, Vec3::Y, 1.5).is_none());
        assert_eq!(fresnel(incident, Vec3::Y, 1.5), 1.0);
    }

    #[test]
    fn test_fresnel_normal_incidence() {
        let ior = 1.5f32;
        let kr = fresnel(Vec3::NEG_Y, Vec3::Y, ior);
        let expected = ((ior - 1.0) / (ior + 1.0)).powi(2);

        assert!((kr - expected).abs() < 1e-5);
    }

    #[test]
    fn test_fresnel_grazing_is_nearly_total() {
        let incident = Vec3::new(1.0, -0.001, 0.0).normalize();
        assert!(fresnel(incident, Vec3::Y, 1.5) > 0.95);
    }

    #[test]
    fn test_offset_origin_follows_direction() {
        let p = Vec3::ZERO;

        assert_eq!(offset_origin(p, Vec3::Y, Vec3::new(0.3, 1.0, 0.0), 0.1), Vec3::new(0.0, 0.1, 0.0));
        assert_eq!(offset_origin(p, Vec3::Y, Vec3::NEG_Y, 0.1), Vec3::new(0.0, -0.1, 0.0));
    }

    #[test]
    fn test_cosine_hemisphere_stays_above_surface() {
        let mut rng = StdRng::seed_from_u64(11);
        let normal = Vec3::new(0.2, 0.9, -0.3).normalize();

        let mut mean_cos = 0.0;
        let n = 20_000;
        for _ in 0..n {
            let (dir, pdf) = sample_cosine_hemisphere(normal, &mut rng);
            let cos = dir.dot(normal);
            assert!(cos >= -1e-5);
            assert!((pdf - cos.max(0.0) / PI).abs() < 1e-5);
            mean_cos += cos / n as f32;
        }

        // E[cos] under a cosine-weighted distribution is 2/3
        assert!((mean_cos - 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_brdf_diffuse_only() {
        let material = Material::default().with_coefficients(1.0, 0.0);
        let f = eval_brdf(&material, Color::ONE, Vec3::Y, Vec3::Y, Vec3::Y);

        assert!((f - Color::splat(1.0 / PI)).length() < 1e-6);
    }

    #[test]
    fn test_brdf_specular_peak() {
        let material = Material::default()
            .with_coefficients(0.0, 1.0)
            .with_specular_exponent(10.0);
        let wi = Vec3::new(1.0, 1.0, 0.0).normalize();
        let wo = Vec3::new(-1.0, 1.0, 0.0).normalize();

        let f = eval_brdf(&material, Color::ONE, wi, wo, Vec3::Y);
        assert!((f.x - 12.0 / (2.0 * PI)).abs() < 1e-4);
    }
}
