//! Built-in Cornell box, rendered when no scene file is given.

use prism_core::{
    CameraDescription, Color, Integrator, Material, SceneDescription, SceneSettings, TriangleEntry,
};
use prism_math::Vec3;

const SIZE: f32 = 555.0;

/// Two triangles covering `origin + a * u + b * v` for `a, b` in `[0, 1]`.
///
/// The quad faces `u x v`.
fn quad(origin: Vec3, u: Vec3, v: Vec3, material: &str) -> [TriangleEntry; 2] {
    let corner = origin + u + v;
    [
        TriangleEntry {
            vertices: [origin, origin + u, corner],
            uvs: None,
            material: material.to_string(),
        },
        TriangleEntry {
            vertices: [origin, corner, origin + v],
            uvs: None,
            material: material.to_string(),
        },
    ]
}

/// Axis-aligned box with outward-facing sides.
fn cuboid(min: Vec3, max: Vec3, material: &str) -> Vec<TriangleEntry> {
    let size = max - min;
    let (sx, sy, sz) = (Vec3::X * size.x, Vec3::Y * size.y, Vec3::Z * size.z);

    [
        quad(min, sx, sz, material),                                  // -Y
        quad(Vec3::new(min.x, max.y, min.z), sz, sx, material),       // +Y
        quad(min, sy, sx, material),                                  // -Z
        quad(Vec3::new(min.x, min.y, max.z), sx, sy, material),       // +Z
        quad(min, sz, sy, material),                                  // -X
        quad(Vec3::new(max.x, min.y, min.z), sy, sz, material),       // +X
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Cornell box with a mirrored tall block, path traced.
pub fn cornell_box() -> SceneDescription {
    let mut scene = SceneDescription {
        settings: SceneSettings {
            background: Color::ZERO,
            max_depth: 8,
            fov: 40.0,
            // hit points sit hundreds of units from the origin
            ray_bias: 0.01,
            ..SceneSettings::default()
        }
        .with_integrator(Integrator::PathTracing),
        camera: CameraDescription {
            position: Vec3::new(278.0, 273.0, -800.0),
            look_at: Vec3::new(278.0, 273.0, 0.0),
            up: Vec3::Y,
            width: 512,
            height: 512,
            samples_per_pixel: 64,
        },
        ..SceneDescription::default()
    };

    let materials = [
        ("red", Material::diffuse(Color::new(0.63, 0.065, 0.05)).with_coefficients(1.0, 0.0)),
        ("green", Material::diffuse(Color::new(0.14, 0.45, 0.091)).with_coefficients(1.0, 0.0)),
        ("white", Material::diffuse(Color::new(0.725, 0.71, 0.68)).with_coefficients(1.0, 0.0)),
        ("mirror", Material::mirror()),
        (
            "light",
            Material::diffuse(Color::splat(0.65))
                .with_coefficients(1.0, 0.0)
                .with_emission(Color::new(47.8, 38.6, 31.1)),
        ),
    ];
    for (name, material) in materials {
        scene.materials.insert(name.to_string(), material);
    }

    let walls = [
        quad(Vec3::ZERO, Vec3::Z * SIZE, Vec3::X * SIZE, "white"),                       // floor
        quad(Vec3::new(0.0, SIZE, 0.0), Vec3::X * SIZE, Vec3::Z * SIZE, "white"),        // ceiling
        quad(Vec3::new(0.0, 0.0, SIZE), Vec3::Y * SIZE, Vec3::X * SIZE, "white"),        // back
        quad(Vec3::new(SIZE, 0.0, 0.0), Vec3::Z * SIZE, Vec3::Y * SIZE, "red"),          // left
        quad(Vec3::ZERO, Vec3::Y * SIZE, Vec3::Z * SIZE, "green"),                       // right
        quad(Vec3::new(213.0, SIZE - 1.0, 227.0), Vec3::X * 130.0, Vec3::Z * 105.0, "light"),
    ];
    scene.triangles.extend(walls.into_iter().flatten());
    scene.triangles.extend(cuboid(Vec3::new(130.0, 0.0, 65.0), Vec3::new(295.0, 165.0, 230.0), "white"));
    scene.triangles.extend(cuboid(Vec3::new(265.0, 0.0, 295.0), Vec3::new(430.0, 330.0, 460.0), "mirror"));

    scene
}
