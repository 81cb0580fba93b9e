//! JSON scene files.
//!
//! A scene file names its materials once and refers to them by name from
//! meshes and inline triangles:
//!
//! ```json
//! {
//!   "settings": { "max_depth": 4, "integrator": "path_tracing" },
//!   "camera": { "position": [0, 1, 4], "look_at": [0, 1, 0] },
//!   "materials": { "white": { "albedo": { "type": "solid", "color": [0.7, 0.7, 0.7] } } },
//!   "meshes": [{ "obj": "bunny.obj", "material": "white", "scale": 10 }],
//!   "lights": [{ "type": "point", "position": [0, 4, 0], "intensity": [20, 20, 20] }]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use prism_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};
use crate::light::Light;
use crate::material::Material;
use crate::settings::SceneSettings;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            width: 400,
            height: 400,
            samples_per_pixel: 1,
        }
    }
}

fn unit_scale() -> f32 {
    1.0
}

/// An OBJ file placed in the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshEntry {
    /// Path to the OBJ, relative to the scene file
    pub obj: PathBuf,
    pub material: String,
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

/// A single triangle written directly in the scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangleEntry {
    pub vertices: [Vec3; 3],
    #[serde(default)]
    pub uvs: Option<[Vec2; 3]>,
    pub material: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub settings: SceneSettings,
    pub camera: CameraDescription,
    pub materials: BTreeMap<String, Material>,
    pub meshes: Vec<MeshEntry>,
    pub triangles: Vec<TriangleEntry>,
    pub lights: Vec<Light>,
}

impl SceneDescription {
    /// Parse and validate a scene from JSON text.
    pub fn from_json_str(text: &str) -> LoadResult<Self> {
        let description: SceneDescription = serde_json::from_str(text)?;
        description.validate()?;
        Ok(description)
    }

    /// Read, parse and validate a scene file.
    pub fn from_path(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        log::info!("Loading scene: {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> LoadResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a material by name.
    pub fn material(&self, name: &str) -> LoadResult<&Material> {
        self.materials
            .get(name)
            .ok_or_else(|| LoadError::UnknownMaterial(name.to_string()))
    }

    /// Check that every material reference resolves and no inline triangle is degenerate.
    pub fn validate(&self) -> LoadResult<()> {
        for mesh in &self.meshes {
            self.material(&mesh.material)?;
        }

        for (index, triangle) in self.triangles.iter().enumerate() {
            self.material(&triangle.material)?;

            let [v0, v1, v2] = triangle.vertices;
            if (v1 - v0).cross(v2 - v0).length_squared() <= f32::EPSILON * f32::EPSILON {
                return Err(LoadError::DegenerateTriangle(index));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::PointLight;
    use crate::material::{Color, MaterialKind};
    use crate::settings::Integrator;

    const SCENE: &str = r#"{
        "settings": { "max_depth": 3, "integrator": "path_tracing" },
        "camera": { "position": [0, 1, 4], "look_at": [0, 1, 0], "width": 64, "height": 32 },
        "materials": {
            "white": { "albedo": { "type": "solid", "color": [0.7, 0.7, 0.7] } },
            "mirror": { "kind": "reflection" }
        },
        "meshes": [{ "obj": "bunny.obj", "material": "white" }],
        "triangles": [
            { "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]], "material": "mirror" }
        ],
        "lights": [{ "type": "point", "position": [0, 4, 0], "intensity": [20, 20, 20] }]
    }"#;

    #[test]
    fn test_parse_scene() {
        let description = SceneDescription::from_json_str(SCENE).unwrap();

        assert_eq!(description.settings.max_depth, 3);
        assert_eq!(description.settings.integrator, Integrator::PathTracing);
        assert_eq!(description.camera.width, 64);
        assert_eq!(description.camera.up, Vec3::Y);
        assert_eq!(description.meshes[0].scale, 1.0);
        assert_eq!(
            description.material("mirror").unwrap().kind,
            MaterialKind::Reflection
        );
        assert_eq!(
            description.lights[0],
            Light::Point(PointLight {
                position: Vec3::new(0.0, 4.0, 0.0),
                intensity: Color::splat(20.0),
            })
        );
    }

    #[test]
    fn test_json_round_trip() {
        let description = SceneDescription::from_json_str(SCENE).unwrap();
        let text = description.to_json_string().unwrap();

        assert_eq!(SceneDescription::from_json_str(&text).unwrap(), description);
    }

    #[test]
    fn test_unknown_material() {
        let text = r#"{ "meshes": [{ "obj": "a.obj", "material": "gold" }] }"#;

        match SceneDescription::from_json_str(text) {
            Err(LoadError::UnknownMaterial(name)) => assert_eq!(name, "gold"),
            other => panic!("expected UnknownMaterial, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_inline_triangle() {
        let text = r#"{
            "materials": { "m": {} },
            "triangles": [{ "vertices": [[0, 0, 0], [1, 1, 1], [2, 2, 2]], "material": "m" }]
        }"#;

        assert!(matches!(
            SceneDescription::from_json_str(text),
            Err(LoadError::DegenerateTriangle(0))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SceneDescription::from_json_str("{ not json"),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SceneDescription::from_path("/nonexistent/prism/scene.json"),
            Err(LoadError::Io(_))
        ));
    }
}
