//! Prism Core - renderer-agnostic scene description.
//!
//! This crate provides:
//!
//! - **Geometry**: `MeshData`, a triangle soup loaded from OBJ files
//! - **Shading inputs**: `Material`, `Light`, `SceneSettings`
//! - **Scene files**: `SceneDescription`, a JSON document tying it all together
//!
//! # Example
//!
//! ```ignore
//! use prism_core::SceneDescription;
//!
//! let description = SceneDescription::from_path("cornell.json")?;
//! println!("{} materials, {} lights",
//!     description.materials.len(),
//!     description.lights.len());
//! ```

pub mod description;
pub mod error;
pub mod light;
pub mod material;
pub mod mesh;
pub mod obj;
pub mod settings;

// Re-export commonly used types
pub use description::{CameraDescription, MeshEntry, SceneDescription, TriangleEntry};
pub use error::{LoadError, LoadResult};
pub use light::{AreaLight, Light, PointLight};
pub use material::{Albedo, Color, Material, MaterialKind};
pub use mesh::MeshData;
pub use settings::{Integrator, SceneSettings, SplitMethod};
