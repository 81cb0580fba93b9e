//! Prism command-line renderer.
//!
//! ```text
//! prism [SCENE.json] [OUTPUT.png]
//! ```
//!
//! Without a scene file the built-in Cornell box is rendered. The output
//! defaults to `render.png`.

mod demo;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use prism_core::SceneDescription;
use prism_renderer::{render, Camera, ImageBuffer, RenderConfig, Scene};

const DEFAULT_OUTPUT: &str = "render.png";

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Args {
    scene: Option<PathBuf>,
    output: PathBuf,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut scene = None;
        let mut output = None;

        for arg in args {
            let path = PathBuf::from(&arg);
            let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

            if is_json && scene.is_none() {
                scene = Some(path);
            } else if output.is_none() {
                output = Some(path);
            } else {
                anyhow::bail!("unexpected argument: {arg}\nusage: prism [SCENE.json] [OUTPUT.png]");
            }
        }

        Ok(Self {
            scene,
            output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        })
    }
}

fn load_description(path: Option<&Path>) -> Result<(SceneDescription, PathBuf)> {
    match path {
        Some(path) => {
            let description = SceneDescription::from_path(path)
                .with_context(|| format!("failed to load scene {}", path.display()))?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            Ok((description, base_dir))
        }
        None => {
            log::info!("No scene given, rendering the built-in Cornell box");
            Ok((demo::cornell_box(), PathBuf::new()))
        }
    }
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("image buffer does not match its dimensions")?;
    rgba.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse(env::args().skip(1))?;
    let (description, base_dir) = load_description(args.scene.as_deref())?;

    let scene = Scene::from_description(&description, &base_dir).context("failed to build scene")?;
    let camera = Camera::from_description(&description.camera, description.settings.fov);
    let config = RenderConfig::default().with_samples(description.camera.samples_per_pixel);

    let image = render(&scene, &camera, &config);
    save_png(&image, &args.output)?;

    log::info!("Wrote {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_no_arguments_renders_demo() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.scene, None);
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_scene_and_output() {
        let args = parse(&["scenes/cornell.json", "out.png"]).unwrap();
        assert_eq!(args.scene, Some(PathBuf::from("scenes/cornell.json")));
        assert_eq!(args.output, PathBuf::from("out.png"));
    }

    #[test]
    fn test_output_only() {
        let args = parse(&["out.png"]).unwrap();
        assert_eq!(args.scene, None);
        assert_eq!(args.output, PathBuf::from("out.png"));
    }

    #[test]
    fn test_extra_argument_is_rejected() {
        assert!(parse(&["a.json", "b.png", "c.png"]).is_err());
    }

    #[test]
    fn test_save_png_writes_file() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(1, 1, prism_core::Color::ONE);

        let path = env::temp_dir().join(format!("prism_cli_test_{}.png", std::process::id()));
        save_png(&image, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(1, 1).0, [255, 255, 255, 255]);
        std::fs::remove_file(&path).ok();
    }
}
