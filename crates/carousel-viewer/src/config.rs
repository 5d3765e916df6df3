use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use carousel_engine::camera::OrbitCamera;
use carousel_engine::render::cylinder::{CylinderLayout, DEFAULT_SHADER};
use carousel_engine::surface::SurfaceConfig;
use carousel_engine::window::RenderMode;

/// Face images are decoded at half resolution unless told otherwise.
pub const DEFAULT_TEXTURE_SUBSAMPLE: u32 = 2;

#[derive(Parser, Debug)]
#[command(name = "carousel-viewer")]
#[command(about = "Textured faceted cylinder, rotated by drag or continuously")]
pub struct Cli {
    /// Start paused; redraw only on input.
    #[arg(long)]
    pub on_demand: bool,

    /// Number of faces. Defaults to the number of images, or 8 without images.
    #[arg(long)]
    pub faces: Option<usize>,

    /// Divide each face image side by this factor before upload (1 = full size).
    #[arg(long, default_value_t = DEFAULT_TEXTURE_SUBSAMPLE)]
    pub subsample: u32,

    /// WGSL file replacing the built-in program.
    #[arg(long, env = "CAROUSEL_SHADER")]
    pub shader: Option<PathBuf>,

    /// One image per face, in face order. Generated faces when omitted.
    pub images: Vec<PathBuf>,
}

/// Everything the viewer needs before the window exists.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// One image per face; empty means generated faces.
    pub face_paths: Vec<PathBuf>,
    pub shader_path: Option<PathBuf>,
    pub texture_subsample: u32,
    pub layout: CylinderLayout,
    pub surface: SurfaceConfig,
    pub camera: OrbitCamera,
}

impl ViewerConfig {
    pub fn from_args() -> Result<Self> {
        Self::from_cli(Cli::parse())
    }

    /// Reconciles `--faces` with the images given. When images are given and
    /// `--faces` is not, the face count follows the number of images.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let faces = match (cli.faces, cli.images.len()) {
            (Some(n), 0) => n,
            (Some(n), given) if n != given => {
                bail!("--faces {n} does not match the {given} images given")
            }
            (Some(n), _) => n,
            (None, 0) => CylinderLayout::default().faces(),
            (None, given) => given,
        };

        let layout = CylinderLayout::new(faces)?;

        let initial_mode = if cli.on_demand {
            RenderMode::OnDemand
        } else {
            RenderMode::Continuous
        };

        Ok(Self {
            face_paths: cli.images,
            shader_path: cli.shader.filter(|p| !p.as_os_str().is_empty()),
            texture_subsample: cli.subsample.max(1),
            layout,
            surface: SurfaceConfig {
                initial_mode,
                ..Default::default()
            },
            camera: OrbitCamera::default(),
        })
    }

    /// The WGSL program: the override file if configured, else the built-in.
    pub fn shader_source(&self) -> Result<Cow<'static, str>> {
        match &self.shader_path {
            Some(path) => {
                let src = std::fs::read_to_string(path)
                    .with_context(|| format!("reading shader {}", path.display()))?;
                log::info!("using shader from {}", path.display());
                Ok(Cow::Owned(src))
            }
            None => Ok(Cow::Borrowed(DEFAULT_SHADER)),
        }
    }
}
