mod app;
mod config;
mod faces;

use anyhow::Result;

use carousel_engine::device::GpuInit;
use carousel_engine::logging::{init_logging, LoggingConfig};
use carousel_engine::window::{Runtime, RuntimeConfig};

use app::CarouselApp;
use config::ViewerConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = ViewerConfig::from_args()?;
    log::info!(
        "carousel viewer: {} faces, {}",
        config.layout.faces(),
        if config.face_paths.is_empty() {
            "generated textures".to_string()
        } else {
            format!("{} image files", config.face_paths.len())
        }
    );

    let runtime = RuntimeConfig {
        title: "Carousel".to_string(),
        render_mode: config.surface.initial_mode,
        ..Default::default()
    };

    let app = CarouselApp::new(config)?;
    Runtime::run(runtime, GpuInit::default(), app)
}
