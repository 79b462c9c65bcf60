//! Vitrine showcase: a start screen, a game picker and three small demos
//! (card stacks, an animated dialogue, a particle flame).

mod config;
mod scenes;
mod sources;
mod tween;

use anyhow::{Context, Result};

use vitrine_engine::logging::{init_logging, LoggingConfig};
use vitrine_engine::paint::Color;
use vitrine_ui::Application;

use config::ShowcaseConfig;
use sources::FileSource;

/// Window clear color behind every scene.
const BACKGROUND: u32 = 0x2b2b40;

fn main() -> Result<()> {
    let config = ShowcaseConfig::load().context("loading showcase config")?;

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..LoggingConfig::default()
    });
    log::info!(
        "showcase: {}x{} window, starting at {:?}",
        config.window.width,
        config.window.height,
        config.initial_scene
    );

    let content = FileSource::new(config.assets.root.clone())
        .with_fallback(config.dialogue.location.clone(), include_str!("../assets/magicwords.json"));

    let app = Application::new()
        .title(config.window.title.clone())
        .size(config.window.width, config.window.height)
        .clear_color(Color::from_hex(BACKGROUND));

    scenes::register_all(app, &config)
        .initial_scene(config.initial_scene.clone())
        .content_source(Box::new(content))
        .run()
}
