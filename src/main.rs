use anyhow::Result;
use box_scene::{BoxSceneApp, config::SceneConfig};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    log::info!("Starting box scene...");

    // Optional path to a RON scene config
    let args: Vec<String> = env::args().collect();
    let config = if args.len() > 1 {
        log::info!("Using scene config: {}", args[1]);
        SceneConfig::load(&args[1])?
    } else {
        log::info!("No scene config given, using defaults");
        SceneConfig::default()
    };

    log::info!(
        "Front texture '{}' from {}",
        config.front_texture,
        config.asset_root.display()
    );

    let app = BoxSceneApp::new(config)?;
    pollster::block_on(app.run())?;
    Ok(())
}
