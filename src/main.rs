#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::{Context, Result};
use env_logger::Env;
use gpui::Application;

use signa::{SignaConfig, gesture::DEFAULT_SCORE_THRESHOLD, ui};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = SignaConfig::load().context("failed to load configuration")?;
    log::info!(
        "polling every {} ms, score threshold {}",
        config.tick_interval_ms,
        DEFAULT_SCORE_THRESHOLD
    );

    Application::new()
        .with_assets(gpui_component_assets::Assets)
        .run(move |app| {
            gpui_component::init(app);

            if let Err(err) = ui::launch_ui(app, config) {
                log::error!("failed to launch ui: {err:?}");
            }
        });

    Ok(())
}
