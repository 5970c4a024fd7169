mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use app::DashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(config::CONFIG_FILE))?;

    let table = data::loader::load_file(&config.data_path, &config.load_options())
        .with_context(|| format!("loading {}", config.data_path.display()))
        .inspect_err(|e| log::error!("Startup failed: {e:#}"))?;

    let mut state = AppState::new(Arc::new(table), &config).context("resolving default controls")?;
    state.description = config::load_description(&config.description_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &config.window_title,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
