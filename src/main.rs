mod app;
mod color;
mod config;
mod data;
mod decor;
mod state;
mod ui;

use anyhow::Result;
use app::DrugDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    // A dataset that cannot be loaded stops the dashboard.
    let dataset = data::loader::load_file(&config.data_path).inspect_err(|e| log::error!("{e}"))?;
    log::info!(
        "Loaded {} drug records from {}",
        dataset.len(),
        config.data_path.display()
    );

    let logo = decor::load_logo(&config.logo_path)
        .inspect_err(|e| log::warn!("{e}"))
        .ok();
    let animation =
        decor::AnimationState::spawn(config.animation_url.clone(), config.animation_timeout);

    let state = AppState::new(config, dataset, logo, animation);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Drugs Dashboard",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can decode the sidebar logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DrugDashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
