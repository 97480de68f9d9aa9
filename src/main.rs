mod app;
mod color;
mod config;
mod data;
mod error;
mod query;
mod state;
mod ui;

use std::process::ExitCode;

use app::WohnbelegungApp;
use clap::Parser;
use config::Args;
use eframe::egui;
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    // Without its data the dashboard has nothing to show.
    let dataset = match data::loader::load_file(&args.data) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", args.data.display());
            return ExitCode::FAILURE;
        }
    };
    if dataset.is_empty() {
        log::warn!("{} contains no rows", args.data.display());
    }
    log::info!(
        "Loaded {} rows, {} neighborhoods, years {:?}",
        dataset.len(),
        dataset.neighborhoods.len(),
        dataset.year_span
    );

    let selection = args.selection();

    if let Some(path) = &args.export {
        let view = query::view::render(&dataset, selection);
        return match view.write_json(path) {
            Ok(()) => {
                log::info!("Wrote view to {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to export view: {e:#}");
                ExitCode::FAILURE
            }
        };
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let state = AppState::new(dataset, selection);
    let result = eframe::run_native(
        "Belegung neuer Wohnungen in St. Gallen",
        options,
        Box::new(|_cc| Ok(Box::new(WohnbelegungApp::new(state)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Window closed with error: {e}");
            ExitCode::FAILURE
        }
    }
}
