mod app;
mod config;
mod data;
mod diagram;
mod notify;
mod state;
mod ui;

use app::AccountLookupApp;
use eframe::egui;
use state::{AppState, Status, StatusLevel};

fn main() -> eframe::Result {
    env_logger::init();

    let mut config_error = None;
    let config = match config::default_path() {
        Some(path) => config::load(&path).unwrap_or_else(|e| {
            log::error!("Failed to load {}: {e:#}", path.display());
            config_error = Some(format!("Error: {e}"));
            config::Config::default()
        }),
        None => {
            log::warn!("Unable to determine config directory, email disabled");
            config::Config::default()
        }
    };

    let mut state = AppState::new(config);
    state.status = config_error.map(|text| Status {
        level: StatusLevel::Error,
        text,
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Account Lookup",
        options,
        Box::new(|_cc| Ok(Box::new(AccountLookupApp::new(state)))),
    )
}
