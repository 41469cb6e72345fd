use eframe::egui;

use crate::state::AppState;
use crate::ui::{details, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AccountLookupApp {
    pub state: AppState,
}

impl AccountLookupApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AccountLookupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and email ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: details ----
        egui::CentralPanel::default().show(ctx, |ui| {
            details::details_view(ui, &mut self.state);
        });
    }
}
