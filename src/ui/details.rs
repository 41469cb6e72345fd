use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Details view (central panel)
// ---------------------------------------------------------------------------

/// Render the retrieved details and a preview of the loaded sheet.
pub fn details_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Automated Account Details Retrieval");
    ui.separator();

    let scroll_to = state.take_scroll_target();
    let Some(session) = &state.session else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an account sheet to begin  (File → Open…)");
        });
        return;
    };

    if !state.details.is_empty() {
        ui.strong("Retrieved Account Details:");
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.add(
                egui::TextEdit::multiline(&mut state.details.as_str())
                    .code_editor()
                    .desired_width(f32::INFINITY),
            );
        });
        ui.add_space(8.0);
    }

    egui::CollapsingHeader::new(format!("Loaded sheet ({} rows)", session.table.len()))
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            sheet_preview(ui, &session.table, state.matched_row, scroll_to);
        });
}

/// Read-only grid of the whole sheet; the matched row is highlighted.
/// `scroll_to` is only set on the frame after a new match.
fn sheet_preview(ui: &mut Ui, table: &Table, matched: Option<usize>, scroll_to: Option<usize>) {
    if table.columns().is_empty() {
        ui.label("The first worksheet is empty.");
        return;
    }
    if table.is_empty() {
        ui.label("The sheet has a header row but no data rows.");
    }

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(80.0), table.columns().len())
        .sense(egui::Sense::hover());
    if let Some(row) = scroll_to {
        builder = builder.scroll_to_row(row, None);
    }

    builder
        .header(22.0, |mut header| {
            for column in table.columns() {
                header.col(|ui: &mut Ui| {
                    ui.strong(column);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, table.len(), |mut row| {
                let index = row.index();
                row.set_selected(matched == Some(index));
                let Some(record) = table.record(index) else {
                    return;
                };
                for (_, value) in record.fields() {
                    row.col(|ui: &mut Ui| {
                        ui.label(value.to_string());
                    });
                }
            });
        });
}
