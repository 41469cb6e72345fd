use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{ACCOUNT_NAME_COLUMN, CURRENCY_COLUMN};
use crate::diagram::{DIAGRAM_FILE_NAME, DIAGRAM_MIME};
use crate::state::{AppState, StatusLevel};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    if state.session.is_none() {
        ui.label("Please upload the Excel file containing account details (File → Open…).");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Select Account Name");
            let accounts = state.choices(ACCOUNT_NAME_COLUMN);
            choice_box(ui, "account_name", ACCOUNT_NAME_COLUMN, accounts, &mut state.account_name);
            ui.add_space(6.0);

            ui.strong("Select Currency");
            let currencies = state.choices(CURRENCY_COLUMN);
            choice_box(ui, "currency", CURRENCY_COLUMN, currencies, &mut state.currency);
            ui.add_space(10.0);

            if ui.button("Retrieve Account Details").clicked() {
                state.retrieve();
            }

            ui.separator();
            email_section(ui, state);
        });
}

/// Combo box over a column's distinct values. A missing column shows a
/// disabled placeholder instead.
fn choice_box(
    ui: &mut Ui,
    id: &str,
    column: &str,
    choices: Option<Vec<String>>,
    selected: &mut String,
) {
    let Some(choices) = choices else {
        ui.add_enabled_ui(false, |ui: &mut Ui| {
            egui::ComboBox::from_id_salt(id)
                .selected_text(format!("No {column} Column"))
                .show_ui(ui, |_ui: &mut Ui| {});
        });
        return;
    };

    egui::ComboBox::from_id_salt(id)
        .selected_text(if selected.is_empty() { "(any)" } else { selected.as_str() })
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in &choices {
                let label = if choice.is_empty() { "(any)" } else { choice.as_str() };
                ui.selectable_value(selected, choice.clone(), label);
            }
        });
}

fn email_section(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Email details").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if state.config.smtp.is_none() {
                ui.label(
                    RichText::new("Add an [smtp] section to the config file to enable email.")
                        .weak(),
                );
            }
            ui.label("Recipient");
            ui.text_edit_singleline(&mut state.recipient);

            let ready = state.matched_row.is_some() && !state.recipient.trim().is_empty();
            if ui.add_enabled(ready, egui::Button::new("Send Email")).clicked() {
                state.send_email_smtp();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export maker-checker diagram…").clicked() {
                save_diagram_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            let name = session
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!("{name}: {} rows", session.table.len()));
        }

        ui.separator();

        if let Some(status) = &state.status {
            let color = match status.level {
                StatusLevel::Info => Color32::GRAY,
                StatusLevel::Warning => Color32::from_rgb(230, 160, 0),
                StatusLevel::Error => Color32::RED,
            };
            ui.label(RichText::new(&status.text).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open account sheet")
        .add_filter("Supported files", &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json"])
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("OpenDocument", &["ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_diagram_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export maker-checker diagram")
        .set_file_name(DIAGRAM_FILE_NAME)
        .add_filter(DIAGRAM_MIME, &["xml"])
        .save_file();

    if let Some(path) = file {
        state.export_diagram(&path);
    }
}
