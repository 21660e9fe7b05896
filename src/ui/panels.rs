use eframe::egui::{self, Color32, DragValue, RichText, Ui};

use crate::data::loader::Format;
use crate::state::{AppState, DataSource, ManualEntry};
use crate::ui::results;

// ---------------------------------------------------------------------------
// Left side panel – data source selection
// ---------------------------------------------------------------------------

/// Render the left panel: source radio buttons and the per-source controls.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data source");
    ui.separator();

    let current = state.source;
    for source in DataSource::ALL {
        if ui.radio(current == source, source.to_string()).clicked() && current != source {
            state.select_source(source);
        }
    }
    ui.separator();

    match state.source {
        DataSource::Preset => {
            ui.label("Built-in class of five students.");
        }
        DataSource::Upload => {
            ui.label("Choose a file with `name` and `score` columns (CSV, XLSX, Parquet or JSON).");
            ui.add_space(4.0);
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
            }
        }
        DataSource::Manual => manual_form(ui, state),
    }
}

fn manual_form(ui: &mut Ui, state: &mut AppState) {
    ui.label("Add students one at a time, then press Analyze.");
    ui.add_space(4.0);

    egui::Grid::new("manual_form")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Name");
            let name_edit = ui.text_edit_singleline(&mut state.manual.name);
            ui.end_row();

            ui.label("Score");
            ui.add(
                DragValue::new(&mut state.manual.score)
                    .range(0..=ManualEntry::MAX_SCORE)
                    .speed(1),
            );
            ui.end_row();

            // Enter in the name field submits like the Add button.
            if name_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                state.submit_manual();
            }
        });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Add").clicked() {
            state.submit_manual();
        }
        if ui.button("Clear").clicked() {
            state.manual.clear();
        }
    });

    if state.manual.rows().is_empty() {
        return;
    }

    ui.separator();
    ui.strong(format!("Entered so far ({})", state.manual.rows().len()));
    let columns = ["name".to_string(), "score".to_string()];
    let rows: Vec<(usize, Vec<String>)> = state
        .manual
        .rows()
        .iter()
        .enumerate()
        .map(|(i, r)| (i, columns.iter().map(|c| r.field(c)).collect()))
        .collect();
    results::record_table(ui, "manual_rows", &columns, &rows);

    ui.add_space(4.0);
    if ui.button("Analyze").clicked() {
        state.analyze_manual();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                state.select_source(DataSource::Upload);
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.analysis.is_some(), egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} records loaded ({})", ds.len(), state.source));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let supported: Vec<&str> = Format::ALL
        .iter()
        .flat_map(|f| f.extensions().iter().copied())
        .collect();
    let mut dialog = rfd::FileDialog::new()
        .set_title("Open score table")
        .add_filter("Supported files", &supported);
    for format in Format::ALL {
        dialog = dialog.add_filter(format.to_string(), format.extensions());
    }

    if let Some(path) = dialog.pick_file() {
        state.load_path(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export CSV")
        .set_file_name(state.config.export_file_name.clone())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
