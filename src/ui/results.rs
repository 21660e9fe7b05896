use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::analysis::{Analysis, ClassifiedRecord, PASSED_COLUMN};
use crate::data::export::export_columns;
use crate::data::model::Record;
use crate::data::stats::Describe;
use crate::state::{AppState, DataSource};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// Results view (central panel)
// ---------------------------------------------------------------------------

/// Render the analysis of the current dataset, or a hint when there is none.
pub fn results_view(ui: &mut Ui, state: &mut AppState) {
    let Some(analysis) = &state.analysis else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(match state.source {
                DataSource::Preset => "No data",
                DataSource::Upload => "Open a file to analyse scores  (File → Open…)",
                DataSource::Manual => "Enter students on the left, then press Analyze",
            });
        });
        return;
    };

    let threshold = state.config.high_score_threshold;
    let mut export_clicked = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Analysis results");
            ui.separator();

            ui.strong("Original data");
            let rows = table_rows(&analysis.columns, &analysis.classified);
            record_table(ui, "original", &analysis.columns, &rows);

            section(ui, "Statistics");
            describe_table(ui, &analysis.stats);
            ui.add_space(8.0);
            metrics(ui, analysis);

            section(ui, &format!("High scorers (≥ {threshold})"));
            if analysis.high_scorers.is_empty() {
                ui.label("Nobody reached the threshold.");
            } else {
                let rows = table_rows(&analysis.columns, &analysis.high_scorers);
                record_table(ui, "high_scorers", &analysis.columns, &rows);
            }

            section(ui, "Top scorer");
            top_record(ui, &analysis.columns, &analysis.top);

            section(ui, "Sorted data");
            let columns = export_columns(&analysis.columns);
            let rows = table_rows(&columns, &analysis.sorted);
            record_table(ui, "sorted", &columns, &rows);
            ui.add_space(4.0);
            if ui.button("⬇ Export CSV…").clicked() {
                export_clicked = true;
            }

            section(ui, "Score chart");
            plot::score_chart(ui, &analysis.chart, &state.colors);
        });

    if export_clicked {
        panels::export_file_dialog(state);
    }
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(title);
}

fn metrics(ui: &mut Ui, analysis: &Analysis) {
    ui.horizontal(|ui: &mut Ui| {
        for (label, value) in [
            ("Mean score", analysis.mean_text()),
            ("Highest", analysis.max_text()),
            ("Lowest", analysis.min_text()),
        ] {
            ui.group(|ui: &mut Ui| {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(RichText::new(label).small());
                    ui.label(RichText::new(value).size(24.0).strong());
                });
            });
        }
    });
}

fn describe_table(ui: &mut Ui, stats: &Describe) {
    let columns = ["statistic".to_string(), "score".to_string()];
    let rows: Vec<(usize, Vec<String>)> = stats
        .rows()
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let text = match value {
                Some(v) if i == 0 => format!("{v}"),
                Some(v) => format!("{v:.6}"),
                None => "NaN".to_string(),
            };
            (i, vec![label.to_string(), text])
        })
        .collect();
    record_table(ui, "describe", &columns, &rows);
}

/// The top record shown field by field.
fn top_record(ui: &mut Ui, columns: &[String], record: &Record) {
    egui::Grid::new("top_record")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for col in columns {
                ui.strong(col);
                ui.label(record.field(col));
                ui.end_row();
            }
        });
}

/// Cells for `columns`, each row tagged with its position in the input.
fn table_rows(columns: &[String], rows: &[ClassifiedRecord]) -> Vec<(usize, Vec<String>)> {
    rows.iter()
        .map(|row| {
            let cells = columns
                .iter()
                .map(|c| {
                    if c == PASSED_COLUMN {
                        row.passed_label().to_string()
                    } else {
                        row.record.field(c)
                    }
                })
                .collect();
            (row.index, cells)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Generic table
// ---------------------------------------------------------------------------

/// A striped table with a leading index column, sized to its content.
pub fn record_table(ui: &mut Ui, id_salt: &str, columns: &[String], rows: &[(usize, Vec<String>)]) {
    ui.push_id(id_salt, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(24.0))
            .columns(Column::auto().at_least(64.0), columns.len())
            .header(20.0, |mut header| {
                header.col(|_ui| {});
                for col in columns {
                    header.col(|ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|mut body| {
                for (index, cells) in rows {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.weak(index.to_string());
                        });
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}
