use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::top_n;
use crate::data::model::{CellValue, RankingDataset};

/// How many of the best-ranked records the table shows.
pub const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Top-10 table (central panel)
// ---------------------------------------------------------------------------

/// Render the top-10 table for the current selection. Pass-through columns
/// from the source file get their own columns after the core four.
pub fn top_table(ui: &mut Ui, dataset: &RankingDataset, selection: &[usize]) {
    ui.strong(format!("Top {TOP_N} Universities"));

    let top = top_n(dataset, selection, TOP_N);
    if top.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    let extra_columns = &dataset.extra_columns;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder().at_least(160.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::auto())
        .columns(Column::auto(), extra_columns.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Rank");
            });
            header.col(|ui| {
                ui.strong("Institution");
            });
            header.col(|ui| {
                ui.strong("Country");
            });
            header.col(|ui| {
                ui.strong("Year");
            });
            for col in extra_columns {
                header.col(|ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|mut body| {
            for &i in &top {
                let rec = &dataset.records[i];
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(rec.world_rank.to_string());
                    });
                    row.col(|ui| {
                        ui.label(&rec.institution);
                    });
                    row.col(|ui| {
                        ui.label(&rec.country);
                    });
                    row.col(|ui| {
                        ui.label(rec.year.to_string());
                    });
                    for col in extra_columns {
                        let cell = rec.extra.get(col).unwrap_or(&CellValue::Null);
                        row.col(|ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            }
        });
}
