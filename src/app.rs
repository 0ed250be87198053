use std::path::Path;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct UniRanksApp {
    pub state: AppState,
}

impl Default for UniRanksApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl UniRanksApp {
    /// Start with a file already loaded (path given on the command line).
    pub fn with_file(path: &Path) -> Self {
        let mut app = Self::default();
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!("Loaded {} records from {}", dataset.len(), path.display());
                app.state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                app.state.status_message = Some(format!("Error: {e:#}"));
            }
        }
        app
    }
}

impl eframe::App for UniRanksApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table + charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let dataset = match &self.state.dataset {
                Some(ds) => ds,
                None => {
                    ui.centered_and_justified(|ui: &mut egui::Ui| {
                        ui.heading("Open a ranking file to begin  (File → Open…)");
                    });
                    return;
                }
            };

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("🎓 University Rankings");
                ui.separator();

                table::top_table(ui, dataset, &self.state.selection);
                ui.separator();
                charts::distribution_chart(ui, dataset, &self.state.selection);
                ui.separator();
                charts::trend_chart(ui, dataset, &self.state.selection);
            });
        });
    }
}
