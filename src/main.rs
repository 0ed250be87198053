mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::UniRanksApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional: a file to load at startup instead of via File → Open.
    let initial_file: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "UniRanks – University Rankings",
        options,
        Box::new(move |_cc| {
            let app = match &initial_file {
                Some(path) => UniRanksApp::with_file(path),
                None => UniRanksApp::default(),
            };
            Ok(Box::new(app))
        }),
    )
}
