mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::ScorePandaApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 850.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Score Panda – Student Score Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(ScorePandaApp::new(config)))),
    )
}
