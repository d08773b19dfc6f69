use eframe::egui;

use horizon_timelapse::config::TimelapseConfig;

mod app;
mod ui;

use app::TimelapseApp;

fn main() {
    env_logger::init();

    let config = match TimelapseConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_title("Horizon Timelapse"),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Horizon Timelapse",
        options,
        Box::new(|_cc| Ok(Box::new(TimelapseApp::new(config)))),
    ) {
        log::error!("eframe exited with error: {}", e);
        std::process::exit(1);
    }
}
