use eframe::{NativeOptions, egui};

mod api;
mod app;
mod theme;

use app::UiApp;

fn main() {
    tracing_subscriber::fmt::init();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 760.0]),
        ..Default::default()
    };
    if let Err(e) = eframe::run_native(
        "PneumoScan",
        options,
        Box::new(|cc| Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(UiApp::new(cc)))),
    ) {
        eprintln!("Application stopped with error: {e}");
    }
}
