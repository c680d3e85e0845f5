use std::process::ExitCode;

use bookgen::{
    config::{
        init_tracing,
        AppConfig,
    },
    gui::BookgenApp,
};
use eframe::egui;

const APP_TITLE: &str = "Book Generator";

type DynError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("bookgen: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([980.0, 860.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc: &eframe::CreationContext<'_>| -> Result<Box<dyn eframe::App>, DynError> {
            Ok(Box::new(BookgenApp::new(cc, &config)?))
        }),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("GUI stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
