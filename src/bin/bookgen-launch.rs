use std::{
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};

use bookgen::{
    config::init_tracing,
    launcher::{
        self,
        FrontendMode,
        LaunchPlan,
        DEFAULT_BACKEND_PORT,
        DEFAULT_FRONTEND_PORT,
    },
};
use clap::Parser;

/// Starts the story generation backend and a frontend for it.
#[derive(Parser, Debug)]
#[command(name = "bookgen-launch", version, about)]
struct Cli {
    /// Directory holding the backend's server.py and requirements.txt
    #[arg(long, default_value = "backend")]
    backend_dir: PathBuf,

    /// Directory of the web frontend (web mode only)
    #[arg(long, default_value = "frontend")]
    frontend_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = FrontendMode::Native)]
    frontend: FrontendMode,

    #[arg(long, default_value_t = DEFAULT_BACKEND_PORT)]
    backend_port: u16,

    #[arg(long, default_value_t = DEFAULT_FRONTEND_PORT)]
    frontend_port: u16,

    /// Do not run pip install / yarn install
    #[arg(long)]
    skip_install: bool,

    /// Do not open a browser once the web frontend is up
    #[arg(long)]
    no_browser: bool,

    /// Seconds to wait for the backend (and web frontend) to come up
    #[arg(long, default_value_t = 60)]
    health_timeout: u64,
}

impl From<Cli> for LaunchPlan {
    fn from(cli: Cli) -> Self {
        LaunchPlan {
            backend_dir: cli.backend_dir,
            frontend_dir: cli.frontend_dir,
            frontend: cli.frontend,
            backend_port: cli.backend_port,
            frontend_port: cli.frontend_port,
            skip_install: cli.skip_install,
            open_browser: !cli.no_browser,
            health_timeout: Duration::from_secs(cli.health_timeout),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let plan = LaunchPlan::from(Cli::parse());
    tracing::info!("Launching with {:?} frontend", plan.frontend);

    match launcher::run(plan).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("bookgen-launch: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
