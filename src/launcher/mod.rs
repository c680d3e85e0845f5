//! Starts the generation backend and a frontend, then supervises both.

mod browser;
mod health;
mod process;
mod runtime;

use std::{
    path::PathBuf,
    time::Duration,
};

use thiserror::Error;

pub use browser::open_browser;
pub use health::{
    port_is_open,
    wait_for_http,
    wait_for_port,
};
pub use process::{
    backend_command,
    install_backend,
    install_frontend,
    native_frontend_command,
    web_frontend_command,
    Supervisor,
};
pub use runtime::{
    find_executable,
    Runtimes,
};

pub const DEFAULT_BACKEND_PORT: u16 = 8001;
pub const DEFAULT_FRONTEND_PORT: u16 = 3000;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("{name} was not found on PATH. {hint}")]
    MissingRuntime { name: String, hint: String },

    #[error("{step} failed ({status})")]
    InstallFailed { step: String, status: String },

    #[error("Could not start {what}: {source}")]
    Spawn {
        what: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Backend exited before it became ready ({status})")]
    BackendExited { status: String },

    #[error("{url} did not answer within {}s", waited.as_secs())]
    HealthTimeout { url: String, waited: Duration },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LaunchError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::MissingRuntime { .. } => 1,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FrontendMode {
    /// The bundled egui application.
    #[default]
    Native,
    /// The yarn-served web frontend, opened in a browser.
    Web,
}

#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub backend_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub frontend: FrontendMode,
    pub backend_port: u16,
    pub frontend_port: u16,
    pub skip_install: bool,
    pub open_browser: bool,
    pub health_timeout: Duration,
}

impl Default for LaunchPlan {
    fn default() -> Self {
        Self {
            backend_dir: PathBuf::from("backend"),
            frontend_dir: PathBuf::from("frontend"),
            frontend: FrontendMode::Native,
            backend_port: DEFAULT_BACKEND_PORT,
            frontend_port: DEFAULT_FRONTEND_PORT,
            skip_install: false,
            open_browser: true,
            health_timeout: Duration::from_secs(60),
        }
    }
}

impl LaunchPlan {
    pub fn backend_url(&self) -> String {
        format!("http://localhost:{}", self.backend_port)
    }

    pub fn health_url(&self) -> String {
        format!("{}/api/", self.backend_url())
    }

    pub fn frontend_url(&self) -> String {
        format!("http://localhost:{}", self.frontend_port)
    }
}

/// Runs the whole launch sequence and returns once both children are down.
pub async fn run(plan: LaunchPlan) -> Result<(), LaunchError> {
    let runtimes = Runtimes::detect(plan.frontend)?;
    tracing::info!("Using Python at {}", runtimes.python.display());

    if plan.skip_install {
        tracing::info!("Skipping dependency installation");
    } else {
        install_backend(&runtimes, &plan).await?;
        if plan.frontend == FrontendMode::Web {
            install_frontend(&runtimes, &plan).await?;
        }
    }

    let mut supervisor = Supervisor::default();
    supervisor.start_backend(backend_command(&runtimes, &plan))?;

    tracing::info!("Waiting for backend at {}", plan.health_url());
    if let Err(e) = supervisor.wait_for_backend(&plan.health_url(), plan.health_timeout).await {
        supervisor.shutdown().await;
        return Err(e);
    }
    tracing::info!("Backend is up on port {}", plan.backend_port);

    match plan.frontend {
        FrontendMode::Native => {
            let command = native_frontend_command(&plan)?;
            supervisor.start_frontend(command, "native frontend")?;
        }
        FrontendMode::Web => {
            supervisor.start_frontend(web_frontend_command(&runtimes, &plan), "web frontend")?;
            if let Err(e) = wait_for_port(plan.frontend_port, plan.health_timeout).await {
                supervisor.shutdown().await;
                return Err(e);
            }
            if plan.open_browser {
                open_browser(&plan.frontend_url());
            }
            tracing::info!("Frontend is up at {}", plan.frontend_url());
        }
    }

    supervisor.supervise().await;
    Ok(())
}
