use std::{
    env,
    process::{
        ExitStatus,
        Stdio,
    },
    time::Duration,
};

use command_group::{
    AsyncCommandGroup,
    AsyncGroupChild,
};
use tokio::process::Command;

use super::{
    health::wait_for_http,
    runtime::Runtimes,
    LaunchError,
    LaunchPlan,
};
use crate::config::BACKEND_URL_VAR;

/// Read by the yarn-served frontend.
const WEB_BACKEND_URL_VAR: &str = "REACT_APP_BACKEND_URL";

async fn run_step(step: &str, mut command: Command) -> Result<(), LaunchError> {
    tracing::info!("Running {step}");
    let status = command
        .stdin(Stdio::null())
        .status()
        .await
        .map_err(|source| LaunchError::Spawn { what: step.to_string(), source })?;

    if status.success() {
        Ok(())
    } else {
        Err(LaunchError::InstallFailed { step: step.to_string(), status: describe(status) })
    }
}

fn describe(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

pub async fn install_backend(runtimes: &Runtimes, plan: &LaunchPlan) -> Result<(), LaunchError> {
    let mut command = Command::new(&runtimes.python);
    command
        .args(["-m", "pip", "install", "-r", "requirements.txt"])
        .current_dir(&plan.backend_dir);
    run_step("pip install", command).await
}

pub async fn install_frontend(runtimes: &Runtimes, plan: &LaunchPlan) -> Result<(), LaunchError> {
    let yarn = runtimes.yarn.as_deref().ok_or_else(|| LaunchError::MissingRuntime {
        name: "Yarn".to_string(),
        hint: "Install it with: npm install -g yarn".to_string(),
    })?;
    let mut command = Command::new(yarn);
    command.arg("install").current_dir(&plan.frontend_dir);
    run_step("yarn install", command).await
}

pub fn backend_command(runtimes: &Runtimes, plan: &LaunchPlan) -> Command {
    let mut command = Command::new(&runtimes.python);
    command
        .args(["-m", "uvicorn", "server:app", "--host", "0.0.0.0", "--port"])
        .arg(plan.backend_port.to_string())
        .arg("--reload")
        .current_dir(&plan.backend_dir)
        .kill_on_drop(true);
    command
}

/// The `bookgen` GUI that sits next to the running launcher executable.
pub fn native_frontend_command(plan: &LaunchPlan) -> Result<Command, LaunchError> {
    let exe = env::current_exe()?
        .with_file_name(format!("bookgen{}", env::consts::EXE_SUFFIX));
    if !exe.is_file() {
        return Err(LaunchError::Spawn {
            what: "native frontend".to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", exe.display()),
            ),
        });
    }

    let mut command = Command::new(exe);
    command.env(BACKEND_URL_VAR, plan.backend_url()).kill_on_drop(true);
    Ok(command)
}

pub fn web_frontend_command(runtimes: &Runtimes, plan: &LaunchPlan) -> Command {
    let yarn = runtimes.yarn.clone().unwrap_or_else(|| "yarn".into());
    let mut command = Command::new(yarn);
    command
        .arg("start")
        .current_dir(&plan.frontend_dir)
        .env("PORT", plan.frontend_port.to_string())
        .env("BROWSER", "none")
        .env(BACKEND_URL_VAR, plan.backend_url())
        .env(WEB_BACKEND_URL_VAR, plan.backend_url())
        .kill_on_drop(true);
    command
}

/// Owns the backend and frontend children. Each one runs in its own process
/// group (a job object on Windows) so that stopping it also stops whatever it
/// spawned, such as the uvicorn reload worker or yarn's node server.
#[derive(Default)]
pub struct Supervisor {
    backend: Option<AsyncGroupChild>,
    frontend: Option<AsyncGroupChild>,
    frontend_name: &'static str,
}

impl Supervisor {
    pub fn start_backend(&mut self, mut command: Command) -> Result<(), LaunchError> {
        let child = command
            .group_spawn()
            .map_err(|source| LaunchError::Spawn { what: "backend".to_string(), source })?;
        tracing::info!("Backend started (pid {:?})", child.id());
        self.backend = Some(child);
        Ok(())
    }

    pub fn start_frontend(
        &mut self,
        mut command: Command,
        name: &'static str,
    ) -> Result<(), LaunchError> {
        let child = command
            .group_spawn()
            .map_err(|source| LaunchError::Spawn { what: name.to_string(), source })?;
        tracing::info!("{name} started (pid {:?})", child.id());
        self.frontend = Some(child);
        self.frontend_name = name;
        Ok(())
    }

    /// Polls the backend's health URL, giving up early if the backend exits.
    pub async fn wait_for_backend(&mut self, url: &str, timeout: Duration) -> Result<(), LaunchError> {
        let Some(backend) = self.backend.as_mut() else {
            return wait_for_http(url, timeout).await;
        };

        tokio::select! {
            ready = wait_for_http(url, timeout) => ready,
            status = backend.wait() => {
                let status = match status {
                    Ok(status) => describe(status),
                    Err(e) => e.to_string(),
                };
                Err(LaunchError::BackendExited { status })
            }
        }
    }

    /// Waits for Ctrl-C or for either child to exit, then stops the other.
    pub async fn supervise(&mut self) {
        let name = self.frontend_name;
        if let (Some(backend), Some(frontend)) = (self.backend.as_mut(), self.frontend.as_mut()) {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted, shutting down"),
                status = backend.wait() => log_exit("backend", status),
                status = frontend.wait() => log_exit(name, status),
            }
        }
        self.shutdown().await;
    }

    /// Kills every process in each child's group. A group whose leader has
    /// already exited is still signalled for the processes it left behind.
    pub async fn shutdown(&mut self) {
        let name = self.frontend_name;
        for (label, slot) in [(name, &mut self.frontend), ("backend", &mut self.backend)] {
            let Some(mut child) = slot.take() else {
                continue;
            };
            match child.try_wait() {
                Ok(Some(_)) => {
                    if let Err(e) = child.start_kill() {
                        tracing::debug!("Nothing left of {label}: {e}");
                    }
                }
                _ => {
                    tracing::info!("Stopping {label}");
                    if let Err(e) = child.kill().await {
                        tracing::warn!("Failed to stop {label}: {e}");
                    }
                }
            }
        }
    }
}

fn log_exit(name: &str, status: std::io::Result<ExitStatus>) {
    match status {
        Ok(status) if status.success() => tracing::info!("{name} exited"),
        Ok(status) => tracing::warn!("{name} exited with {}", describe(status)),
        Err(e) => tracing::warn!("Lost track of {name}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        ffi::OsStr,
        path::PathBuf,
    };

    use super::*;

    fn runtimes() -> Runtimes {
        Runtimes {
            python: PathBuf::from("/usr/bin/python3"),
            node: None,
            yarn: Some(PathBuf::from("/usr/bin/yarn")),
        }
    }

    #[test]
    fn backend_runs_uvicorn_on_the_plan_port() {
        let plan = LaunchPlan { backend_port: 9001, ..LaunchPlan::default() };
        let command = backend_command(&runtimes(), &plan);
        let std = command.as_std();

        let args: Vec<&OsStr> = std.get_args().collect();
        assert_eq!(std.get_program(), OsStr::new("/usr/bin/python3"));
        assert_eq!(
            args,
            ["-m", "uvicorn", "server:app", "--host", "0.0.0.0", "--port", "9001", "--reload"]
                .map(OsStr::new)
        );
        assert_eq!(std.get_current_dir(), Some(plan.backend_dir.as_path()));
    }

    #[test]
    fn web_frontend_gets_port_and_backend_url() {
        let plan = LaunchPlan::default();
        let command = web_frontend_command(&runtimes(), &plan);
        let envs: Vec<(&OsStr, Option<&OsStr>)> = command.as_std().get_envs().collect();

        assert!(envs.contains(&(OsStr::new("PORT"), Some(OsStr::new("3000")))));
        assert!(envs.contains(&(OsStr::new("BROWSER"), Some(OsStr::new("none")))));
        assert!(envs.contains(&(
            OsStr::new(BACKEND_URL_VAR),
            Some(OsStr::new("http://localhost:8001"))
        )));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn supervisor_stops_frontend_when_backend_exits() {
        let mut backend = Command::new("sh");
        backend.args(["-c", "exit 0"]);
        let mut frontend = Command::new("sleep");
        frontend.arg("30").kill_on_drop(true);

        let mut supervisor = Supervisor::default();
        supervisor.start_backend(backend).unwrap();
        supervisor.start_frontend(frontend, "test frontend").unwrap();

        tokio::time::timeout(Duration::from_secs(10), supervisor.supervise())
            .await
            .expect("supervisor should return once the backend exits");
        assert!(supervisor.frontend.is_none());
        assert!(supervisor.backend.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_install_step_is_reported() {
        let mut command = Command::new("sh");
        command.args(["-c", "exit 3"]);
        let err = run_step("pip install", command).await.unwrap_err();
        assert!(matches!(&err, LaunchError::InstallFailed { status, .. } if status == "exit code 3"));
        assert_eq!(err.exit_code(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn backend_crash_is_reported_before_the_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut backend = Command::new("sh");
        backend.args(["-c", "exit 4"]);
        let mut supervisor = Supervisor::default();
        supervisor.start_backend(backend).unwrap();

        let url = format!("http://127.0.0.1:{port}/api/");
        let err = tokio::time::timeout(
            Duration::from_secs(10),
            supervisor.wait_for_backend(&url, Duration::from_secs(120)),
        )
        .await
        .expect("a dead backend should end the wait")
        .unwrap_err();

        assert!(matches!(&err, LaunchError::BackendExited { status } if status == "exit code 4"));
        assert_eq!(err.exit_code(), 2);
        supervisor.shutdown().await;
    }

    /// A zombie waiting for its reaper counts as gone.
    #[cfg(target_os = "linux")]
    fn process_alive(pid: &str) -> bool {
        match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
            Ok(stat) => !stat.contains(") Z "),
            Err(_) => false,
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn shutdown_stops_grandchildren() {
        let dir = tempfile::tempdir().unwrap();
        let pidfile = dir.path().join("worker.pid");

        let mut backend = Command::new("sh");
        backend
            .arg("-c")
            .arg(format!("sleep 300 & echo $! > '{}'; wait", pidfile.display()));
        let mut supervisor = Supervisor::default();
        supervisor.start_backend(backend).unwrap();

        let mut worker = String::new();
        for _ in 0..100 {
            if let Ok(text) = std::fs::read_to_string(&pidfile) {
                if text.ends_with('\n') {
                    worker = text.trim().to_string();
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(!worker.is_empty(), "worker pid was never written");
        assert!(process_alive(&worker));

        supervisor.shutdown().await;

        let mut alive = true;
        for _ in 0..50 {
            alive = process_alive(&worker);
            if !alive {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(!alive, "worker {worker} outlived the supervisor");
    }
}
