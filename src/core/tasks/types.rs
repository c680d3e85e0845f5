use std::path::PathBuf;

use crate::api::types::{
    AgentsResponse,
    DownloadInfo,
    GenerateResponse,
    PreviewResponse,
    ProgressResponse,
};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendHealth {
    Unknown,
    Online { total_agents: usize, system_ready: bool },
    Offline(String),
}

impl BackendHealth {
    pub fn is_online(&self) -> bool {
        matches!(self, BackendHealth::Online { .. })
    }

    pub(super) fn from_checks(
        root: Result<(), String>,
        agents: Result<AgentsResponse, String>,
    ) -> Self {
        match (root, agents) {
            (Err(e), _) => BackendHealth::Offline(e),
            (Ok(()), Ok(agents)) => BackendHealth::Online {
                total_agents: agents.total_agents,
                system_ready: agents.system_ready,
            },
            (Ok(()), Err(e)) => {
                tracing::warn!("Backend is up but agent status failed: {e}");
                BackendHealth::Online { total_agents: 0, system_ready: false }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    BackendStatus(BackendHealth),
    GenerationStarted(Result<GenerateResponse, String>),
    Progress { session_id: String, result: Result<ProgressResponse, String> },
    Preview(Result<PreviewResponse, String>),
    DownloadReady(Result<DownloadInfo, String>),
    Downloaded(Result<(PathBuf, u64), String>),
    Cancelled { session_id: String, result: Result<String, String> },
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::BackendStatus(_) => "backend_status",
            TaskResult::GenerationStarted(_) => "generation_started",
            TaskResult::Progress { .. } => "progress",
            TaskResult::Preview(_) => "preview",
            TaskResult::DownloadReady(_) => "download_ready",
            TaskResult::Downloaded(_) => "downloaded",
            TaskResult::Cancelled { .. } => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_from_checks() {
        let offline = BackendHealth::from_checks(
            Err("connection refused".to_string()),
            Err("skipped".to_string()),
        );
        assert_eq!(offline, BackendHealth::Offline("connection refused".to_string()));

        let degraded = BackendHealth::from_checks(Ok(()), Err("500".to_string()));
        assert_eq!(degraded, BackendHealth::Online { total_agents: 0, system_ready: false });
        assert!(degraded.is_online());

        let agents = AgentsResponse { agents: Vec::new(), total_agents: 7, system_ready: true };
        let ready = BackendHealth::from_checks(Ok(()), Ok(agents));
        assert_eq!(ready, BackendHealth::Online { total_agents: 7, system_ready: true });
    }
}
