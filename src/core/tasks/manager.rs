use std::{
    path::PathBuf,
    sync::{
        mpsc,
        Arc,
    },
    thread,
};

use tokio::runtime::Runtime;

use super::{
    BackendHealth,
    TaskResult,
};
use crate::{
    api::BackendClient,
    core::{
        profile::StoryProfile,
        BookgenError,
    },
};

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Sends one task result back and wakes the UI so it gets drawn.
struct Reply {
    sender: mpsc::Sender<TaskResult>,
    waker: Option<Waker>,
}

impl Reply {
    fn send(self, result: TaskResult) {
        let _ = self.sender.send(result);
        if let Some(wake) = &self.waker {
            wake();
        }
    }
}

/// Runs backend requests off the UI thread. Results come back through
/// `poll_results`, which the UI calls once per frame.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    client: BackendClient,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
    waker: Option<Waker>,
}

impl TaskManager {
    pub fn new(client: BackendClient) -> Result<Self, BookgenError> {
        let runtime = Arc::new(Runtime::new()?);
        let (sender, receiver) = mpsc::channel();
        Ok(Self { runtime, client, receiver, sender, waker: None })
    }

    /// Called from the worker thread after every result, e.g. to request a repaint.
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            tracing::trace!("Task finished: {}", result.task_type());
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> (Reply, Arc<Runtime>, BackendClient) {
        let reply = Reply { sender: self.sender.clone(), waker: self.waker.clone() };
        (reply, self.runtime.clone(), self.client.clone())
    }

    pub fn check_backend(&self) {
        let (reply, runtime, client) = self.task_context();

        thread::spawn(move || {
            let health = runtime.block_on(async {
                let root = client.health().await.map(|_| ()).map_err(|e| e.to_string());
                let agents = match &root {
                    Ok(()) => client.agents().await.map_err(|e| e.to_string()),
                    Err(_) => Err("backend unreachable".to_string()),
                };
                BackendHealth::from_checks(root, agents)
            });

            reply.send(TaskResult::BackendStatus(health));
        });
    }

    pub fn start_generation(&self, profile: StoryProfile) {
        let (reply, runtime, client) = self.task_context();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                client.generate(&profile).await.map_err(|e| e.to_string())
            });

            match &result {
                Ok(started) => tracing::info!(
                    "Generation session {} started, about {} minutes",
                    started.session_id,
                    started.estimated_time_minutes
                ),
                Err(e) => tracing::error!("Generation request failed: {e}"),
            }
            reply.send(TaskResult::GenerationStarted(result));
        });
    }

    pub fn poll_progress(&self, session_id: String) {
        let (reply, runtime, client) = self.task_context();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                client.progress(&session_id).await.map_err(|e| e.to_string())
            });

            reply.send(TaskResult::Progress { session_id, result });
        });
    }

    pub fn fetch_preview(&self, session_id: String) {
        let (reply, runtime, client) = self.task_context();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                client.preview(&session_id).await.map_err(|e| e.to_string())
            });

            reply.send(TaskResult::Preview(result));
        });
    }

    pub fn fetch_download_info(&self, session_id: String) {
        let (reply, runtime, client) = self.task_context();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                client.download_info(&session_id).await.map_err(|e| e.to_string())
            });

            reply.send(TaskResult::DownloadReady(result));
        });
    }

    pub fn download(&self, session_id: String, path: PathBuf) {
        let (reply, runtime, client) = self.task_context();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                client
                    .download_file(&session_id, &path)
                    .await
                    .map(|bytes| (path.clone(), bytes))
                    .map_err(|e| e.to_string())
            });

            reply.send(TaskResult::Downloaded(result));
        });
    }

    pub fn cancel(&self, session_id: String) {
        let (reply, runtime, client) = self.task_context();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                client.cancel(&session_id).await.map(|r| r.message).map_err(|e| e.to_string())
            });

            reply.send(TaskResult::Cancelled { session_id, result });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{
            AtomicUsize,
            Ordering,
        },
        time::{
            Duration,
            Instant,
        },
    };

    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn unreachable_backend_reports_offline() {
        // Nothing listens on the discard port.
        let config = AppConfig::with_backend_url("http://127.0.0.1:9").unwrap();
        let mut tasks = TaskManager::new(BackendClient::new(&config).unwrap()).unwrap();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        tasks.set_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tasks.check_backend();

        let deadline = Instant::now() + Duration::from_secs(30);
        loop {
            if let Some(result) = tasks.poll_results().into_iter().next() {
                match result {
                    TaskResult::BackendStatus(health) => {
                        assert!(matches!(health, BackendHealth::Offline(_)));
                        break;
                    }
                    other => panic!("unexpected task result: {}", other.task_type()),
                }
            }
            assert!(Instant::now() < deadline, "health check never reported back");
            thread::sleep(Duration::from_millis(20));
        }

        // The waker runs right after the send, so it may trail the result slightly.
        while wakes.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
    }
}
