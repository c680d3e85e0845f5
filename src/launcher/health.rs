use std::time::Duration;

use tokio::{
    net::TcpStream,
    time::{
        sleep,
        Instant,
    },
};

use super::LaunchError;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

async fn http_ok(client: &reqwest::Client, url: &str) -> bool {
    match client.get(url).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

/// Polls `url` until it answers 2xx or `timeout` passes.
pub async fn wait_for_http(url: &str, timeout: Duration) -> Result<(), LaunchError> {
    let client = reqwest::Client::builder()
        .timeout(POLL_INTERVAL * 4)
        .build()
        .map_err(|e| LaunchError::Io(std::io::Error::other(e)))?;

    let deadline = Instant::now() + timeout;
    loop {
        if http_ok(&client, url).await {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(LaunchError::HealthTimeout { url: url.to_string(), waited: timeout });
        }
        sleep(POLL_INTERVAL).await;
    }
}

pub async fn port_is_open(port: u16) -> bool {
    TcpStream::connect(("127.0.0.1", port)).await.is_ok()
}

/// Polls a local TCP port until something accepts connections.
pub async fn wait_for_port(port: u16, timeout: Duration) -> Result<(), LaunchError> {
    let deadline = Instant::now() + timeout;
    loop {
        if port_is_open(port).await {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(LaunchError::HealthTimeout {
                url: format!("localhost:{port}"),
                waited: timeout,
            });
        }
        sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn detects_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(port_is_open(port).await);
        wait_for_port(port, Duration::from_secs(2)).await.unwrap();
    }

    #[tokio::test]
    async fn health_poll_times_out_on_closed_port() {
        let port = closed_port().await;
        let url = format!("http://127.0.0.1:{port}/api/");

        let err = wait_for_http(&url, Duration::from_millis(300)).await.unwrap_err();
        assert!(matches!(err, LaunchError::HealthTimeout { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn port_poll_times_out() {
        let port = closed_port().await;
        assert!(!port_is_open(port).await);
        assert!(wait_for_port(port, Duration::from_millis(200)).await.is_err());
    }
}
