//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use lms_monitoring::config::ServiceConfig;
use lms_monitoring::monitoring::RecordingMetricSink;
use lms_monitoring::{HttpServer, Shutdown};

/// A running server plus the handles a test needs.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub sink: Arc<RecordingMetricSink>,
    pub config_updates: mpsc::UnboundedSender<ServiceConfig>,
    pub shutdown: Shutdown,
}

impl TestServer {
    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Reserve a free local port.
#[allow(dead_code)]
pub fn free_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Parse settings from TOML text.
#[allow(dead_code)]
pub fn config_from(toml_text: &str) -> ServiceConfig {
    toml::from_str(toml_text).unwrap()
}

/// Start the server on an ephemeral port with a recording metric sink.
pub async fn start_server(config: ServiceConfig) -> TestServer {
    let sink = Arc::new(RecordingMetricSink::new());
    let server = HttpServer::with_metric_sink(config, sink.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    // Admin API binds inside run(); give it a moment.
    tokio::time::sleep(Duration::from_millis(200)).await;

    TestServer {
        addr,
        sink,
        config_updates,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
