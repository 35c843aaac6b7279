//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use waypoint::config::ServerConfig;
use waypoint::http::{Engine, HttpServer};
use waypoint::lifecycle::Shutdown;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Serve `engine` on 127.0.0.1 with default settings.
pub async fn start_server(engine: Engine) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ServerConfig::default();
    config.listener.bind_address = addr.to_string();
    config.timeouts.request_secs = 5;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, engine);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // The listener is already bound; give the accept loop a moment.
    tokio::time::sleep(Duration::from_millis(50)).await;
    TestServer { addr, shutdown }
}

/// Client that never pools or proxies, so each test sees a fresh connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
