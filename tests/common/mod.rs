//! Shared utilities for integration testing.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use console_relay::config::{IngestConfig, RenderConfig};
use console_relay::lifecycle::Shutdown;
use console_relay::net::Listener;
use console_relay::relay::{Relay, RelayServer};
use console_relay::render::Renderer;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-memory output sink shared between the renderer and the test.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A relay serving on an ephemeral port.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub relay: Arc<Relay>,
    pub output: SharedBuffer,
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestRelay {
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, self.relay.endpoint())
    }

    pub fn base(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("relay did not stop")
            .unwrap();
    }
}

/// Relay rendering without color into an in-memory buffer.
#[allow(dead_code)]
pub fn test_relay(max_body_bytes: usize) -> (Arc<Relay>, SharedBuffer) {
    let output = SharedBuffer::default();
    let renderer = Renderer::new(
        &RenderConfig {
            color: false,
            show_url: false,
        },
        Box::new(output.clone()),
    );
    let config = IngestConfig {
        endpoint: "/__log".into(),
        max_body_bytes,
    };
    (Arc::new(Relay::new(&config, renderer)), output)
}

/// Start a standalone relay on 127.0.0.1:0.
pub async fn start_relay(max_body_bytes: usize) -> TestRelay {
    let (relay, output) = test_relay(max_body_bytes);
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    let listener = Listener::from_tcp(tcp, 16);

    let shutdown = Shutdown::new();
    let server = RelayServer::new(Arc::clone(&relay));
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    TestRelay {
        addr,
        relay,
        output,
        shutdown,
        handle,
    }
}

/// Client with pooling disabled so a stopped relay cannot keep idle sockets.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}
