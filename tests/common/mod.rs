//! Shared harness: a real server on an ephemeral port with a recording
//! console.

#![allow(dead_code, clippy::panic)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use console_echo::config::EchoConfig;
use console_echo::console::{ConsoleSink, MemoryConsole};
use console_echo::domain::ConnectionRegistry;
use console_echo::error::ServerError;
use console_echo::server::Server;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub addr: SocketAddr,
    pub console: MemoryConsole,
    pub registry: Arc<ConnectionRegistry>,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let console = MemoryConsole::new();
        Self::start_with(console.clone(), console).await
    }

    /// Starts a server that displays through `sink`. `console` is what the
    /// test observes; pass an unused [`MemoryConsole`] for custom sinks.
    pub async fn start_with<S: ConsoleSink>(sink: S, console: MemoryConsole) -> Self {
        let config = EchoConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            shutdown_grace: Duration::from_secs(2),
            ..EchoConfig::default()
        };
        let Ok(server) = Server::bind(&config, sink).await else {
            panic!("failed to bind test server");
        };
        let Ok(addr) = server.local_addr() else {
            panic!("test server has no local address");
        };
        let registry = server.registry();

        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(server.serve(async move {
            let _ = stopped.await;
        }));

        Self {
            addr,
            console,
            registry,
            stop: Some(stop),
            task,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    pub async fn connect(&self, path: &str) -> Client {
        let Ok((client, _response)) = connect_async(self.url(path)).await else {
            panic!("websocket connect to {path} failed");
        };
        client
    }

    /// Signals shutdown and waits for `serve` to return.
    pub async fn stop(mut self) -> Result<(), ServerError> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        match self.task.await {
            Ok(result) => result,
            Err(e) => panic!("server task panicked: {e}"),
        }
    }
}

/// Reads the next data frame as text, failing the test on timeout.
pub async fn next_text(client: &mut Client) -> String {
    loop {
        let Ok(next) = tokio::time::timeout(Duration::from_secs(5), client.next()).await else {
            panic!("timed out waiting for a frame");
        };
        match next {
            Some(Ok(Message::Text(text))) => return text.as_str().to_owned(),
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

/// Polls `check` until it returns `true` or five seconds pass.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
