//! Listener lifecycle.
//!
//! [`Server`] owns the bound listener, the console queue, and the shutdown
//! channel. [`Server::serve`] runs until its signal resolves and then tears
//! everything down in order: stop accepting, close every open connection,
//! flush the display.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::EchoConfig;
use crate::console::{ConsoleQueue, ConsoleSink};
use crate::domain::ConnectionRegistry;
use crate::error::ServerError;
use crate::ws::handler::ws_handler;

/// Builds the router: a single fallback handler serves every path.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(ws_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A bound server that has not started accepting yet.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    console: ConsoleQueue,
    registry: Arc<ConnectionRegistry>,
    shutdown_tx: watch::Sender<bool>,
    grace: Duration,
}

impl Server {
    /// Binds the listener and starts the console consumer for `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the configured address cannot be
    /// bound. This is the only startup failure.
    pub async fn bind<S: ConsoleSink>(config: &EchoConfig, sink: S) -> Result<Self, ServerError> {
        let addr = config.bind_addr();
        let bound = TcpListener::bind(addr.as_str()).await;
        let listener = match bound {
            Ok(listener) => listener,
            Err(source) => return Err(ServerError::Bind { addr, source }),
        };
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            listener,
            console: ConsoleQueue::spawn(sink),
            registry: Arc::new(ConnectionRegistry::new()),
            shutdown_tx,
            grace: config.shutdown_grace,
        })
    }

    /// Returns the address the listener is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`] if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Returns the registry of open connections.
    #[must_use]
    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Accepts connections until `signal` resolves, then shuts down.
    ///
    /// Open connections receive a Close frame and are given the configured
    /// grace period to finish before the console is flushed.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`] if the accept loop fails.
    pub async fn serve<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self {
            listener,
            console,
            registry,
            shutdown_tx,
            grace,
        } = self;

        let state = AppState {
            console: console.handle(),
            registry: Arc::clone(&registry),
            shutdown: shutdown_tx.subscribe(),
        };
        let app = build_router(state);

        // Dropping the sender (e.g. if serving fails) also reads as shutdown
        // on the connection side.
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                tracing::info!("shutdown requested");
                shutdown_tx.send_replace(true);
            })
            .await;

        if !registry.wait_idle(grace).await {
            let remaining = registry.len().await;
            tracing::warn!(remaining, "connections still open after shutdown grace period");
        }

        match tokio::time::timeout(grace, console.shutdown()).await {
            Ok(shown) => tracing::debug!(shown, "console flushed"),
            Err(_) => tracing::warn!("console did not drain within grace period"),
        }

        served.map_err(ServerError::Serve)
    }
}
