//! console-echo server entry point.
//!
//! Binds the WebSocket listener and runs until Ctrl-C (or SIGTERM on Unix).

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use console_echo::config::{EchoConfig, LogFormat};
use console_echo::console::{ClearMode, TerminalConsole};
use console_echo::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = EchoConfig::from_env().context("loading configuration")?;

    // Initialize tracing. Logs go to stderr; stdout is the display.
    init_tracing(config.log_format);

    let mode = ClearMode::detect();
    tracing::info!(addr = %config.bind_addr(), ?mode, "starting console-echo");

    // Failing to bind is fatal
    let server = Server::bind(&config, TerminalConsole::stdout(mode)).await?;
    tracing::info!(addr = %server.local_addr()?, "server listening");

    server.serve(shutdown_signal()).await?;
    tracing::info!("server stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
