use tracing::info;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Resolve once SIGINT or SIGTERM is received
///
/// Configuration is read once at startup, so SIGHUP is not handled.
#[cfg(unix)]
pub async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to setup SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            info!("SIGINT received, initiating graceful shutdown");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            info!("SIGTERM received, initiating graceful shutdown");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
        }
    }
}

/// Windows: only Ctrl+C is supported
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Ctrl+C received, initiating graceful shutdown");
}
