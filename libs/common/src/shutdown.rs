//! Graceful shutdown utilities

use std::fmt;

use tracing::{info, warn};

/// Signal that ended the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    CtrlC,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CtrlC => write!(f, "SIGINT"),
            Self::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Wait for Ctrl+C, or SIGTERM on Unix
///
/// Suitable as the future passed to `axum::serve(..).with_graceful_shutdown`.
pub async fn wait_for_shutdown() -> ShutdownSignal {
    let signal = wait_for_signal().await;
    info!("Received {}, shutting down", signal);
    signal
}

#[cfg(unix)]
async fn wait_for_signal() -> ShutdownSignal {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term_signal = match signal(SignalKind::terminate()) {
        Ok(sig) => Some(sig),
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}. Only Ctrl+C will stop the service", e);
            None
        },
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!("Ctrl+C handler failed: {}", e);
            }
            ShutdownSignal::CtrlC
        },
        _ = async {
            match term_signal.as_mut() {
                Some(sig) => {
                    sig.recv().await;
                },
                None => std::future::pending::<()>().await,
            }
        } => ShutdownSignal::Terminate,
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> ShutdownSignal {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl+C handler failed: {}", e);
    }
    ShutdownSignal::CtrlC
}
