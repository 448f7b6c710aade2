//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGINT, SIGTERM)
//! - Translate the first signal into a shutdown request
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The listener task is the only writer of the shutdown token
//! - Once handlers are installed the default terminate action is replaced,
//!   so a read already blocked on input is not interrupted

use std::io;

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Install SIGINT/SIGTERM handlers and spawn a task that triggers `shutdown`
/// on the first of them.
///
/// The handlers are in place when this returns, so a signal sent afterwards
/// never takes the default terminate action.
#[cfg(unix)]
pub fn spawn_listener(shutdown: Shutdown) -> io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    Ok(tokio::spawn(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
        };
        tracing::info!(signal = name, "Shutdown signal received");
        shutdown.trigger();
    }))
}

#[cfg(not(unix))]
pub fn spawn_listener(shutdown: Shutdown) -> io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!(signal = "ctrl-c", "Shutdown signal received");
                shutdown.trigger();
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to listen for ctrl-c");
            }
        }
    }))
}
