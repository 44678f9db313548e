// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::lifecycle::{ControlSignal, RunOutcome};

/// The supervised application service: a control listener that runs until a
/// lifecycle transition is requested.
///
/// Privileged clients connect and send a `restart` or `shutdown` line, the
/// same commands the corpus editor frontend issues. OS signals work too:
/// SIGINT/SIGTERM request a shutdown and SIGHUP a restart.
pub struct ControlService {
    listener: TcpListener,
}

impl ControlService {
    pub async fn bind(port: u16) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves control connections sequentially until a signal is raised.
    /// Never returns `RunOutcome::Silent`; only a scripted service can.
    pub async fn run(self) -> Result<RunOutcome, ServerError> {
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);
        let restart = restart_signal();
        tokio::pin!(restart);

        loop {
            tokio::select! {
                result = &mut shutdown => {
                    result?;
                    info!("Termination signal received");
                    return Ok(RunOutcome::Signal(ControlSignal::Shutdown));
                }
                result = &mut restart => {
                    result?;
                    info!("Hangup received, restart requested");
                    return Ok(RunOutcome::Signal(ControlSignal::Restart));
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            debug!("Control connection from {addr}");
                            match handle_connection(stream).await {
                                Ok(Some(signal)) => return Ok(RunOutcome::Signal(signal)),
                                Ok(None) => {}
                                Err(err) => warn!("Control connection failed: {err}"),
                            }
                        }
                        Err(err) => warn!("Failed to accept control connection: {err}"),
                    }
                }
            }
        }
    }
}

/// Reads commands line by line until the client hangs up or issues a
/// lifecycle request. The acknowledgement write is best-effort; a client
/// that disconnects before reading it still gets its transition.
async fn handle_connection(stream: TcpStream) -> Result<Option<ControlSignal>, ServerError> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }

        match line.trim().to_ascii_lowercase().as_str() {
            "restart" => {
                let _ = reader.get_mut().write_all(b"restarting\n").await;
                return Ok(Some(ControlSignal::Restart));
            }
            "shutdown" => {
                let _ = reader.get_mut().write_all(b"shutting down\n").await;
                return Ok(Some(ControlSignal::Shutdown));
            }
            "" => {}
            other => {
                warn!("Unknown control command: {other}");
                reader.get_mut().write_all(b"unknown command\n").await?;
            }
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(unix)]
async fn restart_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sighup = signal(SignalKind::hangup())?;
    sighup.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn restart_signal() -> std::io::Result<()> {
    std::future::pending::<()>().await;
    Ok(())
}
