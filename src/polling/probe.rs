//! Reachability probes.
//!
//! A probe is a single blocking "is this host up" check bounded by a
//! timeout. It runs on tokio's blocking pool, so implementations are free to
//! use blocking sockets or spawn processes.
//!
//! # Implementations
//! - `TcpProbe`: TCP connect to a fixed port; a refused connection still
//!   proves the host answered
//! - `CommandProbe`: runs the system `ping` once
//! - any `Fn(&Host, Duration) -> Result<(), ProbeError>`

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpStream};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::schema::{ProbeConfig, ProbeKind};
use crate::polling::types::Host;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("unreachable")]
    Unreachable,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("io error: {0}")]
    Io(String),

    #[error("probe aborted: {0}")]
    Aborted(String),
}

pub trait Probe: Send + Sync {
    fn probe(&self, host: &Host, timeout: Duration) -> Result<(), ProbeError>;
}

impl<F> Probe for F
where
    F: Fn(&Host, Duration) -> Result<(), ProbeError> + Send + Sync,
{
    fn probe(&self, host: &Host, timeout: Duration) -> Result<(), ProbeError> {
        self(host, timeout)
    }
}

/// TCP connect probe.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    port: u16,
}

impl TcpProbe {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

impl Probe for TcpProbe {
    fn probe(&self, host: &Host, timeout: Duration) -> Result<(), ProbeError> {
        let addr = SocketAddr::new(host.addr(), self.port);
        // connect_timeout rejects a zero duration
        let timeout = timeout.max(Duration::from_millis(1));
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => Ok(()),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                Err(ProbeError::Timeout(timeout))
            }
            Err(e) => Err(ProbeError::Io(e.to_string())),
        }
    }
}

/// Single-echo `ping` command probe.
///
/// Runs `<program> -c 1 -W <secs> <addr>`. The reply wait is passed in whole
/// seconds, which is what Linux iputils `ping` expects. BSD and macOS `ping`
/// read `-W` as milliseconds, so on those systems the wait is 1000x shorter
/// than configured; use `TcpProbe` or a closure probe there.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
}

impl CommandProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl CommandProbe {
    /// Arguments for one echo with a reply wait rounded up to whole seconds.
    fn args(host: &Host, timeout: Duration) -> Vec<String> {
        let wait_secs = timeout.as_secs_f64().ceil().max(1.0) as u64;
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            wait_secs.to_string(),
            host.addr().to_string(),
        ]
    }
}

impl Probe for CommandProbe {
    fn probe(&self, host: &Host, timeout: Duration) -> Result<(), ProbeError> {
        let status = Command::new(&self.program)
            .args(Self::args(host, timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ProbeError::Io(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(ProbeError::Unreachable)
        }
    }
}

/// Build the probe selected in configuration.
pub fn probe_from_config(config: &ProbeConfig) -> Arc<dyn Probe> {
    match config.kind {
        ProbeKind::Tcp => Arc::new(TcpProbe::new(config.tcp_port)),
        ProbeKind::Command => Arc::new(CommandProbe::new(config.command.clone())),
    }
}
