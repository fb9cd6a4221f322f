//! Startup: host resolution.
//!
//! Every configured name must resolve before monitoring starts; a name that
//! does not resolve has no identity to track, so startup fails as a whole.
//! An empty host list is not a failure: there is simply nothing to poll.

use thiserror::Error;
use tokio::net::lookup_host;

use crate::polling::types::Host;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} resolved to no addresses")]
    NoAddress(String),
}

/// Resolve a host name (or literal address) to a `Host`.
pub async fn resolve_host(name: &str) -> Result<Host, StartupError> {
    let mut addrs = lookup_host((name, 0))
        .await
        .map_err(|source| StartupError::Resolve {
            host: name.to_string(),
            source,
        })?;

    addrs
        .next()
        .map(|addr| Host::new(name, addr.ip()))
        .ok_or_else(|| StartupError::NoAddress(name.to_string()))
}

/// Resolve every name, failing on the first that does not resolve.
/// Duplicate names are monitored once.
pub async fn resolve_hosts(names: &[String]) -> Result<Vec<Host>, StartupError> {
    let mut hosts: Vec<Host> = Vec::with_capacity(names.len());
    for name in names {
        if hosts.iter().any(|h| h.name() == name) {
            continue;
        }
        let host = resolve_host(name).await?;
        tracing::debug!(host = %host, address = %host.addr(), "Resolved host");
        hosts.push(host);
    }
    Ok(hosts)
}
