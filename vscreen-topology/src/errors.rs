//! Error types for the topology service.

use crate::registry::MonitorHandle;
use thiserror::Error;

/// Errors reported by the topology query and configuration API.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The handle does not name a monitor of the current generation.
    #[error("Monitor not found: {0}")]
    NotFound(MonitorHandle),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Host display error surfaced outside the fallback paths.
    #[error("Host display error: {0}")]
    Host(#[from] HostError),
}

impl TopologyError {
    /// Returns true if this error was caused by a handle from another
    /// registry generation or an out-of-range index.
    #[must_use]
    pub fn is_stale_handle(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors raised by a [`HostDisplay`](crate::host::HostDisplay) backend.
///
/// Discovery treats every variant as "extension unavailable" and falls back
/// to the default screen; they only escape when a backend is constructed.
#[derive(Debug, Error)]
pub enum HostError {
    /// The multi-display extension is absent or inactive.
    #[error("Multi-display extension unavailable: {0}")]
    Unavailable(String),

    /// Connecting to the host windowing system failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The host replied with something unexpected.
    #[error("Protocol error: {0}")]
    Protocol(String),
}
