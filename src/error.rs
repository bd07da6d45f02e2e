//! Error taxonomy for the sampling engine.
//!
//! Configuration and initial connection failures are fatal. Query failures
//! cost one metric family for one pass. A server that went away is not an
//! error here at all: the session reconnects and reports no rows.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Bad or unresolvable connection target.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a value for the socket must be given; use 'default' to search the usual locations")]
    EmptySocket,

    #[error("a value for host:port must be given; use 'default' for localhost:3306")]
    EmptyHostPort,

    #[error("invalid host:port '{0}'; expected host or host:port with an integer port")]
    InvalidHostPort(String),

    #[error("specified socket file is not a socket: {}", .0.display())]
    NotASocket(PathBuf),

    #[error("no socket file given and none found at the default locations")]
    NoDefaultSocket,

    #[error("could not stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by the underlying database driver.
#[derive(Clone, Debug, Error)]
pub enum DriverError {
    /// Transport lost or server gone away; worth one reconnect.
    #[error("server has gone away: {0}")]
    GoneAway(String),

    #[error("{0}")]
    Database(String),
}

impl DriverError {
    #[must_use]
    pub const fn is_gone_away(&self) -> bool {
        matches!(self, Self::GoneAway(_))
    }
}

/// The session could not be established.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("database connect to {target} failed: {source}")]
    Failed {
        target: String,
        #[source]
        source: DriverError,
    },

    #[error("database connect to {target} timed out after {timeout:?}")]
    Timeout { target: String, timeout: Duration },
}

/// A query failed for this pass.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query '{sql}' failed: {source}")]
    Database {
        sql: String,
        #[source]
        source: DriverError,
    },

    #[error("query '{sql}' timed out after {timeout:?}")]
    Timeout { sql: String, timeout: Duration },

    #[error("reconnect failed: {0}")]
    Reconnect(#[from] ConnectionError),
}
