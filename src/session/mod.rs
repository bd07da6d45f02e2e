//! Session manager: owns the one connection to the monitored server, knows
//! its version, and reconnects once when the server has gone away.
//!
//! Every driver call runs under the configured deadline. A query that times
//! out drops the connection (its state is unknown after cancellation); the
//! next [`Session::query`] reconnects before issuing SQL.

use crate::error::{ConnectionError, DriverError, QueryError};
use std::fmt;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, info_span, instrument, warn};
use tracing_futures::Instrument as _;

pub mod driver;
pub mod mysql;
pub mod target;

pub use driver::{Cell, Connector, Driver, QueryResult};
pub use target::{ConnectTarget, FsProbe, SocketProbe, TargetSpec};

const VERSION_QUERY: &str = "SELECT VERSION()";
const UNKNOWN_VERSION: &str = "unknown";

/// Server version as reported at connect time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerIdentity {
    pub version: String,
    pub major: u32,
    pub medium: u32,
}

impl ServerIdentity {
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            version: UNKNOWN_VERSION.to_string(),
            major: 0,
            medium: 0,
        }
    }

    /// Take the first two dot-separated components as major and medium.
    ///
    /// Anything that does not yield two integers degrades to unknown.
    #[must_use]
    pub fn parse(version: &str) -> Self {
        let mut parts = version.split('.');
        let major = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
        let medium = parts.next().and_then(|p| p.trim().parse::<u32>().ok());

        match (major, medium) {
            (Some(major), Some(medium)) => Self {
                version: version.to_string(),
                major,
                medium,
            },
            _ => {
                debug!(version, "could not parse server version");
                Self::unknown()
            }
        }
    }

    /// `SHOW GLOBAL STATUS` holds a global lock for too long before 5.1.
    #[must_use]
    pub const fn is_status_snapshot_safe(&self) -> bool {
        self.major > 5 || (self.major == 5 && self.medium >= 1)
    }
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for ServerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}

/// Single-owner session against one server.
pub struct Session {
    target: ConnectTarget,
    connector: Box<dyn Connector>,
    driver: Option<Box<dyn Driver>>,
    identity: ServerIdentity,
    timeout: Duration,
}

impl Session {
    #[must_use]
    pub fn new(target: ConnectTarget, connector: Box<dyn Connector>, timeout: Duration) -> Self {
        Self {
            target,
            connector,
            driver: None,
            identity: ServerIdentity::unknown(),
            timeout,
        }
    }

    #[must_use]
    pub const fn target(&self) -> &ConnectTarget {
        &self.target
    }

    #[must_use]
    pub const fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.driver.is_some()
    }

    #[must_use]
    pub const fn is_status_snapshot_safe(&self) -> bool {
        self.identity.is_status_snapshot_safe()
    }

    /// Open the connection and identify the server version.
    ///
    /// A version lookup failure degrades to an unknown version instead of
    /// failing the connect.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened in time.
    #[instrument(skip(self), level = "info", err, fields(target = %self.target))]
    pub async fn connect(&mut self) -> Result<ServerIdentity, ConnectionError> {
        self.close().await;

        let target = self.target.to_string();
        let mut driver = match timeout(self.timeout, self.connector.connect(&self.target)).await {
            Ok(Ok(driver)) => driver,
            Ok(Err(source)) => return Err(ConnectionError::Failed { target, source }),
            Err(_) => {
                return Err(ConnectionError::Timeout {
                    target,
                    timeout: self.timeout,
                });
            }
        };

        self.identity = match timeout(self.timeout, driver.query(VERSION_QUERY)).await {
            Ok(Ok(result)) => result
                .rows()
                .first()
                .and_then(|row| row.first())
                .and_then(Cell::as_text)
                .map_or_else(ServerIdentity::unknown, |v| ServerIdentity::parse(&v)),
            Ok(Err(e)) => {
                error!(error = %e, "failed to read database version");
                ServerIdentity::unknown()
            }
            Err(_) => {
                error!(timeout = ?self.timeout, "timed out reading database version");
                ServerIdentity::unknown()
            }
        };

        self.driver = Some(driver);
        info!(
            version = %self.identity,
            major = self.identity.major,
            medium = self.identity.medium,
            "connected to database"
        );
        Ok(self.identity.clone())
    }

    /// Run `sql` and return its rows.
    ///
    /// `Ok(None)` means the server had gone away: the session reconnected
    /// once and this call has no result. The caller should treat the metric
    /// family as absent for this pass.
    ///
    /// # Errors
    ///
    /// Returns an error on any other database error, on timeout, or when the
    /// reconnect itself fails.
    pub async fn query(&mut self, sql: &str) -> Result<Option<QueryResult>, QueryError> {
        if self.driver.is_none() {
            debug!("no live connection; reconnecting before query");
            self.connect().await?;
        }
        let Some(driver) = self.driver.as_mut() else {
            return Err(QueryError::Database {
                sql: sql.to_string(),
                source: DriverError::GoneAway("no connection".to_string()),
            });
        };

        let span = info_span!(
            "db.query",
            db.system = "mysql",
            db.operation = sql.split_whitespace().next().unwrap_or_default(),
            db.statement = sql,
            otel.kind = "client"
        );

        match timeout(self.timeout, driver.query(sql)).instrument(span).await {
            Ok(Ok(result)) => Ok(Some(result)),
            Ok(Err(e)) if e.is_gone_away() => {
                warn!(error = %e, sql, "server has gone away; reconnecting");
                self.reconnect().await?;
                Ok(None)
            }
            Ok(Err(source)) => Err(QueryError::Database {
                sql: sql.to_string(),
                source,
            }),
            Err(_) => {
                warn!(sql, timeout = ?self.timeout, "query timed out; dropping connection");
                self.driver = None;
                Err(QueryError::Timeout {
                    sql: sql.to_string(),
                    timeout: self.timeout,
                })
            }
        }
    }

    /// Close the connection, if any.
    pub async fn close(&mut self) {
        if let Some(driver) = self.driver.take()
            && timeout(self.timeout, driver.close()).await.is_err()
        {
            debug!("timed out closing connection");
        }
    }

    async fn reconnect(&mut self) -> Result<(), ConnectionError> {
        self.connect().await.map(|_| ())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DB({}, {})", self.target, self.identity)
    }
}
