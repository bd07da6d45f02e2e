//! sqlx-backed [`Connector`] holding one dedicated `MySqlConnection`.

use crate::error::DriverError;
use crate::session::driver::{Cell, Connector, Driver, QueryResult};
use crate::session::target::ConnectTarget;
use futures::future::BoxFuture;
use secrecy::{ExposeSecret, SecretString};
use sqlx::mysql::{MySqlConnectOptions, MySqlDatabaseError, MySqlRow};
use sqlx::{Column, ConnectOptions, Connection, MySqlConnection, Row};
use tracing::debug;

/// Disconnect codes: client-side "gone away" and "lost connection", the
/// server's shutdown notice and its interactive-timeout kick (8.0.24+).
const GONE_AWAY_CODES: [u16; 4] = [2006, 2013, 1053, 4031];

fn is_gone_away_code(code: u16) -> bool {
    GONE_AWAY_CODES.contains(&code)
}

/// Opens a fresh connection per call; no pooling.
pub struct MySqlConnector {
    username: String,
    password: SecretString,
}

impl MySqlConnector {
    #[must_use]
    pub fn new(username: String, password: SecretString) -> Self {
        Self { username, password }
    }

    fn options(&self, target: &ConnectTarget) -> MySqlConnectOptions {
        let opts = MySqlConnectOptions::new()
            .username(&self.username)
            .password(self.password.expose_secret());

        let opts = match target {
            ConnectTarget::Socket(path) => opts.socket(path),
            ConnectTarget::Tcp { host, port } => opts.host(host).port(*port),
        };

        opts.disable_statement_logging()
    }
}

impl Connector for MySqlConnector {
    fn connect<'a>(
        &'a self,
        target: &'a ConnectTarget,
    ) -> BoxFuture<'a, Result<Box<dyn Driver>, DriverError>> {
        Box::pin(async move {
            let conn = self
                .options(target)
                .connect()
                .await
                .map_err(DriverError::from)?;
            debug!(%target, "opened database connection");
            Ok(Box::new(MySqlDriver { conn }) as Box<dyn Driver>)
        })
    }
}

struct MySqlDriver {
    conn: MySqlConnection,
}

impl Driver for MySqlDriver {
    fn query<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, Result<QueryResult, DriverError>> {
        Box::pin(async move {
            let rows = sqlx::query(sql)
                .fetch_all(&mut self.conn)
                .await
                .map_err(DriverError::from)?;
            Ok(to_query_result(&rows))
        })
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            if let Err(e) = self.conn.close().await {
                debug!(error = %e, "error while closing connection");
            }
        })
    }
}

fn to_query_result(rows: &[MySqlRow]) -> QueryResult {
    let columns: Vec<String> = rows
        .first()
        .map(|row| {
            row.columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect()
        })
        .unwrap_or_default();

    let cells: Vec<Vec<Cell>> = rows
        .iter()
        .map(|row| (0..row.len()).map(|idx| decode_cell(row, idx)).collect())
        .collect();

    QueryResult::new(columns, cells)
}

/// Decode a column into the narrowest matching cell type.
fn decode_cell(row: &MySqlRow, idx: usize) -> Cell {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map_or(Cell::Null, Cell::Int);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map_or(Cell::Null, Cell::UInt);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map_or(Cell::Null, Cell::Float);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map_or(Cell::Null, Cell::Text);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return v.map_or(Cell::Null, |bytes| {
            Cell::Text(String::from_utf8_lossy(&bytes).into_owned())
        });
    }
    debug!(column = idx, "undecodable column; treating as NULL");
    Cell::Null
}

impl From<sqlx::Error> for DriverError {
    fn from(e: sqlx::Error) -> Self {
        let gone_away = match &e {
            sqlx::Error::Io(_) => true,
            sqlx::Error::Database(db) => db
                .try_downcast_ref::<MySqlDatabaseError>()
                .is_some_and(|err| is_gone_away_code(err.number())),
            _ => false,
        };

        if gone_away {
            Self::GoneAway(e.to_string())
        } else {
            Self::Database(e.to_string())
        }
    }
}
