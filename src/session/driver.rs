//! The database capability the session depends on: run a query string, get
//! rows of typed columns back, and report a lost connection distinctly.

use crate::error::DriverError;
use crate::metrics::Scalar;
use crate::session::target::ConnectTarget;
use futures::future::BoxFuture;
use std::borrow::Cow;
use std::collections::HashMap;

/// One column value as returned by the server.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Textual form of the value; `None` for SQL NULL.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Int(v) => Some(Cow::Owned(v.to_string())),
            Self::UInt(v) => Some(Cow::Owned(v.to_string())),
            Self::Float(v) => Some(Cow::Owned(Scalar::Float(*v).to_string())),
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }

    /// The value when the column is a genuine integer type.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Coerce the textual form; `None` for SQL NULL.
    #[must_use]
    pub fn to_scalar(&self) -> Option<Scalar> {
        self.as_text().map(|text| Scalar::coerce(&text))
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

/// Column names plus rows of cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl QueryResult {
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, compared case-insensitively.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// Row `idx` keyed by lower-cased column name.
    #[must_use]
    pub fn row_map(&self, idx: usize) -> Option<HashMap<String, &Cell>> {
        let row = self.rows.get(idx)?;
        Some(
            self.columns
                .iter()
                .map(|column| column.to_lowercase())
                .zip(row.iter())
                .collect(),
        )
    }
}

/// A live, single-owner connection.
pub trait Driver: Send {
    /// Execute `sql` and return every row.
    fn query<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, Result<QueryResult, DriverError>>;

    /// Close the connection, ignoring errors.
    fn close(self: Box<Self>) -> BoxFuture<'static, ()>;
}

/// Opens drivers for a target.
pub trait Connector: Send + Sync {
    fn connect<'a>(
        &'a self,
        target: &'a ConnectTarget,
    ) -> BoxFuture<'a, Result<Box<dyn Driver>, DriverError>>;
}
