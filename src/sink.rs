//! Where sampled records go.

use crate::metrics::{Scalar, Tags};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Receives every record of a pass, in order.
pub trait Sink: Send {
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn emit(&mut self, field: &str, value: &Scalar, tags: Option<&Tags>) -> Result<()>;

    /// Called once a pass has emitted everything.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered output cannot be flushed.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct Line<'a> {
    timestamp: String,
    server: &'a str,
    metric: &'a str,
    value: &'a Scalar,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a Tags>,
}

/// One JSON object per record, newline delimited.
pub struct JsonLinesSink<W: Write + Send> {
    server: String,
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// `server` labels every line, e.g. `localhost:3306 (8.0.36)`.
    #[must_use]
    pub fn new(server: impl Into<String>, writer: W) -> Self {
        Self {
            server: server.into(),
            writer,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Sink for JsonLinesSink<W> {
    fn emit(&mut self, field: &str, value: &Scalar, tags: Option<&Tags>) -> Result<()> {
        let line = Line {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            server: &self.server,
            metric: field,
            value,
            tags,
        };
        serde_json::to_writer(&mut self.writer, &line).context("failed to encode metric")?;
        self.writer
            .write_all(b"\n")
            .context("failed to write metric")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("failed to flush metrics")
    }
}

/// Records as structured `tracing` events.
#[derive(Debug, Default)]
pub struct LogSink {
    server: String,
}

impl LogSink {
    #[must_use]
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
        }
    }
}

impl Sink for LogSink {
    fn emit(&mut self, field: &str, value: &Scalar, tags: Option<&Tags>) -> Result<()> {
        match tags {
            Some(tags) => info!(server = %self.server, metric = field, %value, ?tags, "sample"),
            None => info!(server = %self.server, metric = field, %value, "sample"),
        }
        Ok(())
    }
}
