use crate::collectors::Collector;
use crate::collectors::util::{is_yes, lookup};
use crate::metrics::{MetricRecord, Scalar};
use crate::session::{Cell, QueryResult, Session};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use tracing::{debug, instrument};

const REPLICA_STATUS_QUERY: &str = "SHOW SLAVE STATUS";

// Column aliases: legacy name first, then the 8.0.22+ rename.
const UPSTREAM_HOST: &[&str] = &["master_host", "source_host"];
const LAG: &[&str] = &["seconds_behind_master", "seconds_behind_source"];
const EXEC_POS: &[&str] = &["exec_master_log_pos", "exec_source_log_pos"];
const READ_POS: &[&str] = &["read_master_log_pos", "read_source_log_pos"];
const IO_RUNNING: &[&str] = &["slave_io_running", "replica_io_running"];
const SQL_RUNNING: &[&str] = &["slave_sql_running", "replica_sql_running"];

/// Replica lag, log positions and thread state as `slave.*`.
#[derive(Clone, Default)]
pub struct ReplicationCollector;

impl ReplicationCollector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// `None` when the server is not a replica: no row, or no upstream host.
    #[must_use]
    pub fn shape(result: &QueryResult) -> Option<Vec<MetricRecord>> {
        let row = result.row_map(0)?;

        let host = lookup(&row, UPSTREAM_HOST).and_then(Cell::as_text)?;
        if host.is_empty() {
            return None;
        }

        let mut records = Vec::with_capacity(5);

        // NULL while the SQL thread is stopped; only report a real integer.
        match lookup(&row, LAG).and_then(Cell::as_integer) {
            Some(lag) => records.push(MetricRecord::new("slave.seconds_behind_master", lag)),
            None => debug!("replica lag not reported"),
        }

        for (field, aliases) in [
            ("slave.bytes_executed", EXEC_POS),
            ("slave.bytes_relayed", READ_POS),
        ] {
            if let Some(value) = lookup(&row, aliases).and_then(Cell::to_scalar) {
                records.push(MetricRecord::new(field, value));
            }
        }

        for (field, aliases) in [
            ("slave.thread_io_running", IO_RUNNING),
            ("slave.thread_sql_running", SQL_RUNNING),
        ] {
            if let Some(cell) = lookup(&row, aliases) {
                records.push(MetricRecord::new(field, Scalar::Int(is_yes(cell))));
            }
        }

        Some(records)
    }
}

impl Collector for ReplicationCollector {
    fn name(&self) -> &'static str {
        "replication"
    }

    #[instrument(skip(self, session, _prior), level = "info", err, fields(collector = "replication", otel.kind = "internal"))]
    fn collect<'a>(
        &'a self,
        session: &'a mut Session,
        _prior: &'a [MetricRecord],
    ) -> BoxFuture<'a, Result<Option<Vec<MetricRecord>>>> {
        Box::pin(async move {
            let result = session
                .query(REPLICA_STATUS_QUERY)
                .await
                .context("failed to execute SHOW SLAVE STATUS")?;

            Ok(result.and_then(|result| Self::shape(&result)))
        })
    }
}
