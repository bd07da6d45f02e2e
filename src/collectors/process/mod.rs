use crate::collectors::Collector;
use crate::metrics::{MetricRecord, normalize_name};
use crate::session::{Cell, QueryResult, Session};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use tracing::instrument;

const PROCESSLIST_QUERY: &str = "SHOW PROCESSLIST";
const COMMAND_COLUMN: &str = "Command";
// Id, User, Host, db, Command, ...
const COMMAND_FALLBACK_INDEX: usize = 4;

/// Connection census: one `process.<command>` count per distinct command.
#[derive(Clone, Default)]
pub struct ProcessCollector;

impl ProcessCollector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Count rows per normalized command; `None` when no row names a command.
    #[must_use]
    pub fn shape(result: &QueryResult) -> Option<Vec<MetricRecord>> {
        if result.is_empty() {
            return None;
        }

        let column = result
            .column_index(COMMAND_COLUMN)
            .unwrap_or(COMMAND_FALLBACK_INDEX);

        let mut census: BTreeMap<String, i64> = BTreeMap::new();
        for command in result
            .rows()
            .iter()
            .filter_map(|row| row.get(column).and_then(Cell::as_text))
        {
            *census.entry(normalize_name(&command)).or_default() += 1;
        }

        if census.is_empty() {
            return None;
        }

        Some(
            census
                .into_iter()
                .map(|(state, count)| MetricRecord::new(format!("process.{state}"), count))
                .collect(),
        )
    }
}

impl Collector for ProcessCollector {
    fn name(&self) -> &'static str {
        "process"
    }

    #[instrument(skip(self, session, _prior), level = "info", err, fields(collector = "process", otel.kind = "internal"))]
    fn collect<'a>(
        &'a self,
        session: &'a mut Session,
        _prior: &'a [MetricRecord],
    ) -> BoxFuture<'a, Result<Option<Vec<MetricRecord>>>> {
        Box::pin(async move {
            let result = session
                .query(PROCESSLIST_QUERY)
                .await
                .context("failed to execute SHOW PROCESSLIST")?;

            Ok(result.and_then(|result| Self::shape(&result)))
        })
    }
}
