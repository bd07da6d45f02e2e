use crate::collectors::Collector;
use crate::metrics::MetricRecord;
use crate::session::{Cell, QueryResult, Session};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use tracing::{debug, instrument};

pub mod status;

const ENGINE_STATUS_QUERY: &str = "SHOW ENGINE INNODB STATUS";
const ENGINE_MARKER: &str = "global.innodb";

/// `InnoDB` engine internals mined from `SHOW ENGINE INNODB STATUS`.
///
/// Only runs when the status family already reported `innodb_*` counters,
/// so servers without the engine are never asked for its report.
#[derive(Clone, Default)]
pub struct InnodbCollector;

impl InnodbCollector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether earlier families show the engine is present.
    #[must_use]
    pub fn engine_present(prior: &[MetricRecord]) -> bool {
        prior.iter().any(|r| r.field().starts_with(ENGINE_MARKER))
    }

    /// The report text lives in the third column of the first row.
    ///
    /// A missing row, a short row or a NULL report means the family is
    /// unavailable. Report text that matches no rule is an empty list.
    #[must_use]
    pub fn shape(result: &QueryResult) -> Option<Vec<MetricRecord>> {
        let report = result
            .rows()
            .first()
            .and_then(|row| row.get(2))
            .and_then(Cell::as_text)?;

        Some(status::parse(&report))
    }
}

impl Collector for InnodbCollector {
    fn name(&self) -> &'static str {
        "innodb"
    }

    #[instrument(skip(self, session, prior), level = "info", err, fields(collector = "innodb", otel.kind = "internal"))]
    fn collect<'a>(
        &'a self,
        session: &'a mut Session,
        prior: &'a [MetricRecord],
    ) -> BoxFuture<'a, Result<Option<Vec<MetricRecord>>>> {
        Box::pin(async move {
            if !Self::engine_present(prior) {
                debug!("no innodb counters in global status; skipping engine report");
                return Ok(None);
            }

            let result = session
                .query(ENGINE_STATUS_QUERY)
                .await
                .context("failed to execute SHOW ENGINE INNODB STATUS")?;

            Ok(result.and_then(|result| Self::shape(&result)))
        })
    }
}
