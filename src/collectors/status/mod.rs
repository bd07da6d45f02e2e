use crate::collectors::{Collector, util::name_value_pairs};
use crate::metrics::MetricRecord;
use crate::session::{QueryResult, Session};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use tracing::{debug, instrument};

const STATUS_QUERY: &str = "SHOW /*!50000 GLOBAL */ STATUS";

/// `com_*` counters are high-cardinality; only these are reported.
pub const REPORTED_COM_COUNTERS: [&str; 5] = [
    "com_select",
    "com_update",
    "com_delete",
    "com_replace",
    "com_insert",
];

/// Global status counters as `global.<name>`.
#[derive(Clone, Default)]
pub struct StatusCollector;

impl StatusCollector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Shape `SHOW GLOBAL STATUS` rows, dropping unlisted `com_*` counters.
    #[must_use]
    pub fn shape(result: &QueryResult) -> Vec<MetricRecord> {
        name_value_pairs(result)
            .filter(|(name, _)| is_reported(name))
            .map(|(name, value)| MetricRecord::new(format!("global.{name}"), value))
            .collect()
    }
}

fn is_reported(name: &str) -> bool {
    !name.starts_with("com_") || REPORTED_COM_COUNTERS.contains(&name)
}

impl Collector for StatusCollector {
    fn name(&self) -> &'static str {
        "status"
    }

    #[instrument(skip(self, session, _prior), level = "info", err, fields(collector = "status", otel.kind = "internal"))]
    fn collect<'a>(
        &'a self,
        session: &'a mut Session,
        _prior: &'a [MetricRecord],
    ) -> BoxFuture<'a, Result<Option<Vec<MetricRecord>>>> {
        Box::pin(async move {
            if !session.is_status_snapshot_safe() {
                debug!(version = %session.identity(), "global status snapshot unsafe on this version; skipping");
                return Ok(None);
            }

            let Some(result) = session
                .query(STATUS_QUERY)
                .await
                .context("failed to execute SHOW GLOBAL STATUS")?
            else {
                return Ok(None);
            };

            Ok(Some(Self::shape(&result)))
        })
    }
}
