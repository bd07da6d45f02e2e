use crate::collectors::{Collector, util::name_value_pairs};
use crate::metrics::MetricRecord;
use crate::session::{QueryResult, Session};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use tracing::instrument;

const VARIABLES_QUERY: &str = "SHOW /*!50000 GLOBAL */ VARIABLES";

/// The only variables reported; the rest of the set is not worth the volume.
pub const REPORTED_VARIABLES: [&str; 2] = ["max_connections", "open_files_limit"];

/// Selected global variables as `vars.<name>`.
#[derive(Clone, Default)]
pub struct VariablesCollector;

impl VariablesCollector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn shape(result: &QueryResult) -> Vec<MetricRecord> {
        name_value_pairs(result)
            .filter(|(name, _)| REPORTED_VARIABLES.contains(&name.as_str()))
            .map(|(name, value)| MetricRecord::new(format!("vars.{name}"), value))
            .collect()
    }
}

impl Collector for VariablesCollector {
    fn name(&self) -> &'static str {
        "variables"
    }

    #[instrument(skip(self, session, _prior), level = "info", err, fields(collector = "variables", otel.kind = "internal"))]
    fn collect<'a>(
        &'a self,
        session: &'a mut Session,
        _prior: &'a [MetricRecord],
    ) -> BoxFuture<'a, Result<Option<Vec<MetricRecord>>>> {
        Box::pin(async move {
            let result = session
                .query(VARIABLES_QUERY)
                .await
                .context("failed to execute SHOW GLOBAL VARIABLES")?;

            Ok(result.map(|result| Self::shape(&result)))
        })
    }
}
