use crate::metrics::MetricRecord;
use crate::session::Session;
use anyhow::Result;
use futures::future::BoxFuture;
use std::collections::HashMap;

#[macro_use]
mod register_macro;

/// One metric family: a single query shaped into records.
pub trait Collector {
    fn name(&self) -> &'static str;

    /// Collect this family for one pass.
    ///
    /// `prior` holds the records already gathered earlier in the same pass.
    /// `Ok(None)` means the family does not apply right now (not a replica,
    /// engine absent, server went away, ...), never "no rows".
    fn collect<'a>(
        &'a self,
        session: &'a mut Session,
        prior: &'a [MetricRecord],
    ) -> BoxFuture<'a, Result<Option<Vec<MetricRecord>>>>;

    fn enabled_by_default(&self) -> bool {
        true
    }
}

pub mod util;

// Order matters: later families may read earlier ones from `prior`.
register_collectors! {
    variables => VariablesCollector,
    status => StatusCollector,
    innodb => InnodbCollector,
    replication => ReplicationCollector,
    process => ProcessCollector,
}

/// Instantiate the named collectors in pass order, ignoring unknown names.
#[must_use]
pub fn build_enabled(names: &[String]) -> Vec<CollectorType> {
    let factories = all_factories();
    COLLECTOR_NAMES
        .iter()
        .filter(|name| names.iter().any(|n| n == *name))
        .filter_map(|name| factories.get(name).map(|factory| factory()))
        .collect()
}
