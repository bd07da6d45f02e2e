//! One sampling pass: run each enabled family in order, derive the ratios,
//! hand every record to the sink.

use crate::collectors::{Collector, CollectorType};
use crate::derived;
use crate::metrics::{MetricMap, MetricRecord};
use crate::session::Session;
use crate::sink::Sink;
use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

pub struct Sampler {
    session: Session,
    collectors: Vec<CollectorType>,
    sink: Box<dyn Sink>,
}

impl Sampler {
    #[must_use]
    pub fn new(session: Session, collectors: Vec<CollectorType>, sink: Box<dyn Sink>) -> Self {
        Self {
            session,
            collectors,
            sink,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Gather every family without emitting anything.
    ///
    /// A family that fails is logged and left out; the rest of the pass goes on.
    pub async fn gather(&mut self) -> Vec<MetricRecord> {
        let mut records: Vec<MetricRecord> = Vec::new();

        for collector in &self.collectors {
            match collector.collect(&mut self.session, &records).await {
                Ok(Some(batch)) => {
                    debug!(collector = collector.name(), records = batch.len(), "collected");
                    records.extend(batch);
                }
                Ok(None) => debug!(collector = collector.name(), "nothing to report"),
                Err(e) => warn!(collector = collector.name(), error = %format!("{e:#}"), "collector failed"),
            }
        }

        let vars = MetricMap::from_records(&records, "vars.");
        let status = MetricMap::from_records(&records, "global.");
        if let Some(stats) = derived::compute_all(&vars, &status) {
            records.extend(stats);
        }

        records
    }

    /// Run one pass and emit it. Returns the number of records emitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a record.
    #[instrument(skip(self), level = "info", err, fields(session = %self.session))]
    pub async fn sample(&mut self) -> Result<usize> {
        let records = self.gather().await;

        for record in &records {
            self.sink
                .emit(record.field(), record.value(), record.tags())
                .with_context(|| format!("failed to emit {}", record.field()))?;
        }
        self.sink.flush()?;

        Ok(records.len())
    }

    /// Close the underlying session.
    pub async fn close(mut self) {
        self.session.close().await;
    }
}
