//! Metric records produced by collectors and the derived-stats calculator.
//!
//! Field names are dotted paths with a family prefix (`global.`, `vars.`,
//! `innodb.`, `slave.`, `process.`, `derived.`) followed by a lower-cased,
//! underscore-separated name.

use std::collections::{BTreeMap, HashMap};

pub mod value;
pub use value::Scalar;

/// Tag dimensions attached to a record, e.g. `{"type": "mutex"}`.
pub type Tags = BTreeMap<String, String>;

/// One sampled metric. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricRecord {
    field: String,
    value: Scalar,
    tags: Tags,
}

impl MetricRecord {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            tags: Tags::new(),
        }
    }

    #[must_use]
    pub fn with_tags(field: impl Into<String>, value: impl Into<Scalar>, tags: Tags) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            tags,
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub const fn value(&self) -> &Scalar {
        &self.value
    }

    /// Tags, or `None` when the record carries no dimensions.
    #[must_use]
    pub fn tags(&self) -> Option<&Tags> {
        if self.tags.is_empty() {
            None
        } else {
            Some(&self.tags)
        }
    }
}

/// Lowercase a server-side name and replace spaces with underscores.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Field name to value lookup for one metric family within a pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricMap {
    values: HashMap<String, Scalar>,
}

impl MetricMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the records whose field starts with `prefix`.
    #[must_use]
    pub fn from_records<'a, I>(records: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = &'a MetricRecord>,
    {
        let values = records
            .into_iter()
            .filter(|record| record.field().starts_with(prefix))
            .map(|record| (record.field().to_string(), record.value().clone()))
            .collect();
        Self { values }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Scalar>) {
        self.values.insert(field.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.values.get(field)
    }

    /// Numeric value of `field`, `None` when absent or textual.
    #[must_use]
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Scalar::as_f64)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for MetricMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let values = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { values }
    }
}
