//! Line-oriented pattern extraction over free-form report text.
//!
//! Each line is tested against the rules in order. The first rule whose
//! pattern matches claims the line and emits one record per declared output;
//! later rules are not consulted for that line.

use crate::metrics::{MetricRecord, Scalar, Tags};
use regex::Regex;
use tracing::debug;

/// One value taken from a capture group of a matching line.
#[derive(Clone, Debug)]
pub struct RuleOutput {
    pub label: &'static str,
    pub group: usize,
    pub tags: &'static [(&'static str, &'static str)],
}

impl RuleOutput {
    #[must_use]
    pub const fn new(label: &'static str, group: usize) -> Self {
        Self {
            label,
            group,
            tags: &[],
        }
    }

    #[must_use]
    pub const fn tagged(
        label: &'static str,
        group: usize,
        tags: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { label, group, tags }
    }

    fn tag_map(&self) -> Tags {
        self.tags
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }
}

/// A line pattern and the records it yields.
#[derive(Clone, Debug)]
pub struct ExtractionRule {
    pattern: Regex,
    outputs: Vec<RuleOutput>,
}

impl ExtractionRule {
    #[must_use]
    pub fn new(pattern: Regex, outputs: Vec<RuleOutput>) -> Self {
        Self { pattern, outputs }
    }

    #[must_use]
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    #[must_use]
    pub fn outputs(&self) -> &[RuleOutput] {
        &self.outputs
    }

    /// Records for `line`, or `None` when the pattern does not match.
    fn apply(&self, line: &str) -> Option<Vec<MetricRecord>> {
        let caps = self.pattern.captures(line)?;
        let records = self
            .outputs
            .iter()
            .filter_map(|output| {
                let Some(raw) = caps.get(output.group) else {
                    debug!(
                        label = output.label,
                        group = output.group,
                        "capture group did not participate in match"
                    );
                    return None;
                };
                Some(MetricRecord::with_tags(
                    output.label,
                    Scalar::coerce(raw.as_str()),
                    output.tag_map(),
                ))
            })
            .collect();
        Some(records)
    }
}

/// Run `rules` over every line of `text`, first match per line.
#[must_use]
pub fn extract(text: &str, rules: &[ExtractionRule]) -> Vec<MetricRecord> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| rules.iter().find_map(|rule| rule.apply(line)))
        .flatten()
        .collect()
}
