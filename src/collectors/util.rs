//! Shared shaping helpers for collectors.

use crate::metrics::Scalar;
use crate::session::{Cell, QueryResult};
use std::collections::HashMap;
use tracing::debug;

/// `(lower-cased name, coerced value)` for every two-column `SHOW` row.
///
/// Rows whose name or value is NULL are skipped.
pub fn name_value_pairs(result: &QueryResult) -> impl Iterator<Item = (String, Scalar)> + '_ {
    result.rows().iter().filter_map(|row| {
        let name = row.first().and_then(Cell::as_text)?;
        let Some(value) = row.get(1).and_then(Cell::to_scalar) else {
            debug!(name = %name, "skipping row without a value");
            return None;
        };
        Some((name.to_lowercase(), value))
    })
}

/// First present column among `aliases` in a row keyed by lower-cased name.
#[must_use]
pub fn lookup<'r>(row: &HashMap<String, &'r Cell>, aliases: &[&str]) -> Option<&'r Cell> {
    aliases.iter().find_map(|alias| row.get(*alias).copied())
}

/// `1` when the text equals "yes" in any case, else `0`.
#[must_use]
pub fn is_yes(cell: &Cell) -> i64 {
    i64::from(
        cell.as_text()
            .is_some_and(|text| text.eq_ignore_ascii_case("yes")),
    )
}
