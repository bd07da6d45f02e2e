//! Ratios and counts derived from the `vars.` and `global.` families of one pass.
//!
//! Every stat is a plain function over the two maps. A stat whose inputs are
//! missing (or textual) yields `None` and is left out of the output; division
//! by a non-positive denominator yields `0.0`.

use crate::metrics::{MetricMap, MetricRecord, Scalar};
use tracing::debug;

/// Signature shared by every derived statistic: `(vars, status) -> value`.
pub type DerivedStat = fn(&MetricMap, &MetricMap) -> Option<Scalar>;

/// Every derived stat, in emission order. Field name is `derived.<name>`.
pub const DERIVED_STATS: &[(&str, DerivedStat)] = &[
    ("slow_query_percentage", slow_query_percentage),
    ("connections_used_percentage", connections_used_percentage),
    ("aborted_connections_percentage", aborted_connections_percentage),
    ("aborted_clients_percentage", aborted_clients_percentage),
    ("read_percentage", read_percentage),
    ("write_percentage", write_percentage),
    ("query_cache_efficiency", query_cache_efficiency),
    ("joins_without_indexes", joins_without_indexes),
    ("table_cache_hit_rate", table_cache_hit_rate),
    ("open_file_percentage", open_file_percentage),
    ("immediate_table_lock_percentage", immediate_table_lock_percentage),
    ("thread_cache_hit_rate", thread_cache_hit_rate),
    ("tmp_disk_table_percentage", tmp_disk_table_percentage),
];

/// Compute every derived stat whose inputs are present.
///
/// Returns `None` when either family is empty.
#[must_use]
pub fn compute_all(vars: &MetricMap, status: &MetricMap) -> Option<Vec<MetricRecord>> {
    if vars.is_empty() || status.is_empty() {
        return None;
    }

    let records = DERIVED_STATS
        .iter()
        .filter_map(|(name, stat)| {
            let value = stat(vars, status);
            if value.is_none() {
                debug!(stat = name, "skipping derived stat; required field missing");
            }
            value.map(|v| MetricRecord::new(format!("derived.{name}"), v))
        })
        .collect();

    Some(records)
}

fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        100.0 * numerator / denominator
    } else {
        0.0
    }
}

/// Requires `global.slow_queries`, `global.questions`.
#[must_use]
pub fn slow_query_percentage(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let slow = status.number("global.slow_queries")?;
    let questions = status.number("global.questions")?;
    Some(Scalar::Float(percentage(slow, questions)))
}

/// Requires `global.max_used_connections`, `vars.max_connections`. Capped at 100.
#[must_use]
pub fn connections_used_percentage(vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let used = status.number("global.max_used_connections")?;
    let limit = vars.number("vars.max_connections")?;
    Some(Scalar::Float(percentage(used, limit).min(100.0)))
}

/// Requires `global.aborted_connects`, `global.connections`.
#[must_use]
pub fn aborted_connections_percentage(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let aborted = status.number("global.aborted_connects")?;
    let connections = status.number("global.connections")?;
    Some(Scalar::Float(percentage(aborted, connections)))
}

/// Requires `global.aborted_clients`, `global.connections`.
#[must_use]
pub fn aborted_clients_percentage(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let aborted = status.number("global.aborted_clients")?;
    let connections = status.number("global.connections")?;
    Some(Scalar::Float(percentage(aborted, connections)))
}

/// Share of reads (`com_select`) or writes (`com_delete`, `com_insert`,
/// `com_update`, `com_replace`) over their sum.
fn read_write_percentage(status: &MetricMap, reads_wanted: bool) -> Option<Scalar> {
    let reads = status.number("global.com_select")?;
    let writes = status.number("global.com_delete")?
        + status.number("global.com_insert")?
        + status.number("global.com_update")?
        + status.number("global.com_replace")?;
    let top = if reads_wanted { reads } else { writes };
    Some(Scalar::Float(percentage(top, reads + writes)))
}

/// Requires `global.com_select` and the four write counters.
#[must_use]
pub fn read_percentage(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    read_write_percentage(status, true)
}

/// Requires `global.com_select` and the four write counters.
#[must_use]
pub fn write_percentage(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    read_write_percentage(status, false)
}

/// Requires `global.qcache_hits`, `global.com_select`.
#[must_use]
pub fn query_cache_efficiency(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let hits = status.number("global.qcache_hits")?;
    let selects = status.number("global.com_select")?;
    Some(Scalar::Float(percentage(hits, selects + hits)))
}

/// Requires `global.select_range_check`, `global.select_full_join`.
///
/// A raw count, not a ratio.
#[must_use]
pub fn joins_without_indexes(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let range_check = status.get("global.select_range_check")?;
    let full_join = status.get("global.select_full_join")?;
    match (range_check.as_i64(), full_join.as_i64()) {
        (Some(a), Some(b)) => Some(Scalar::Int(a.saturating_add(b))),
        _ => Some(Scalar::Float(range_check.as_f64()? + full_join.as_f64()?)),
    }
}

/// Requires `global.open_tables`, `global.opened_tables`.
#[must_use]
pub fn table_cache_hit_rate(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let open = status.number("global.open_tables")?;
    let opened = status.number("global.opened_tables")?;
    Some(Scalar::Float(percentage(open, opened)))
}

/// Requires `global.open_files`, `vars.open_files_limit`.
#[must_use]
pub fn open_file_percentage(vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let open = status.number("global.open_files")?;
    let limit = vars.number("vars.open_files_limit")?;
    Some(Scalar::Float(percentage(open, limit)))
}

/// Requires `global.table_locks_immediate`, `global.table_locks_waited`.
#[must_use]
pub fn immediate_table_lock_percentage(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let immediate = status.number("global.table_locks_immediate")?;
    let waited = status.number("global.table_locks_waited")?;
    Some(Scalar::Float(percentage(immediate, immediate + waited)))
}

/// Requires `global.threads_created`, `global.connections`.
///
/// `100 - created / connections`; the quotient is not scaled to a percentage.
#[must_use]
pub fn thread_cache_hit_rate(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let created = status.number("global.threads_created")?;
    let connections = status.number("global.connections")?;
    let rate = if connections > 0.0 {
        100.0 - created / connections
    } else {
        0.0
    };
    Some(Scalar::Float(rate))
}

/// Requires `global.created_tmp_disk_tables`, `global.created_tmp_tables`.
#[must_use]
pub fn tmp_disk_table_percentage(_vars: &MetricMap, status: &MetricMap) -> Option<Scalar> {
    let on_disk = status.number("global.created_tmp_disk_tables")?;
    let total = status.number("global.created_tmp_tables")?;
    Some(Scalar::Float(percentage(on_disk, total)))
}
