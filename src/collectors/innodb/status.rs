//! Line rules for the `SHOW ENGINE INNODB STATUS` report.

use crate::extract::{ExtractionRule, RuleOutput, extract};
use crate::metrics::MetricRecord;
use once_cell::sync::Lazy;
use regex::Regex;

const MUTEX: &[(&str, &str)] = &[("type", "mutex")];
const RW_SHARED: &[(&str, &str)] = &[("type", "rw-shared")];
const RW_EXCLUSIVE: &[(&str, &str)] = &[("type", "rw-exclusive")];

static RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(build_rules);

#[allow(clippy::expect_used)]
fn rule(pattern: &str, outputs: Vec<RuleOutput>) -> ExtractionRule {
    ExtractionRule::new(
        Regex::new(pattern).expect("valid innodb status pattern"),
        outputs,
    )
}

fn build_rules() -> Vec<ExtractionRule> {
    vec![
        // OS WAIT ARRAY INFO: reservation count 13569, signal count 11421
        rule(
            r"^OS WAIT ARRAY INFO: reservation count (\d+), signal count (\d+)",
            vec![
                RuleOutput::new("innodb.oswait_array.reservation_count", 1),
                RuleOutput::new("innodb.oswait_array.signal_count", 2),
            ],
        ),
        // Mutex spin waits 5672442, rounds 3899888, OS waits 4719
        rule(
            r"^Mutex spin waits (\d+), rounds (\d+), OS waits (\d+)",
            vec![
                RuleOutput::tagged("innodb.locks.spin_waits", 1, MUTEX),
                RuleOutput::tagged("innodb.locks.rounds", 2, MUTEX),
                RuleOutput::tagged("innodb.locks.os_waits", 3, MUTEX),
            ],
        ),
        // RW-shared spins 5920, OS waits 2918; RW-excl spins 3463, OS waits 3163
        rule(
            r"^RW-shared spins (\d+), OS waits (\d+); RW-excl spins (\d+), OS waits (\d+)",
            vec![
                RuleOutput::tagged("innodb.locks.spin_waits", 1, RW_SHARED),
                RuleOutput::tagged("innodb.locks.os_waits", 2, RW_SHARED),
                RuleOutput::tagged("innodb.locks.spin_waits", 3, RW_EXCLUSIVE),
                RuleOutput::tagged("innodb.locks.os_waits", 4, RW_EXCLUSIVE),
            ],
        ),
        // Ibuf: size 1, free list len 0, seg size 2,
        rule(
            r"^Ibuf: size (\d+), free list len (\d+), seg size (\d+),",
            vec![
                RuleOutput::new("innodb.ibuf.size", 1),
                RuleOutput::new("innodb.ibuf.free_list_len", 2),
                RuleOutput::new("innodb.ibuf.seg_size", 3),
            ],
        ),
        // 0 inserts, 0 merged recs, 0 merges
        rule(
            r"^(\d+) inserts, (\d+) merged recs, (\d+) merges",
            vec![
                RuleOutput::new("innodb.ibuf.inserts", 1),
                RuleOutput::new("innodb.ibuf.merged_recs", 2),
                RuleOutput::new("innodb.ibuf.merges", 3),
            ],
        ),
        // 0 queries inside InnoDB, 0 queries in queue
        rule(
            r"^\d+ queries inside InnoDB, (\d+) queries in queue",
            vec![RuleOutput::new("innodb.queries_queued", 1)],
        ),
        // 1 read views open inside InnoDB
        rule(
            r"^(\d+) read views open inside InnoDB",
            vec![RuleOutput::new("innodb.opened_read_views", 1)],
        ),
        // History list length 132
        rule(
            r"^History list length (\d+)",
            vec![RuleOutput::new("innodb.history_list_length", 1)],
        ),
    ]
}

/// The fixed rule table, compiled once.
#[must_use]
pub fn rules() -> &'static [ExtractionRule] {
    &RULES
}

/// Mine the report text for the engine's internal counters.
#[must_use]
pub fn parse(report: &str) -> Vec<MetricRecord> {
    extract(report, rules())
}
