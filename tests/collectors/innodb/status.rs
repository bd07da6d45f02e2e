use super::super::common::{FakeServer, Reply, rows};
use anyhow::Result;
use mysql_monitor::collectors::Collector;
use mysql_monitor::collectors::innodb::InnodbCollector;
use mysql_monitor::metrics::{MetricRecord, Scalar};
use mysql_monitor::session::Cell;

const QUERY: &str = "SHOW ENGINE INNODB STATUS";

const REPORT: &str = "
----------
SEMAPHORES
----------
OS WAIT ARRAY INFO: reservation count 13569, signal count 11421
Mutex spin waits 10, rounds 20, OS waits 3
RW-shared spins 5920, OS waits 2918; RW-excl spins 3463, OS waits 3163
------------
TRANSACTIONS
------------
History list length 132
";

fn engine_status(report: &str) -> Reply {
    Reply::Rows(rows(
        &["Type", "Name", "Status"],
        vec![vec![Cell::from("InnoDB"), Cell::from(""), Cell::from(report)]],
    ))
}

fn innodb_present() -> Vec<MetricRecord> {
    vec![MetricRecord::new("global.innodb_row_lock_waits", 0)]
}

#[tokio::test]
async fn test_innodb_collector_is_enabled_by_default() {
    assert!(InnodbCollector::new().enabled_by_default());
}

#[tokio::test]
async fn test_innodb_collector_collects_successfully() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(QUERY, engine_status(REPORT));
    let mut session = server.session();
    session.connect().await?;

    let prior = innodb_present();
    let records = InnodbCollector::new()
        .collect(&mut session, &prior)
        .await?
        .unwrap();

    assert_eq!(records.len(), 10);

    let mutex: Vec<(&str, &Scalar)> = records
        .iter()
        .filter(|r| {
            r.tags()
                .and_then(|t| t.get("type"))
                .is_some_and(|t| t == "mutex")
        })
        .map(|r| (r.field(), r.value()))
        .collect();
    assert_eq!(
        mutex,
        vec![
            ("innodb.locks.spin_waits", &Scalar::Int(10)),
            ("innodb.locks.rounds", &Scalar::Int(20)),
            ("innodb.locks.os_waits", &Scalar::Int(3)),
        ]
    );
    assert_eq!(records[9].field(), "innodb.history_list_length");
    Ok(())
}

#[tokio::test]
async fn test_innodb_collector_skipped_without_engine() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(QUERY, engine_status(REPORT));
    let mut session = server.session();
    session.connect().await?;

    let prior = vec![MetricRecord::new("global.uptime", 10)];
    let result = InnodbCollector::new().collect(&mut session, &prior).await?;

    assert!(result.is_none());
    assert!(server.sampled_queries().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_innodb_collector_handles_empty_report() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(QUERY, engine_status(""));
    let mut session = server.session();
    session.connect().await?;

    let prior = innodb_present();
    let records = InnodbCollector::new().collect(&mut session, &prior).await?;

    assert_eq!(records, Some(vec![]));
    Ok(())
}

#[tokio::test]
async fn test_innodb_collector_null_report_is_unavailable() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(
        QUERY,
        Reply::Rows(rows(
            &["Type", "Name", "Status"],
            vec![vec![Cell::from("InnoDB"), Cell::from(""), Cell::Null]],
        )),
    );
    let mut session = server.session();
    session.connect().await?;

    let prior = innodb_present();
    let records = InnodbCollector::new().collect(&mut session, &prior).await?;

    assert!(records.is_none());
    Ok(())
}

#[tokio::test]
async fn test_innodb_collector_no_rows_is_unavailable() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(QUERY, Reply::Rows(rows(&["Type", "Name", "Status"], vec![])));
    let mut session = server.session();
    session.connect().await?;

    let prior = innodb_present();
    let records = InnodbCollector::new().collect(&mut session, &prior).await?;

    assert!(records.is_none());
    Ok(())
}
