use super::super::common::{FakeServer, Reply, rows};
use anyhow::Result;
use mysql_monitor::collectors::Collector;
use mysql_monitor::collectors::replication::ReplicationCollector;
use mysql_monitor::metrics::Scalar;
use mysql_monitor::session::Cell;

const QUERY: &str = "SHOW SLAVE STATUS";

const COLUMNS: [&str; 7] = [
    "Slave_IO_State",
    "Master_Host",
    "Read_Master_Log_Pos",
    "Slave_IO_Running",
    "Slave_SQL_Running",
    "Exec_Master_Log_Pos",
    "Seconds_Behind_Master",
];

fn replica_row(host: &str, lag: Cell) -> Reply {
    Reply::Rows(rows(
        &COLUMNS,
        vec![vec![
            Cell::from("Waiting for master to send event"),
            Cell::from(host),
            Cell::UInt(9_000),
            Cell::from("Yes"),
            Cell::from("No"),
            Cell::UInt(8_500),
            lag,
        ]],
    ))
}

#[tokio::test]
async fn test_replication_collector_handles_no_replication() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(QUERY, Reply::Rows(rows(&COLUMNS, vec![])));
    let mut session = server.session();
    session.connect().await?;

    let result = ReplicationCollector::new().collect(&mut session, &[]).await?;

    assert!(result.is_none());
    Ok(())
}

#[tokio::test]
async fn test_replication_collector_empty_upstream_host() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(QUERY, replica_row("", Cell::Null));
    let mut session = server.session();
    session.connect().await?;

    let result = ReplicationCollector::new().collect(&mut session, &[]).await?;

    assert!(result.is_none());
    Ok(())
}

#[tokio::test]
async fn test_replication_collector_collects_lagging_replica() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(QUERY, replica_row("primary.internal", Cell::Int(12)));
    let mut session = server.session();
    session.connect().await?;

    let records = ReplicationCollector::new()
        .collect(&mut session, &[])
        .await?
        .unwrap();
    let pairs: Vec<(&str, &Scalar)> = records.iter().map(|r| (r.field(), r.value())).collect();

    assert_eq!(
        pairs,
        vec![
            ("slave.seconds_behind_master", &Scalar::Int(12)),
            ("slave.bytes_executed", &Scalar::Int(8_500)),
            ("slave.bytes_relayed", &Scalar::Int(9_000)),
            ("slave.thread_io_running", &Scalar::Int(1)),
            ("slave.thread_sql_running", &Scalar::Int(0)),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_replication_collector_omits_null_lag() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(QUERY, replica_row("primary.internal", Cell::Null));
    let mut session = server.session();
    session.connect().await?;

    let records = ReplicationCollector::new()
        .collect(&mut session, &[])
        .await?
        .unwrap();

    assert_eq!(records.len(), 4);
    assert!(
        records
            .iter()
            .all(|r| r.field() != "slave.seconds_behind_master")
    );
    Ok(())
}

#[tokio::test]
async fn test_replication_collector_handles_privilege_errors() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(
        QUERY,
        Reply::Error("Access denied; you need the REPLICATION CLIENT privilege".into()),
    );
    let mut session = server.session();
    session.connect().await?;

    let result = ReplicationCollector::new().collect(&mut session, &[]).await;

    assert!(result.is_err());
    assert!(session.is_connected());
    Ok(())
}
