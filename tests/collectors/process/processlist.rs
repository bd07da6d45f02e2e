use super::super::common::{FakeServer, Reply, rows};
use anyhow::Result;
use mysql_monitor::collectors::Collector;
use mysql_monitor::collectors::process::ProcessCollector;
use mysql_monitor::metrics::Scalar;
use mysql_monitor::session::Cell;

const COLUMNS: [&str; 8] = ["Id", "User", "Host", "db", "Command", "Time", "State", "Info"];

fn processlist(commands: &[&str]) -> Reply {
    Reply::Rows(rows(
        &COLUMNS,
        commands
            .iter()
            .zip(1_i64..)
            .map(|(command, id)| {
                vec![
                    Cell::Int(id),
                    Cell::from("app"),
                    Cell::from("localhost"),
                    Cell::Null,
                    Cell::from(*command),
                    Cell::Int(0),
                    Cell::Null,
                    Cell::Null,
                ]
            })
            .collect(),
    ))
}

#[tokio::test]
async fn test_process_collector_counts_commands() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(
        "SHOW PROCESSLIST",
        processlist(&["Sleep", "Sleep", "Query", "Binlog Dump", "Sleep"]),
    );
    let mut session = server.session();
    session.connect().await?;

    let records = ProcessCollector::new()
        .collect(&mut session, &[])
        .await?
        .unwrap();
    let pairs: Vec<(&str, &Scalar)> = records.iter().map(|r| (r.field(), r.value())).collect();

    assert_eq!(
        pairs,
        vec![
            ("process.binlog_dump", &Scalar::Int(1)),
            ("process.query", &Scalar::Int(1)),
            ("process.sleep", &Scalar::Int(3)),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_process_collector_empty_list() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on("SHOW PROCESSLIST", processlist(&[]));
    let mut session = server.session();
    session.connect().await?;

    let result = ProcessCollector::new().collect(&mut session, &[]).await?;

    assert!(result.is_none());
    Ok(())
}
