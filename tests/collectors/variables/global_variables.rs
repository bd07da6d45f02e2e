use super::super::common::{FakeServer, Reply, name_values};
use anyhow::Result;
use mysql_monitor::collectors::Collector;
use mysql_monitor::collectors::variables::VariablesCollector;
use mysql_monitor::metrics::Scalar;

#[tokio::test]
async fn test_variables_collector_collects_successfully() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(
        "SHOW /*!50000 GLOBAL */ VARIABLES",
        Reply::Rows(name_values(&[
            ("max_connections", "151"),
            ("open_files_limit", "1048576"),
            ("sql_mode", "STRICT_TRANS_TABLES"),
        ])),
    );
    let mut session = server.session();
    session.connect().await?;

    let records = VariablesCollector::new()
        .collect(&mut session, &[])
        .await?
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].field(), "vars.max_connections");
    assert_eq!(records[0].value(), &Scalar::Int(151));
    assert_eq!(records[1].field(), "vars.open_files_limit");
    Ok(())
}

#[tokio::test]
async fn test_variables_collector_runs_on_old_servers() -> Result<()> {
    let server = FakeServer::new("5.0.96");
    server.on(
        "SHOW /*!50000 GLOBAL */ VARIABLES",
        Reply::Rows(name_values(&[("max_connections", "100")])),
    );
    let mut session = server.session();
    session.connect().await?;

    let records = VariablesCollector::new()
        .collect(&mut session, &[])
        .await?;

    assert_eq!(records.map(|r| r.len()), Some(1));
    Ok(())
}
