use super::super::common::{FakeServer, Reply, name_values};
use anyhow::Result;
use mysql_monitor::collectors::Collector;
use mysql_monitor::collectors::status::StatusCollector;
use mysql_monitor::metrics::Scalar;

const QUERY: &str = "SHOW /*!50000 GLOBAL */ STATUS";

#[tokio::test]
async fn test_status_collector_collects_successfully() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(
        QUERY,
        Reply::Rows(name_values(&[
            ("Com_select", "5"),
            ("Com_alter_table", "2"),
            ("Slow_queries", "1"),
            ("Innodb_buffer_pool_pages_free", "812"),
        ])),
    );
    let mut session = server.session();
    session.connect().await?;

    let records = StatusCollector::new()
        .collect(&mut session, &[])
        .await?
        .unwrap();
    let fields: Vec<&str> = records.iter().map(|r| r.field()).collect();

    assert_eq!(
        fields,
        vec![
            "global.com_select",
            "global.slow_queries",
            "global.innodb_buffer_pool_pages_free"
        ]
    );
    assert_eq!(records[0].value(), &Scalar::Int(5));
    Ok(())
}

#[tokio::test]
async fn test_status_collector_skips_old_servers() -> Result<()> {
    let server = FakeServer::new("5.0.96");
    let mut session = server.session();
    session.connect().await?;

    let result = StatusCollector::new().collect(&mut session, &[]).await?;

    assert!(result.is_none());
    assert!(server.sampled_queries().is_empty(), "status must not be queried on 5.0");
    Ok(())
}

#[tokio::test]
async fn test_status_collector_skips_unknown_version() -> Result<()> {
    let server = FakeServer::new("garbage");
    let mut session = server.session();
    session.connect().await?;

    assert!(StatusCollector::new().collect(&mut session, &[]).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_status_collector_absent_after_gone_away() -> Result<()> {
    let server = FakeServer::new("5.5.62");
    server.on(QUERY, Reply::GoneAway);
    let mut session = server.session();
    session.connect().await?;

    let result = StatusCollector::new().collect(&mut session, &[]).await?;

    assert!(result.is_none());
    assert_eq!(server.connects(), 2);
    Ok(())
}

#[tokio::test]
async fn test_status_collector_reports_query_failure() -> Result<()> {
    let server = FakeServer::new("8.0.36");
    server.on(QUERY, Reply::Error("Access denied".into()));
    let mut session = server.session();
    session.connect().await?;

    let err = StatusCollector::new()
        .collect(&mut session, &[])
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("Access denied"));
    Ok(())
}
