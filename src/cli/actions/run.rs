use crate::cli::actions::{Action, OutputFormat};
use crate::collectors::build_enabled;
use crate::sampler::Sampler;
use crate::session::{ConnectTarget, FsProbe, Session, mysql::MySqlConnector};
use crate::sink::{JsonLinesSink, LogSink, Sink};
use anyhow::{Context, Result};
use std::io;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

/// Handle the run action
///
/// # Errors
///
/// Returns an error if the target cannot be resolved or the first connection fails
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Run {
            target,
            user,
            password,
            interval: period,
            query_timeout,
            output,
            collectors,
        } => {
            let target = ConnectTarget::resolve(target, &FsProbe)?;
            let connector = MySqlConnector::new(user, password);
            let mut session = Session::new(target, Box::new(connector), query_timeout);

            let identity = session
                .connect()
                .await
                .context("initial database connection failed")?;

            let server = format!("{} ({identity})", session.target());
            let sink: Box<dyn Sink> = match output {
                OutputFormat::Json => Box::new(JsonLinesSink::new(server, io::stdout())),
                OutputFormat::Log => Box::new(LogSink::new(server)),
            };

            let mut sampler = Sampler::new(session, build_enabled(&collectors), sink);

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(interval = ?period, "sampling started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match sampler.sample().await {
                            Ok(count) => info!(records = count, "sample emitted"),
                            Err(e) => error!(error = %format!("{e:#}"), "failed to emit sample"),
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("shutting down");
                        break;
                    }
                }
            }

            sampler.close().await;
        }
    }

    Ok(())
}
