use crate::{
    cli::actions::{Action, OutputFormat},
    collectors::{COLLECTOR_NAMES, Collector, all_factories},
    session::TargetSpec,
};
use anyhow::{Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;
use std::time::Duration;
use tracing::info;

/// # Errors
///
/// Returns an error if required arguments are missing or the target is malformed
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let target = get_target(matches)?;

    let user = matches
        .get_one::<String>("user")
        .cloned()
        .ok_or_else(|| anyhow!("User is required. Please provide it using the --user flag."))?;

    let password = SecretString::from(matches.get_one::<String>("password").cloned().ok_or_else(
        || anyhow!("Password is required. Please provide it using the --password flag."),
    )?);

    let interval = Duration::from_secs(matches.get_one::<u64>("interval").copied().unwrap_or(30));
    let query_timeout = Duration::from_secs(
        matches
            .get_one::<u64>("query-timeout")
            .copied()
            .unwrap_or(10),
    );

    let output = match matches.get_one::<String>("output").map(String::as_str) {
        Some("log") => OutputFormat::Log,
        _ => OutputFormat::Json,
    };

    let collectors = get_enabled_collectors(matches);
    info!("Enabled collectors: {}", collectors.join(", "));

    Ok(Action::Run {
        target,
        user,
        password,
        interval,
        query_timeout,
        output,
        collectors,
    })
}

fn get_target(matches: &ArgMatches) -> Result<TargetSpec> {
    if let Some(socket) = matches.get_one::<String>("socket") {
        return Ok(TargetSpec::from_socket_arg(socket)?);
    }
    if let Some(host_port) = matches.get_one::<String>("host-port") {
        return Ok(TargetSpec::from_host_port(host_port)?);
    }
    Err(anyhow!(
        "A target is required. Please provide either --socket or --host-port."
    ))
}

#[must_use]
pub fn get_enabled_collectors(matches: &ArgMatches) -> Vec<String> {
    let factories = all_factories();

    COLLECTOR_NAMES
        .iter()
        .filter(|&name| {
            // If explicitly disabled, skip it
            if matches.get_flag(&format!("no-collector.{name}")) {
                return false;
            }

            if matches.get_flag(&format!("collector.{name}")) {
                return true;
            }

            factories
                .get(name)
                .is_some_and(|factory| factory().enabled_by_default())
        })
        .map(|&name| name.to_string())
        .collect()
}
