use crate::session::TargetSpec;
use secrecy::SecretString;
use std::time::Duration;

pub mod run;

/// Where each sampled record is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON lines on stdout.
    Json,
    /// `tracing` events.
    Log,
}

#[derive(Debug)]
pub enum Action {
    Run {
        target: TargetSpec,
        user: String,
        password: SecretString,
        interval: Duration,
        query_timeout: Duration,
        output: OutputFormat,
        collectors: Vec<String>,
    },
}
