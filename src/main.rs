use anyhow::Result;
use mysql_monitor::cli::{actions::run, commands, dispatch, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = commands::new().get_matches();

    let telemetry = telemetry::init(matches.get_count("verbose"))?;

    let result = match dispatch::handler(&matches) {
        Ok(action) => run::handle(action).await,
        Err(e) => Err(e),
    };

    telemetry.shutdown();

    result
}
