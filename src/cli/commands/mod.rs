use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::{
        PossibleValuesParser,
        styling::{AnsiColor, Effects, Styles},
    },
};

pub mod collectors;

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let cmd = Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("socket")
                .long("socket")
                .help("Unix socket of the server, or 'default' to search the usual locations")
                .env("MYSQL_MONITOR_SOCKET")
                .value_name("PATH")
                .conflicts_with("host-port"),
        )
        .arg(
            Arg::new("host-port")
                .long("host-port")
                .help("host[:port] of the server, or 'default' for localhost:3306")
                .env("MYSQL_MONITOR_HOSTPORT")
                .value_name("HOST[:PORT]"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .help("Database user")
                .env("MYSQL_MONITOR_USER"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .short('p')
                .help("Database password")
                .env("MYSQL_MONITOR_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new("interval")
                .long("interval")
                .short('i')
                .help("Seconds between sampling passes")
                .env("MYSQL_MONITOR_INTERVAL")
                .default_value("30")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("query-timeout")
                .long("query-timeout")
                .help("Deadline in seconds for every connect, query and close")
                .env("MYSQL_MONITOR_QUERY_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Where sampled metrics are written")
                .env("MYSQL_MONITOR_OUTPUT")
                .default_value("json")
                .value_parser(PossibleValuesParser::new(["json", "log"])),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase verbosity, -vv for debug")
                .action(ArgAction::Count),
        );

    collectors::add_collectors_args(cmd)
}
