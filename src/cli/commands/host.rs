use clap::{Arg, ArgMatches, Command};

pub const ARG_PORT: &str = "port";
pub const ARG_CEREMONY_TTL: &str = "ceremony-ttl-seconds";

#[derive(Debug, Clone)]
pub struct Options {
    pub port: u16,
    pub ceremony_ttl_seconds: u64,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            port: matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080),
            ceremony_ttl_seconds: matches
                .get_one::<u64>(ARG_CEREMONY_TTL)
                .copied()
                .unwrap_or(300),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("FREJAMFA_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_CEREMONY_TTL)
                .long(ARG_CEREMONY_TTL)
                .help("Seconds an unfinished ceremony is kept before it is treated as abandoned")
                .default_value("300")
                .env("FREJAMFA_CEREMONY_TTL_SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
