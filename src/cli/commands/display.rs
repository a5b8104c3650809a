use clap::{Arg, ArgMatches, Command};

pub const ARG_COMPANY_NAME: &str = "company-name";
pub const ARG_SUPPORT_EMAIL: &str = "support-email";

/// Strings shown on the sign in pages.
#[derive(Debug, Clone)]
pub struct Options {
    pub company_name: String,
    pub support_email: String,
}

impl Options {
    /// # Errors
    /// Returns an error if required arguments are missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_required = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        Ok(Self {
            company_name: read_required(ARG_COMPANY_NAME)?,
            support_email: read_required(ARG_SUPPORT_EMAIL)?,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COMPANY_NAME)
                .long(ARG_COMPANY_NAME)
                .help("Organization name shown on the sign in pages")
                .env("FREJAMFA_COMPANY_NAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_SUPPORT_EMAIL)
                .long(ARG_SUPPORT_EMAIL)
                .help("Support contact shown on the sign in pages")
                .env("FREJAMFA_SUPPORT_EMAIL")
                .required(true),
        )
}
