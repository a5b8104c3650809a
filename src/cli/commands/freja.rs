use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_ENDPOINT: &str = "freja-endpoint";
pub const ARG_CA_CERT_PATH: &str = "ca-cert-path";
pub const ARG_CLIENT_CERT_PATH: &str = "client-cert-path";
pub const ARG_CLIENT_CERT_PASSWORD: &str = "client-cert-password";
pub const ARG_ID_TYPE: &str = "id-type";
pub const ARG_ATTRIBUTE_LIST: &str = "attribute-list";
pub const ARG_MINIMUM_LEVEL: &str = "minimum-level";
pub const ARG_DEFAULT_COUNTRY: &str = "default-country";
pub const ARG_TIMEOUT: &str = "freja-timeout-seconds";

/// Raw Freja eID settings; validated when the client is built.
#[derive(Debug, Clone)]
pub struct Options {
    pub environment: String,
    pub endpoint: Option<String>,
    pub ca_cert_path: Option<String>,
    pub client_cert_path: Option<String>,
    pub client_cert_password: SecretString,
    pub id_type: String,
    pub attribute_list: String,
    pub minimum_level: String,
    pub default_country: String,
    pub timeout_seconds: u64,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let read = |id: &str| matches.get_one::<String>(id).cloned();
        let read_or = |id: &str, default: &str| read(id).unwrap_or_else(|| default.to_string());

        Self {
            environment: read_or(ARG_ENVIRONMENT, "testing"),
            endpoint: read(ARG_ENDPOINT).filter(|v| !v.trim().is_empty()),
            ca_cert_path: read(ARG_CA_CERT_PATH).filter(|v| !v.trim().is_empty()),
            client_cert_path: read(ARG_CLIENT_CERT_PATH).filter(|v| !v.trim().is_empty()),
            client_cert_password: SecretString::from(read_or(ARG_CLIENT_CERT_PASSWORD, "")),
            id_type: read_or(ARG_ID_TYPE, "EMAIL"),
            attribute_list: read_or(ARG_ATTRIBUTE_LIST, ""),
            minimum_level: read_or(ARG_MINIMUM_LEVEL, "BASIC"),
            default_country: read_or(ARG_DEFAULT_COUNTRY, "SE"),
            timeout_seconds: matches.get_one::<u64>(ARG_TIMEOUT).copied().unwrap_or(10),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_connection_args(command);
    with_request_args(command)
}

fn with_connection_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Freja eID environment: testing or production")
                .env("FREJAMFA_ENVIRONMENT")
                .default_value("testing"),
        )
        .arg(
            Arg::new(ARG_ENDPOINT)
                .long(ARG_ENDPOINT)
                .help("Override the Freja eID services URL of the environment")
                .env("FREJAMFA_FREJA_ENDPOINT"),
        )
        .arg(
            Arg::new(ARG_CA_CERT_PATH)
                .long(ARG_CA_CERT_PATH)
                .help("Path to the Freja eID server CA certificate (PEM)")
                .env("FREJAMFA_CA_CERT_PATH"),
        )
        .arg(
            Arg::new(ARG_CLIENT_CERT_PATH)
                .long(ARG_CLIENT_CERT_PATH)
                .help("Path to the relying party client certificate (PKCS#12)")
                .env("FREJAMFA_CLIENT_CERT_PATH"),
        )
        .arg(
            Arg::new(ARG_CLIENT_CERT_PASSWORD)
                .long(ARG_CLIENT_CERT_PASSWORD)
                .help("Password of the client certificate")
                .env("FREJAMFA_CLIENT_CERT_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Timeout in seconds for each Freja eID request")
                .env("FREJAMFA_FREJA_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
}

fn with_request_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ID_TYPE)
                .long(ARG_ID_TYPE)
                .help("How the user identifier is sent: EMAIL, SSN, PHONE or INFERRED")
                .env("FREJAMFA_ID_TYPE")
                .default_value("EMAIL"),
        )
        .arg(
            Arg::new(ARG_ATTRIBUTE_LIST)
                .long(ARG_ATTRIBUTE_LIST)
                .help("Comma separated user attributes to request, e.g. EMAIL_ADDRESS,BASIC_USER_INFO")
                .env("FREJAMFA_ATTRIBUTE_LIST"),
        )
        .arg(
            Arg::new(ARG_MINIMUM_LEVEL)
                .long(ARG_MINIMUM_LEVEL)
                .help("Minimum registration level: BASIC, EXTENDED or PLUS")
                .env("FREJAMFA_MINIMUM_LEVEL")
                .default_value("BASIC"),
        )
        .arg(
            Arg::new(ARG_DEFAULT_COUNTRY)
                .long(ARG_DEFAULT_COUNTRY)
                .help("Country used when the id type is SSN")
                .env("FREJAMFA_DEFAULT_COUNTRY")
                .default_value("SE"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn options_from_env() {
        temp_env::with_vars(
            [
                ("FREJAMFA_ENVIRONMENT", Some("production")),
                ("FREJAMFA_FREJA_ENDPOINT", Some("https://freja.internal")),
                ("FREJAMFA_CLIENT_CERT_PATH", Some("/etc/frejamfa/client.p12")),
                ("FREJAMFA_CLIENT_CERT_PASSWORD", Some("changeit")),
                ("FREJAMFA_ID_TYPE", Some("SSN")),
                ("FREJAMFA_FREJA_TIMEOUT_SECONDS", Some("3")),
            ],
            || {
                let matches = with_args(Command::new("frejamfa")).get_matches_from(vec!["frejamfa"]);
                let options = Options::parse(&matches);

                assert_eq!(options.environment, "production");
                assert_eq!(options.endpoint.as_deref(), Some("https://freja.internal"));
                assert_eq!(
                    options.client_cert_path.as_deref(),
                    Some("/etc/frejamfa/client.p12")
                );
                assert_eq!(options.client_cert_password.expose_secret(), "changeit");
                assert_eq!(options.id_type, "SSN");
                assert_eq!(options.timeout_seconds, 3);
                assert!(options.ca_cert_path.is_none());
            },
        );
    }

    #[test]
    fn password_is_not_printed() {
        temp_env::with_vars(
            [("FREJAMFA_CLIENT_CERT_PASSWORD", Some("changeit"))],
            || {
                let matches = with_args(Command::new("frejamfa")).get_matches_from(vec!["frejamfa"]);
                let options = Options::parse(&matches);
                assert!(!format!("{options:?}").contains("changeit"));
            },
        );
    }
}
