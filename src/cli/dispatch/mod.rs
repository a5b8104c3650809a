//! Maps validated CLI matches to the action to run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{display, freja, host};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or blank.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let host_opts = host::Options::parse(matches);
    let freja_opts = freja::Options::parse(matches);
    let display_opts = display::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port: host_opts.port,
        ceremony_ttl_seconds: host_opts.ceremony_ttl_seconds,
        environment: freja_opts.environment,
        endpoint: freja_opts.endpoint,
        ca_cert_path: freja_opts.ca_cert_path,
        client_cert_path: freja_opts.client_cert_path,
        client_cert_password: freja_opts.client_cert_password,
        id_type: freja_opts.id_type,
        attribute_list: freja_opts.attribute_list,
        minimum_level: freja_opts.minimum_level,
        default_country: freja_opts.default_country,
        freja_timeout_seconds: freja_opts.timeout_seconds,
        company_name: display_opts.company_name,
        support_email: display_opts.support_email,
    }))
}
