use crate::{
    api::{self, AppState, CeremonyStore},
    ceremony::Adapter,
    cli::telemetry,
    freja::{Environment, FrejaClient, FrejaConfig, IdType},
    render::Renderer,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub ceremony_ttl_seconds: u64,
    pub environment: String,
    pub endpoint: Option<String>,
    pub ca_cert_path: Option<String>,
    pub client_cert_path: Option<String>,
    pub client_cert_password: SecretString,
    pub id_type: String,
    pub attribute_list: String,
    pub minimum_level: String,
    pub default_country: String,
    pub freja_timeout_seconds: u64,
    pub company_name: String,
    pub support_email: String,
}

impl Args {
    /// Validate the Freja eID settings.
    ///
    /// # Errors
    /// Returns an error on an unknown environment, id type or level, or an invalid endpoint.
    pub fn freja_config(&self) -> Result<FrejaConfig> {
        let environment: Environment = self.environment.parse()?;

        let mut config = FrejaConfig::new(environment)
            .with_id_type(self.id_type.parse()?)
            .with_minimum_level(self.minimum_level.parse()?)
            .with_attribute_list(&self.attribute_list)
            .with_default_country(self.default_country.clone())
            .with_timeout_seconds(self.freja_timeout_seconds);

        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint)?;
        }

        if let Some(path) = &self.ca_cert_path {
            config = config.with_ca_cert_path(path.clone());
        }

        if let Some(path) = &self.client_cert_path {
            config = config.with_client_cert(path.clone(), self.client_cert_password.clone());
        }

        Ok(config)
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = args.freja_config().context("Invalid configuration data")?;

    info!(
        environment = ?config.environment(),
        endpoint = config.endpoint(),
        id_type = %config.id_type(),
        "Freja eID client configured"
    );

    let email_subjects = config.id_type() == IdType::Email;

    let client = FrejaClient::new(config).context("Invalid configuration data")?;

    let renderer = Renderer::new(args.company_name, args.support_email)?;

    let state = AppState::new(
        Adapter::new(Arc::new(client)),
        renderer,
        CeremonyStore::new(Duration::from_secs(args.ceremony_ttl_seconds)),
    )
    .with_email_subjects(email_subjects);

    let result = api::new(args.port, state).await;

    telemetry::shutdown_tracer();

    result
}
