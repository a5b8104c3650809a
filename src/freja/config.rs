//! Startup configuration for the Freja eID client.

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::{fmt, str::FromStr, time::Duration};
use url::Url;

pub const TEST_ENDPOINT: &str = "https://services.test.frejaeid.com";
pub const PROD_ENDPOINT: &str = "https://services.prod.frejaeid.com";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_COUNTRY: &str = "SE";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Testing,
    Production,
}

impl Environment {
    #[must_use]
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Self::Testing => TEST_ENDPOINT,
            Self::Production => PROD_ENDPOINT,
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "testing" | "test" => Ok(Self::Testing),
            "production" | "prod" => Ok(Self::Production),
            other => Err(anyhow!("unknown environment: {other}")),
        }
    }
}

/// How the subject identifier is presented to Freja eID (`userInfoType`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdType {
    Email,
    Ssn,
    Phone,
    Inferred,
}

impl IdType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Ssn => "SSN",
            Self::Phone => "PHONE",
            Self::Inferred => "INFERRED",
        }
    }
}

impl FromStr for IdType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_uppercase().as_str() {
            "EMAIL" => Ok(Self::Email),
            "SSN" => Ok(Self::Ssn),
            "PHONE" => Ok(Self::Phone),
            "INFERRED" => Ok(Self::Inferred),
            other => Err(anyhow!("unknown id type: {other}")),
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum registration level required of the user (`minRegistrationLevel`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationLevel {
    Basic,
    Extended,
    Plus,
}

impl RegistrationLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Extended => "EXTENDED",
            Self::Plus => "PLUS",
        }
    }
}

impl FromStr for RegistrationLevel {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_uppercase().as_str() {
            "BASIC" => Ok(Self::Basic),
            "EXTENDED" => Ok(Self::Extended),
            "PLUS" => Ok(Self::Plus),
            other => Err(anyhow!("unknown registration level: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FrejaConfig {
    environment: Environment,
    endpoint: String,
    id_type: IdType,
    minimum_level: RegistrationLevel,
    attributes: Vec<String>,
    default_country: String,
    ca_cert_path: Option<String>,
    client_cert_path: Option<String>,
    client_cert_password: SecretString,
    timeout: Duration,
}

impl FrejaConfig {
    /// Defaults for `environment`: its public endpoint, `EMAIL` ids, `BASIC`
    /// level, no attributes and no client certificate.
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            endpoint: environment.default_endpoint().to_string(),
            id_type: IdType::Email,
            minimum_level: RegistrationLevel::Basic,
            attributes: Vec::new(),
            default_country: DEFAULT_COUNTRY.to_string(),
            ca_cert_path: None,
            client_cert_path: None,
            client_cert_password: SecretString::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    /// Override the endpoint.
    ///
    /// # Errors
    /// Returns an error if `endpoint` is not an absolute http(s) URL.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint).with_context(|| format!("Invalid endpoint: {endpoint}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("Error parsing URL: unsupported scheme {}", url.scheme()));
        }
        self.endpoint = url.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    #[must_use]
    pub fn with_id_type(mut self, id_type: IdType) -> Self {
        self.id_type = id_type;
        self
    }

    #[must_use]
    pub fn with_minimum_level(mut self, level: RegistrationLevel) -> Self {
        self.minimum_level = level;
        self
    }

    /// Comma separated list, e.g. `EMAIL_ADDRESS,BASIC_USER_INFO`.
    #[must_use]
    pub fn with_attribute_list(mut self, list: &str) -> Self {
        self.attributes = list
            .split(',')
            .map(str::trim)
            .filter(|attribute| !attribute.is_empty())
            .map(str::to_uppercase)
            .collect();
        self
    }

    #[must_use]
    pub fn with_default_country(mut self, country: String) -> Self {
        self.default_country = country.trim().to_uppercase();
        self
    }

    #[must_use]
    pub fn with_ca_cert_path(mut self, path: String) -> Self {
        self.ca_cert_path = Some(path);
        self
    }

    #[must_use]
    pub fn with_client_cert(mut self, path: String, password: SecretString) -> Self {
        self.client_cert_path = Some(path);
        self.client_cert_password = password;
        self
    }

    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds.max(1));
        self
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn id_type(&self) -> IdType {
        self.id_type
    }

    #[must_use]
    pub fn minimum_level(&self) -> RegistrationLevel {
        self.minimum_level
    }

    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    #[must_use]
    pub fn default_country(&self) -> &str {
        &self.default_country
    }

    #[must_use]
    pub fn ca_cert_path(&self) -> Option<&str> {
        self.ca_cert_path.as_deref()
    }

    #[must_use]
    pub fn client_cert_path(&self) -> Option<&str> {
        self.client_cert_path.as_deref()
    }

    pub(crate) fn client_cert_password(&self) -> &SecretString {
        &self.client_cert_password
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL for an API path below the configured endpoint.
    pub(crate) fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }
}
