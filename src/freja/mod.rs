//! Freja eID relying-party client.
//!
//! Requests are `POST`ed with a single `name=<base64(JSON)>` body and answered
//! with JSON. Mutual TLS is used when a PKCS#12 client certificate is
//! configured.
//!
//! A `4xx` answer carrying a Freja `{code, message}` body is a remote-reported
//! failure and becomes an `Error` status. Everything else that goes wrong
//! (connect, timeout, `5xx`, undecodable body) is a `ClientError`. Nothing is
//! retried here.

pub mod config;

pub use config::{Environment, FrejaConfig, IdType, RegistrationLevel};

use crate::{
    ceremony::{AssertionClient, AssertionHandle, AssertionStatus, ClientError},
    APP_USER_AGENT,
};
use base64ct::{Base64, Encoding};
use reqwest::{header::CONTENT_TYPE, Certificate, Client, Identity};
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use std::fs;
use tracing::{debug, instrument, warn};

const INIT_AUTH_PATH: &str = "/authentication/1.0/initAuthentication";
const GET_ONE_RESULT_PATH: &str = "/authentication/1.0/getOneResult";
const AUTOSTART_PREFIX: &str = "frejaeid://bindUserToTransaction?transactionReference=";
const NOT_DELIVERED: &str = "pending_notdelivered";

enum Reply {
    Accepted(Value),
    Rejected(String),
}

#[derive(Clone, Debug)]
pub struct FrejaClient {
    http: Client,
    config: FrejaConfig,
}

impl FrejaClient {
    /// Build the shared HTTP client from `config`.
    ///
    /// # Errors
    /// Returns `ClientError::Configuration` if a certificate cannot be read or
    /// parsed, or the TLS backend rejects the settings.
    pub fn new(config: FrejaConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout());

        if let Some(path) = config.ca_cert_path() {
            let pem = fs::read(path)
                .map_err(|e| ClientError::Configuration(format!("{path}: {e}")))?;
            let certificate = Certificate::from_pem(&pem)
                .map_err(|e| ClientError::Configuration(format!("{path}: {e}")))?;
            builder = builder.add_root_certificate(certificate);
        }

        if let Some(path) = config.client_cert_path() {
            let der = fs::read(path)
                .map_err(|e| ClientError::Configuration(format!("{path}: {e}")))?;
            let identity =
                Identity::from_pkcs12_der(&der, config.client_cert_password().expose_secret())
                    .map_err(|e| ClientError::Configuration(format!("{path}: {e}")))?;
            builder = builder.identity(identity);
        }

        let http = builder
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self { http, config })
    }

    fn user_info(&self, subject_id: &str) -> String {
        match self.config.id_type() {
            IdType::Ssn => {
                let ssn = json!({
                    "country": self.config.default_country(),
                    "ssn": subject_id,
                });
                Base64::encode_string(ssn.to_string().as_bytes())
            }
            IdType::Email | IdType::Phone | IdType::Inferred => subject_id.to_string(),
        }
    }

    fn init_payload(&self, subject_id: &str) -> Value {
        let mut payload = json!({
            "userInfoType": self.config.id_type().as_str(),
            "userInfo": self.user_info(subject_id),
            "minRegistrationLevel": self.config.minimum_level().as_str(),
        });

        if !self.config.attributes().is_empty() {
            payload["attributesToReturn"] = self
                .config
                .attributes()
                .iter()
                .map(|attribute| json!({ "attribute": attribute }))
                .collect();
        }

        payload
    }

    async fn call(&self, path: &str, field: &str, payload: &Value) -> Result<Reply, ClientError> {
        let url = self.config.endpoint_url(path);
        let body = format!(
            "{field}={}",
            Base64::encode_string(payload.to_string().as_bytes())
        );

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();

        if status.is_client_error() {
            let json_response: Value = response.json().await.unwrap_or(Value::Null);
            let code = api_error_code(&json_response)
                .ok_or_else(|| ClientError::Protocol(format!("{url} - {status}")))?;

            warn!(
                %status,
                code = %code,
                message = json_response["message"].as_str().unwrap_or_default(),
                "request rejected by Freja eID"
            );

            return Ok(Reply::Rejected(code));
        }

        if !status.is_success() {
            return Err(ClientError::Transport(format!("{url} - {status}")));
        }

        Ok(Reply::Accepted(response.json().await?))
    }
}

impl AssertionClient for FrejaClient {
    #[instrument(skip(self))]
    async fn initiate_request(&self, subject_id: &str) -> Result<AssertionHandle, ClientError> {
        let payload = self.init_payload(subject_id);

        match self.call(INIT_AUTH_PATH, "initAuthRequest", &payload).await? {
            Reply::Rejected(code) => Ok(AssertionHandle::failed(AssertionStatus::Error, code)),
            Reply::Accepted(json_response) => {
                let auth_ref = json_response["authRef"].as_str().ok_or_else(|| {
                    ClientError::Protocol("Error parsing JSON response: no authRef found".into())
                })?;

                debug!("authentication request initialized");

                Ok(AssertionHandle::new(AssertionStatus::Initialized)
                    .with_reference(auth_ref)
                    .with_code(NOT_DELIVERED)
                    .with_qr_payload(autostart_url(auth_ref)))
            }
        }
    }

    #[instrument(skip(self, reference))]
    async fn poll_request(&self, reference: &str) -> Result<AssertionHandle, ClientError> {
        let payload = json!({ "authRef": reference });

        match self
            .call(GET_ONE_RESULT_PATH, "getOneAuthResultRequest", &payload)
            .await?
        {
            Reply::Rejected(code) => Ok(AssertionHandle::failed(AssertionStatus::Error, code)
                .with_reference(reference)),
            Reply::Accepted(json_response) => {
                let status = json_response["status"].as_str().ok_or_else(|| {
                    ClientError::Protocol("Error parsing JSON response: no status found".into())
                })?;

                debug!(status, "authentication result received");

                Ok(result_handle(reference, status))
            }
        }
    }
}

/// Deep link the Freja eID app opens for a transaction; also the QR payload.
#[must_use]
pub fn autostart_url(auth_ref: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(auth_ref.as_bytes()).collect();
    format!("{AUTOSTART_PREFIX}{encoded}")
}

fn result_handle(reference: &str, status: &str) -> AssertionHandle {
    let pending = |code: &str| {
        AssertionHandle::new(AssertionStatus::Pending)
            .with_reference(reference)
            .with_code(code)
            .with_qr_payload(autostart_url(reference))
    };

    match status {
        "STARTED" => pending(NOT_DELIVERED),
        "DELIVERED_TO_MOBILE" => pending("pending_delivered"),
        "OPENED" => pending("pending_user_in_app"),
        "APPROVED" => AssertionHandle::new(AssertionStatus::Completed).with_reference(reference),
        "CANCELED" => AssertionHandle::failed(AssertionStatus::Cancelled, "cancelled_by_user"),
        "RP_CANCELED" => AssertionHandle::failed(AssertionStatus::Cancelled, "cancelled_by_idp"),
        "EXPIRED" => AssertionHandle::failed(AssertionStatus::Error, "expired_transaction"),
        "REJECTED" => AssertionHandle::failed(AssertionStatus::Error, "rejected"),
        other => AssertionHandle::new(AssertionStatus::Unrecognized(other.to_string()))
            .with_reference(reference),
    }
}

fn api_error_code(json: &Value) -> Option<String> {
    match &json["code"] {
        Value::Number(code) => Some(code.to_string()),
        Value::String(code) if !code.is_empty() => Some(code.clone()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::net::TcpListener;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(server: &MockServer, config: FrejaConfig) -> Result<FrejaClient> {
        Ok(FrejaClient::new(config.with_endpoint(&server.uri())?)?)
    }

    fn encoded(field: &str, payload: &Value) -> String {
        format!(
            "{field}={}",
            Base64::encode_string(payload.to_string().as_bytes())
        )
    }

    #[test]
    fn autostart_url_encodes_reference() {
        assert_eq!(
            autostart_url("abc+/="),
            "frejaeid://bindUserToTransaction?transactionReference=abc%2B%2F%3D"
        );
    }

    #[test]
    fn result_statuses_map_to_assertion_statuses() {
        let cases = [
            ("STARTED", AssertionStatus::Pending, Some("pending_notdelivered"), None),
            ("DELIVERED_TO_MOBILE", AssertionStatus::Pending, Some("pending_delivered"), None),
            ("OPENED", AssertionStatus::Pending, Some("pending_user_in_app"), None),
            ("APPROVED", AssertionStatus::Completed, None, None),
            ("CANCELED", AssertionStatus::Cancelled, None, Some("cancelled_by_user")),
            ("RP_CANCELED", AssertionStatus::Cancelled, None, Some("cancelled_by_idp")),
            ("EXPIRED", AssertionStatus::Error, None, Some("expired_transaction")),
            ("REJECTED", AssertionStatus::Error, None, Some("rejected")),
        ];

        for (remote, status, code, error_code) in cases {
            let handle = result_handle("ref", remote);
            assert_eq!(handle.status(), &status, "{remote}");
            assert_eq!(handle.code(), code, "{remote}");
            assert_eq!(handle.error_code(), error_code, "{remote}");

            if status == AssertionStatus::Pending {
                assert_eq!(handle.reference(), Some("ref"), "{remote}");
                assert_eq!(handle.qr_payload(), Some(autostart_url("ref").as_str()));
            }
        }

        let handle = result_handle("ref", "SOMETHING_NEW");
        assert_eq!(
            handle.status(),
            &AssertionStatus::Unrecognized("SOMETHING_NEW".to_string())
        );
        assert_eq!(handle.error_code(), None);
    }

    #[test]
    fn ssn_user_info_is_wrapped() -> Result<()> {
        let client = FrejaClient::new(
            FrejaConfig::new(Environment::Testing)
                .with_id_type(IdType::Ssn)
                .with_default_country("se".to_string()),
        )?;

        let decoded = Base64::decode_vec(&client.user_info("197001011234")).unwrap();
        let json: Value = serde_json::from_slice(&decoded)?;
        assert_eq!(json, json!({"country": "SE", "ssn": "197001011234"}));
        Ok(())
    }

    #[test]
    fn init_payload_lists_attributes() -> Result<()> {
        let client = FrejaClient::new(
            FrejaConfig::new(Environment::Testing)
                .with_minimum_level(RegistrationLevel::Extended)
                .with_attribute_list("EMAIL_ADDRESS,BASIC_USER_INFO"),
        )?;

        assert_eq!(
            client.init_payload("alice@example.com"),
            json!({
                "userInfoType": "EMAIL",
                "userInfo": "alice@example.com",
                "minRegistrationLevel": "EXTENDED",
                "attributesToReturn": [
                    {"attribute": "EMAIL_ADDRESS"},
                    {"attribute": "BASIC_USER_INFO"}
                ]
            })
        );
        Ok(())
    }

    #[test]
    fn missing_client_certificate_is_a_configuration_error() {
        let config = FrejaConfig::new(Environment::Testing).with_client_cert(
            "/nonexistent/frejamfa-client.p12".to_string(),
            "secret".to_string().into(),
        );
        assert!(matches!(
            FrejaClient::new(config),
            Err(ClientError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn initiate_returns_initialized_handle() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let expected = encoded(
            "initAuthRequest",
            &json!({
                "userInfoType": "EMAIL",
                "userInfo": "alice@example.com",
                "minRegistrationLevel": "BASIC",
            }),
        );
        Mock::given(method("POST"))
            .and(path(INIT_AUTH_PATH))
            .and(header("content-type", "application/json"))
            .and(body_string(expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"authRef": "req-abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, FrejaConfig::new(Environment::Testing))?;
        let handle = client.initiate_request("alice@example.com").await?;

        assert_eq!(handle.status(), &AssertionStatus::Initialized);
        assert_eq!(handle.reference(), Some("req-abc"));
        assert_eq!(handle.code(), Some("pending_notdelivered"));
        assert_eq!(
            handle.qr_payload(),
            Some("frejaeid://bindUserToTransaction?transactionReference=req-abc")
        );
        assert_eq!(handle.error_code(), None);
        Ok(())
    }

    #[tokio::test]
    async fn initiate_rejection_is_remote_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(INIT_AUTH_PATH))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "code": 1100,
                "message": "Invalid or missing userInfoType."
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, FrejaConfig::new(Environment::Testing))?;
        let handle = client.initiate_request("alice@example.com").await?;

        assert_eq!(handle.status(), &AssertionStatus::Error);
        assert_eq!(handle.error_code(), Some("1100"));
        assert_eq!(handle.reference(), None);
        Ok(())
    }

    #[tokio::test]
    async fn initiate_server_error_is_transport_fault() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(INIT_AUTH_PATH))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, FrejaConfig::new(Environment::Testing))?;
        let result = client.initiate_request("alice@example.com").await;

        assert!(matches!(result, Err(ClientError::Transport(_))));
        Ok(())
    }

    #[tokio::test]
    async fn initiate_without_auth_ref_is_protocol_fault() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(INIT_AUTH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server, FrejaConfig::new(Environment::Testing))?;
        let result = client.initiate_request("alice@example.com").await;

        assert!(matches!(result, Err(ClientError::Protocol(_))));
        Ok(())
    }

    #[tokio::test]
    async fn poll_maps_delivered_to_pending() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GET_ONE_RESULT_PATH))
            .and(body_string(encoded(
                "getOneAuthResultRequest",
                &json!({"authRef": "req-abc"}),
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "authRef": "req-abc",
                "status": "DELIVERED_TO_MOBILE"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, FrejaConfig::new(Environment::Testing))?;
        let handle = client.poll_request("req-abc").await?;

        assert_eq!(handle.status(), &AssertionStatus::Pending);
        assert_eq!(handle.code(), Some("pending_delivered"));
        assert_eq!(
            handle.qr_payload(),
            Some("frejaeid://bindUserToTransaction?transactionReference=req-abc")
        );
        Ok(())
    }

    #[tokio::test]
    async fn poll_maps_approved_to_completed() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GET_ONE_RESULT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "authRef": "req-abc",
                "status": "APPROVED",
                "details": "eyJhbGciOiJSUzI1NiJ9.e30.c2ln"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, FrejaConfig::new(Environment::Testing))?;
        let handle = client.poll_request("req-abc").await?;

        assert_eq!(handle.status(), &AssertionStatus::Completed);
        Ok(())
    }

    #[tokio::test]
    async fn poll_rejection_is_remote_error_with_reference() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GET_ONE_RESULT_PATH))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "code": 1100,
                "message": "Invalid or missing authRef."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, FrejaConfig::new(Environment::Testing))?;
        let handle = client.poll_request("req-abc").await?;

        assert_eq!(handle.status(), &AssertionStatus::Error);
        assert_eq!(handle.error_code(), Some("1100"));
        assert_eq!(handle.reference(), Some("req-abc"));
        Ok(())
    }

    #[tokio::test]
    async fn poll_client_error_without_code_is_protocol_fault() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GET_ONE_RESULT_PATH))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, FrejaConfig::new(Environment::Testing))?;
        let result = client.poll_request("req-abc").await;

        assert!(matches!(result, Err(ClientError::Protocol(_))));
        Ok(())
    }

    #[tokio::test]
    async fn poll_undecodable_body_is_protocol_fault() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GET_ONE_RESULT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, FrejaConfig::new(Environment::Testing))?;
        let result = client.poll_request("req-abc").await;

        assert!(matches!(result, Err(ClientError::Protocol(_))));
        Ok(())
    }
}
