use super::{
    presentation, AssertionClient, AssertionStatus, CeremonyError, CeremonyState,
    PresentationView,
};
use tracing::{info, instrument, warn};

/// Start a ceremony for `subject_id`.
///
/// Issues exactly one initiation call. A failed initiation is not retried; it
/// yields a state with no reference and an `ErrorView`.
///
/// # Errors
/// Returns `CeremonyError::Client` if the remote call fails and
/// `CeremonyError::MissingReference` if a pollable status came back without a
/// reference.
#[instrument(skip(client))]
pub async fn begin<C: AssertionClient>(
    client: &C,
    subject_id: &str,
) -> Result<(CeremonyState, PresentationView), CeremonyError> {
    let handle = client.initiate_request(subject_id).await?;

    let reference = if handle.status().is_failure() {
        warn!(
            status = %handle.status(),
            error_code = handle.error_code().unwrap_or_default(),
            "assertion request was not initialized"
        );
        None
    } else {
        let reference = handle
            .reference()
            .ok_or(CeremonyError::MissingReference)?
            .to_string();
        if *handle.status() != AssertionStatus::Initialized {
            warn!(status = %handle.status(), "unexpected status on initiation");
        }
        info!(status = %handle.status(), "assertion request initialized");
        Some(reference)
    };

    let view = presentation::select(&handle);

    Ok((CeremonyState::new(subject_id, reference), view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ceremony::testing::FakeClient;
    use crate::ceremony::AssertionHandle;

    #[tokio::test]
    async fn initialized_records_reference() -> Result<(), CeremonyError> {
        let client = FakeClient::initiating(
            AssertionHandle::new(AssertionStatus::Initialized)
                .with_reference("req-abc")
                .with_code("123456")
                .with_qr_payload("freja://start/abc"),
        );

        let (state, view) = begin(&client, "alice@example.com").await?;

        assert_eq!(state.subject_id(), "alice@example.com");
        assert_eq!(state.reference(), Some("req-abc"));
        assert_eq!(
            view,
            PresentationView::AuthView {
                code: "123456".to_string(),
                status: "Initialized".to_string(),
                qr_payload: "freja://start/abc".to_string(),
            }
        );
        assert_eq!(client.initiate_calls(), vec!["alice@example.com".to_string()]);
        assert_eq!(client.poll_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn failed_initiation_records_empty_reference() -> Result<(), CeremonyError> {
        for status in [AssertionStatus::Cancelled, AssertionStatus::Error] {
            let client = FakeClient::initiating(
                AssertionHandle::failed(status, "USER_NOT_FOUND").with_reference("ignored"),
            );

            let (state, view) = begin(&client, "alice@example.com").await?;

            assert_eq!(state.reference(), None);
            assert_eq!(view, PresentationView::error("API-Error: USER_NOT_FOUND"));
            assert_eq!(client.initiate_calls().len(), 1);
        }
        Ok(())
    }

    #[tokio::test]
    async fn initialized_without_reference_is_a_fault() {
        let client = FakeClient::initiating(AssertionHandle::new(AssertionStatus::Initialized));

        let result = begin(&client, "alice@example.com").await;

        assert!(matches!(result, Err(CeremonyError::MissingReference)));
    }

    #[tokio::test]
    async fn transport_failure_propagates_without_retry() {
        let client = FakeClient::failing_initiation();

        let result = begin(&client, "alice@example.com").await;

        assert!(matches!(result, Err(CeremonyError::Client(_))));
        assert_eq!(client.initiate_calls().len(), 1);
    }
}
