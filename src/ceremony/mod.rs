//! # Authentication ceremony
//!
//! A ceremony is one user authentication attempt: one `begin` followed by any
//! number of `resume` calls, each driven by the host.
//!
//! ## Flow
//!
//! 1. `begin` asks the remote service to start an assertion request and
//!    returns the `CeremonyState` the host must persist plus the first view.
//! 2. Every `resume` reads that state back, polls the remote service exactly
//!    once and maps the status to a `PollOutcome`.
//! 3. `Completed`, `Cancelled` and `Error` are terminal. The host issues claims
//!    on success and must not resume a terminal ceremony again.
//!
//! The adapter keeps no state between calls. The only shared object is the
//! remote client, built once at startup and passed in as `Arc<C>`.

mod client;
mod context;
mod coordinator;
mod error;
mod initiator;
pub mod presentation;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use client::AssertionClient;
pub use context::{CeremonyContext, CeremonyData, KEY_REFERENCE, KEY_SUBJECT};
pub use coordinator::resume;
pub use error::{CeremonyError, ClientError};
pub use initiator::begin;
pub use types::{AssertionHandle, AssertionStatus, CeremonyState, PollOutcome, PresentationView};

use std::sync::Arc;

/// Entry points the host calls for every ceremony.
#[derive(Debug)]
pub struct Adapter<C> {
    client: Arc<C>,
}

impl<C> Clone for Adapter<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: AssertionClient> Adapter<C> {
    #[must_use]
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Every user may try; the remote service decides.
    #[must_use]
    pub fn is_available_for_user(&self, _subject_id: &str) -> bool {
        true
    }

    /// Start a ceremony.
    ///
    /// # Errors
    /// See [`begin`].
    pub async fn begin(
        &self,
        subject_id: &str,
    ) -> Result<(CeremonyState, PresentationView), CeremonyError> {
        begin(self.client.as_ref(), subject_id).await
    }

    /// Poll once for a ceremony.
    ///
    /// # Errors
    /// See [`resume`].
    pub async fn resume(&self, state: &CeremonyState) -> Result<PollOutcome, CeremonyError> {
        resume(self.client.as_ref(), state).await
    }

    /// Start a ceremony and record its state in `ctx`.
    ///
    /// The subject is written before the remote call so a failed initiation
    /// still leaves an identifiable context.
    ///
    /// # Errors
    /// See [`begin`].
    pub async fn begin_with_context(
        &self,
        ctx: &mut (impl CeremonyContext + Send),
        subject_id: &str,
    ) -> Result<PresentationView, CeremonyError> {
        ctx.set(KEY_SUBJECT, subject_id.to_string());
        let (state, view) = self.begin(subject_id).await?;
        state.store(ctx);
        Ok(view)
    }

    /// Resume the ceremony recorded in `ctx`.
    ///
    /// # Errors
    /// Returns `CeremonyError::CorruptedCeremony` if `ctx` lacks the subject or
    /// reference, otherwise see [`resume`].
    pub async fn resume_with_context(
        &self,
        ctx: &(impl CeremonyContext + Sync),
    ) -> Result<PollOutcome, CeremonyError> {
        let state = CeremonyState::load(ctx)?;
        self.resume(&state).await
    }

    /// View for a fault returned by `begin` or `resume`.
    #[must_use]
    pub fn on_error(&self, fault: &CeremonyError) -> PresentationView {
        presentation::select_fault(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeClient;
    use super::*;

    fn adapter(client: FakeClient) -> Adapter<FakeClient> {
        Adapter::new(Arc::new(client))
    }

    #[tokio::test]
    async fn begin_then_resume_through_context() -> Result<(), CeremonyError> {
        let adapter = adapter(FakeClient::new(
            Some(
                AssertionHandle::new(AssertionStatus::Initialized)
                    .with_reference("req-abc")
                    .with_code("123456")
                    .with_qr_payload("freja://start/abc"),
            ),
            Some(AssertionHandle::new(AssertionStatus::Completed)),
        ));
        let mut ctx = CeremonyData::new();

        let view = adapter
            .begin_with_context(&mut ctx, "alice@example.com")
            .await?;
        assert!(!view.is_error());
        assert_eq!(ctx.get(KEY_REFERENCE).as_deref(), Some("req-abc"));

        let outcome = adapter.resume_with_context(&ctx).await?;
        assert!(outcome.is_success());
        assert_eq!(adapter.client().poll_calls(), vec!["req-abc".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn failed_begin_leaves_corrupted_ceremony() -> Result<(), CeremonyError> {
        let adapter = adapter(FakeClient::new(
            Some(AssertionHandle::failed(
                AssertionStatus::Error,
                "USER_NOT_FOUND",
            )),
            Some(AssertionHandle::new(AssertionStatus::Completed)),
        ));
        let mut ctx = CeremonyData::new();

        let view = adapter.begin_with_context(&mut ctx, "bob").await?;
        assert_eq!(view, PresentationView::error("API-Error: USER_NOT_FOUND"));
        assert_eq!(ctx.get(KEY_SUBJECT).as_deref(), Some("bob"));
        assert_eq!(ctx.get(KEY_REFERENCE).as_deref(), Some(""));

        let result = adapter.resume_with_context(&ctx).await;
        assert!(matches!(result, Err(CeremonyError::CorruptedCeremony)));
        assert_eq!(adapter.client().poll_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn resume_on_empty_context_is_corrupted() {
        let adapter = adapter(FakeClient::polling(AssertionHandle::new(
            AssertionStatus::Completed,
        )));

        let result = adapter.resume_with_context(&CeremonyData::new()).await;

        assert!(matches!(result, Err(CeremonyError::CorruptedCeremony)));
        assert_eq!(adapter.client().poll_count(), 0);
    }

    #[test]
    fn on_error_renders_exception_view() {
        let adapter = adapter(FakeClient::default());
        assert!(adapter.is_available_for_user("anyone"));
        assert_eq!(
            adapter.on_error(&CeremonyError::CorruptedCeremony),
            PresentationView::error("Exception: Corrupted context.")
        );
    }
}
