use super::{
    presentation, AssertionClient, AssertionStatus, CeremonyError, CeremonyState, PollOutcome,
};
use tracing::{info, instrument, warn};

/// Poll the remote service once for the ceremony in `state`.
///
/// Never loops and never retries; the host decides when to call again.
/// Feeding the same remote result twice yields the same outcome.
///
/// # Errors
/// Returns `CeremonyError::CorruptedCeremony` without contacting the remote
/// service if `state` has no reference, and `CeremonyError::Client` if the
/// poll itself fails.
#[instrument(skip(client, state), fields(subject_id = state.subject_id()))]
pub async fn resume<C: AssertionClient>(
    client: &C,
    state: &CeremonyState,
) -> Result<PollOutcome, CeremonyError> {
    let Some(reference) = state.reference() else {
        warn!("ceremony has no correlation reference");
        return Err(CeremonyError::CorruptedCeremony);
    };

    let handle = client.poll_request(reference).await?;

    let outcome = match handle.status() {
        AssertionStatus::Completed => PollOutcome::Terminal {
            success: true,
            view: None,
        },
        AssertionStatus::Cancelled | AssertionStatus::Error => PollOutcome::Terminal {
            success: false,
            view: Some(presentation::select(&handle)),
        },
        AssertionStatus::Initialized | AssertionStatus::Pending => {
            PollOutcome::Continue(presentation::select(&handle))
        }
        AssertionStatus::Unrecognized(raw) => {
            warn!(status = %raw, "unrecognized remote status, treating as pending");
            PollOutcome::Continue(presentation::select(&handle))
        }
    };

    info!(
        status = %handle.status(),
        terminal = outcome.is_terminal(),
        success = outcome.is_success(),
        "polled assertion request"
    );

    Ok(outcome)
}
