//! Maps assertion results and adapter faults to view descriptors.
//!
//! Pure functions: the initiator and the poll coordinator both go through
//! here so the same remote state always renders the same view.

use super::{AssertionHandle, AssertionStatus, CeremonyError, PresentationView};

/// View for a handle.
///
/// An error code wins over everything else, even when a QR payload is also
/// present.
#[must_use]
pub fn select(handle: &AssertionHandle) -> PresentationView {
    if let Some(code) = handle.error_code() {
        return api_error(code);
    }

    match handle.status() {
        AssertionStatus::Cancelled | AssertionStatus::Error => {
            api_error(&handle.status().as_str().to_lowercase())
        }
        AssertionStatus::Unrecognized(raw) => api_error(&format!("unrecognized status {raw}")),
        AssertionStatus::Initialized | AssertionStatus::Pending | AssertionStatus::Completed => {
            PresentationView::AuthView {
                code: handle.code().unwrap_or_default().to_string(),
                status: handle.status().to_string(),
                qr_payload: handle.qr_payload().unwrap_or_default().to_string(),
            }
        }
    }
}

/// View the host shows when `begin`/`resume` fail outright.
#[must_use]
pub fn select_fault(fault: &CeremonyError) -> PresentationView {
    PresentationView::error(format!("Exception: {fault}"))
}

fn api_error(code: &str) -> PresentationView {
    PresentationView::error(format!("API-Error: {code}"))
}
