//! Values exchanged between the remote assertion client, the state machine and
//! the host.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Status reported by the remote assertion service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssertionStatus {
    /// Request accepted, waiting for the user to act.
    Initialized,
    /// Still waiting, already polled at least once.
    Pending,
    /// User approved the request.
    Completed,
    /// User or service aborted the request.
    Cancelled,
    /// Remote service reported a failure.
    Error,
    /// Status string the client could not map. Never terminal.
    Unrecognized(String),
}

impl AssertionStatus {
    /// `Completed`, `Cancelled` and `Error` end a ceremony.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Error)
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Error)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Initialized => "Initialized",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Error => "Error",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for AssertionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of initiating or polling a remote assertion request.
///
/// Built once by the client and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionHandle {
    status: AssertionStatus,
    reference: Option<String>,
    code: Option<String>,
    qr_payload: Option<String>,
    error_code: Option<String>,
}

impl AssertionHandle {
    #[must_use]
    pub fn new(status: AssertionStatus) -> Self {
        Self {
            status,
            reference: None,
            code: None,
            qr_payload: None,
            error_code: None,
        }
    }

    /// A remote-reported failure carrying the service's error code.
    #[must_use]
    pub fn failed(status: AssertionStatus, error_code: impl Into<String>) -> Self {
        Self::new(status).with_error_code(error_code)
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_qr_payload(mut self, qr_payload: impl Into<String>) -> Self {
        self.qr_payload = Some(qr_payload.into());
        self
    }

    #[must_use]
    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    #[must_use]
    pub fn status(&self) -> &AssertionStatus {
        &self.status
    }

    /// Correlation reference, ignoring empty strings.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    #[must_use]
    pub fn qr_payload(&self) -> Option<&str> {
        self.qr_payload.as_deref()
    }

    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }
}

/// Durable record round-tripped through the host between `begin` and every
/// `resume`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyState {
    subject_id: String,
    reference: Option<String>,
}

impl CeremonyState {
    /// Empty references collapse to `None`.
    #[must_use]
    pub fn new(subject_id: impl Into<String>, reference: Option<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            reference: reference.filter(|r| !r.is_empty()),
        }
    }

    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// View descriptor handed to the rendering collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresentationView {
    /// Non-terminal: lets the user continue or retry.
    AuthView {
        code: String,
        status: String,
        qr_payload: String,
    },
    /// Terminal failure or adapter fault.
    ErrorView { message: String },
}

impl PresentationView {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::ErrorView {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::ErrorView { .. })
    }
}

/// Result of one `resume` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The ceremony is over; do not resume it again.
    Terminal {
        success: bool,
        view: Option<PresentationView>,
    },
    /// Still in progress; show the view and resume later.
    Continue(PresentationView),
}

impl PollOutcome {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Terminal { success: true, .. })
    }

    #[must_use]
    pub fn view(&self) -> Option<&PresentationView> {
        match self {
            Self::Terminal { view, .. } => view.as_ref(),
            Self::Continue(view) => Some(view),
        }
    }
}
