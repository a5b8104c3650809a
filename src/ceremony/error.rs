use thiserror::Error;

/// Failure of the remote assertion client call itself.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Protocol(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Faults surfaced to the host instead of a view.
///
/// Remote-reported failures (`Cancelled`/`Error`) are not faults; they are
/// mapped to an `ErrorView`.
#[derive(Debug, Error)]
pub enum CeremonyError {
    /// Ceremony context lost its subject or correlation reference.
    #[error("Corrupted context.")]
    CorruptedCeremony,
    /// Initiation reported a pollable status without a reference.
    #[error("remote service returned no correlation reference")]
    MissingReference,
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl CeremonyError {
    #[must_use]
    pub fn is_corrupted(&self) -> bool {
        matches!(self, Self::CorruptedCeremony)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupted_ceremony_message() {
        assert_eq!(
            CeremonyError::CorruptedCeremony.to_string(),
            "Corrupted context."
        );
        assert!(CeremonyError::CorruptedCeremony.is_corrupted());
    }

    #[test]
    fn client_errors_pass_through() {
        let err = CeremonyError::from(ClientError::Transport("connection refused".to_string()));
        assert_eq!(err.to_string(), "transport error: connection refused");
        assert!(!err.is_corrupted());
    }
}
