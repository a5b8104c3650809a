use super::{AssertionHandle, ClientError};
use std::future::Future;

/// Remote identity-assertion service.
///
/// One instance is built at startup and shared by every ceremony, so
/// implementations must be safe to call concurrently.
pub trait AssertionClient: Send + Sync {
    /// Start a new assertion request for `subject_id`.
    fn initiate_request(
        &self,
        subject_id: &str,
    ) -> impl Future<Output = Result<AssertionHandle, ClientError>> + Send;

    /// Query the current status of the request identified by `reference`.
    fn poll_request(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<AssertionHandle, ClientError>> + Send;
}
