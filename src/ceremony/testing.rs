//! Scripted `AssertionClient` that records every call.

use super::{AssertionClient, AssertionHandle, ClientError};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub(crate) struct FakeClient {
    initiate: Option<AssertionHandle>,
    poll: Option<AssertionHandle>,
    initiate_calls: Mutex<Vec<String>>,
    poll_calls: Mutex<Vec<String>>,
}

impl FakeClient {
    /// `None` makes the corresponding call fail with a transport error.
    pub(crate) fn new(initiate: Option<AssertionHandle>, poll: Option<AssertionHandle>) -> Self {
        Self {
            initiate,
            poll,
            ..Self::default()
        }
    }

    pub(crate) fn initiating(handle: AssertionHandle) -> Self {
        Self::new(Some(handle), None)
    }

    pub(crate) fn polling(handle: AssertionHandle) -> Self {
        Self::new(None, Some(handle))
    }

    pub(crate) fn failing_initiation() -> Self {
        Self::new(None, None)
    }

    pub(crate) fn failing_poll() -> Self {
        Self::new(None, None)
    }

    pub(crate) fn initiate_calls(&self) -> Vec<String> {
        self.initiate_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn poll_calls(&self) -> Vec<String> {
        self.poll_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn poll_count(&self) -> usize {
        self.poll_calls().len()
    }
}

impl AssertionClient for FakeClient {
    async fn initiate_request(&self, subject_id: &str) -> Result<AssertionHandle, ClientError> {
        self.initiate_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subject_id.to_string());
        self.initiate
            .clone()
            .ok_or_else(|| ClientError::Transport("connection refused".to_string()))
    }

    async fn poll_request(&self, reference: &str) -> Result<AssertionHandle, ClientError> {
        self.poll_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reference.to_string());
        self.poll
            .clone()
            .ok_or_else(|| ClientError::Transport("connection refused".to_string()))
    }
}
