//! Host-provided key/value bag scoped to one ceremony.

use super::{CeremonyError, CeremonyState};
use std::collections::HashMap;

pub const KEY_SUBJECT: &str = "upn";
pub const KEY_REFERENCE: &str = "authref";

pub trait CeremonyContext {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory context bag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CeremonyData(HashMap<String, String>);

impl CeremonyData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CeremonyContext for CeremonyData {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }
}

impl CeremonyState {
    /// Write the subject and reference; a missing reference is stored as `""`.
    pub fn store(&self, ctx: &mut impl CeremonyContext) {
        ctx.set(KEY_SUBJECT, self.subject_id().to_string());
        ctx.set(
            KEY_REFERENCE,
            self.reference().unwrap_or_default().to_string(),
        );
    }

    /// Read back what `store` wrote.
    ///
    /// # Errors
    /// Returns `CeremonyError::CorruptedCeremony` if either key is missing.
    pub fn load(ctx: &impl CeremonyContext) -> Result<Self, CeremonyError> {
        let subject_id = ctx
            .get(KEY_SUBJECT)
            .ok_or(CeremonyError::CorruptedCeremony)?;
        let reference = ctx
            .get(KEY_REFERENCE)
            .ok_or(CeremonyError::CorruptedCeremony)?;

        Ok(Self::new(subject_id, Some(reference)))
    }
}
