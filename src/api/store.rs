//! In-memory ceremony contexts, one per in-flight sign in.
//!
//! Entries older than the TTL are treated as abandoned: lookups ignore them and
//! every insert prunes them.

use crate::ceremony::CeremonyData;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use ulid::Ulid;

pub const DEFAULT_CEREMONY_TTL_SECONDS: u64 = 5 * 60;

struct Entry {
    data: CeremonyData,
    created_at: Instant,
}

pub struct CeremonyStore {
    ttl: Duration,
    entries: Mutex<HashMap<Ulid, Entry>>,
}

impl CeremonyStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, data: CeremonyData) -> Ulid {
        let id = Ulid::new();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.created_at.elapsed() < self.ttl);
        entries.insert(
            id,
            Entry {
                data,
                created_at: Instant::now(),
            },
        );
        id
    }

    pub async fn get(&self, id: Ulid) -> Option<CeremonyData> {
        let entries = self.entries.lock().await;
        entries
            .get(&id)
            .filter(|entry| entry.created_at.elapsed() < self.ttl)
            .map(|entry| entry.data.clone())
    }

    pub async fn remove(&self, id: Ulid) -> bool {
        self.entries.lock().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for CeremonyStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CEREMONY_TTL_SECONDS))
    }
}
