//! Per-name locks that serialise the duplicate check and the add.
//!
//! Announcements for the same normalised name queue behind one another;
//! different names never contend. An entry lives in the map only while some
//! announcement holds or waits for it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as NameLock, OwnedMutexGuard};

#[derive(Debug)]
struct Entry {
    lock: Arc<NameLock<()>>,
    users: usize,
}

type Names = Arc<Mutex<HashMap<String, Entry>>>;

/// Normalised names whose announcements are between dedup and submission.
#[derive(Debug, Clone, Default)]
pub struct InflightNames {
    names: Names,
}

impl InflightNames {
    /// Empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other announcement holds `name`, then hold it.
    ///
    /// The name is released when the returned guard is dropped. Dropping the
    /// future while it waits also withdraws from the queue.
    pub async fn claim(&self, name: &str) -> InflightClaim {
        let name_lock = {
            let mut names = lock(&self.names);
            let entry = names.entry(name.to_string()).or_insert_with(|| Entry {
                lock: Arc::new(NameLock::new(())),
                users: 0,
            });
            entry.users += 1;
            Arc::clone(&entry.lock)
        };
        let mut claim = InflightClaim {
            names: Arc::clone(&self.names),
            name: name.to_string(),
            guard: None,
        };
        claim.guard = Some(name_lock.lock_owned().await);
        claim
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        lock(&self.names).len()
    }
}

/// Guard for a held name.
#[derive(Debug)]
pub struct InflightClaim {
    names: Names,
    name: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl InflightClaim {
    /// Held name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for InflightClaim {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut names = lock(&self.names);
        if let Some(entry) = names.get_mut(&self.name) {
            entry.users = entry.users.saturating_sub(1);
            if entry.users == 0 {
                names.remove(&self.name);
            }
        }
    }
}

// The table stays consistent even if a holder panicked mid-update.
fn lock(names: &Mutex<HashMap<String, Entry>>) -> MutexGuard<'_, HashMap<String, Entry>> {
    names.lock().unwrap_or_else(PoisonError::into_inner)
}
