//! Client registry
//!
//! The process-wide directory of online handles. Every operation takes the
//! same lock, so `register` checks and inserts in one step and readers only
//! ever see whole entries. The lock is a blocking mutex held for map access
//! only, never across an `.await`, which lets session cleanup run from `Drop`.

use crate::client::profile::{Outbound, UserProfile};
use crate::error::RegistryError;
use log::debug;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct RegistryState {
    users: HashMap<String, UserProfile>,
    next_session_id: u64,
}

/// Shared handle to the registry; clones refer to the same directory.
#[derive(Clone, Default)]
pub struct Registry {
    state: Arc<Mutex<RegistryState>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // No critical section panics mid-update, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admits `handle` bound to `outbound`, or fails without mutating if the
    /// handle is already held.
    pub fn register(&self, handle: &str, outbound: Outbound) -> Result<UserProfile, RegistryError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let session_id = state.next_session_id;

        match state.users.entry(handle.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateHandle(handle.to_string())),
            Entry::Vacant(slot) => {
                let profile = UserProfile::new(handle.to_string(), session_id, outbound);
                slot.insert(profile.clone());
                state.next_session_id += 1;
                debug!("Registered {} as session {}", handle, session_id);
                Ok(profile)
            }
        }
    }

    /// Deletes `handle` if present. Idempotent.
    pub fn remove(&self, handle: &str) {
        if self.lock().users.remove(handle).is_some() {
            debug!("Removed {}", handle);
        }
    }

    /// Removes the entry for `profile` only while it still belongs to that
    /// session. Returns whether an entry was removed.
    pub fn release(&self, profile: &UserProfile) -> bool {
        let mut state = self.lock();
        let owned = state
            .users
            .get(profile.handle())
            .is_some_and(|current| current.session_id() == profile.session_id());

        if owned {
            state.users.remove(profile.handle());
            debug!("Released {} (session {})", profile.handle(), profile.session_id());
        }
        owned
    }

    pub fn lookup(&self, handle: &str) -> Result<UserProfile, RegistryError> {
        self.lock()
            .users
            .get(handle)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(handle.to_string()))
    }

    /// Snapshot of every online handle, sorted.
    pub fn list_handles(&self) -> Vec<String> {
        let mut handles: Vec<String> = self.lock().users.keys().cloned().collect();
        handles.sort();
        handles
    }

    pub fn len(&self) -> usize {
        self.lock().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
