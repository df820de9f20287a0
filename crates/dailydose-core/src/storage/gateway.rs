//! Ledger/persistence gateway.
//!
//! The day list, balance and streak are written as ONE JSON snapshot under a
//! single versioned key, so a write either lands all three or none of them.
//! Unreadable or foreign-version snapshots load as "no prior state".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::KvStore;
use crate::day::Day;
use crate::error::StorageError;
use crate::ledger::Ledger;

/// Bump when the snapshot layout changes; older snapshots are then ignored.
pub const SCHEMA_VERSION: u32 = 1;

/// Key holding the snapshot for [`SCHEMA_VERSION`].
pub const STATE_KEY: &str = "tracker_state_v1";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    schema_version: u32,
    days: Vec<Day>,
    balance: i64,
    streak: u32,
    saved_at: DateTime<Utc>,
}

/// What a previous session left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub days: Option<Vec<Day>>,
    pub ledger: Ledger,
}

/// Reads and writes tracker state through a [`KvStore`].
#[derive(Debug)]
pub struct LedgerGateway<S> {
    store: S,
}

impl<S: KvStore> LedgerGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the last saved state, or defaults when none is usable.
    ///
    /// Never fails: read errors, malformed JSON and schema mismatches are
    /// logged and treated as absent state.
    pub fn load(&self) -> PersistedState {
        let raw = match self.store.get(STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PersistedState::default(),
            Err(e) => {
                warn!("could not read tracker state, starting fresh: {e}");
                return PersistedState::default();
            }
        };

        let snapshot: Snapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("stored tracker state is malformed, starting fresh: {e}");
                return PersistedState::default();
            }
        };

        if snapshot.schema_version != SCHEMA_VERSION {
            warn!(
                found = snapshot.schema_version,
                expected = SCHEMA_VERSION,
                "stored tracker state has an incompatible schema version, starting fresh"
            );
            return PersistedState::default();
        }

        PersistedState {
            days: Some(snapshot.days),
            ledger: Ledger::new(snapshot.balance, snapshot.streak),
        }
    }

    /// Write the day list and ledger as one unit.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be encoded or the store
    /// rejects the write. Nothing is partially written.
    pub fn save(&self, days: &[Day], ledger: &Ledger) -> Result<(), StorageError> {
        let snapshot = Snapshot {
            schema_version: SCHEMA_VERSION,
            days: days.to_vec(),
            balance: ledger.balance,
            streak: ledger.streak,
            saved_at: Utc::now(),
        };
        let encoded =
            serde_json::to_string(&snapshot).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.store.set(STATE_KEY, &encoded)?;
        debug!(
            days = days.len(),
            balance = ledger.balance,
            streak = ledger.streak,
            "tracker state saved"
        );
        Ok(())
    }
}
