//! Local ticket number sequence
//!
//! Legacy client-side numbering: `I15015`, `I15017`, ... The counter and the
//! issued history live in a caller-supplied [`StateStore`] instead of
//! ambient global storage. Server-assigned ticket numbers take precedence;
//! this sequence is only used where no server number exists yet.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use opsboard_core::ticket_number::{MemoryStore, TicketSequence};
//!
//! let mut seq = TicketSequence::new(MemoryStore::default());
//! let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
//!
//! let ticket = seq.generate("asha", now).unwrap();
//! assert_eq!(ticket.id, "I15015");
//! assert_eq!(seq.generate("asha", now).unwrap().id, "I15017");
//! assert_eq!(seq.history().unwrap().len(), 2);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::StoreError;

const COUNTER_KEY: &str = "lastTicketNumber";
const HISTORY_KEY: &str = "ticketHistory";

/// Key/value persistence for the sequence
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// A number handed out by the sequence
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedTicket {
    pub id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Prefixed, stepped ticket counter over a [`StateStore`]
#[derive(Debug)]
pub struct TicketSequence<S> {
    store: S,
    prefix: String,
    step: u64,
    seed: u64,
}

impl<S: StateStore> TicketSequence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            prefix: "I".to_string(),
            step: 2,
            seed: 15013,
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn step(mut self, step: u64) -> Self {
        self.step = step.max(1);
        self
    }

    /// Number considered "last issued" when the store is empty
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Write the seed to the store unless a counter is already present
    pub fn init(&mut self) -> Result<u64, StoreError> {
        match self.store.get(COUNTER_KEY)? {
            Some(_) => self.last_number(),
            None => {
                self.store.set(COUNTER_KEY, self.seed.to_string())?;
                Ok(self.seed)
            }
        }
    }

    pub fn last_number(&self) -> Result<u64, StoreError> {
        match self.store.get(COUNTER_KEY)? {
            None => Ok(self.seed),
            Some(value) => value.trim().parse().map_err(|_| StoreError::Corrupt {
                key: COUNTER_KEY.to_string(),
                value,
            }),
        }
    }

    /// The id the next call to [`generate`](Self::generate) would return
    pub fn peek(&self) -> Result<String, StoreError> {
        Ok(format!("{}{}", self.prefix, self.next_number()?))
    }

    fn next_number(&self) -> Result<u64, StoreError> {
        let last = self.last_number()?;
        last.checked_add(self.step).ok_or_else(|| StoreError::Corrupt {
            key: COUNTER_KEY.to_string(),
            value: last.to_string(),
        })
    }

    pub fn history(&self) -> Result<Vec<IssuedTicket>, StoreError> {
        match self.store.get(HISTORY_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    /// Issue the next number and record it in the history
    pub fn generate(
        &mut self,
        created_by: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<IssuedTicket, StoreError> {
        let next = self.next_number()?;
        let ticket = IssuedTicket {
            id: format!("{}{}", self.prefix, next),
            created_by: created_by.into(),
            created_at: now,
        };

        let mut history = self.history()?;
        history.push(ticket.clone());

        self.store.set(COUNTER_KEY, next.to_string())?;
        self.store.set(HISTORY_KEY, serde_json::to_string(&history)?)?;
        debug!(id = %ticket.id, "issued ticket number");
        Ok(ticket)
    }

    /// Forget the counter and the history
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.remove(COUNTER_KEY)?;
        self.store.remove(HISTORY_KEY)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap()
    }

    #[test]
    fn starts_after_seed() {
        let seq = TicketSequence::new(MemoryStore::default());
        assert_eq!(seq.last_number().unwrap(), 15013);
        assert_eq!(seq.peek().unwrap(), "I15015");
    }

    #[test]
    fn generate_advances_and_records() {
        let mut seq = TicketSequence::new(MemoryStore::default());
        let first = seq.generate("asha", now()).unwrap();
        let second = seq.generate("ravi", now()).unwrap();

        assert_eq!(first.id, "I15015");
        assert_eq!(second.id, "I15017");
        assert_eq!(seq.last_number().unwrap(), 15017);
        assert_eq!(seq.history().unwrap(), vec![first, second]);
    }

    #[test]
    fn custom_prefix_and_step() {
        let mut seq = TicketSequence::new(MemoryStore::default()).prefix("T-").step(1).seed(99);
        assert_eq!(seq.init().unwrap(), 99);
        assert_eq!(seq.generate("x", now()).unwrap().id, "T-100");
    }

    #[test]
    fn init_keeps_existing_counter() {
        let mut store = MemoryStore::default();
        store.set(COUNTER_KEY, "20001".into()).unwrap();
        let mut seq = TicketSequence::new(store);
        assert_eq!(seq.init().unwrap(), 20001);
        assert_eq!(seq.generate("x", now()).unwrap().id, "I20003");
    }

    #[test]
    fn clear_resets_to_seed() {
        let mut seq = TicketSequence::new(MemoryStore::default());
        seq.generate("x", now()).unwrap();
        seq.clear().unwrap();
        assert_eq!(seq.last_number().unwrap(), 15013);
        assert!(seq.history().unwrap().is_empty());
    }

    #[test]
    fn corrupt_counter_is_reported() {
        let mut store = MemoryStore::default();
        store.set(COUNTER_KEY, "abc".into()).unwrap();
        let seq = TicketSequence::new(store);
        assert!(matches!(seq.last_number(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn exhausted_counter_is_reported() {
        let mut store = MemoryStore::default();
        store.set(COUNTER_KEY, u64::MAX.to_string()).unwrap();
        let mut seq = TicketSequence::new(store);

        assert!(matches!(seq.peek(), Err(StoreError::Corrupt { .. })));
        assert!(matches!(seq.generate("x", now()), Err(StoreError::Corrupt { .. })));
        assert_eq!(seq.last_number().unwrap(), u64::MAX);
        assert!(seq.history().unwrap().is_empty());
    }

    #[test]
    fn history_is_camel_case_json() {
        let mut seq = TicketSequence::new(MemoryStore::default());
        seq.generate("asha", now()).unwrap();
        let raw = seq.into_inner().get(HISTORY_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["createdBy"], "asha");
        assert_eq!(value[0]["id"], "I15015");
    }
}
