use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, Utc};

use crate::{EngineError, Ledger, ResultEngine, User};

use super::LedgerStore;

#[derive(Debug)]
struct Record {
    user: User,
    ledger: Ledger,
}

/// In-process [`LedgerStore`]. Clones share the same data.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_records<T>(&self, f: impl FnOnce(&mut HashMap<String, Record>) -> T) -> T {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut records)
    }
}

impl LedgerStore for MemoryStore {
    async fn load_ledger(&self, user_email: &str) -> ResultEngine<Ledger> {
        self.with_records(|records| {
            records
                .get(user_email)
                .map(|record| record.ledger.clone())
                .ok_or_else(|| EngineError::UserNotFound(user_email.to_string()))
        })
    }

    async fn save_ledger(&self, ledger: &Ledger) -> ResultEngine<()> {
        self.with_records(|records| match records.get_mut(&ledger.user_email) {
            Some(record) => {
                record.ledger = ledger.clone();
                Ok(())
            }
            None => Err(EngineError::NoChangeMade(format!(
                "no ledger stored for {}",
                ledger.user_email
            ))),
        })
    }

    async fn upsert_user(
        &self,
        email: &str,
        user_info: serde_json::Value,
        now: DateTime<Utc>,
    ) -> ResultEngine<(User, bool)> {
        self.with_records(|records| match records.get_mut(email) {
            Some(record) => {
                record.user.user_info = user_info;
                record.user.updated_at = now;
                Ok((record.user.clone(), false))
            }
            None => {
                let user = User::new(email.to_string(), user_info, now);
                records.insert(
                    email.to_string(),
                    Record {
                        user: user.clone(),
                        ledger: Ledger::new(email),
                    },
                );
                Ok((user, true))
            }
        })
    }

    async fn load_user(&self, email: &str) -> ResultEngine<User> {
        self.with_records(|records| {
            records
                .get(email)
                .map(|record| record.user.clone())
                .ok_or_else(|| EngineError::UserNotFound(email.to_string()))
        })
    }
}
