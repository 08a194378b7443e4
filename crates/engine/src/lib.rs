//! Finance tracker engine.
//!
//! The [`Engine`] keeps every [`Period`] of a user's [`Ledger`] consistent
//! with its transactions: `income` and `expenses` are the sums of the
//! matching transaction amounts and `savings` is their difference, after
//! every add, edit and delete.

use std::time::Duration;

pub use commands::{AddTransactionCmd, DeleteTransactionCmd, EditTransactionCmd};
pub use error::EngineError;
pub use ledger::Ledger;
pub use money::{MINOR_UNITS, amount_from_json, amount_to_json, parse_amount};
pub use periods::Period;
pub use store::{DatabaseStore, LedgerStore, MemoryStore};
pub use transactions::{Transaction, TransactionKind};
pub use users::User;

use sea_orm::DatabaseConnection;

use locks::KeyedLocks;

mod commands;
mod error;
mod ledger;
mod locks;
mod money;
mod ops;
mod periods;
mod store;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;

/// Default bound on a single store call or lock wait.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct Engine<S = DatabaseStore> {
    store: S,
    locks: KeyedLocks,
    store_timeout: Duration,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl<S> Engine<S> {
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }
}

/// The builder for `Engine`
#[derive(Debug)]
pub struct EngineBuilder<S = DatabaseStore> {
    store: Option<S>,
    store_timeout: Duration,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            store: None,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl EngineBuilder {
    /// Persist ledgers in the given database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.store = Some(DatabaseStore::new(db));
        self
    }
}

impl<S: LedgerStore> EngineBuilder<S> {
    /// Persist ledgers through any other store
    pub fn store<T: LedgerStore>(self, store: T) -> EngineBuilder<T> {
        EngineBuilder {
            store: Some(store),
            store_timeout: self.store_timeout,
        }
    }

    /// Upper bound for each store call and each wait on a user's lock
    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine<S>> {
        let store = self
            .store
            .ok_or_else(|| EngineError::Internal("engine built without a store".to_string()))?;
        if self.store_timeout.is_zero() {
            return Err(EngineError::Internal(
                "store timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Engine {
            store,
            locks: KeyedLocks::default(),
            store_timeout: self.store_timeout,
        })
    }
}
