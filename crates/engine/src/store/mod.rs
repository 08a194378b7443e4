//! Persistence boundary of the engine.
//!
//! A [`LedgerStore`] loads and overwrites whole ledgers. It is not expected
//! to coordinate concurrent writers of the same ledger, the engine does that
//! itself (see [`Engine`](crate::Engine)).

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{Ledger, ResultEngine, User};

pub use database::DatabaseStore;
pub use memory::MemoryStore;

mod database;
mod memory;

pub trait LedgerStore: Send + Sync + 'static {
    /// Load the ledger of `user_email`, [`UserNotFound`] if there is no such
    /// user.
    ///
    /// [`UserNotFound`]: crate::EngineError::UserNotFound
    fn load_ledger(&self, user_email: &str) -> impl Future<Output = ResultEngine<Ledger>> + Send;

    /// Replace every stored period and transaction of `ledger.user_email`
    /// with the content of `ledger`, all at once or not at all.
    ///
    /// Fails with [`NoChangeMade`] when no user matches.
    ///
    /// [`NoChangeMade`]: crate::EngineError::NoChangeMade
    fn save_ledger(&self, ledger: &Ledger) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Insert the user or replace its profile. The flag is `true` when the
    /// user was created.
    fn upsert_user(
        &self,
        email: &str,
        user_info: serde_json::Value,
        now: DateTime<Utc>,
    ) -> impl Future<Output = ResultEngine<(User, bool)>> + Send;

    fn load_user(&self, email: &str) -> impl Future<Output = ResultEngine<User>> + Send;
}
