use std::future::Future;

use crate::{Engine, EngineError, Ledger, LedgerStore, Period, ResultEngine, locks::KeyGuard};

mod transactions;
mod users;

impl<S: LedgerStore> Engine<S> {
    /// Run a store call, failing with `StoreTimeout` if it does not finish
    /// in time. The call is dropped on timeout.
    async fn bounded<T>(
        &self,
        what: &str,
        call: impl Future<Output = ResultEngine<T>>,
    ) -> ResultEngine<T> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                EngineError::StoreTimeout(format!(
                    "{what} took longer than {}ms",
                    self.store_timeout.as_millis()
                ))
            })?
    }

    async fn lock_user(&self, user_email: &str) -> ResultEngine<KeyGuard> {
        let guard = tokio::time::timeout(self.store_timeout, self.locks.lock(user_email))
            .await
            .map_err(|_| {
                EngineError::StoreTimeout(format!("waiting for the ledger of {user_email}"))
            })?;
        tracing::debug!(user = user_email, "ledger lock acquired");
        Ok(guard)
    }

    /// Read-modify-write of one ledger under its user's lock.
    ///
    /// `change` mutates the loaded ledger in memory; nothing is written if it
    /// fails or if `period` no longer satisfies the sum invariant afterwards.
    async fn mutate_ledger<F>(
        &self,
        user_email: &str,
        period: &str,
        change: F,
    ) -> ResultEngine<Vec<Period>>
    where
        F: FnOnce(&mut Ledger) -> ResultEngine<()>,
    {
        let _guard = self.lock_user(user_email).await?;

        let mut ledger = self
            .bounded("loading ledger", self.store.load_ledger(user_email))
            .await?;
        change(&mut ledger)?;

        let touched = ledger.period_mut(period)?;
        touched.refresh_savings();
        if !touched.is_balanced() {
            tracing::error!(
                user = user_email,
                period,
                "period totals diverged from its transactions"
            );
            return Err(EngineError::Internal(format!(
                "totals of period {period} diverged from its transactions"
            )));
        }

        self.bounded("saving ledger", self.store.save_ledger(&ledger))
            .await?;

        Ok(ledger.into_periods())
    }
}
