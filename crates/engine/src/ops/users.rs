use chrono::Utc;

use crate::{Engine, LedgerStore, Period, ResultEngine, User, users::normalize_email};

impl<S: LedgerStore> Engine<S> {
    /// Creates the user with an empty ledger, or replaces the profile of an
    /// existing one. The flag is `true` when the user was created.
    pub async fn upsert_user(
        &self,
        email: &str,
        user_info: serde_json::Value,
    ) -> ResultEngine<(User, bool)> {
        let email = normalize_email(email)?;
        let _guard = self.lock_user(&email).await?;

        let (user, created) = self
            .bounded(
                "saving user",
                self.store.upsert_user(&email, user_info, Utc::now()),
            )
            .await?;

        if created {
            tracing::info!(user = %email, "user created");
        } else {
            tracing::debug!(user = %email, "user profile updated");
        }
        Ok((user, created))
    }

    pub async fn user(&self, email: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        self.bounded("loading user", self.store.load_user(&email))
            .await
    }

    /// Every period of the user's ledger, in creation order.
    pub async fn ledger(&self, email: &str) -> ResultEngine<Vec<Period>> {
        let email = normalize_email(email)?;
        let ledger = self
            .bounded("loading ledger", self.store.load_ledger(&email))
            .await?;

        Ok(ledger.into_periods())
    }
}
