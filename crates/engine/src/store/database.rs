use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Ledger, Period, ResultEngine, Transaction, User, periods, transactions, users,
};

use super::LedgerStore;

/// [`LedgerStore`] over a sea-orm connection.
///
/// Every call runs in its own database transaction, so a save that fails or
/// is dropped halfway rolls back entirely.
#[derive(Clone, Debug)]
pub struct DatabaseStore {
    database: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

fn position(index: usize) -> ResultEngine<i32> {
    i32::try_from(index).map_err(|_| EngineError::Internal(format!("position {index} overflows")))
}

impl LedgerStore for DatabaseStore {
    async fn load_ledger(&self, user_email: &str) -> ResultEngine<Ledger> {
        let db_tx = self.database.begin().await?;

        if users::Entity::find_by_id(user_email.to_string())
            .one(&db_tx)
            .await?
            .is_none()
        {
            return Err(EngineError::UserNotFound(user_email.to_string()));
        }

        let period_models = periods::Entity::find()
            .filter(periods::Column::UserEmail.eq(user_email))
            .order_by_asc(periods::Column::Position)
            .all(&db_tx)
            .await?;
        let tx_models = transactions::Entity::find()
            .filter(transactions::Column::UserEmail.eq(user_email))
            .order_by_asc(transactions::Column::Position)
            .all(&db_tx)
            .await?;
        db_tx.commit().await?;

        let mut by_period: HashMap<String, Vec<Transaction>> = HashMap::new();
        for model in tx_models {
            let period_name = model.period_name.clone();
            by_period
                .entry(period_name)
                .or_default()
                .push(Transaction::try_from(model)?);
        }

        let mut ledger = Ledger::new(user_email);
        for model in period_models {
            let transactions = by_period.remove(&model.name).unwrap_or_default();
            ledger.periods.push(Period {
                name: model.name,
                income: model.income,
                expenses: model.expenses,
                savings: model.savings,
                transactions,
            });
        }
        if let Some(orphan) = by_period.keys().next() {
            return Err(EngineError::Internal(format!(
                "transactions stored for unknown period {orphan}"
            )));
        }

        ledger.refresh_savings();
        Ok(ledger)
    }

    async fn save_ledger(&self, ledger: &Ledger) -> ResultEngine<()> {
        let user_email = ledger.user_email.as_str();
        let db_tx = self.database.begin().await?;

        if users::Entity::find_by_id(user_email.to_string())
            .one(&db_tx)
            .await?
            .is_none()
        {
            return Err(EngineError::NoChangeMade(format!(
                "no ledger stored for {user_email}"
            )));
        }

        transactions::Entity::delete_many()
            .filter(transactions::Column::UserEmail.eq(user_email))
            .exec(&db_tx)
            .await?;
        periods::Entity::delete_many()
            .filter(periods::Column::UserEmail.eq(user_email))
            .exec(&db_tx)
            .await?;

        for (period_index, period) in ledger.periods.iter().enumerate() {
            periods::ActiveModel::from_period(period, user_email, position(period_index)?)
                .insert(&db_tx)
                .await?;
            for (tx_index, tx) in period.transactions.iter().enumerate() {
                transactions::ActiveModel::from_transaction(
                    tx,
                    user_email,
                    &period.name,
                    position(tx_index)?,
                )
                .insert(&db_tx)
                .await?;
            }
        }

        db_tx.commit().await?;
        Ok(())
    }

    async fn upsert_user(
        &self,
        email: &str,
        user_info: serde_json::Value,
        now: DateTime<Utc>,
    ) -> ResultEngine<(User, bool)> {
        let db_tx = self.database.begin().await?;

        let existing = users::Entity::find_by_id(email.to_string())
            .one(&db_tx)
            .await?;
        let result = match existing {
            Some(model) => {
                let mut user = User::try_from(model)?;
                user.user_info = user_info;
                user.updated_at = now;
                let user_model = users::ActiveModel {
                    email: ActiveValue::Unchanged(user.email.clone()),
                    user_info: ActiveValue::Set(user.user_info.to_string()),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                };
                user_model.update(&db_tx).await?;
                (user, false)
            }
            None => {
                let user = User::new(email.to_string(), user_info, now);
                users::ActiveModel::from(&user).insert(&db_tx).await?;
                (user, true)
            }
        };

        db_tx.commit().await?;
        Ok(result)
    }

    async fn load_user(&self, email: &str) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(email.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(email.to_string()))?;

        User::try_from(model)
    }
}
