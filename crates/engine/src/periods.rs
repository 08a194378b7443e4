//! The module contains `Period` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, transactions::validate_amount};

/// A period bucket.
///
/// A period is one month of a ledger: the running `income` and `expenses`
/// over its transactions and the derived `savings`. The running sums are
/// moved by deltas on every change, they are never rebuilt from scratch
/// during a mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub name: String,
    pub income: i64,
    pub expenses: i64,
    /// Always `income - expenses`, see [`Period::refresh_savings`].
    pub savings: i64,
    pub transactions: Vec<Transaction>,
}

impl Period {
    /// Create an empty period.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            income: 0,
            expenses: 0,
            savings: 0,
            transactions: Vec::new(),
        }
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    /// Append a transaction and move the matching running sum by its amount.
    pub fn push(&mut self, tx: Transaction) -> ResultEngine<&Transaction> {
        let (income, expenses) = tx.contribution();
        self.apply_delta(income, expenses)?;
        self.transactions.push(tx);

        Ok(&self.transactions[self.transactions.len() - 1])
    }

    /// Replace kind, amount and date of transaction `id` in place.
    ///
    /// A kind change moves the old amount out of its category and the new
    /// amount into the other one.
    pub fn edit(
        &mut self,
        id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
        date: DateTime<Utc>,
    ) -> ResultEngine<&Transaction> {
        validate_amount(amount_minor)?;
        let index = self.position(id)?;

        let (old_income, old_expenses) = self.transactions[index].contribution();
        let (new_income, new_expenses) = match kind {
            TransactionKind::Income => (amount_minor, 0),
            TransactionKind::Expense => (0, amount_minor),
        };
        self.apply_delta(new_income - old_income, new_expenses - old_expenses)?;

        let tx = &mut self.transactions[index];
        tx.kind = kind;
        tx.amount_minor = amount_minor;
        tx.date = date;

        Ok(tx)
    }

    /// Remove transaction `id`, taking its amount back out of the sums.
    pub fn remove(&mut self, id: Uuid) -> ResultEngine<Transaction> {
        let index = self.position(id)?;
        let (income, expenses) = self.transactions[index].contribution();
        self.apply_delta(-income, -expenses)?;

        Ok(self.transactions.remove(index))
    }

    pub fn refresh_savings(&mut self) {
        self.savings = self.income.saturating_sub(self.expenses);
    }

    /// `true` when the running sums match the transactions and savings is
    /// up to date.
    /// Sums that overflow `i64` are never balanced.
    pub fn is_balanced(&self) -> bool {
        let sums = self
            .transactions
            .iter()
            .map(Transaction::contribution)
            .try_fold((0i64, 0i64), |(income, expenses), (i, e)| {
                Some((income.checked_add(i)?, expenses.checked_add(e)?))
            });

        match sums {
            Some((income, expenses)) => {
                self.income == income
                    && self.expenses == expenses
                    && income.checked_sub(expenses) == Some(self.savings)
            }
            None => false,
        }
    }

    fn position(&self, id: Uuid) -> ResultEngine<usize> {
        self.transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or_else(|| EngineError::TransactionNotFound(id.to_string()))
    }

    fn apply_delta(&mut self, income: i64, expenses: i64) -> ResultEngine<()> {
        let (Some(new_income), Some(new_expenses)) = (
            self.income.checked_add(income),
            self.expenses.checked_add(expenses),
        ) else {
            return Err(EngineError::InvalidAmount(format!(
                "amount overflows totals of period {}",
                self.name
            )));
        };

        self.income = new_income;
        self.expenses = new_expenses;
        self.refresh_savings();
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "periods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_email: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub position: i32,
    pub income: i64,
    pub expenses: i64,
    pub savings: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserEmail",
        to = "super::users::Column::Email",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_period(period: &Period, user_email: &str, position: i32) -> Self {
        Self {
            user_email: ActiveValue::Set(user_email.to_string()),
            name: ActiveValue::Set(period.name.clone()),
            position: ActiveValue::Set(position),
            income: ActiveValue::Set(period.income),
            expenses: ActiveValue::Set(period.expenses),
            savings: ActiveValue::Set(period.savings),
        }
    }
}
