//! Transaction primitives.
//!
//! A `Transaction` is a single income or expense entry owned by exactly one
//! [`Period`](crate::Period). Its id never changes once generated.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    #[serde(alias = "expenses")]
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expense),
            other => Err(EngineError::Internal(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount_minor: i64, date: DateTime<Utc>) -> ResultEngine<Self> {
        validate_amount(amount_minor)?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount_minor,
            date,
        })
    }

    /// Contribution of this transaction to a period's `(income, expenses)`.
    pub fn contribution(&self) -> (i64, i64) {
        match self.kind {
            TransactionKind::Income => (self.amount_minor, 0),
            TransactionKind::Expense => (0, self.amount_minor),
        }
    }
}

pub(crate) fn validate_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "period_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_email: String,
    pub period_name: String,
    pub position: i32,
    pub kind: String,
    pub amount_minor: i64,
    pub date: DateTimeUtc,
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
    pub(crate) fn from_transaction(
        tx: &Transaction,
        user_email: &str,
        period_name: &str,
        position: i32,
    ) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_email: ActiveValue::Set(user_email.to_string()),
            period_name: ActiveValue::Set(period_name.to_string()),
            position: ActiveValue::Set(position),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            date: ActiveValue::Set(tx.date),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id).map_err(|_| {
                EngineError::Internal(format!("stored transaction id {} is not a uuid", model.id))
            })?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            date: model.date,
        })
    }
}
