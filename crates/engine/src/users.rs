//! Users table.
//!
//! A user is the record a ledger hangs off, keyed by email. The profile the
//! client sends along is kept as opaque JSON.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub user_info: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, user_info: serde_json::Value, now: DateTime<Utc>) -> Self {
        Self {
            email,
            user_info,
            created_at: now,
            updated_at: now,
        }
    }
}

pub(crate) fn normalize_email(email: &str) -> ResultEngine<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(
            "email must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub user_info: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::periods::Entity")]
    Periods,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Periods.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&User> for ActiveModel {
    fn from(value: &User) -> Self {
        Self {
            email: ActiveValue::Set(value.email.clone()),
            user_info: ActiveValue::Set(value.user_info.to_string()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let user_info = serde_json::from_str(&model.user_info).map_err(|err| {
            EngineError::Internal(format!("stored profile of {} is not json: {err}", model.email))
        })?;
        Ok(Self {
            email: model.email,
            user_info,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
