//! Request and response bodies of the HTTP API.
//!
//! Field names follow what the client application already sends, hence the
//! camelCase renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Query string of `GET /api/v1/users`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserQuery {
        pub email: String,
    }

    /// Body of `POST /api/v1/addUserToDB`.
    ///
    /// `user` is stored as-is; its email is read from `user.email`, falling
    /// back to `user.user.email`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserUpsert {
        pub user: serde_json::Value,
    }

    impl UserUpsert {
        pub fn email(&self) -> Option<&str> {
            self.user
                .get("email")
                .and_then(serde_json::Value::as_str)
                .or_else(|| {
                    self.user
                        .get("user")
                        .and_then(|inner| inner.get("email"))
                        .and_then(serde_json::Value::as_str)
                })
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserCreated {
        pub message: String,
        pub user_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub email: String,
        pub user_info: serde_json::Value,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod finance {
    use serde_json::Number;

    use super::*;

    /// Written as `"income"` / `"expenses"`, the spelling the client
    /// filters on; `"expense"` is accepted on input.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        #[serde(rename = "expenses", alias = "expense")]
        Expense,
    }

    /// Query string of `GET /api/v1/financeTracker`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerQuery {
        pub email: String,
    }

    /// Type and amount of a transaction as sent by the client.
    ///
    /// `amount` is a decimal number with at most two decimals, e.g. `12.5`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionInput {
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount: Number,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub email: String,
        pub month_name: String,
        pub transaction: TransactionInput,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionEdit {
        pub email: String,
        pub month_name: String,
        /// Transaction id (UUID), serialized as a string in JSON.
        pub transaction_id: String,
        pub updated_transaction: TransactionInput,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionDelete {
        pub email: String,
        pub month_name: String,
        pub transaction_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        #[serde(rename = "_id")]
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount: Number,
        pub date: DateTime<Utc>,
    }

    /// One month of the finance tracker.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthView {
        pub name: String,
        pub income: Number,
        pub expenses: Number,
        pub savings: Number,
        pub transactions: Vec<TransactionView>,
    }

    /// Every month of the user's tracker after the request was applied.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LedgerResponse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
        pub updated_financial_data: Vec<MonthView>,
    }
}
