//! Command structs for engine operations.
//!
//! These types group parameters for the ledger write operations
//! (add/edit/delete), keeping call sites readable and avoiding long argument
//! lists.

use uuid::Uuid;

use crate::TransactionKind;

/// Append a transaction to a period, creating the period if needed.
#[derive(Clone, Debug)]
pub struct AddTransactionCmd {
    pub user_email: String,
    pub period: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
}

impl AddTransactionCmd {
    #[must_use]
    pub fn new(
        user_email: impl Into<String>,
        period: impl Into<String>,
        kind: TransactionKind,
        amount_minor: i64,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            period: period.into(),
            kind,
            amount_minor,
        }
    }
}

/// Replace kind and amount of an existing transaction.
#[derive(Clone, Debug)]
pub struct EditTransactionCmd {
    pub user_email: String,
    pub period: String,
    pub transaction_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
}

impl EditTransactionCmd {
    #[must_use]
    pub fn new(
        user_email: impl Into<String>,
        period: impl Into<String>,
        transaction_id: Uuid,
        kind: TransactionKind,
        amount_minor: i64,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            period: period.into(),
            transaction_id,
            kind,
            amount_minor,
        }
    }
}

/// Remove a transaction from its period.
#[derive(Clone, Debug)]
pub struct DeleteTransactionCmd {
    pub user_email: String,
    pub period: String,
    pub transaction_id: Uuid,
}

impl DeleteTransactionCmd {
    #[must_use]
    pub fn new(
        user_email: impl Into<String>,
        period: impl Into<String>,
        transaction_id: Uuid,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            period: period.into(),
            transaction_id,
        }
    }
}
