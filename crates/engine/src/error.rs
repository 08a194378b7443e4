//! The module contains the error the engine can throw.
//!
//! The not-found family ([`UserNotFound`], [`PeriodNotFound`],
//! [`TransactionNotFound`] and [`NoChangeMade`]) is what callers usually
//! branch on. [`StoreTimeout`] and [`Database`] come from the persistence
//! boundary, [`Internal`] from anything the engine did not expect.
//!
//!  [`UserNotFound`]: EngineError::UserNotFound
//!  [`PeriodNotFound`]: EngineError::PeriodNotFound
//!  [`TransactionNotFound`]: EngineError::TransactionNotFound
//!  [`NoChangeMade`]: EngineError::NoChangeMade
//!  [`StoreTimeout`]: EngineError::StoreTimeout
//!  [`Database`]: EngineError::Database
//!  [`Internal`]: EngineError::Internal
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("User \"{0}\" not found!")]
    UserNotFound(String),
    #[error("Period \"{0}\" not found!")]
    PeriodNotFound(String),
    #[error("Transaction \"{0}\" not found!")]
    TransactionNotFound(String),
    #[error("No changes made: {0}")]
    NoChangeMade(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Store timed out: {0}")]
    StoreTimeout(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// `true` for the errors meaning "the addressed record does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::PeriodNotFound(_)
                | Self::TransactionNotFound(_)
                | Self::NoChangeMade(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserNotFound(a), Self::UserNotFound(b)) => a == b,
            (Self::PeriodNotFound(a), Self::PeriodNotFound(b)) => a == b,
            (Self::TransactionNotFound(a), Self::TransactionNotFound(b)) => a == b,
            (Self::NoChangeMade(a), Self::NoChangeMade(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::StoreTimeout(a), Self::StoreTimeout(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
