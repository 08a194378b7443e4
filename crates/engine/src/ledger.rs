//! The module contains `Ledger` struct and its implementation.

use serde::{Deserialize, Serialize};

use crate::{EngineError, Period, ResultEngine};

/// One user's finance tracker: the period buckets, in creation order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub user_email: String,
    pub periods: Vec<Period>,
}

impl Ledger {
    pub fn new(user_email: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
            periods: Vec::new(),
        }
    }

    pub fn period(&self, name: &str) -> ResultEngine<&Period> {
        self.periods
            .iter()
            .find(|period| period.name == name)
            .ok_or_else(|| EngineError::PeriodNotFound(name.to_string()))
    }

    pub fn period_mut(&mut self, name: &str) -> ResultEngine<&mut Period> {
        self.periods
            .iter_mut()
            .find(|period| period.name == name)
            .ok_or_else(|| EngineError::PeriodNotFound(name.to_string()))
    }

    /// Return the period called `name`, appending an empty one if missing.
    pub fn find_or_create(&mut self, name: &str) -> &mut Period {
        let index = match self.periods.iter().position(|period| period.name == name) {
            Some(index) => index,
            None => {
                self.periods.push(Period::new(name));
                self.periods.len() - 1
            }
        };

        &mut self.periods[index]
    }

    /// Recompute the derived savings of every period.
    pub fn refresh_savings(&mut self) {
        self.periods.iter_mut().for_each(Period::refresh_savings);
    }

    pub fn is_balanced(&self) -> bool {
        self.periods.iter().all(Period::is_balanced)
    }

    pub fn into_periods(self) -> Vec<Period> {
        self.periods
    }
}

pub(crate) fn normalize_period_name(name: &str) -> ResultEngine<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(
            "period name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
