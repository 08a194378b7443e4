//! Decimal amounts as sent by clients, stored as integer minor units.
//!
//! Every total in the engine is an `i64` count of minor units (hundredths),
//! so sums stay exact. Clients send and receive plain decimal numbers:
//!
//! | client | minor units |
//! |--------|-------------|
//! | `100`  | `10000`     |
//! | `12.5` | `1250`      |
//! | `0.05` | `5`         |

use serde_json::Number;

use crate::{EngineError, ResultEngine};

/// Minor units in one unit of amount.
pub const MINOR_UNITS: i64 = 100;

const FRACTION_DIGITS: u32 = 2;

/// Parse a decimal amount (`"12.5"`, `"-3"`, `"100.00"`) into minor units.
///
/// Rejects exponents, more than two significant decimals and values that do
/// not fit in `i64` with `InvalidAmount`. The sign is kept, positivity is
/// checked where the amount is used.
pub fn parse_amount(value: &str) -> ResultEngine<i64> {
    let invalid = || EngineError::InvalidAmount(format!("invalid amount: {value}"));
    let overflow = || EngineError::InvalidAmount(format!("amount {value} is too large"));

    let trimmed = value.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    if units.is_empty()
        || !units.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let fraction = fraction.trim_end_matches('0');
    let fraction_len = u32::try_from(fraction.len()).map_err(|_| invalid())?;
    if fraction_len > FRACTION_DIGITS {
        return Err(EngineError::InvalidAmount(format!(
            "amount {value} has more than {FRACTION_DIGITS} decimals"
        )));
    }

    let units: i64 = units.parse().map_err(|_| overflow())?;
    let fraction: i64 = if fraction.is_empty() {
        0
    } else {
        fraction.parse::<i64>().map_err(|_| invalid())? * 10i64.pow(FRACTION_DIGITS - fraction_len)
    };

    let minor = units
        .checked_mul(MINOR_UNITS)
        .and_then(|minor| minor.checked_add(fraction))
        .ok_or_else(overflow)?;

    Ok(if negative { -minor } else { minor })
}

/// Parse a JSON number into minor units, see [`parse_amount`].
pub fn amount_from_json(value: &Number) -> ResultEngine<i64> {
    parse_amount(&value.to_string())
}

/// Render minor units as a JSON number: whole amounts as integers, the rest
/// as decimals.
pub fn amount_to_json(minor: i64) -> Number {
    if minor % MINOR_UNITS == 0 {
        return Number::from(minor / MINOR_UNITS);
    }

    let decimal = minor as f64 / MINOR_UNITS as f64;
    Number::from_f64(decimal).unwrap_or_else(|| Number::from(minor / MINOR_UNITS))
}
