//! Conversion between domain amounts and the integer cent columns

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{DomainError, DomainResult};

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Round to the nearest cent, halves away from zero.
pub fn to_cents(amount: Decimal) -> DomainResult<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|c| {
            c.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or_else(|| DomainError::Validation(format!("amount {} is out of range", amount)))
}
