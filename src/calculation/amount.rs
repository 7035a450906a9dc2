//! Overflow-checked decimal arithmetic shared by the calculators.
//!
//! `Decimal`'s operators panic once a value leaves the 96-bit range. Salaries
//! and hours arrive from operators, so every product and total that depends on
//! them goes through these helpers and fails with `AmountOutOfRange` instead.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

fn out_of_range(rule_id: &str) -> EngineError {
    EngineError::AmountOutOfRange {
        rule_id: rule_id.to_string(),
    }
}

/// Multiplies every factor.
pub(crate) fn checked_product(rule_id: &str, factors: &[Decimal]) -> EngineResult<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, factor| acc.checked_mul(*factor))
        .ok_or_else(|| out_of_range(rule_id))
}

/// Adds every part.
pub(crate) fn checked_sum(rule_id: &str, parts: &[Decimal]) -> EngineResult<Decimal> {
    parts
        .iter()
        .try_fold(Decimal::ZERO, |acc, part| acc.checked_add(*part))
        .ok_or_else(|| out_of_range(rule_id))
}

/// `numerator / divisor`; a zero divisor is reported like an overflow.
pub(crate) fn checked_quotient(
    rule_id: &str,
    numerator: Decimal,
    divisor: Decimal,
) -> EngineResult<Decimal> {
    numerator
        .checked_div(divisor)
        .ok_or_else(|| out_of_range(rule_id))
}
