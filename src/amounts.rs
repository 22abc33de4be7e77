//! Amount normalization and aggregation
//!
//! All amounts are denominated in the asset's smallest unit. Totals are
//! computed with checked 256-bit arithmetic; no decimal scaling happens here.

use crate::error::{Error, Result};
use crate::types::Amount;
use alloy_primitives::U256;

/// Parse a single amount into a non-negative 256-bit integer.
///
/// Text amounts may be decimal or `0x`-prefixed hex. Signs, fractions,
/// digit separators, other radix prefixes and empty digit runs are rejected.
pub fn parse_amount(amount: &Amount) -> Result<U256> {
    match amount {
        Amount::Units(value) => Ok(U256::from(*value)),
        Amount::Exact(value) => Ok(*value),
        Amount::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(invalid(text, "amount is empty"));
            }
            if trimmed.starts_with('-') {
                return Err(invalid(text, "amount must not be negative"));
            }
            let (digits, radix) = match trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
            {
                Some(hex) => (hex, 16),
                None => (trimmed, 10),
            };
            if !is_plain_integer(digits, radix) {
                return Err(invalid(text, "amount must be a plain decimal or 0x-hex integer"));
            }
            U256::from_str_radix(digits, radix).map_err(|e| invalid(text, &e.to_string()))
        }
    }
}

/// Non-empty run of digits in `radix`, with no separators or sign
fn is_plain_integer(digits: &str, radix: u64) -> bool {
    !digits.is_empty()
        && digits.chars().all(|c| match radix {
            16 => c.is_ascii_hexdigit(),
            _ => c.is_ascii_digit(),
        })
}

/// Parse every amount, preserving order
pub fn parse_amounts<'a, I>(amounts: I) -> Result<Vec<U256>>
where
    I: IntoIterator<Item = &'a Amount>,
{
    amounts.into_iter().map(parse_amount).collect()
}

/// Sum already-parsed amounts; an empty slice sums to zero
pub fn sum(values: &[U256]) -> Result<U256> {
    values.iter().try_fold(U256::ZERO, |acc, value| {
        acc.checked_add(*value)
            .ok_or_else(|| invalid(&value.to_string(), "batch total overflows uint256"))
    })
}

/// Parse and sum a sequence of amounts
pub fn aggregate<'a, I>(amounts: I) -> Result<U256>
where
    I: IntoIterator<Item = &'a Amount>,
{
    sum(&parse_amounts(amounts)?)
}

/// Total for an equal-amount batch: `amount × count`
pub fn multiply(amount: U256, count: usize) -> Result<U256> {
    amount
        .checked_mul(U256::from(count))
        .ok_or_else(|| invalid(&amount.to_string(), "batch total overflows uint256"))
}

fn invalid(value: &str, reason: &str) -> Error {
    Error::InvalidAmount {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
