use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits used for every stored or presented amount (paise)
pub const CURRENCY_SCALE: u32 = 2;

/// Largest value a `DECIMAL(12,2)` money column holds: 9,999,999,999.99
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, CURRENCY_SCALE);

/// Rounds an amount to currency scale.
///
/// Half-way values round away from zero, matching what MySQL stores when a
/// wider DECIMAL is written into a `DECIMAL(12,2)` column.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with exactly two fractional digits
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = round_currency(amount);
    rounded.rescale(CURRENCY_SCALE);
    rounded.to_string()
}

/// Serializes an amount as a two-decimal string, for `#[serde(serialize_with)]`
pub fn serialize_amount<S: serde::Serializer>(
    amount: &Decimal,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_amount(*amount))
}

/// Drops the fractional part, the way dashboard widgets display amounts
pub fn whole_units(amount: Decimal) -> i64 {
    amount.trunc().to_i64().unwrap_or(if amount < Decimal::ZERO {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Validates that an amount fits a money column: not negative, at most
/// [`MAX_AMOUNT`], and no finer than the currency scale
pub fn validate_amount(label: &str, amount: Decimal) -> Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("{} cannot be negative, got {}", label, amount));
    }

    if amount > MAX_AMOUNT {
        return Err(format!("{} cannot exceed {}, got {}", label, MAX_AMOUNT, amount));
    }

    if amount.normalize().scale() > CURRENCY_SCALE {
        return Err(format!(
            "{} must have at most {} decimal places, got {}",
            label, CURRENCY_SCALE, amount
        ));
    }

    Ok(())
}
