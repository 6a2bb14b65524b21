use rust_decimal::Decimal;

use crate::core::{AppError, Result};

/// All amounts in the system share one currency with two decimal places.
pub const SCALE: u32 = 2;

/// Rounds an amount to the monetary scale (banker's rounding)
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp(SCALE)
}

/// Formats an amount for display with the monetary scale
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.width$}", amount, width = SCALE as usize)
}

/// Validates that a fee or tendered amount is not negative
pub fn require_non_negative(label: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} must be non-negative, got: {}",
            label, amount
        )));
    }

    Ok(())
}
