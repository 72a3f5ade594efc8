//! Tax command implementation.

use crate::cli::TaxArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rust_decimal::Decimal;
use std::str::FromStr;
use taxscan_domain::compute_tax;

/// Execute the tax command.
pub fn execute_tax(args: TaxArgs, formatter: &Formatter) -> Result<()> {
    let gross_income = parse_income(&args.gross_income)?;
    let breakdown = compute_tax(gross_income);
    println!("{}", formatter.format_tax(&breakdown)?);
    Ok(())
}

/// Parse a user-typed income figure, allowing thousands separators.
pub fn parse_income(input: &str) -> Result<Decimal> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();

    let amount = Decimal::from_str(&cleaned)
        .map_err(|_| CliError::InvalidInput(format!("'{}' is not a number", input.trim())))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CliError::InvalidInput("Income cannot be negative".to_string()));
    }

    Ok(amount)
}
