//! Graduated personal income tax
//!
//! Gross income is first reduced by the consolidated relief allowance, then the
//! remainder is charged band by band:
//!
//! | Band width | Rate |
//! |-----------:|-----:|
//! |    300,000 |   7% |
//! |    300,000 |  11% |
//! |    500,000 |  15% |
//! |    500,000 |  19% |
//! |  1,600,000 |  21% |
//! |  unbounded |  24% |
//!
//! All arithmetic is exact decimal arithmetic. Nothing is rounded here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Fixed floor of the relief allowance
pub const RELIEF_MINIMUM: Decimal = dec!(200000);

/// Share of gross income that competes with the floor
pub const RELIEF_FLOOR_RATE: Decimal = dec!(0.01);

/// Share of gross income added on top of the floor
pub const RELIEF_VARIABLE_RATE: Decimal = dec!(0.20);

/// A marginal band; `width` of `None` is the open-ended top band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBand {
    /// Amount of taxable income the band covers
    pub width: Option<Decimal>,
    /// Rate applied within the band
    pub rate: Decimal,
}

/// Bands in the order they are consumed
pub const TAX_BANDS: [TaxBand; 6] = [
    TaxBand { width: Some(dec!(300000)), rate: dec!(0.07) },
    TaxBand { width: Some(dec!(300000)), rate: dec!(0.11) },
    TaxBand { width: Some(dec!(500000)), rate: dec!(0.15) },
    TaxBand { width: Some(dec!(500000)), rate: dec!(0.19) },
    TaxBand { width: Some(dec!(1600000)), rate: dec!(0.21) },
    TaxBand { width: None, rate: dec!(0.24) },
];

/// Portion of taxable income charged in one band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandCharge {
    /// Band rate
    pub rate: Decimal,
    /// Taxable income that fell into this band
    pub taxed_amount: Decimal,
    /// `taxed_amount * rate`
    pub tax: Decimal,
}

/// Result of a tax computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    /// Gross income the computation started from (negative input is clamped to zero)
    pub gross_income: Decimal,
    /// Consolidated relief allowance
    pub consolidated_relief: Decimal,
    /// Gross income less relief, never below zero
    pub taxable_income: Decimal,
    /// Sum of all band charges
    pub total_tax: Decimal,
    /// `total_tax / gross_income * 100`, zero for zero income
    pub effective_rate: Decimal,
    /// Bands actually consumed, in order
    pub bands: Vec<BandCharge>,
}

/// Consolidated relief: the higher of the fixed floor or 1% of gross, plus 20% of gross
pub fn consolidated_relief(gross_income: Decimal) -> Decimal {
    let base = RELIEF_MINIMUM.max(gross_income * RELIEF_FLOOR_RATE);
    base + gross_income * RELIEF_VARIABLE_RATE
}

/// Compute the tax due on a gross income
///
/// # Examples
///
/// ```
/// use taxscan_domain::compute_tax;
/// use rust_decimal_macros::dec;
///
/// let breakdown = compute_tax(dec!(1000000));
/// assert_eq!(breakdown.taxable_income, dec!(600000));
/// assert_eq!(breakdown.total_tax, dec!(54000));
/// assert_eq!(breakdown.effective_rate, dec!(5.4));
/// ```
pub fn compute_tax(gross_income: Decimal) -> TaxBreakdown {
    let gross_income = gross_income.max(Decimal::ZERO);
    let relief = consolidated_relief(gross_income);
    let taxable_income = (gross_income - relief).max(Decimal::ZERO);

    let mut remaining = taxable_income;
    let mut bands = Vec::new();
    let mut total_tax = Decimal::ZERO;

    for band in TAX_BANDS.iter() {
        if remaining <= Decimal::ZERO {
            break;
        }

        let taxed_amount = match band.width {
            Some(width) => width.min(remaining),
            None => remaining,
        };
        let tax = taxed_amount * band.rate;

        bands.push(BandCharge {
            rate: band.rate,
            taxed_amount,
            tax,
        });
        total_tax += tax;
        remaining -= taxed_amount;
    }

    let effective_rate = if gross_income.is_zero() {
        Decimal::ZERO
    } else {
        (total_tax / gross_income * dec!(100)).normalize()
    };

    TaxBreakdown {
        gross_income,
        consolidated_relief: relief,
        taxable_income,
        total_tax,
        effective_rate,
        bands,
    }
}
