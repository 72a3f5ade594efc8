//! Transaction module - the unit read off a bank statement

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of money movement on a statement line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money into the account
    #[serde(rename = "CREDIT", alias = "credit", alias = "Credit")]
    Credit,

    /// Money out of the account
    #[serde(rename = "DEBIT", alias = "debit", alias = "Debit")]
    Debit,
}

impl TransactionType {
    /// Wire name of the transaction type
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
        }
    }

    /// Parse a transaction type, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CREDIT" => Some(TransactionType::Credit),
            "DEBIT" => Some(TransactionType::Debit),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single statement line
///
/// Transactions keep the order in which they appear in the document and are
/// never deduplicated. The amount is always non-negative; direction is carried
/// by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Posting date (no time component)
    pub date: NaiveDate,

    /// Free-text narration as printed on the statement
    pub description: String,

    /// Non-negative amount in currency units
    pub amount: Decimal,

    /// Credit or debit
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Transaction {
    /// Create a transaction, normalizing the amount to its absolute value
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        kind: TransactionType,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount: amount.abs(),
            kind,
        }
    }

    /// Whether this line is money in
    pub fn is_credit(&self) -> bool {
        self.kind == TransactionType::Credit
    }
}

/// Aggregate cash flows over a transaction set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatementTotals {
    /// Sum of CREDIT amounts
    pub credits: Decimal,
    /// Sum of DEBIT amounts
    pub debits: Decimal,
    /// Number of CREDIT lines
    pub credit_count: usize,
    /// Number of DEBIT lines
    pub debit_count: usize,
}

impl StatementTotals {
    /// Sum a transaction set by direction
    ///
    /// Sums saturate at `Decimal::MAX` instead of overflowing.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(StatementTotals::default(), |mut totals, tx| {
                match tx.kind {
                    TransactionType::Credit => {
                        totals.credits = saturating_add(totals.credits, tx.amount);
                        totals.credit_count += 1;
                    }
                    TransactionType::Debit => {
                        totals.debits = saturating_add(totals.debits, tx.amount);
                        totals.debit_count += 1;
                    }
                }
                totals
            })
    }

    /// Credits minus debits
    pub fn net(&self) -> Decimal {
        self.credits - self.debits
    }
}

fn saturating_add(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_wire_format() {
        let tx: Transaction = serde_json::from_str(
            r#"{"date":"2024-01-01","description":"Salary","amount":500000,"type":"CREDIT"}"#,
        )
        .unwrap();

        assert_eq!(tx.date, date(2024, 1, 1));
        assert_eq!(tx.description, "Salary");
        assert_eq!(tx.amount, dec!(500000));
        assert_eq!(tx.kind, TransactionType::Credit);
    }

    #[test]
    fn test_lowercase_type_accepted() {
        let tx: Transaction = serde_json::from_str(
            r#"{"date":"2024-03-09","description":"POS","amount":"1250.50","type":"debit"}"#,
        )
        .unwrap();
        assert_eq!(tx.kind, TransactionType::Debit);
        assert_eq!(tx.amount, dec!(1250.50));
    }

    #[test]
    fn test_new_normalizes_negative_amount() {
        let tx = Transaction::new(date(2024, 2, 1), "Transfer", dec!(-300), TransactionType::Debit);
        assert_eq!(tx.amount, dec!(300));
    }

    #[test]
    fn test_type_parse() {
        assert_eq!(TransactionType::parse(" credit "), Some(TransactionType::Credit));
        assert_eq!(TransactionType::parse("DEBIT"), Some(TransactionType::Debit));
        assert_eq!(TransactionType::parse("refund"), None);
    }

    #[test]
    fn test_totals() {
        let txs = vec![
            Transaction::new(date(2024, 1, 1), "Salary", dec!(500000), TransactionType::Credit),
            Transaction::new(date(2024, 1, 3), "Rent", dec!(120000), TransactionType::Debit),
            Transaction::new(date(2024, 1, 2), "Refund", dec!(2500.75), TransactionType::Credit),
        ];

        let totals = StatementTotals::from_transactions(&txs);
        assert_eq!(totals.credits, dec!(502500.75));
        assert_eq!(totals.debits, dec!(120000));
        assert_eq!(totals.credit_count, 2);
        assert_eq!(totals.debit_count, 1);
        assert_eq!(totals.net(), dec!(382500.75));
    }

    #[test]
    fn test_totals_saturate_on_huge_amounts() {
        let txs = vec![
            Transaction::new(date(2024, 1, 1), "A", Decimal::MAX, TransactionType::Credit),
            Transaction::new(date(2024, 1, 2), "B", Decimal::MAX, TransactionType::Credit),
            Transaction::new(date(2024, 1, 3), "C", Decimal::MAX, TransactionType::Debit),
            Transaction::new(date(2024, 1, 4), "D", dec!(1), TransactionType::Debit),
        ];

        let totals = StatementTotals::from_transactions(&txs);
        assert_eq!(totals.credits, Decimal::MAX);
        assert_eq!(totals.debits, Decimal::MAX);
        assert_eq!(totals.credit_count, 2);
        assert_eq!(totals.net(), Decimal::ZERO);
    }

    #[test]
    fn test_totals_empty() {
        let totals = StatementTotals::from_transactions(&[]);
        assert_eq!(totals, StatementTotals::default());
    }
}
