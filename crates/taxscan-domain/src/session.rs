//! In-memory holder for the current statement
//!
//! Transactions never leave process memory. Loading a new statement replaces
//! the previous set; `reset` drops it.

use crate::tax::{compute_tax, TaxBreakdown};
use crate::transaction::{StatementTotals, Transaction};

/// The transaction set of the most recent upload
#[derive(Debug, Clone, Default)]
pub struct StatementSession {
    source: Option<String>,
    transactions: Vec<Transaction>,
}

impl StatementSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current set with a freshly extracted one
    pub fn replace(&mut self, source: impl Into<String>, transactions: Vec<Transaction>) {
        self.source = Some(source.into());
        self.transactions = transactions;
    }

    /// Discard the current set
    pub fn reset(&mut self) {
        self.source = None;
        self.transactions.clear();
    }

    /// Name of the document the current set came from
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Current transactions in document order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Whether a statement is loaded
    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    /// Credit and debit totals
    pub fn totals(&self) -> StatementTotals {
        StatementTotals::from_transactions(&self.transactions)
    }

    /// Tax estimate on the sum of credits, recomputed on every call
    pub fn tax(&self) -> TaxBreakdown {
        compute_tax(self.totals().credits)
    }
}
