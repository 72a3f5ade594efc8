//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style},
};
use taxscan_domain::{StatementTotals, TaxBreakdown, Transaction};
use taxscan_extractor::ExtractionMetadata;

/// Shown once, the first time the CLI runs.
pub const PRIVACY_NOTICE: &str = "Statements you extract are sent to the configured AI provider for reading. \
Nothing you load is stored on disk; transactions live only in memory for the current run.";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a transaction list.
    pub fn format_transactions(&self, transactions: &[Transaction]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(transactions)?),
            OutputFormat::Table => Ok(self.transactions_table(transactions)),
        }
    }

    /// Format credit/debit totals.
    pub fn format_totals(&self, totals: &StatementTotals) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&totals_json(totals))?),
            OutputFormat::Table => Ok(self.totals_table(totals)),
        }
    }

    /// Format a tax computation.
    pub fn format_tax(&self, tax: &TaxBreakdown) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(tax)?),
            OutputFormat::Table => Ok(self.tax_tables(tax)),
        }
    }

    /// Format a full extraction: transactions, totals, run details and an optional tax estimate.
    pub fn format_statement(
        &self,
        transactions: &[Transaction],
        metadata: &ExtractionMetadata,
        tax: Option<&TaxBreakdown>,
    ) -> Result<String> {
        let totals = StatementTotals::from_transactions(transactions);

        match self.format {
            OutputFormat::Json => {
                let mut value = json!({
                    "transactions": transactions,
                    "totals": totals_json(&totals),
                    "metadata": {
                        "tier": metadata.tier.as_str(),
                        "model": metadata.model,
                        "decoded_size_bytes": metadata.decoded_size_bytes,
                        "attempts": metadata.attempts,
                        "repaired": metadata.repaired,
                        "skipped_items": metadata.skipped_items,
                        "processing_time_ms": metadata.processing_time_ms,
                    },
                });
                if let Some(tax) = tax {
                    value["tax"] = serde_json::to_value(tax)?;
                }
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut sections = vec![
                    self.transactions_table(transactions),
                    self.totals_table(&totals),
                ];
                if let Some(tax) = tax {
                    sections.push(self.tax_tables(tax));
                }
                sections.push(self.run_summary(metadata));
                Ok(sections.join("\n\n"))
            }
        }
    }

    fn transactions_table(&self, transactions: &[Transaction]) -> String {
        if transactions.is_empty() {
            return self.colorize("No transactions found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Date", "Description", "Type", "Amount"]);

        for tx in transactions {
            builder.push_record([
                tx.date.to_string(),
                tx.description.clone(),
                tx.kind.to_string(),
                format_amount(tx.amount),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Modify::new(Columns::last()).with(Alignment::right()));

        table.to_string()
    }

    fn totals_table(&self, totals: &StatementTotals) -> String {
        let mut builder = Builder::default();
        builder.push_record(["", "Count", "Total"]);
        builder.push_record([
            "Credits".to_string(),
            totals.credit_count.to_string(),
            format_amount(totals.credits),
        ]);
        builder.push_record([
            "Debits".to_string(),
            totals.debit_count.to_string(),
            format_amount(totals.debits),
        ]);
        builder.push_record([
            "Net".to_string(),
            String::new(),
            format_amount(totals.net()),
        ]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

        table.to_string()
    }

    fn tax_tables(&self, tax: &TaxBreakdown) -> String {
        let mut summary = Builder::default();
        summary.push_record(["Gross income".to_string(), format_amount(tax.gross_income)]);
        summary.push_record([
            "Consolidated relief".to_string(),
            format_amount(tax.consolidated_relief),
        ]);
        summary.push_record(["Taxable income".to_string(), format_amount(tax.taxable_income)]);
        summary.push_record(["Total tax".to_string(), format_amount(tax.total_tax)]);
        summary.push_record(["Effective rate".to_string(), format_percent(tax.effective_rate)]);

        let mut summary = summary.build();
        summary
            .with(Style::rounded())
            .with(Modify::new(Columns::last()).with(Alignment::right()));

        if tax.bands.is_empty() {
            return format!(
                "{}\n{}",
                summary,
                self.colorize("Income is fully covered by relief; no tax due.", "green")
            );
        }

        let mut bands = Builder::default();
        bands.push_record(["Rate", "Taxed amount", "Tax"]);
        for band in &tax.bands {
            bands.push_record([
                format_percent(band.rate * Decimal::ONE_HUNDRED),
                format_amount(band.taxed_amount),
                format_amount(band.tax),
            ]);
        }

        let mut bands = bands.build();
        bands
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

        format!("{}\n{}", summary, bands)
    }

    fn run_summary(&self, metadata: &ExtractionMetadata) -> String {
        let mut line = format!(
            "{} tier ({}), {} attempt(s), {} ms",
            metadata.tier, metadata.model, metadata.attempts, metadata.processing_time_ms
        );
        if metadata.repaired {
            line.push_str(", truncated response repaired");
        }
        if metadata.skipped_items > 0 {
            line.push_str(&format!(", {} unreadable row(s) skipped", metadata.skipped_items));
        }
        self.info(&line)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn totals_json(totals: &StatementTotals) -> Value {
    json!({
        "credits": totals.credits,
        "debits": totals.debits,
        "net": totals.net(),
        "credit_count": totals.credit_count,
        "debit_count": totals.debit_count,
    })
}

/// Format money with thousands separators and two decimal places.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, fraction)
}

/// Format a percentage value (already scaled to 0-100).
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}
