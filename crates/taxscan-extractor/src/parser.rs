//! Repair and parse provider output into transactions
//!
//! Provider output is untrusted text. It may be wrapped in a markdown code
//! fence and, on long statements, it may stop mid-object. A truncated array is
//! cut back to its last complete object and closed before parsing. Anything
//! that still fails to parse is rejected.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Map, Value};
use std::str::FromStr;
use taxscan_domain::{Transaction, TransactionType};
use thiserror::Error;
use tracing::{debug, warn};

/// Largest amount accepted for a single statement line
///
/// Anything above this is a misread, not a transaction; such items are skipped.
pub const MAX_TRANSACTION_AMOUNT: Decimal = dec!(1000000000000000);

/// Why a response could not be turned into transactions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not valid JSON even after repair
    #[error("JSON parse error: {0}")]
    Json(String),

    /// Valid JSON, but not an array of transactions
    #[error("Expected JSON array, got {0}")]
    NotAnArray(&'static str),

    /// Truncated before any object completed
    #[error("Truncated response contains no complete object")]
    Unrepairable,
}

/// Transactions read from one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Valid transactions in document order
    pub transactions: Vec<Transaction>,

    /// Whether a truncated array had to be closed
    pub repaired: bool,

    /// Array items dropped because they were not valid transactions
    pub skipped: usize,
}

/// Parse a provider response into transactions
pub fn parse_provider_response(response: &str) -> Result<ParsedResponse, ParseError> {
    let unwrapped = strip_code_fence(response);
    let (json_str, repaired) = repair_truncated_array(unwrapped)?;

    if repaired {
        warn!("Provider response was truncated; kept the complete objects only");
    }

    let json: Value = serde_json::from_str(&json_str).map_err(|e| ParseError::Json(e.to_string()))?;

    let items = match json {
        Value::Array(items) => items,
        // Some models wrap the array despite the schema
        Value::Object(mut obj) => match obj.remove("transactions") {
            Some(Value::Array(items)) => items,
            _ => return Err(ParseError::NotAnArray("object")),
        },
        other => return Err(ParseError::NotAnArray(json_type_name(&other))),
    };

    let mut transactions = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (idx, item) in items.iter().enumerate() {
        match parse_transaction_json(item) {
            Ok(tx) => transactions.push(tx),
            Err(e) => {
                warn!("Skipping item {}: {}", idx, e);
                skipped += 1;
            }
        }
    }

    debug!("Parsed {} transactions ({} skipped)", transactions.len(), skipped);

    Ok(ParsedResponse {
        transactions,
        repaired,
        skipped,
    })
}

/// Remove a surrounding markdown code fence, if any
///
/// The closing fence is optional: a truncated response loses it.
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Drop the opening fence line (``` or ```json)
    let body = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed.trim_start_matches('`'),
    };

    body.trim_end().trim_end_matches("```").trim()
}

/// Close an array that opens with `[` but never reaches its `]`
///
/// Returns the (possibly repaired) text and whether a repair happened.
fn repair_truncated_array(json: &str) -> Result<(String, bool), ParseError> {
    if !json.starts_with('[') || json.ends_with(']') {
        return Ok((json.to_string(), false));
    }

    let last_brace = json.rfind('}').ok_or(ParseError::Unrepairable)?;
    let mut repaired = String::with_capacity(last_brace + 2);
    repaired.push_str(&json[..=last_brace]);
    repaired.push(']');
    Ok((repaired, true))
}

/// Parse a single transaction from JSON
fn parse_transaction_json(json: &Value) -> Result<Transaction, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Transaction is not a JSON object".to_string())?;

    let date = obj
        .get("date")
        .and_then(|v| v.as_str())
        .and_then(parse_date)
        .ok_or_else(|| "Missing or invalid 'date'".to_string())?;

    let description = obj
        .get("description")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing or invalid 'description'".to_string())?
        .trim()
        .to_string();

    let amount = obj
        .get("amount")
        .and_then(parse_amount)
        .ok_or_else(|| "Missing or invalid 'amount'".to_string())?;
    if amount > MAX_TRANSACTION_AMOUNT {
        return Err(format!("Amount {} exceeds {}", amount, MAX_TRANSACTION_AMOUNT));
    }

    let kind = type_field(obj)
        .and_then(TransactionType::parse)
        .ok_or_else(|| "Missing or invalid 'type'".to_string())?;

    Ok(Transaction::new(date, description, amount, kind))
}

fn type_field(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("type").and_then(|v| v.as_str())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    // Accept a trailing time component ("2024-01-01T00:00:00Z")
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_amount(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E' | '+'))
            .collect(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .map(|d| d.abs())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SALARY: &str = r#"{"date":"2024-01-01","description":"Salary","amount":500000,"type":"CREDIT"}"#;

    #[test]
    fn test_parse_single_transaction() {
        let response = format!("[{}]", SALARY);
        let parsed = parse_provider_response(&response).unwrap();

        assert_eq!(parsed.transactions.len(), 1);
        assert!(!parsed.repaired);
        let tx = &parsed.transactions[0];
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(tx.description, "Salary");
        assert_eq!(tx.amount, dec!(500000));
        assert_eq!(tx.kind, TransactionType::Credit);
    }

    #[test]
    fn test_repair_truncated_array() {
        let response = format!(r#"[{},{{"date":"2024-01-02","desc"#, SALARY);
        let parsed = parse_provider_response(&response).unwrap();

        assert!(parsed.repaired);
        assert_eq!(parsed.transactions.len(), 1);
        assert_eq!(parsed.transactions[0].description, "Salary");
    }

    #[test]
    fn test_repair_after_trailing_comma() {
        let response = format!("[{},", SALARY);
        let parsed = parse_provider_response(&response).unwrap();
        assert!(parsed.repaired);
        assert_eq!(parsed.transactions.len(), 1);
    }

    #[test]
    fn test_truncated_before_first_object_fails() {
        let result = parse_provider_response(r#"[{"date":"2024-01-01","descr"#);
        assert_eq!(result, Err(ParseError::Unrepairable));
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = format!("```json\n[{}]\n```", SALARY);
        let parsed = parse_provider_response(&response).unwrap();
        assert_eq!(parsed.transactions.len(), 1);
        assert!(!parsed.repaired);
    }

    #[test]
    fn test_truncated_inside_markdown_wrapper() {
        let response = format!("```json\n[{},{{\"date\":\"2024-02", SALARY);
        let parsed = parse_provider_response(&response).unwrap();
        assert!(parsed.repaired);
        assert_eq!(parsed.transactions.len(), 1);
    }

    #[test]
    fn test_parse_empty_array() {
        let parsed = parse_provider_response("[]").unwrap();
        assert!(parsed.transactions.is_empty());
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_provider_response("This statement is unreadable");
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn test_parse_json_not_array() {
        let result = parse_provider_response(r#""just a string""#);
        assert_eq!(result, Err(ParseError::NotAnArray("string")));
        let result = parse_provider_response(r#"{"date":"2024-01-01"}"#);
        assert_eq!(result, Err(ParseError::NotAnArray("object")));
    }

    #[test]
    fn test_parse_wrapped_in_transactions_object() {
        let response = format!(r#"{{"transactions":[{}]}}"#, SALARY);
        let parsed = parse_provider_response(&response).unwrap();
        assert_eq!(parsed.transactions.len(), 1);
    }

    #[test]
    fn test_parse_partial_success_preserves_order() {
        let response = r#"[
            {"date":"2024-01-05","description":"Transfer in","amount":"12,500.50","type":"credit"},
            {"date":"2024-13-40","description":"Bad date","amount":10,"type":"DEBIT"},
            {"date":"2024-01-03","description":"POS","amount":-2500,"type":"DEBIT"},
            {"date":"2024-01-04","description":"No type","amount":10},
            {"date":"2024-01-06T00:00:00Z","description":" ATM ","amount":1e3,"type":"DEBIT"}
        ]"#;

        let parsed = parse_provider_response(response).unwrap();
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.transactions.len(), 3);

        // Document order, not date order
        assert_eq!(parsed.transactions[0].description, "Transfer in");
        assert_eq!(parsed.transactions[0].amount, dec!(12500.50));
        assert_eq!(parsed.transactions[1].amount, dec!(2500));
        assert_eq!(parsed.transactions[2].description, "ATM");
        assert_eq!(parsed.transactions[2].amount, dec!(1000));
        assert_eq!(parsed.transactions[2].date, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    }

    #[test]
    fn test_implausible_amounts_skipped() {
        let response = r#"[
            {"date":"2024-01-01","description":"Misread","amount":"79228162514264337593543950335","type":"CREDIT"},
            {"date":"2024-01-02","description":"Misread","amount":79228162514264337593543950335,"type":"CREDIT"},
            {"date":"2024-01-03","description":"Ceiling","amount":"1000000000000000","type":"CREDIT"},
            {"date":"2024-01-04","description":"Salary","amount":500000,"type":"CREDIT"}
        ]"#;

        let parsed = parse_provider_response(response).unwrap();
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.transactions.len(), 2);
        assert_eq!(parsed.transactions[0].amount, MAX_TRANSACTION_AMOUNT);
        assert_eq!(parsed.transactions[1].description, "Salary");
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("  []  "), "[]");
        assert_eq!(strip_code_fence("```json\n[1,"), "[1,");
    }

    #[test]
    fn test_repair_leaves_closed_arrays_alone() {
        assert_eq!(repair_truncated_array("[1]").unwrap(), ("[1]".to_string(), false));
        assert_eq!(repair_truncated_array("{}").unwrap(), ("{}".to_string(), false));
    }
}
