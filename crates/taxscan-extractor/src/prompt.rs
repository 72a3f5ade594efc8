//! Instructions and response schema for statement extraction

use serde_json::json;

/// Instructions sent alongside the document
pub const EXTRACTION_INSTRUCTIONS: &str = r#"You are reading a bank statement. Extract every transaction line in the document.

Rules:
- Scan the ENTIRE document, every page, from the first line to the last.
- Do not summarize, sample, group or truncate. One output object per statement line.
- Keep the order in which transactions appear in the document.
- "date": the posting date as YYYY-MM-DD.
- "description": the narration exactly as printed.
- "amount": the absolute amount as a plain number, no currency symbols or thousands separators.
- "type": "CREDIT" for money into the account, "DEBIT" for money out.
- Skip opening/closing balances, subtotals and page headers; they are not transactions.
- If the document contains no transactions, return an empty array.

Return ONLY the JSON array, no markdown code blocks, no explanations."#;

/// JSON schema constraining the response to an array of transactions
///
/// Each item carries exactly `date`, `description`, `amount` and `type`.
pub fn response_schema() -> String {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "date": {
                    "type": "STRING",
                    "description": "Posting date, YYYY-MM-DD"
                },
                "description": {
                    "type": "STRING",
                    "description": "Transaction narration as printed"
                },
                "amount": {
                    "type": "NUMBER",
                    "description": "Absolute amount"
                },
                "type": {
                    "type": "STRING",
                    "enum": ["CREDIT", "DEBIT"]
                }
            },
            "required": ["date", "description", "amount", "type"],
            "propertyOrdering": ["date", "description", "amount", "type"]
        }
    })
    .to_string()
}
