//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! The loaded statement lives only in this process. History is kept in
//! memory and never written to disk.

use crate::commands::{build_extractor, parse_income, run_extraction};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rust_decimal::Decimal;
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use std::path::{Path, PathBuf};
use taxscan_domain::traits::DocumentProvider;
use taxscan_domain::{compute_tax, StatementSession};
use taxscan_extractor::Extractor;

/// Run the interactive REPL.
pub async fn run_repl(config: &Config, api_key: Option<String>, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.info("taxscan REPL - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(config.settings.history_size)
        .map_err(|e| CliError::Editor(e.to_string()))?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(|e| CliError::Editor(e.to_string()))?;

    let extractor = build_extractor(config, api_key);
    let mut session = StatementSession::new();

    loop {
        let prompt = match session.source() {
            Some(source) => format!("taxscan [{}]> ", source),
            None => "taxscan> ".to_string(),
        };

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(
                            cmd,
                            &mut session,
                            &extractor,
                            config.settings.max_upload_bytes,
                            formatter,
                        )
                        .await
                        {
                            eprintln!("{}", formatter.error(&e.to_string()));
                            if let Some(hint) = e.hint() {
                                eprintln!("{}", formatter.info(hint));
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    Ok(())
}

/// REPL command type.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Exit,
    Help,
    Load { path: PathBuf, deep: bool },
    List,
    Totals,
    Tax(Option<Decimal>),
    Reset,
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "load" => parse_load_command(&parts[1..]),
        "list" | "ls" => Ok(ReplCommand::List),
        "totals" => Ok(ReplCommand::Totals),
        "tax" => match parts.get(1) {
            None => Ok(ReplCommand::Tax(None)),
            Some(_) => Ok(ReplCommand::Tax(Some(parse_income(&parts[1..].join(""))?))),
        },
        "reset" | "clear" => Ok(ReplCommand::Reset),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

fn parse_load_command(args: &[&str]) -> Result<ReplCommand> {
    let deep = args.iter().any(|a| *a == "--deep" || *a == "deep");
    let path: Vec<&str> = args
        .iter()
        .copied()
        .filter(|a| *a != "--deep" && *a != "deep")
        .collect();

    if path.is_empty() {
        return Err(CliError::InvalidInput("Usage: load <file> [--deep]".to_string()));
    }

    Ok(ReplCommand::Load {
        path: PathBuf::from(path.join(" ")),
        deep,
    })
}

/// Execute a REPL command against the session.
async fn execute_repl_command<P>(
    cmd: ReplCommand,
    session: &mut StatementSession,
    extractor: &Extractor<P>,
    max_upload_bytes: u64,
    formatter: &Formatter,
) -> Result<()>
where
    P: DocumentProvider,
{
    match cmd {
        ReplCommand::Load { path, deep } => {
            println!("{}", formatter.info(&format!("Reading {}...", path.display())));
            let result = run_extraction(extractor, &path, deep, max_upload_bytes).await?;
            let count = result.transactions.len();
            session.replace(display_name(&path), result.transactions);

            if count == 0 {
                println!("{}", formatter.warning("No transactions found in this document"));
            } else {
                println!(
                    "{}",
                    formatter.success(&format!("Loaded {} transaction(s) using the {} tier", count, result.metadata.tier))
                );
            }
        }
        ReplCommand::List => {
            require_loaded(session)?;
            println!("{}", formatter.format_transactions(session.transactions())?);
        }
        ReplCommand::Totals => {
            require_loaded(session)?;
            println!("{}", formatter.format_totals(&session.totals())?);
        }
        ReplCommand::Tax(Some(gross_income)) => {
            println!("{}", formatter.format_tax(&compute_tax(gross_income))?);
        }
        ReplCommand::Tax(None) => {
            require_loaded(session)?;
            println!("{}", formatter.format_tax(&session.tax())?);
        }
        ReplCommand::Reset => {
            session.reset();
            println!("{}", formatter.success("Statement cleared"));
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

fn require_loaded(session: &StatementSession) -> Result<()> {
    if session.is_loaded() {
        Ok(())
    } else {
        Err(CliError::NotLoaded)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Print REPL help.
fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  load <file> [--deep]   - Extract transactions from a PDF, JPEG or PNG statement");
    println!("  list, ls               - Show the loaded transactions");
    println!("  totals                 - Show credit and debit totals");
    println!("  tax [income]           - Estimate tax on loaded credits, or on a given income");
    println!("  reset, clear           - Drop the loaded statement");
    println!("  help, ?                - Show this help");
    println!("  exit, quit, q          - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use taxscan_extractor::ExtractorConfig;
    use taxscan_llm::MockProvider;

    const TWO_LINES: &str = r#"[
        {"date":"2024-01-31","description":"Salary","amount":1000000,"type":"CREDIT"},
        {"date":"2024-01-05","description":"Rent","amount":250000,"type":"DEBIT"}
    ]"#;

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_repl_command("quit").unwrap(), ReplCommand::Exit);
        assert_eq!(parse_repl_command("?").unwrap(), ReplCommand::Help);
        assert_eq!(parse_repl_command("ls").unwrap(), ReplCommand::List);
        assert_eq!(parse_repl_command("reset").unwrap(), ReplCommand::Reset);
        assert_eq!(parse_repl_command("tax").unwrap(), ReplCommand::Tax(None));
    }

    #[test]
    fn test_parse_tax_with_income() {
        assert_eq!(
            parse_repl_command("tax 4,250,000").unwrap(),
            ReplCommand::Tax(Some(dec!(4250000)))
        );
        assert!(parse_repl_command("tax lots").is_err());
    }

    #[test]
    fn test_parse_load() {
        assert_eq!(
            parse_repl_command("load jan.pdf --deep").unwrap(),
            ReplCommand::Load {
                path: PathBuf::from("jan.pdf"),
                deep: true
            }
        );
        assert_eq!(
            parse_repl_command("load my statement.pdf").unwrap(),
            ReplCommand::Load {
                path: PathBuf::from("my statement.pdf"),
                deep: false
            }
        );
        assert!(parse_repl_command("load").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_repl_command("frobnicate").unwrap_err();
        assert!(err.to_string().contains("Unknown command"));
    }

    #[tokio::test]
    async fn test_commands_need_loaded_statement() {
        let extractor = Extractor::new(MockProvider::new("[]"), ExtractorConfig::default());
        let mut session = StatementSession::new();

        let result = execute_repl_command(ReplCommand::List, &mut session, &extractor, 1024, &formatter()).await;
        assert!(matches!(result, Err(CliError::NotLoaded)));

        let result = execute_repl_command(ReplCommand::Tax(None), &mut session, &extractor, 1024, &formatter()).await;
        assert!(matches!(result, Err(CliError::NotLoaded)));
    }

    #[tokio::test]
    async fn test_load_replaces_and_reset_clears() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.7").unwrap();

        let extractor = Extractor::new(MockProvider::new(TWO_LINES), ExtractorConfig::default());
        let mut session = StatementSession::new();
        session.replace("old.pdf", Vec::new());

        let load = ReplCommand::Load {
            path: file.path().to_path_buf(),
            deep: false,
        };
        execute_repl_command(load, &mut session, &extractor, 1024, &formatter())
            .await
            .unwrap();

        assert_eq!(session.transactions().len(), 2);
        assert_ne!(session.source(), Some("old.pdf"));
        assert_eq!(session.tax().total_tax, dec!(54000));

        execute_repl_command(ReplCommand::Reset, &mut session, &extractor, 1024, &formatter())
            .await
            .unwrap();
        assert!(!session.is_loaded());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_statement() {
        let extractor = Extractor::new(MockProvider::failing("HTTP 429: quota"), ExtractorConfig::default());
        let mut session = StatementSession::new();
        session.replace("previous.pdf", Vec::new());

        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.7").unwrap();
        let load = ReplCommand::Load {
            path: file.path().to_path_buf(),
            deep: false,
        };

        let result = execute_repl_command(load, &mut session, &extractor, 1024, &formatter()).await;
        assert!(matches!(result, Err(CliError::Extraction(_))));
        assert_eq!(session.source(), Some("previous.pdf"));
    }
}
