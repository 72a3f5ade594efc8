//! CLI command definitions and argument parsing.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// taxscan - Extract bank statement transactions and estimate personal income tax.
#[derive(Debug, Parser)]
#[command(name = "taxscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Provider API key
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract transactions from a statement and estimate tax on the credits
    Extract(ExtractArgs),

    /// Estimate tax for a gross annual income
    Tax(TaxArgs),

    /// Show or change the configuration
    Config(ConfigArgs),

    /// Start interactive REPL mode
    Repl,
}

/// Arguments for the extract command.
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Statement file (PDF, JPEG or PNG)
    pub file: PathBuf,

    /// Use the deep, high-context tier regardless of size
    #[arg(long)]
    pub deep: bool,

    /// Skip the tax estimate
    #[arg(long)]
    pub no_tax: bool,
}

/// Arguments for the tax command.
#[derive(Debug, Clone, Args)]
pub struct TaxArgs {
    /// Gross annual income, e.g. 4250000 or 4,250,000.50
    pub gross_income: String,
}

/// Arguments for the config command.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Store an API key in the configuration file
    SetKey {
        /// API key
        key: String,
    },

    /// Remove the stored API key
    ClearKey,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_means_repl() {
        let cli = Cli::try_parse_from(["taxscan"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_extract_parsing() {
        let cli = Cli::try_parse_from(["taxscan", "extract", "statement.pdf", "--deep", "-f", "json"]).unwrap();

        match cli.command {
            Some(Command::Extract(args)) => {
                assert_eq!(args.file, PathBuf::from("statement.pdf"));
                assert!(args.deep);
                assert!(!args.no_tax);
            }
            _ => panic!("Expected Extract command"),
        }
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }

    #[test]
    fn test_extract_requires_file() {
        assert!(Cli::try_parse_from(["taxscan", "extract"]).is_err());
    }

    #[test]
    fn test_tax_parsing() {
        let cli = Cli::try_parse_from(["taxscan", "tax", "4250000"]).unwrap();
        match cli.command {
            Some(Command::Tax(args)) => assert_eq!(args.gross_income, "4250000"),
            _ => panic!("Expected Tax command"),
        }
    }

    #[test]
    fn test_config_set_key_parsing() {
        let cli = Cli::try_parse_from(["taxscan", "config", "set-key", "abc"]).unwrap();
        match cli.command {
            Some(Command::Config(ConfigArgs {
                action: ConfigAction::SetKey { key },
            })) => assert_eq!(key, "abc"),
            _ => panic!("Expected Config set-key command"),
        }
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["taxscan", "-vv", "repl"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Command::Repl)));
    }

    #[test]
    fn test_format_conversion() {
        use crate::config::OutputFormat;
        assert_eq!(OutputFormat::from(CliFormat::Table), OutputFormat::Table);
        assert_eq!(OutputFormat::from(CliFormat::Json), OutputFormat::Json);
    }
}
