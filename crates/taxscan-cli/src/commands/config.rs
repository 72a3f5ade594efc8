//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{mask_secret, Config};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &mut Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config, path),
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::SetKey { key } => set_key(config, path, key, formatter),
        ConfigAction::ClearKey => {
            config.provider.api_key = None;
            config.save_to(path)?;
            println!("{}", formatter.success("API key removed"));
            Ok(())
        }
    }
}

/// Print the configuration with the API key masked.
fn show_config(config: &Config, path: &Path) -> Result<()> {
    let mut shown = config.clone();
    shown.provider.api_key = shown.provider.api_key.as_deref().map(mask_secret);

    let contents = toml::to_string_pretty(&shown)
        .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;

    println!("# {}", path.display());
    println!("{}", contents);
    Ok(())
}

fn set_key(config: &mut Config, path: &Path, key: String, formatter: &Formatter) -> Result<()> {
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(CliError::InvalidInput("API key cannot be empty".to_string()));
    }

    config.provider.api_key = Some(key);
    config.save_to(path)?;
    println!(
        "{}",
        formatter.success(&format!("API key saved to {}", path.display()))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    #[test]
    fn test_set_and_clear_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        let args = ConfigArgs {
            action: ConfigAction::SetKey {
                key: " secret-key ".to_string(),
            },
        };
        execute_config(args, &mut config, &path, &formatter()).unwrap();
        assert_eq!(
            Config::load_from(&path).unwrap().provider.api_key.as_deref(),
            Some("secret-key")
        );

        let args = ConfigArgs {
            action: ConfigAction::ClearKey,
        };
        execute_config(args, &mut config, &path, &formatter()).unwrap();
        assert!(Config::load_from(&path).unwrap().provider.api_key.is_none());
    }

    #[test]
    fn test_empty_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        let args = ConfigArgs {
            action: ConfigAction::SetKey { key: "  ".to_string() },
        };
        assert!(execute_config(args, &mut config, &path, &formatter()).is_err());
        assert!(!path.exists());
    }
}
