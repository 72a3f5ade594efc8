//! taxscan - bank statement extraction and tax estimation from the command line.

use clap::Parser;
use taxscan_cli::commands;
use taxscan_cli::output::PRIVACY_NOTICE;
use taxscan_cli::repl;
use taxscan_cli::{Cli, Command, Config, Formatter};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run() -> taxscan_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    if !config.settings.onboarded {
        eprintln!("{}", formatter.info(PRIVACY_NOTICE));
        config.settings.onboarded = true;
        if let Err(e) = config.save_to(&config_path) {
            warn!("Could not record onboarding in {}: {}", config_path.display(), e);
        }
    }

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&config, cli.api_key, &formatter).await?;
        }
        Some(Command::Extract(args)) => {
            commands::execute_extract(args, &config, cli.api_key, &formatter).await?;
        }
        Some(Command::Tax(args)) => {
            commands::execute_tax(args, &formatter)?;
        }
        Some(Command::Config(args)) => {
            commands::execute_config(args, &mut config, &config_path, &formatter)?;
        }
    }

    Ok(())
}
