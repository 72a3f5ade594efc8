//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs;
use std::path::Path;
use taxscan_domain::traits::DocumentProvider;
use taxscan_domain::{compute_tax, DocumentPayload, MimeType, ProviderChoice, StatementTotals};
use taxscan_extractor::{ExtractionRequest, ExtractionResult, Extractor};
use taxscan_llm::GeminiProvider;
use tracing::info;

const MIB: u64 = 1024 * 1024;

/// Build an extractor backed by the configured Gemini endpoint.
pub fn build_extractor(config: &Config, api_key: Option<String>) -> Extractor<GeminiProvider> {
    let provider = GeminiProvider::new(config.resolve_api_key(api_key))
        .with_endpoint(config.provider.endpoint.clone())
        .with_timeout_secs(config.provider.timeout_secs);
    Extractor::new(provider, config.extraction.clone())
}

/// Read a statement file into a payload after type and size checks.
pub fn load_document(path: &Path, max_upload_bytes: u64) -> Result<DocumentPayload> {
    let mime_type = MimeType::from_path(path).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "Unsupported file type: {} (expected PDF, JPEG or PNG)",
            path.display()
        ))
    })?;

    let size = fs::metadata(path)?.len();
    if size == 0 {
        return Err(CliError::InvalidInput(format!("{} is empty", path.display())));
    }
    if size > max_upload_bytes {
        return Err(CliError::InvalidInput(format!(
            "{} is {:.1} MB; the upload limit is {:.1} MB",
            path.display(),
            size as f64 / MIB as f64,
            max_upload_bytes as f64 / MIB as f64
        )));
    }

    let bytes = fs::read(path)?;
    Ok(DocumentPayload::from_bytes(&bytes, mime_type))
}

/// Load a file and run it through the extractor.
pub async fn run_extraction<P>(
    extractor: &Extractor<P>,
    path: &Path,
    deep: bool,
    max_upload_bytes: u64,
) -> Result<ExtractionResult>
where
    P: DocumentProvider,
{
    let document = load_document(path, max_upload_bytes)?;
    let preference = if deep {
        ProviderChoice::Deep
    } else {
        ProviderChoice::Fast
    };

    info!("Extracting {}", path.display());
    let result = extractor
        .extract_detailed(ExtractionRequest::new(document, preference))
        .await?;
    Ok(result)
}

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    api_key: Option<String>,
    formatter: &Formatter,
) -> Result<()> {
    let extractor = build_extractor(config, api_key);
    let result = run_extraction(&extractor, &args.file, args.deep, config.settings.max_upload_bytes).await?;

    let tax = if args.no_tax {
        None
    } else {
        let totals = StatementTotals::from_transactions(&result.transactions);
        Some(compute_tax(totals.credits))
    };

    println!(
        "{}",
        formatter.format_statement(&result.transactions, &result.metadata, tax.as_ref())?
    );
    Ok(())
}
