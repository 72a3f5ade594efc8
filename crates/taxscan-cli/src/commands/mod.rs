//! Command implementations.

pub mod config;
pub mod extract;
pub mod tax;

pub use self::config::execute_config;
pub use self::extract::{build_extractor, execute_extract, load_document, run_extraction};
pub use self::tax::{execute_tax, parse_income};
