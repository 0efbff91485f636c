//! Output module for catalog exports and reports
//!
//! This module handles:
//! - Writing the catalog snapshot as CSV (full replace)
//! - Loading an exported catalog back for searching
//! - Printing run reports and search results

mod csv;
mod report;

pub use self::csv::{export_catalog, import_catalog, parse_catalog, write_catalog, HEADER};
pub use report::{print_report, print_search_results, RunReport};

use thiserror::Error;

/// Errors that can occur during export or import
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog file: {0}")]
    Format(String),
}

/// Result type for output operations
pub type ExportResult<T> = Result<T, ExportError>;
