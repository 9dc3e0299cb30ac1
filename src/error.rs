// src/error.rs

use thiserror::Error;

/// Errors raised around the pure core: reading config and catalog files,
/// refusing an incomplete bill, and writing the documents.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Config(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Please enter a Buyer Name")]
    MissingBuyer,

    #[error("Please enter a valid billing date (got {0:?})")]
    InvalidBillingDate(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
