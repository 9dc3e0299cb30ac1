//! Bill of exchange reports: a bill header plus received line items, totalled
//! and rendered to a one-page PDF and a matching spreadsheet.

pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod format;
pub mod layout;
pub mod render;
pub mod report;

pub use error::{ReportError, Result};
pub use format::{amount_to_words, compact_date_token, format_currency};
