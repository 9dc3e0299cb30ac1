// src/catalog.rs

use crate::error::Result;
use csv::ReaderBuilder;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use std::{fs, path::Path};
use tracing::{info, warn};

/// Autocomplete never shows more than this many entries.
pub const MAX_SUGGESTIONS: usize = 12;

static SHORT_FILE_NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,4}$").expect("static regex"));

/// Contract number → buyer lookup, loaded from the contract sheet export.
#[derive(Debug, Clone, Default)]
pub struct ContractBook {
    contracts: BTreeMap<String, String>,
}

/// Result of resolving what was typed into the File No field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNoMatch {
    /// Value to store in the field (possibly prefixed).
    pub file_no: String,
    /// Buyer owning the contract, if known.
    pub buyer: Option<String>,
}

impl ContractBook {
    /// Parse `contract,customer[,...]` rows. The first row is a header; rows
    /// with fewer than two fields are skipped.
    pub fn from_csv(text: &str) -> Self {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut contracts = BTreeMap::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    warn!(line = idx + 2, error = %e, "Skipping unreadable contract row");
                    continue;
                }
            };
            let (Some(contract), Some(customer)) = (record.get(0), record.get(1)) else {
                continue;
            };
            if contract.is_empty() {
                continue;
            }
            contracts.insert(contract.to_string(), customer.to_string());
        }

        Self { contracts }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let book = Self::from_csv(&fs::read_to_string(path)?);
        info!(path = %path.display(), contracts = book.len(), "Loaded contract book");
        Ok(book)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    pub fn buyer_for(&self, contract: &str) -> Option<&str> {
        self.contracts.get(contract).map(String::as_str)
    }

    /// Distinct buyer names, sorted.
    pub fn buyers(&self) -> Vec<String> {
        self.contracts
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All contract numbers, sorted.
    pub fn contracts(&self) -> Vec<String> {
        self.contracts.keys().cloned().collect()
    }

    /// Resolve a typed file number.
    ///
    /// A bare 1-4 digit number is expanded to `{prefix}{n}` when that
    /// contract exists. Anything else is looked up as typed, then upper-cased.
    pub fn resolve_file_no(&self, value: &str, prefix: &str) -> FileNoMatch {
        let trimmed = value.trim();

        if SHORT_FILE_NO.is_match(trimmed) {
            let prefixed = format!("{prefix}{trimmed}");
            if let Some(buyer) = self.buyer_for(&prefixed) {
                return FileNoMatch {
                    buyer: Some(buyer.to_string()),
                    file_no: prefixed,
                };
            }
            return FileNoMatch {
                file_no: value.to_string(),
                buyer: None,
            };
        }

        let buyer = self
            .buyer_for(trimmed)
            .or_else(|| self.buyer_for(&trimmed.to_uppercase()))
            .map(str::to_string);
        FileNoMatch {
            file_no: value.to_string(),
            buyer,
        }
    }
}

/// Known supplier names, one per line in the source file.
#[derive(Debug, Clone, Default)]
pub struct SupplierList {
    names: Vec<String>,
}

impl SupplierList {
    pub fn from_lines(text: &str) -> Self {
        let mut names: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let list = Self::from_lines(&fs::read_to_string(path)?);
        info!(path = %path.display(), suppliers = list.names.len(), "Loaded supplier list");
        Ok(list)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Case-insensitive substring matches for an input field.
///
/// Nothing is suggested until at least `threshold` characters are typed.
pub fn suggestions<'a>(value: &str, candidates: &'a [String], threshold: usize) -> Vec<&'a str> {
    if value.is_empty() || value.chars().count() < threshold {
        return Vec::new();
    }
    let needle = value.to_lowercase();
    candidates
        .iter()
        .filter(|c| c.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .map(String::as_str)
        .collect()
}
