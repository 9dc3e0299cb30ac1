// src/report/mod.rs

mod totals;

pub use totals::{Totals, calculate_totals, parse_number};

use crate::error::{ReportError, Result};
use crate::format::{compact_date_token, format_fixed};
use serde::{Deserialize, Serialize};

/// Shortest billing date accepted for generation (`1/Jan/25`).
const MIN_BILLING_DATE_LEN: usize = 8;

/// Document-level fields shared by every line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportHeader {
    pub buyer_name: String,
    pub supplier_name: String,
    pub file_no: String,
    pub invoice_no: String,
    pub lc_number: String,
    pub invoice_date: String,
    pub billing_date: String,
}

/// A single row of received goods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub id: u64,
    pub fabric_code: String,
    pub item_description: String,
    pub color: String,
    pub hs_code: String,
    pub rcvd_date: String,
    pub challan_no: String,
    pub pi_number: String,
    pub unit: String,
    pub invoice_qty: f64,
    pub rcvd_qty: f64,
    pub unit_price: f64,
    pub appstreme_no: String,
}

impl Default for LineItem {
    fn default() -> Self {
        Self::blank(0)
    }
}

impl LineItem {
    /// Unit every fresh row starts with.
    pub const DEFAULT_UNIT: &'static str = "YDS";

    pub fn blank(id: u64) -> Self {
        Self {
            id,
            fabric_code: String::new(),
            item_description: String::new(),
            color: String::new(),
            hs_code: String::new(),
            rcvd_date: String::new(),
            challan_no: String::new(),
            pi_number: String::new(),
            unit: Self::DEFAULT_UNIT.to_string(),
            invoice_qty: 0.0,
            rcvd_qty: 0.0,
            unit_price: 0.0,
            appstreme_no: String::new(),
        }
    }

    /// Invoiced quantity times unit price; non-finite inputs count as zero.
    pub fn line_value(&self) -> f64 {
        finite_or_zero(self.invoice_qty) * finite_or_zero(self.unit_price)
    }

    /// Description with the color appended, and the HS code when asked.
    pub fn display_description(&self, with_hs_code: bool) -> String {
        let mut description = self.item_description.clone();
        if !self.color.is_empty() {
            description.push_str(&format!(" ({})", self.color));
        }
        if with_hs_code && !self.hs_code.is_empty() {
            description.push_str(&format!(" (HS: {})", self.hs_code));
        }
        description
    }
}

/// A complete bill: header plus its line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub header: ReportHeader,
    #[serde(default, rename = "item")]
    pub items: Vec<LineItem>,
}

impl Report {
    pub fn new(header: ReportHeader, items: Vec<LineItem>) -> Self {
        Self { header, items }
    }

    /// Parse a bill stored as TOML (`[header]` plus `[[item]]` tables).
    /// Items without an id are numbered from 1 in file order.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut report: Report = toml::from_str(text)?;
        for (idx, item) in report.items.iter_mut().enumerate() {
            if item.id == 0 {
                item.id = idx as u64 + 1;
            }
        }
        Ok(report)
    }

    pub fn totals(&self) -> Totals {
        calculate_totals(&self.items)
    }

    /// Check the fields that must be present before rendering.
    pub fn validate(&self) -> Result<()> {
        if self.header.buyer_name.trim().is_empty() {
            return Err(ReportError::MissingBuyer);
        }
        if self.header.billing_date.chars().count() < MIN_BILLING_DATE_LEN {
            return Err(ReportError::InvalidBillingDate(
                self.header.billing_date.clone(),
            ));
        }
        Ok(())
    }

    /// Filename shared by both documents, without extension.
    ///
    /// e.g. `Bill of Buyer ACME $1234.50 DATE-01.01.25`
    pub fn base_filename(&self) -> String {
        let buyer: String = self
            .header
            .buyer_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
            .collect();
        format!(
            "Bill of Buyer {} ${} DATE-{}",
            buyer.trim(),
            format_fixed(self.totals().total_value, 2),
            compact_date_token(&self.header.billing_date)
        )
    }

    /// How many header fields are filled in (out of all of them).
    pub fn coverage(&self) -> (usize, usize) {
        let h = &self.header;
        let fields = [
            &h.buyer_name,
            &h.supplier_name,
            &h.file_no,
            &h.invoice_no,
            &h.lc_number,
            &h.invoice_date,
            &h.billing_date,
        ];
        let filled = fields.iter().filter(|v| !v.trim().is_empty()).count();
        (filled, fields.len())
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
