use super::{LineItem, finite_or_zero};
use serde::Serialize;

/// Invoice and received quantities may differ by rounding noise only.
const QTY_TOLERANCE: f64 = 0.001;

/// Column sums for the TOTAL row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total_invoice_qty: f64,
    pub total_rcvd_qty: f64,
    pub total_value: f64,
}

impl Totals {
    /// Invoiced and received quantities disagree.
    pub fn has_qty_mismatch(&self) -> bool {
        (self.total_invoice_qty - self.total_rcvd_qty).abs() > QTY_TOLERANCE
    }
}

pub fn calculate_totals(items: &[LineItem]) -> Totals {
    items.iter().fold(Totals::default(), |acc, item| Totals {
        total_invoice_qty: acc.total_invoice_qty + finite_or_zero(item.invoice_qty),
        total_rcvd_qty: acc.total_rcvd_qty + finite_or_zero(item.rcvd_qty),
        total_value: acc.total_value + item.line_value(),
    })
}

/// Read a quantity or price typed into the form. Anything that is not a
/// finite number counts as zero.
pub fn parse_number(text: &str) -> f64 {
    text.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
