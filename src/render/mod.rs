// src/render/mod.rs

pub mod pdf;
pub mod sheet;

use crate::config::Config;
use crate::error::Result;
use crate::format::{amount_to_words, format_fixed, format_grouped, format_quantity, report_date};
use crate::layout::COLUMNS;
use crate::report::{Report, ReportHeader, Totals};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Sheet,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Sheet => "xlsx",
        }
    }
}

/// What happened to one of the two documents.
#[derive(Debug)]
pub struct ExportOutcome {
    pub format: ExportFormat,
    pub result: Result<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Head,
    Item,
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub kind: RowKind,
    pub cells: Vec<String>,
}

/// The bill laid out as display text: header block, grid rows and the
/// "In Words" line.
#[derive(Debug, Clone, PartialEq)]
pub struct BillTable {
    pub left_info: Vec<(&'static str, String)>,
    pub right_info: Vec<(&'static str, String)>,
    pub rows: Vec<TableRow>,
    pub words_line: String,
    pub totals: Totals,
}

impl BillTable {
    pub fn build(report: &Report) -> Self {
        let totals = report.totals();
        let mut rows = Vec::with_capacity(report.items.len() + 2);

        rows.push(TableRow {
            kind: RowKind::Head,
            cells: COLUMNS.iter().map(|c| c.pdf_title.to_string()).collect(),
        });

        for item in &report.items {
            rows.push(TableRow {
                kind: RowKind::Item,
                cells: vec![
                    item.fabric_code.clone(),
                    item.display_description(false),
                    report_date(&item.rcvd_date),
                    item.challan_no.clone(),
                    item.pi_number.clone(),
                    item.unit.clone(),
                    format_quantity(item.invoice_qty),
                    format_quantity(item.rcvd_qty),
                    format!("$ {}", format_fixed(item.unit_price, 2)),
                    format!("$ {}", format_grouped(item.line_value(), 2)),
                    item.appstreme_no.clone(),
                ],
            });
        }

        let mut total = vec![String::new(); COLUMNS.len()];
        total[5] = "TOTAL".to_string();
        total[6] = format_quantity(totals.total_invoice_qty);
        total[7] = format_quantity(totals.total_rcvd_qty);
        total[9] = format!("$ {}", format_grouped(totals.total_value, 2));
        rows.push(TableRow {
            kind: RowKind::Total,
            cells: total,
        });

        let (left_info, right_info) = header_info(&report.header, &PDF_INFO_LABELS);
        Self {
            left_info,
            right_info,
            rows,
            words_line: words_line(&totals),
            totals,
        }
    }

    pub fn item_count(&self) -> usize {
        self.rows.iter().filter(|r| r.kind == RowKind::Item).count()
    }
}

/// Labels of the header block: five on the left, the two dates on the right.
pub(crate) struct InfoLabels {
    left: [&'static str; 5],
    right: [&'static str; 2],
}

const LEFT_INFO_LABELS: [&str; 5] = [
    "Buyer Name :",
    "Supplier Name:",
    "File No :",
    "Invoice No :",
    "L/C Number :",
];

pub(crate) const PDF_INFO_LABELS: InfoLabels = InfoLabels {
    left: LEFT_INFO_LABELS,
    right: ["Invoice Date:", "Billing Date:"],
};

pub(crate) const SHEET_INFO_LABELS: InfoLabels = InfoLabels {
    left: LEFT_INFO_LABELS,
    right: ["Invoice Date :", "Billing Date :"],
};

/// Label/value pairs for the header block.
pub(crate) fn header_info(
    header: &ReportHeader,
    labels: &InfoLabels,
) -> (Vec<(&'static str, String)>, Vec<(&'static str, String)>) {
    let left_values = [
        &header.buyer_name,
        &header.supplier_name,
        &header.file_no,
        &header.invoice_no,
        &header.lc_number,
    ];
    let left = labels
        .left
        .iter()
        .zip(left_values)
        .map(|(label, value)| (*label, value.clone()))
        .collect();
    let right = vec![
        (labels.right[0], report_date(&header.invoice_date)),
        (labels.right[1], report_date(&header.billing_date)),
    ];
    (left, right)
}

pub(crate) fn words_line(totals: &Totals) -> String {
    format!("In Words: {}", amount_to_words(totals.total_value))
}

/// Write the PDF and then the spreadsheet for `report` into `out_dir`.
///
/// An incomplete bill is rejected before anything is written. After that a
/// failure in one format is logged and the other is still attempted.
pub fn generate_reports(
    report: &Report,
    config: &Config,
    out_dir: &Path,
) -> Result<Vec<ExportOutcome>> {
    report.validate()?;
    fs::create_dir_all(out_dir)?;

    let base = report.base_filename();
    let table = BillTable::build(report);
    info!(
        file = %base,
        items = report.items.len(),
        total = table.totals.total_value,
        qty_mismatch = table.totals.has_qty_mismatch(),
        "Generating reports"
    );

    let mut outcomes = Vec::with_capacity(2);
    for format in [ExportFormat::Pdf, ExportFormat::Sheet] {
        let span = tracing::info_span!("export", format = format.extension());
        let _guard = span.enter();

        let path = out_dir.join(format!("{base}.{}", format.extension()));
        let result = match format {
            ExportFormat::Pdf => pdf::render(&table, config).and_then(|bytes| {
                fs::write(&path, bytes)?;
                Ok(path)
            }),
            ExportFormat::Sheet => sheet::write(report, config, &path).map(|()| path),
        };

        match &result {
            Ok(path) => info!(path = %path.display(), "Report written"),
            Err(e) => error!(error = %e, "Report generation failed"),
        }
        outcomes.push(ExportOutcome { format, result });
    }

    Ok(outcomes)
}
