// src/render/sheet.rs

use super::{SHEET_INFO_LABELS, header_info, words_line};
use crate::config::Config;
use crate::error::Result;
use crate::format::report_date;
use crate::layout::{Align, COLUMNS};
use crate::report::Report;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;
use tracing::debug;

/// Blank rows between the "In Words" line and the signatures.
const SIGNATURE_SPACER_ROWS: usize = 5;
/// Column (0-based) holding the right-hand date labels and signature.
const RIGHT_BLOCK_COLUMN: usize = 9;
/// Column (0-based) where the total label and the words line start.
const WORDS_COLUMN: usize = 4;
/// Background of the column header row.
const HEAD_FILL: u32 = 0xF5F5F5;
/// Excel refuses longer worksheet names.
const MAX_SHEET_NAME: usize = 31;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }
}

/// Excel-style number format applied when a numeric cell is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// `#,##0`
    Integer,
    /// `#,##0.00`
    Money,
}

impl NumberFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            NumberFormat::Integer => "#,##0",
            NumberFormat::Money => "#,##0.00",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    None,
    Thin,
    /// A signature line: only the top edge.
    TopOnly,
}

/// How one cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub bold: bool,
    pub font_size: f64,
    pub align: Align,
    /// Anchor text to the top of the cell instead of the middle.
    pub top: bool,
    pub wrap: bool,
    pub border: Border,
    pub fill: Option<u32>,
    pub number: Option<NumberFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetRowKind {
    Title,
    Info,
    Spacer,
    Head,
    Item,
    Total,
    Words,
    Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub kind: SheetRowKind,
    pub cells: Vec<CellValue>,
}

/// Cells merged across columns `first..=last` of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    pub row: usize,
    pub first: usize,
    pub last: usize,
}

/// Every row of the spreadsheet, in order, plus its merged ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub name: String,
    pub rows: Vec<SheetRow>,
    pub merges: Vec<Merge>,
}

impl SheetPlan {
    pub fn build(report: &Report, config: &Config) -> Self {
        let width = COLUMNS.len();
        let last = width - 1;
        let totals = report.totals();
        let mut plan = SheetPlan {
            name: config.company.title.clone(),
            rows: Vec::new(),
            merges: Vec::new(),
        };

        for title in [&config.company.name, &config.company.address, &config.company.title] {
            let row = plan.push(SheetRowKind::Title, vec![CellValue::text(title.as_str())]);
            plan.merges.push(Merge { row, first: 0, last });
        }
        plan.push(SheetRowKind::Spacer, Vec::new());

        let (left, right) = header_info(&report.header, &SHEET_INFO_LABELS);
        for (idx, (label, value)) in left.into_iter().enumerate() {
            let mut cells = vec![CellValue::text(label), CellValue::Text(value)];
            if let Some((label, value)) = right.get(idx) {
                cells.resize(RIGHT_BLOCK_COLUMN, CellValue::Empty);
                cells.push(CellValue::text(*label));
                cells.push(CellValue::Text(value.clone()));
            }
            plan.push(SheetRowKind::Info, cells);
        }
        plan.push(SheetRowKind::Spacer, Vec::new());

        plan.push(
            SheetRowKind::Head,
            COLUMNS.iter().map(|c| CellValue::text(c.sheet_title)).collect(),
        );

        for item in &report.items {
            plan.push(
                SheetRowKind::Item,
                vec![
                    CellValue::text(item.fabric_code.as_str()),
                    CellValue::Text(item.display_description(true)),
                    CellValue::Text(report_date(&item.rcvd_date)),
                    CellValue::text(item.challan_no.as_str()),
                    CellValue::text(item.pi_number.as_str()),
                    CellValue::text(item.unit.as_str()),
                    CellValue::Number(item.invoice_qty.round()),
                    CellValue::Number(item.rcvd_qty.round()),
                    CellValue::Number(item.unit_price),
                    CellValue::Number(item.line_value()),
                    CellValue::text(item.appstreme_no.as_str()),
                ],
            );
        }

        let mut total = vec![CellValue::Empty; width];
        total[WORDS_COLUMN] = CellValue::text("Total:");
        total[5] = CellValue::text("YDS");
        total[6] = CellValue::Number(totals.total_invoice_qty.round());
        total[7] = CellValue::Number(totals.total_rcvd_qty.round());
        total[9] = CellValue::Number(totals.total_value);
        plan.push(SheetRowKind::Total, total);

        let mut words = vec![CellValue::Empty; WORDS_COLUMN];
        words.push(CellValue::Text(words_line(&totals)));
        let row = plan.push(SheetRowKind::Words, words);
        plan.merges.push(Merge {
            row,
            first: WORDS_COLUMN,
            last,
        });

        for _ in 0..SIGNATURE_SPACER_ROWS {
            plan.push(SheetRowKind::Spacer, Vec::new());
        }

        let mut signature = vec![CellValue::Text(config.company.left_signature.clone())];
        signature.resize(RIGHT_BLOCK_COLUMN, CellValue::Empty);
        signature.push(CellValue::Text(config.company.right_signature.clone()));
        plan.push(SheetRowKind::Signature, signature);

        plan
    }

    fn push(&mut self, kind: SheetRowKind, cells: Vec<CellValue>) -> usize {
        self.rows.push(SheetRow { kind, cells });
        self.rows.len() - 1
    }

    pub fn row_index(&self, kind: SheetRowKind) -> Option<usize> {
        self.rows.iter().position(|r| r.kind == kind)
    }

    /// The merged range covering `(row, col)`, if any.
    pub fn merge_at(&self, row: usize, col: usize) -> Option<&Merge> {
        self.merges
            .iter()
            .find(|m| m.row == row && (m.first..=m.last).contains(&col))
    }
}

/// Number format for a cell of the item and total rows.
pub fn number_format(kind: SheetRowKind, col: usize) -> Option<NumberFormat> {
    match (kind, col) {
        (SheetRowKind::Item | SheetRowKind::Total, 6 | 7) => Some(NumberFormat::Integer),
        (SheetRowKind::Item | SheetRowKind::Total, 8 | 9) => Some(NumberFormat::Money),
        _ => None,
    }
}

/// Style of the cell at `col` of plan row `row`.
pub fn cell_style(kind: SheetRowKind, row: usize, col: usize) -> CellStyle {
    let base = CellStyle {
        bold: false,
        font_size: 10.0,
        align: Align::Left,
        top: false,
        wrap: false,
        border: Border::None,
        fill: None,
        number: number_format(kind, col),
    };
    let figure = (6..=9).contains(&col);

    match kind {
        SheetRowKind::Title => {
            let (bold, font_size) = match row {
                0 => (true, 20.0),
                1 => (false, 11.0),
                _ => (true, 14.0),
            };
            CellStyle {
                bold,
                font_size,
                align: Align::Center,
                ..base
            }
        }
        SheetRowKind::Info => CellStyle {
            bold: col == 0 || col == RIGHT_BLOCK_COLUMN,
            ..base
        },
        SheetRowKind::Head => CellStyle {
            bold: true,
            align: Align::Center,
            wrap: true,
            border: Border::Thin,
            fill: Some(HEAD_FILL),
            ..base
        },
        SheetRowKind::Item => CellStyle {
            align: COLUMNS[col].align,
            wrap: true,
            border: Border::Thin,
            ..base
        },
        SheetRowKind::Total => CellStyle {
            bold: true,
            align: if figure || col == WORDS_COLUMN {
                Align::Right
            } else {
                Align::Center
            },
            border: Border::Thin,
            ..base
        },
        SheetRowKind::Words => CellStyle { bold: true, ..base },
        SheetRowKind::Signature => CellStyle {
            bold: true,
            align: Align::Center,
            top: true,
            border: if col == 0 || col == RIGHT_BLOCK_COLUMN {
                Border::TopOnly
            } else {
                Border::None
            },
            ..base
        },
        SheetRowKind::Spacer => base,
    }
}

/// Fixed heights (points) for the title rows and the column header.
pub fn row_height(kind: SheetRowKind, row: usize) -> Option<f64> {
    match (kind, row) {
        (SheetRowKind::Title, 0) => Some(26.0),
        (SheetRowKind::Title, 1) => Some(18.0),
        (SheetRowKind::Title, _) => Some(22.0),
        (SheetRowKind::Head, _) => Some(25.0),
        _ => None,
    }
}

fn xlsx_format(style: &CellStyle) -> Format {
    let horizontal = match style.align {
        Align::Left => FormatAlign::Left,
        Align::Center => FormatAlign::Center,
        Align::Right => FormatAlign::Right,
    };
    let vertical = if style.top {
        FormatAlign::Top
    } else {
        FormatAlign::VerticalCenter
    };
    let mut format = Format::new()
        .set_font_size(style.font_size)
        .set_align(horizontal)
        .set_align(vertical);

    if style.bold {
        format = format.set_bold();
    }
    if style.wrap {
        format = format.set_text_wrap();
    }
    match style.border {
        Border::Thin => format = format.set_border(FormatBorder::Thin),
        Border::TopOnly => format = format.set_border_top(FormatBorder::Thin),
        Border::None => {}
    }
    if let Some(rgb) = style.fill {
        format = format.set_background_color(Color::RGB(rgb));
    }
    if let Some(number) = style.number {
        format = format.set_num_format(number.pattern());
    }
    format
}

/// A worksheet name Excel accepts: no `[]:*?/\`, at most 31 characters.
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    if cleaned.is_empty() {
        "Bill".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Lay a plan out on a fresh workbook: widths, row heights, styled cells and
/// merged ranges.
pub fn build_workbook(plan: &SheetPlan) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name(&plan.name))?;

    for (col, column) in COLUMNS.iter().enumerate() {
        sheet.set_column_width(col as u16, column.sheet_width)?;
    }

    for (idx, row) in plan.rows.iter().enumerate() {
        if let Some(height) = row_height(row.kind, idx) {
            sheet.set_row_height(idx as u32, height)?;
        }
        for col in 0..COLUMNS.len() {
            if plan.merge_at(idx, col).is_some() {
                continue;
            }
            let style = cell_style(row.kind, idx, col);
            match row.cells.get(col) {
                Some(value) => write_cell(sheet, idx, col, value, &style)?,
                None => write_cell(sheet, idx, col, &CellValue::Empty, &style)?,
            }
        }
    }

    for merge in &plan.merges {
        let row = &plan.rows[merge.row];
        let text = match row.cells.get(merge.first) {
            Some(CellValue::Text(s)) => s.as_str(),
            _ => "",
        };
        let format = xlsx_format(&cell_style(row.kind, merge.row, merge.first));
        sheet.merge_range(
            merge.row as u32,
            merge.first as u16,
            merge.row as u32,
            merge.last as u16,
            text,
            &format,
        )?;
    }

    Ok(workbook)
}

fn write_cell(
    sheet: &mut Worksheet,
    row: usize,
    col: usize,
    value: &CellValue,
    style: &CellStyle,
) -> Result<()> {
    let (row, col) = (row as u32, col as u16);
    let format = xlsx_format(style);
    match value {
        // Blank cells only matter when they carry a border or fill.
        CellValue::Empty if style.border == Border::None && style.fill.is_none() => {}
        CellValue::Empty => {
            sheet.write_blank(row, col, &format)?;
        }
        CellValue::Text(text) => {
            sheet.write_string_with_format(row, col, text, &format)?;
        }
        CellValue::Number(n) => {
            sheet.write_number_with_format(row, col, *n, &format)?;
        }
    }
    Ok(())
}

pub fn write(report: &Report, config: &Config, path: &Path) -> Result<()> {
    let plan = SheetPlan::build(report, config);
    debug!(rows = plan.rows.len(), merges = plan.merges.len(), "Sheet plan built");
    build_workbook(&plan)?.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{LineItem, ReportHeader};

    fn report() -> Report {
        let header = ReportHeader {
            buyer_name: "ACME Apparel".to_string(),
            supplier_name: "Alpha Textiles".to_string(),
            invoice_date: "20/Dec/2024".to_string(),
            billing_date: "01/Jan/2025".to_string(),
            ..Default::default()
        };
        let item = LineItem {
            fabric_code: "F-100".to_string(),
            item_description: "Twill".to_string(),
            hs_code: "5209".to_string(),
            invoice_qty: 1200.4,
            rcvd_qty: 1200.0,
            unit_price: 1.5,
            ..LineItem::blank(1)
        };
        Report::new(header, vec![item])
    }

    #[test]
    fn test_plan_layout() {
        let plan = SheetPlan::build(&report(), &Config::default());
        // 3 titles, spacer, 5 info, spacer, head, 1 item, total, words, 5 spacers, signature
        assert_eq!(plan.rows.len(), 20);
        assert_eq!(plan.row_index(SheetRowKind::Head), Some(10));
        assert_eq!(plan.row_index(SheetRowKind::Total), Some(12));
        assert_eq!(plan.row_index(SheetRowKind::Words), Some(13));
        assert_eq!(plan.row_index(SheetRowKind::Signature), Some(19));
        assert_eq!(plan.merges.len(), 4);
        assert_eq!(plan.merges[3], Merge { row: 13, first: 4, last: 10 });
    }

    #[test]
    fn test_info_rows_carry_dates_on_the_right() {
        let plan = SheetPlan::build(&report(), &Config::default());
        let buyer = &plan.rows[4].cells;
        assert_eq!(buyer[0], CellValue::text("Buyer Name :"));
        assert_eq!(buyer[9], CellValue::text("Invoice Date :"));
        assert_eq!(buyer[2], CellValue::Empty);
        assert_eq!(buyer[10], CellValue::text("20-Dec-2024"));
        assert_eq!(plan.rows[6].cells.len(), 2);
    }

    #[test]
    fn test_item_row_values() {
        let plan = SheetPlan::build(&report(), &Config::default());
        let item = &plan.rows[11].cells;
        assert_eq!(item[1], CellValue::text("Twill (HS: 5209)"));
        assert_eq!(item[6], CellValue::Number(1200.0));
        assert_eq!(item[9], CellValue::Number(1200.4 * 1.5));
    }

    #[test]
    fn test_item_and_total_styles() {
        let plan = SheetPlan::build(&report(), &Config::default());

        let qty = cell_style(SheetRowKind::Item, 11, 6);
        assert_eq!(qty.align, Align::Right);
        assert_eq!(qty.border, Border::Thin);
        assert_eq!(qty.number, Some(NumberFormat::Integer));
        assert_eq!(cell_style(SheetRowKind::Item, 11, 1).align, Align::Left);
        assert_eq!(cell_style(SheetRowKind::Item, 11, 0).align, Align::Center);

        let total = cell_style(SheetRowKind::Total, 12, 9);
        assert!(total.bold);
        assert_eq!(total.number.map(NumberFormat::pattern), Some("#,##0.00"));
        assert_eq!(plan.rows[12].cells[WORDS_COLUMN], CellValue::text("Total:"));
        assert_eq!(cell_style(SheetRowKind::Total, 12, WORDS_COLUMN).align, Align::Right);
    }

    #[test]
    fn test_head_and_title_styles() {
        let head = cell_style(SheetRowKind::Head, 10, 3);
        assert!(head.bold && head.wrap);
        assert_eq!(head.fill, Some(0xF5F5F5));
        assert_eq!(row_height(SheetRowKind::Head, 10), Some(25.0));

        assert_eq!(cell_style(SheetRowKind::Title, 0, 0).font_size, 20.0);
        assert!(!cell_style(SheetRowKind::Title, 1, 0).bold);
        assert_eq!(cell_style(SheetRowKind::Title, 2, 0).font_size, 14.0);
        assert_eq!(row_height(SheetRowKind::Item, 11), None);
    }

    #[test]
    fn test_signature_lines_only_under_names() {
        assert_eq!(cell_style(SheetRowKind::Signature, 19, 0).border, Border::TopOnly);
        assert_eq!(cell_style(SheetRowKind::Signature, 19, 9).border, Border::TopOnly);
        assert_eq!(cell_style(SheetRowKind::Signature, 19, 4).border, Border::None);
        assert!(cell_style(SheetRowKind::Signature, 19, 0).top);
    }

    #[test]
    fn test_merges_cover_titles_and_words() {
        let plan = SheetPlan::build(&report(), &Config::default());
        assert_eq!(plan.merge_at(0, 7), Some(&Merge { row: 0, first: 0, last: 10 }));
        assert!(plan.merge_at(13, 10).is_some());
        assert!(plan.merge_at(13, 3).is_none());
        assert!(plan.merge_at(11, 0).is_none());
    }

    #[test]
    fn test_workbook_is_xlsx() {
        let plan = SheetPlan::build(&report(), &Config::default());
        let bytes = build_workbook(&plan).unwrap().save_to_buffer().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_sheet_name_is_excel_safe() {
        assert_eq!(sheet_name("Bill Of Exchange Report"), "Bill Of Exchange Report");
        assert_eq!(sheet_name("Q1/Q2 [draft]"), "Q1Q2 draft");
        assert_eq!(sheet_name("???"), "Bill");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }

    #[test]
    fn test_number_format_only_for_figures() {
        assert_eq!(number_format(SheetRowKind::Item, 6), Some(NumberFormat::Integer));
        assert_eq!(number_format(SheetRowKind::Total, 9), Some(NumberFormat::Money));
        assert_eq!(number_format(SheetRowKind::Head, 9), None);
        assert_eq!(number_format(SheetRowKind::Item, 1), None);
    }
}
