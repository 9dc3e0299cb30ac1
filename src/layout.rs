// src/layout.rs

//! Page geometry shared by both renderers.
//!
//! All lengths are millimetres, font sizes are points. The table is scaled so
//! that every line item, the TOTAL row, the "In Words" line and the signature
//! block fit on one landscape A4 page.

use serde::Deserialize;

/// Tunable page layout. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub margin_x: f64,
    pub top_margin: f64,
    pub header_section_height: f64,
    pub bottom_margin: f64,
    pub signature_line_height: f64,
    pub words_section_height: f64,
    pub footer_padding: f64,
    pub min_row_height: f64,
    pub max_row_height: f64,
    /// Points of font per millimetre of row height.
    pub font_scale: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 297.0,
            page_height: 210.0,
            margin_x: 10.0,
            top_margin: 8.0,
            header_section_height: 42.0,
            bottom_margin: 8.0,
            signature_line_height: 12.0,
            words_section_height: 8.0,
            footer_padding: 10.0,
            min_row_height: 3.5,
            max_row_height: 8.0,
            font_scale: 1.8,
            min_font_size: 5.5,
            max_font_size: 9.5,
        }
    }
}

/// Row height and font size chosen for a given number of items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableMetrics {
    pub start_y: f64,
    pub max_height: f64,
    pub row_height: f64,
    pub font_size: f64,
}

impl LayoutConfig {
    pub fn table_start_y(&self) -> f64 {
        self.top_margin + self.header_section_height
    }

    /// Space kept free under the table for the words line and signatures.
    pub fn footer_reserve(&self) -> f64 {
        self.signature_line_height + self.words_section_height + self.footer_padding
    }

    pub fn table_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin_x
    }

    /// Scale rows down as items are added. The TOTAL row counts as a row.
    pub fn table_metrics(&self, item_count: usize) -> TableMetrics {
        let start_y = self.table_start_y();
        let max_height = self.page_height - start_y - self.footer_reserve();
        let rows = (item_count + 1) as f64;

        let row_height = clamp(max_height / rows, self.min_row_height, self.max_row_height);
        let font_size = clamp(
            row_height * self.font_scale,
            self.min_font_size,
            self.max_font_size,
        );

        TableMetrics {
            start_y,
            max_height,
            row_height,
            font_size,
        }
    }

    /// Baseline of the signature lines, anchored to the bottom margin.
    pub fn signature_line_y(&self) -> f64 {
        self.page_height - self.bottom_margin - self.signature_line_height
    }
}

/// `f64::clamp` panics when min > max; a bad config should not.
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Horizontal alignment of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One column of the bill table as both renderers draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub pdf_title: &'static str,
    pub sheet_title: &'static str,
    /// Fixed PDF width in mm; `None` takes the remaining width.
    pub pdf_width: Option<f64>,
    /// Spreadsheet width in characters.
    pub sheet_width: f64,
    pub align: Align,
}

const fn column(
    pdf_title: &'static str,
    sheet_title: &'static str,
    pdf_width: Option<f64>,
    sheet_width: f64,
    align: Align,
) -> Column {
    Column {
        pdf_title,
        sheet_title,
        pdf_width,
        sheet_width,
        align,
    }
}

pub const COLUMNS: [Column; 11] = [
    column("Fabric Code", "Fabric Code", Some(28.0), 14.0, Align::Center),
    column("Item Description", "Item Description", None, 35.0, Align::Left),
    column("Received Date", "Received Date", Some(22.0), 13.0, Align::Center),
    column("Challan No", "Challan No", Some(20.0), 15.0, Align::Center),
    column("Pi Number", "Pi Number", Some(24.0), 15.0, Align::Center),
    column("Unit", "Unit", Some(12.0), 8.0, Align::Center),
    column("Invoice Qty", "Invoice Qty", Some(18.0), 12.0, Align::Right),
    column("Received Qty", "Received Qty", Some(18.0), 12.0, Align::Right),
    column("Unit Price ($)", "Unit Price $", Some(20.0), 12.0, Align::Right),
    column("Total Value ($)", "Total Value", Some(26.0), 14.0, Align::Right),
    column("Appstreme No", "Appstreme No.\n(Receipt no)", Some(22.0), 16.0, Align::Left),
];

/// Index of the Unit column; the "In Words" line starts there.
pub const UNIT_COLUMN: usize = 5;

/// Resolved PDF column widths: the auto column gets whatever the fixed
/// columns leave of the table width, but never less than `min_auto`.
pub fn pdf_column_widths(table_width: f64, min_auto: f64) -> Vec<f64> {
    let fixed: f64 = COLUMNS.iter().filter_map(|c| c.pdf_width).sum();
    let auto = (table_width - fixed).max(min_auto);
    COLUMNS.iter().map(|c| c.pdf_width.unwrap_or(auto)).collect()
}

/// Left edge of each column given the table's left edge and widths.
pub fn column_offsets(left: f64, widths: &[f64]) -> Vec<f64> {
    widths
        .iter()
        .scan(left, |x, w| {
            let start = *x;
            *x += w;
            Some(start)
        })
        .collect()
}
