// src/render/pdf.rs

use super::{BillTable, RowKind};
use crate::config::Config;
use crate::error::Result;
use crate::layout::{Align, COLUMNS, LayoutConfig, UNIT_COLUMN, column_offsets, pdf_column_widths};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use tracing::debug;

/// Points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f64 = 0.5;
const AVG_BOLD_GLYPH_WIDTH: f64 = 0.55;

const CELL_PADDING: f64 = 0.5;
const GRID_LINE_WIDTH: f64 = 0.05;
const HEAD_FILL_GRAY: f64 = 245.0 / 255.0;
const MIN_AUTO_COLUMN: f64 = 20.0;

const INFO_LABEL_OFFSET: f64 = 28.0;
const INFO_LINE_STEP: f64 = 5.0;
const INFO_FONT_SIZE: f64 = 8.5;
const RIGHT_INFO_INSET: f64 = 80.0;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Render the bill as a single landscape page and return the PDF bytes.
pub fn render(table: &BillTable, config: &Config) -> Result<Vec<u8>> {
    let layout = &config.layout;
    let mut canvas = Canvas::new(layout.page_height);

    draw_letterhead(&mut canvas, table, config);
    let table_bottom = draw_table(&mut canvas, table, layout);
    draw_words(&mut canvas, table, layout, table_bottom);
    draw_signatures(&mut canvas, config);

    debug!(operations = canvas.ops.len(), "PDF content built");
    build_document(canvas.ops, layout)
}

fn draw_letterhead(canvas: &mut Canvas, table: &BillTable, config: &Config) {
    let layout = &config.layout;
    let center = layout.page_width / 2.0;
    let top = layout.top_margin;

    canvas.text(BOLD, 18.0, center, top, &config.company.name, Align::Center);
    canvas.text(REGULAR, 9.0, center, top + 6.0, &config.company.address, Align::Center);
    canvas.text(BOLD, 14.0, center, top + 13.0, &config.company.title, Align::Center);

    let info_y = top + 20.0;
    let right_x = layout.page_width - RIGHT_INFO_INSET;
    for (idx, (label, value)) in table.left_info.iter().enumerate() {
        let y = info_y + INFO_LINE_STEP * idx as f64;
        canvas.info(label, value, layout.margin_x, y);
    }
    for (idx, (label, value)) in table.right_info.iter().enumerate() {
        let y = info_y + INFO_LINE_STEP * idx as f64;
        canvas.info(label, value, right_x, y);
    }
}

/// Draw the grid and return the y of its bottom edge.
fn draw_table(canvas: &mut Canvas, table: &BillTable, layout: &LayoutConfig) -> f64 {
    let metrics = layout.table_metrics(table.item_count());
    let widths = pdf_column_widths(layout.table_width(), MIN_AUTO_COLUMN);
    let offsets = column_offsets(layout.margin_x, &widths);
    let row_h = metrics.row_height;
    let size = metrics.font_size;

    let mut y = metrics.start_y;
    for row in &table.rows {
        if row.kind == RowKind::Head {
            canvas.fill_rect(layout.margin_x, y, layout.table_width(), row_h, HEAD_FILL_GRAY);
        }
        for (col, cell) in row.cells.iter().enumerate() {
            let (x, w) = (offsets[col], widths[col]);
            canvas.stroke_rect(x, y, w, row_h, GRID_LINE_WIDTH);

            let bold = row.kind != RowKind::Item || col == 9;
            let font = if bold { BOLD } else { REGULAR };
            let align = if row.kind == RowKind::Head {
                Align::Center
            } else {
                COLUMNS[col].align
            };
            let inner = w - 2.0 * CELL_PADDING;
            let label = ellipsize(&cell.replace('\n', " "), inner, size, bold);
            let text_x = match align {
                Align::Left => x + CELL_PADDING,
                Align::Center => x + w / 2.0,
                Align::Right => x + w - CELL_PADDING,
            };
            // Vertically centred: baseline sits a third of the cap height below the middle.
            let baseline = y + row_h / 2.0 + size / PT_PER_MM * 0.35;
            canvas.text(font, size, text_x, baseline, &label, align);
        }
        y += row_h;
    }
    y
}

fn draw_words(canvas: &mut Canvas, table: &BillTable, layout: &LayoutConfig, table_bottom: f64) {
    let metrics = layout.table_metrics(table.item_count());
    let size = (metrics.font_size - 1.0).max(7.0);
    let widths = pdf_column_widths(layout.table_width(), MIN_AUTO_COLUMN);
    let x = column_offsets(layout.margin_x, &widths)[UNIT_COLUMN];
    let wrap = (layout.page_width - layout.margin_x - x).max(100.0);

    let line_step = size * 1.15 / PT_PER_MM;
    let mut y = table_bottom + 5.0;
    for line in wrap_words(&table.words_line, wrap, size, true) {
        canvas.text(BOLD, size, x, y, &line, Align::Left);
        y += line_step;
    }
}

fn draw_signatures(canvas: &mut Canvas, config: &Config) {
    let layout = &config.layout;
    let y = layout.signature_line_y();
    let left = layout.margin_x;
    let right = layout.page_width - layout.margin_x;

    canvas.line(left + 5.0, y, left + 65.0, y, 0.2);
    canvas.text(REGULAR, 9.0, left + 20.0, y + 5.0, &config.company.left_signature, Align::Left);

    canvas.line(right - 65.0, y, right - 5.0, y, 0.2);
    canvas.text(REGULAR, 9.0, right - 52.0, y + 5.0, &config.company.right_signature, Align::Left);
}

fn build_document(ops: Vec<Operation>, layout: &LayoutConfig) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dict("Helvetica"));
    let bold_id = doc.add_object(font_dict("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            real(layout.page_width * PT_PER_MM),
            real(layout.page_height * PT_PER_MM),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn font_dict(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn real(value: f64) -> Object {
    value.into()
}

/// Characters at 0x80..=0x9F of WinAnsiEncoding; unassigned slots hold NUL.
const WIN_ANSI_HIGH: [char; 32] = [
    '€', '\0', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\0', 'Ž', '\0',
    '\0', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ', '\0', 'ž', 'Ÿ',
];

/// Encode text for the WinAnsi Helvetica fonts. Characters the encoding
/// lacks print as `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => c as u8,
            '\0' => b'?',
            _ => WIN_ANSI_HIGH
                .iter()
                .position(|&high| high == c)
                .map_or(b'?', |idx| 0x80 + idx as u8),
        })
        .collect()
}

/// Estimated width in mm of `text` set at `size` points.
fn text_width(text: &str, size: f64, bold: bool) -> f64 {
    let glyph = if bold { AVG_BOLD_GLYPH_WIDTH } else { AVG_GLYPH_WIDTH };
    text.chars().count() as f64 * size * glyph / PT_PER_MM
}

/// Shorten `text` with a trailing "..." until it fits in `max_width` mm.
fn ellipsize(text: &str, max_width: f64, size: f64, bold: bool) -> String {
    if text_width(text, size, bold) <= max_width {
        return text.to_string();
    }
    let mut kept: Vec<char> = text.chars().collect();
    while !kept.is_empty() {
        kept.pop();
        let candidate: String = kept.iter().collect::<String>() + "...";
        if text_width(&candidate, size, bold) <= max_width {
            return candidate;
        }
    }
    String::new()
}

/// Greedy word wrap to `max_width` mm.
fn wrap_words(text: &str, max_width: f64, size: f64, bold: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if !current.is_empty() && text_width(&candidate, size, bold) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Collects content-stream operations, taking top-down millimetre
/// coordinates and emitting PDF points.
struct Canvas {
    ops: Vec<Operation>,
    page_height: f64,
}

impl Canvas {
    fn new(page_height: f64) -> Self {
        Self {
            ops: Vec::new(),
            page_height,
        }
    }

    fn x(&self, mm: f64) -> Object {
        real(mm * PT_PER_MM)
    }

    fn y(&self, mm: f64) -> Object {
        real((self.page_height - mm) * PT_PER_MM)
    }

    fn text(&mut self, font: &str, size: f64, x: f64, y: f64, text: &str, align: Align) {
        if text.is_empty() {
            return;
        }
        let width = text_width(text, size, font == BOLD);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let (px, py) = (self.x(left), self.y(y));
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), real(size)]),
            Operation::new("Td", vec![px, py]),
            Operation::new("Tj", vec![Object::String(win_ansi(text), StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Bold label with its value 28mm to the right.
    fn info(&mut self, label: &str, value: &str, x: f64, y: f64) {
        self.text(BOLD, INFO_FONT_SIZE, x, y, label, Align::Left);
        self.text(REGULAR, INFO_FONT_SIZE, x + INFO_LABEL_OFFSET, y, value, Align::Left);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64) {
        let (ax, ay, bx, by) = (self.x(x1), self.y(y1), self.x(x2), self.y(y2));
        self.ops.extend([
            Operation::new("w", vec![real(width * PT_PER_MM)]),
            Operation::new("m", vec![ax, ay]),
            Operation::new("l", vec![bx, by]),
            Operation::new("S", vec![]),
        ]);
    }

    fn rect_operands(&self, x: f64, y: f64, w: f64, h: f64) -> Vec<Object> {
        // PDF rectangles grow upwards from their lower-left corner.
        vec![self.x(x), self.y(y + h), real(w * PT_PER_MM), real(h * PT_PER_MM)]
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, width: f64) {
        let operands = self.rect_operands(x, y, w, h);
        self.ops.extend([
            Operation::new("w", vec![real(width * PT_PER_MM)]),
            Operation::new("re", operands),
            Operation::new("S", vec![]),
        ]);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, gray: f64) {
        let operands = self.rect_operands(x, y, w, h);
        self.ops.extend([
            Operation::new("g", vec![real(gray)]),
            Operation::new("re", operands),
            Operation::new("f", vec![]),
            Operation::new("g", vec![Object::Integer(0)]),
        ]);
    }
}
