//! Page geometry and cell text preparation for the single-page report.
//!
//! All lengths are millimetres; the renderer converts to points. The page is
//! sized to its content: height grows linearly with the row count and is then
//! scaled by the user's height multiplier and rounded up to a whole millimetre.

use super::metrics::text_width_pt;

/// Title band height
pub const TITLE_HEIGHT: f64 = 12.0;
/// Body row height
pub const ROW_HEIGHT: f64 = 4.5;
/// Table header row height
pub const HEADER_ROW_HEIGHT: f64 = 8.0;
/// Gap between title band and table
pub const SPACING: f64 = 5.0;
/// Left + right page margin
pub const MARGINS: f64 = 5.0;

/// Brand mark placement inside the title band
pub const LOGO_X: f64 = 2.5;
pub const LOGO_Y: f64 = 2.0;
pub const LOGO_WIDTH: f64 = 25.0;
pub const LOGO_HEIGHT: f64 = 8.0;

/// Title text baseline, measured from the page top
pub const TITLE_BASELINE: f64 = 8.0;
pub const TITLE_FONT_SIZE: f32 = 12.0;
pub const HEADER_FONT_SIZE: f32 = 8.0;
pub const BODY_FONT_SIZE: f32 = 7.0;

/// Title rule and header cell borders
pub const THICK_LINE: f64 = 0.5;
/// Body cell borders
pub const THIN_LINE: f64 = 0.1;
/// Horizontal cell padding
pub const CELL_PADDING: f64 = 1.0;

/// Words of the advisor name kept for display
pub const NAME_WORD_LIMIT: usize = 4;

const MM_TO_PT: f64 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f64) -> f32 {
    (mm * MM_TO_PT) as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One table column: header lines, width, body alignment
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub header: &'static [&'static str],
    pub width: f64,
    pub align: Align,
}

pub const COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec {
        header: &["#"],
        width: 7.0,
        align: Align::Center,
    },
    ColumnSpec {
        header: &["Advisor Code"],
        width: 18.0,
        align: Align::Center,
    },
    ColumnSpec {
        header: &["Advisor Name"],
        width: 70.0,
        align: Align::Left,
    },
    ColumnSpec {
        header: &["Status"],
        width: 15.0,
        align: Align::Center,
    },
    ColumnSpec {
        header: &["No of", "Policies"],
        width: 20.0,
        align: Align::Center,
    },
    ColumnSpec {
        header: &["Annualized New", "Business Premium (RS)"],
        width: 34.0,
        align: Align::Right,
    },
];

/// Sum of the fixed column widths
pub fn columns_total() -> f64 {
    COLUMNS.iter().map(|c| c.width).sum()
}

/// Deterministic page dimensions for a given row count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub row_count: usize,
    pub table_height: f64,
    pub content_height: f64,
    pub page_width: f64,
    pub page_height: f64,
}

impl PageGeometry {
    pub fn new(row_count: usize, height_multiplier: f64) -> Self {
        let table_height = ROW_HEIGHT * row_count as f64 + HEADER_ROW_HEIGHT;
        let content_height = TITLE_HEIGHT + table_height + SPACING;
        Self {
            row_count,
            table_height,
            content_height,
            page_width: columns_total() + MARGINS,
            page_height: (content_height * height_multiplier).ceil(),
        }
    }

    /// Top edge of the table header row
    pub fn table_top(&self) -> f64 {
        TITLE_HEIGHT + SPACING
    }

    /// Left edge of the table
    pub fn table_left(&self) -> f64 {
        MARGINS / 2.0
    }

    /// Top edge of the body row with 0-based `index`
    pub fn row_top(&self, index: usize) -> f64 {
        self.table_top() + HEADER_ROW_HEIGHT + ROW_HEIGHT * index as f64
    }

    /// Left edge of column `col`
    pub fn column_left(&self, col: usize) -> f64 {
        self.table_left() + COLUMNS[..col].iter().map(|c| c.width).sum::<f64>()
    }
}

/// First four whitespace-separated words of a name
pub fn truncate_name(name: &str) -> String {
    name.split_whitespace()
        .take(NAME_WORD_LIMIT)
        .collect::<Vec<_>>()
        .join(" ")
}

/// en-US grouping with at most three fraction digits: 1234567.5 → "1,234,567.5"
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

/// Clip `text` with a trailing "..." so it fits `max_width` millimetres
pub fn fit_text(text: &str, max_width: f64, font_size: f32) -> String {
    let limit = mm_to_pt(max_width);
    if text_width_pt(text, font_size) <= limit {
        return text.to_string();
    }
    let mut clipped: String = text.to_string();
    while !clipped.is_empty() {
        clipped.pop();
        let candidate = format!("{}...", clipped.trim_end());
        if text_width_pt(&candidate, font_size) <= limit {
            return candidate;
        }
    }
    String::new()
}
