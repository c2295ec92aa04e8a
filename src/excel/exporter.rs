//! Spreadsheet exporter implementation - ranked records → styled .xlsx

use crate::core::sorter::{rank_rows, sort_records, RankedRow};
use crate::error::{AdvisorError, AdvisorResult};
use crate::types::{AdvisorRecord, BandTier, Rgb, SortState};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

/// Name of the single exported worksheet
pub const SHEET_NAME: &str = "Active Advisors";

/// Header labels of the six exported columns
pub const SHEET_HEADERS: [&str; 6] = [
    "#",
    "Advisor Code",
    "Advisor Name",
    "Status",
    "No of Policies",
    "Annualized New Business Premium (RS)",
];

const COLUMN_WIDTHS: [f64; 6] = [6.0, 16.0, 40.0, 12.0, 16.0, 24.0];
const HEADER_ROW_HEIGHT: f64 = 32.0;

fn color(rgb: Rgb) -> Color {
    Color::RGB(rgb.hex())
}

/// Horizontal alignment per column: name left, premium right, the rest centered
fn column_align(col: usize) -> FormatAlign {
    match col {
        2 => FormatAlign::Left,
        5 => FormatAlign::Right,
        _ => FormatAlign::Center,
    }
}

/// Spreadsheet exporter for the active-advisor table
pub struct SheetExporter {
    records: Vec<AdvisorRecord>,
}

impl SheetExporter {
    /// Sort `records` once and keep the ranked order
    pub fn new(records: &[AdvisorRecord], sort: SortState) -> Self {
        Self {
            records: sort_records(records, sort),
        }
    }

    /// Records in export order
    pub fn records(&self) -> &[AdvisorRecord] {
        &self.records
    }

    /// Build the workbook and return its bytes
    pub fn export_bytes(&self) -> AdvisorResult<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        let bytes = workbook
            .save_to_buffer()
            .map_err(|e| AdvisorError::Export(format!("Failed to save Excel buffer: {}", e)))?;
        info!(rows = self.records.len(), bytes = bytes.len(), "Spreadsheet export built");
        Ok(bytes)
    }

    /// Build the workbook and write it to `output_path`
    pub fn export(&self, output_path: &Path) -> AdvisorResult<()> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save(output_path)
            .map_err(|e| AdvisorError::Export(format!("Failed to save Excel file: {}", e)))?;
        info!(rows = self.records.len(), path = %output_path.display(), "Spreadsheet export saved");
        Ok(())
    }

    fn build_workbook(&self) -> AdvisorResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(SHEET_NAME)
            .map_err(|e| AdvisorError::Export(format!("Failed to set worksheet name: {}", e)))?;

        self.write_header(worksheet)?;
        for row in rank_rows(&self.records) {
            self.write_row(worksheet, &row)?;
        }
        Ok(workbook)
    }

    fn write_header(&self, worksheet: &mut Worksheet) -> AdvisorResult<()> {
        let header_format = Self::header_format();
        for (col, label) in SHEET_HEADERS.iter().enumerate() {
            worksheet
                .set_column_width(col as u16, COLUMN_WIDTHS[col])
                .map_err(|e| AdvisorError::Export(format!("Failed to set column width: {}", e)))?;
            worksheet
                .write_string_with_format(0, col as u16, *label, &header_format)
                .map_err(|e| AdvisorError::Export(format!("Failed to write header: {}", e)))?;
        }
        worksheet
            .set_row_height(0, HEADER_ROW_HEIGHT)
            .map_err(|e| AdvisorError::Export(format!("Failed to set header height: {}", e)))?;
        Ok(())
    }

    fn write_row(&self, worksheet: &mut Worksheet, row: &RankedRow<'_>) -> AdvisorResult<()> {
        let excel_row = row.rank as u32; // header occupies row 0
        let record = row.record;
        let fmt = |col: usize| Self::cell_format(row.tier, col);
        let err = |e: rust_xlsxwriter::XlsxError| {
            AdvisorError::Export(format!("Failed to write row {}: {}", row.rank, e))
        };

        worksheet
            .write_number_with_format(excel_row, 0, row.rank as f64, &fmt(0))
            .map_err(err)?;
        worksheet
            .write_string_with_format(excel_row, 1, &record.advisor_code, &fmt(1))
            .map_err(err)?;
        worksheet
            .write_string_with_format(excel_row, 2, &record.advisor_name, &fmt(2))
            .map_err(err)?;
        worksheet
            .write_string_with_format(excel_row, 3, &record.advisor_status, &fmt(3))
            .map_err(err)?;
        worksheet
            .write_number_with_format(excel_row, 4, record.no_of_policies as f64, &fmt(4))
            .map_err(err)?;
        worksheet
            .write_number_with_format(excel_row, 5, record.annualized_premium, &fmt(5))
            .map_err(err)?;
        Ok(())
    }

    /// Solid brand fill, bold white centered wrapped text
    pub fn header_format() -> Format {
        Format::new()
            .set_bold()
            .set_font_color(color(Rgb::WHITE))
            .set_background_color(color(Rgb::BRAND))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Medium)
            .set_border_color(color(Rgb::BLACK))
    }

    /// Banded body format for a tier and column
    pub fn cell_format(tier: BandTier, col: usize) -> Format {
        Format::new()
            .set_font_color(color(tier.text()))
            .set_background_color(color(tier.fill()))
            .set_align(column_align(col))
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(color(Rgb::BLACK))
    }
}
