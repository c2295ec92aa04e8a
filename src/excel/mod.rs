//! Excel import/export module
//!
//! - Import: advisor workbook (.xlsx / .xls) → active advisor records
//! - Export: ranked records → styled single-sheet .xlsx

mod exporter;
mod importer;

pub use exporter::{SheetExporter, SHEET_HEADERS, SHEET_NAME};
pub use importer::{
    cell_text, coerce_number, find_header_row, parse_numeric_text, AdvisorImporter, ColumnMap,
    ADVISOR_CODE_HEADER, ADVISOR_NAME_HEADER, ADVISOR_STATUS_HEADER, POLICIES_HEADER,
    PREMIUM_HEADER, SUPPORTED_EXTENSIONS,
};
