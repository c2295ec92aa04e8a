//! Advisor importer implementation - workbook bytes → active advisor records

use crate::error::{AdvisorError, AdvisorResult};
use crate::types::AdvisorRecord;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

/// Marker cell that identifies the header row
pub const ADVISOR_CODE_HEADER: &str = "Advisor Code";
pub const ADVISOR_NAME_HEADER: &str = "Advisor Name";
pub const ADVISOR_STATUS_HEADER: &str = "Advisor Status";
pub const POLICIES_HEADER: &str = "No of Policies";
pub const PREMIUM_HEADER: &str = "Annualized New Business Premium (RS)";

/// Status value (after trim + lowercase) that keeps a row
const ACTIVE_STATUS: &str = "active";

/// File extensions offered by the upload surface
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Resolved positions of the five named columns. `None` reads as empty/zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub code: Option<usize>,
    pub name: Option<usize>,
    pub status: Option<usize>,
    pub policies: Option<usize>,
    pub premium: Option<usize>,
}

impl ColumnMap {
    /// Resolve columns from a header row by exact label
    pub fn from_header(header: &[Data]) -> Self {
        let find = |label: &str| {
            header
                .iter()
                .position(|cell| matches!(cell, Data::String(s) if s == label))
        };
        Self {
            code: find(ADVISOR_CODE_HEADER),
            name: find(ADVISOR_NAME_HEADER),
            status: find(ADVISOR_STATUS_HEADER),
            policies: find(POLICIES_HEADER),
            premium: find(PREMIUM_HEADER),
        }
    }

    /// Labels of the columns that did not resolve
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.code, ADVISOR_CODE_HEADER),
            (self.name, ADVISOR_NAME_HEADER),
            (self.status, ADVISOR_STATUS_HEADER),
            (self.policies, POLICIES_HEADER),
            (self.premium, PREMIUM_HEADER),
        ]
        .into_iter()
        .filter_map(|(idx, label)| idx.is_none().then_some(label))
        .collect()
    }
}

/// Importer for advisor workbooks (.xlsx / .xls).
///
/// Only the first sheet is consulted. The header row is located by content, so
/// title rows and blank rows above it are tolerated.
pub struct AdvisorImporter {
    source: String,
}

impl Default for AdvisorImporter {
    fn default() -> Self {
        Self::new("<memory>")
    }
}

impl AdvisorImporter {
    /// Create an importer; `source` only labels log lines
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Whether a path carries one of the accepted spreadsheet extensions
    pub fn is_supported_path(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| ext.eq_ignore_ascii_case(supported))
            })
            .unwrap_or(false)
    }

    /// Parse a workbook buffer into active advisor records.
    ///
    /// Errors with `Workbook` when the buffer is not a readable spreadsheet and
    /// with `MissingHeaderRow` when no row carries the marker column.
    pub fn import(&self, bytes: &[u8]) -> AdvisorResult<Vec<AdvisorRecord>> {
        let range = self.first_sheet(bytes)?;
        self.process_sheet(&range)
    }

    /// Silent variant: any failure is logged and yields no records.
    pub fn import_lenient(&self, bytes: &[u8]) -> Vec<AdvisorRecord> {
        match self.import(bytes) {
            Ok(records) => records,
            Err(AdvisorError::MissingHeaderRow) => {
                warn!(source = %self.source, "Could not find header row");
                Vec::new()
            }
            Err(e) => {
                warn!(source = %self.source, error = %e, "Error processing Excel file");
                Vec::new()
            }
        }
    }

    fn first_sheet(&self, bytes: &[u8]) -> AdvisorResult<Range<Data>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| AdvisorError::Workbook(format!("Failed to open workbook: {}", e)))?;

        workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AdvisorError::Workbook("Workbook has no sheets".to_string()))?
            .map_err(|e| AdvisorError::Workbook(format!("Failed to read first sheet: {}", e)))
    }

    /// Turn the first sheet's grid into records
    pub fn process_sheet(&self, range: &Range<Data>) -> AdvisorResult<Vec<AdvisorRecord>> {
        let rows: Vec<&[Data]> = range.rows().collect();
        debug!(source = %self.source, rows = rows.len(), "Raw data rows");

        let header_idx = find_header_row(&rows).ok_or(AdvisorError::MissingHeaderRow)?;
        let columns = ColumnMap::from_header(rows[header_idx]);
        debug!(source = %self.source, header_row = header_idx, ?columns, "Headers found");

        let missing = columns.missing();
        if !missing.is_empty() {
            warn!(source = %self.source, ?missing, "Header row is missing columns; defaulting them");
        }

        let mut records = Vec::new();
        for row in rows.iter().skip(header_idx + 1) {
            if let Some(record) = row_to_record(row, &columns) {
                records.push(record);
            }
        }

        if records.is_empty() {
            info!(source = %self.source, "No active advisors found in the data");
        } else {
            info!(source = %self.source, count = records.len(), "Imported active advisors");
        }
        Ok(records)
    }
}

/// Index of the first row holding the marker cell
pub fn find_header_row(rows: &[&[Data]]) -> Option<usize> {
    rows.iter().position(|row| {
        row.iter()
            .any(|cell| matches!(cell, Data::String(s) if s == ADVISOR_CODE_HEADER))
    })
}

fn cell_at(row: &[Data], idx: Option<usize>) -> Option<&Data> {
    idx.and_then(|i| row.get(i))
}

/// Build a record from one data row, or None when the row is skipped
fn row_to_record(row: &[Data], columns: &ColumnMap) -> Option<AdvisorRecord> {
    if row.iter().all(|cell| cell_text(cell).is_empty()) {
        return None;
    }

    let code = cell_at(row, columns.code).map(cell_text).unwrap_or_default();
    if code.is_empty() {
        return None;
    }

    let status = cell_at(row, columns.status).map(cell_text).unwrap_or_default();
    if status.to_lowercase() != ACTIVE_STATUS {
        debug!(advisor_code = %code, status = %status, "Skipping inactive row");
        return None;
    }

    let name = cell_at(row, columns.name).map(cell_text).unwrap_or_default();
    let policies = cell_at(row, columns.policies).map(coerce_number).unwrap_or(0.0);
    let premium = cell_at(row, columns.premium).map(coerce_number).unwrap_or(0.0);

    Some(AdvisorRecord::new(
        code,
        name,
        status,
        policies.trunc() as u64,
        premium,
    ))
}

/// Display text of a cell, trimmed. Whole floats print without a fraction.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format_plain_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_plain_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn format_plain_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Numeric value of a cell. Non-numeric, negative, or missing content is 0.
pub fn coerce_number(cell: &Data) -> f64 {
    let value = match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => parse_numeric_text(s),
        Data::DateTime(dt) => dt.as_f64(),
        _ => 0.0,
    };
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse text as a number, ignoring surrounding whitespace and grouping commas
pub fn parse_numeric_text(text: &str) -> f64 {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn header() -> Vec<Data> {
        vec![
            s(ADVISOR_CODE_HEADER),
            s(ADVISOR_NAME_HEADER),
            s(ADVISOR_STATUS_HEADER),
            s(POLICIES_HEADER),
            s(PREMIUM_HEADER),
        ]
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&s("1,234")), 1234.0);
        assert_eq!(coerce_number(&Data::Int(1234)), 1234.0);
        assert_eq!(coerce_number(&Data::Float(1234.5)), 1234.5);
        assert_eq!(coerce_number(&Data::Empty), 0.0);
        assert_eq!(coerce_number(&s("abc")), 0.0);
        assert_eq!(coerce_number(&s("  42 ")), 42.0);
        assert_eq!(coerce_number(&s("")), 0.0);
        assert_eq!(coerce_number(&s("-5")), 0.0);
        assert_eq!(coerce_number(&s("NaN")), 0.0);
        assert_eq!(coerce_number(&Data::Bool(true)), 0.0);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&s("  A001 ")), "A001");
        assert_eq!(cell_text(&Data::Float(1001.0)), "1001");
        assert_eq!(cell_text(&Data::Float(10.5)), "10.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_find_header_row_after_title_rows() {
        let title = vec![s("Monthly Report"), Data::Empty];
        let blank = vec![Data::Empty, Data::Empty];
        let head = header();
        let rows: Vec<&[Data]> = vec![&title, &blank, &head];
        assert_eq!(find_header_row(&rows), Some(2));

        let rows: Vec<&[Data]> = vec![&title, &blank];
        assert_eq!(find_header_row(&rows), None);
    }

    #[test]
    fn test_column_map_any_order_and_missing() {
        let head = vec![
            s(PREMIUM_HEADER),
            s("Region"),
            s(ADVISOR_STATUS_HEADER),
            s(ADVISOR_CODE_HEADER),
        ];
        let map = ColumnMap::from_header(&head);
        assert_eq!(map.premium, Some(0));
        assert_eq!(map.status, Some(2));
        assert_eq!(map.code, Some(3));
        assert_eq!(map.name, None);
        assert_eq!(map.missing(), vec![ADVISOR_NAME_HEADER, POLICIES_HEADER]);
    }

    #[test]
    fn test_row_to_record_status_filter() {
        let map = ColumnMap::from_header(&header());
        let row = |status: Data| vec![s("A1"), s("Jane"), status, Data::Int(3), Data::Float(10.0)];

        for kept in ["Active", "ACTIVE", " active "] {
            let record = row_to_record(&row(s(kept)), &map).expect("active row kept");
            assert_eq!(record.advisor_status, kept.trim());
            assert_eq!(record.no_of_policies, 3);
        }
        for dropped in [s("Inactive"), s(""), Data::Empty] {
            assert!(row_to_record(&row(dropped), &map).is_none());
        }
    }

    #[test]
    fn test_row_without_code_is_skipped() {
        let map = ColumnMap::from_header(&header());
        let row = vec![Data::Empty, s("Jane"), s("Active"), Data::Int(3), Data::Float(1.0)];
        assert!(row_to_record(&row, &map).is_none());
    }

    #[test]
    fn test_missing_columns_default() {
        let head = vec![s(ADVISOR_CODE_HEADER), s(ADVISOR_STATUS_HEADER)];
        let map = ColumnMap::from_header(&head);
        let record = row_to_record(&[s("A9"), s("active")], &map).unwrap();
        assert_eq!(record.advisor_name, "");
        assert_eq!(record.no_of_policies, 0);
        assert_eq!(record.annualized_premium, 0.0);
    }

    #[test]
    fn test_fractional_policies_truncate() {
        let map = ColumnMap::from_header(&header());
        let row = vec![s("A1"), s("Jane"), s("Active"), s("2.7"), s("1,000.5")];
        let record = row_to_record(&row, &map).unwrap();
        assert_eq!(record.no_of_policies, 2);
        assert_eq!(record.annualized_premium, 1000.5);
    }

    #[test]
    fn test_import_garbage_bytes() {
        let importer = AdvisorImporter::new("garbage.xlsx");
        let result = importer.import(b"definitely not a workbook");
        assert!(matches!(result, Err(AdvisorError::Workbook(_))));
        assert!(importer.import_lenient(b"definitely not a workbook").is_empty());
    }

    #[test]
    fn test_is_supported_path() {
        assert!(AdvisorImporter::is_supported_path(Path::new("a.xlsx")));
        assert!(AdvisorImporter::is_supported_path(Path::new("B.XLS")));
        assert!(!AdvisorImporter::is_supported_path(Path::new("c.csv")));
        assert!(!AdvisorImporter::is_supported_path(Path::new("noext")));
    }
}
