//! Session state: the accumulated working set plus view parameters.
//!
//! Every mutation goes through a pure function over the records (`edit_name`,
//! `sort_records`) and the session only swaps in the result.

use crate::core::sorter::sort_records;
use crate::error::{AdvisorError, AdvisorResult};
use crate::excel::{AdvisorImporter, SheetExporter};
use crate::pdf::{BrandMark, PdfExporter};
use crate::types::{AdvisorRecord, ExportLayoutParams, SortField, SortState};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::task::{Id, JoinSet};
use tracing::{error, info, warn};

/// Base name of exported files
pub const EXPORT_BASE_NAME: &str = "active_advisors";

/// Outcome of importing one file
#[derive(Debug)]
pub struct ImportReport {
    pub path: PathBuf,
    pub outcome: AdvisorResult<usize>,
}

impl ImportReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Records appended from this file (0 on failure)
    pub fn imported(&self) -> usize {
        *self.outcome.as_ref().unwrap_or(&0)
    }
}

/// Rename every record carrying `code`; order and all other records are untouched
pub fn edit_name(records: &[AdvisorRecord], code: &str, name: &str) -> Vec<AdvisorRecord> {
    records
        .iter()
        .map(|record| {
            if record.advisor_code == code {
                record.with_name(name)
            } else {
                record.clone()
            }
        })
        .collect()
}

/// Parse one workbook for the working set. A missing header row is not an error here.
pub fn parse_workbook(source: &str, bytes: &[u8]) -> AdvisorResult<Vec<AdvisorRecord>> {
    match AdvisorImporter::new(source).import(bytes) {
        Err(AdvisorError::MissingHeaderRow) => {
            warn!(source, "Could not find header row; no records imported");
            Ok(Vec::new())
        }
        other => other,
    }
}

async fn read_and_parse(path: PathBuf) -> AdvisorResult<Vec<AdvisorRecord>> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| AdvisorError::UnreadableFile {
            path: path.clone(),
            source,
        })?;
    let source = path.display().to_string();
    tokio::task::spawn_blocking(move || parse_workbook(&source, &bytes))
        .await
        .map_err(|e| AdvisorError::Workbook(format!("Import task failed: {}", e)))?
}

/// Working set, sort selection, and PDF layout for one user session
#[derive(Debug, Clone, Default)]
pub struct Session {
    records: Vec<AdvisorRecord>,
    sort: SortState,
    layout: ExportLayoutParams,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: ExportLayoutParams) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Records in import order
    pub fn records(&self) -> &[AdvisorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn layout(&self) -> &ExportLayoutParams {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: ExportLayoutParams) {
        self.layout = layout;
    }

    /// Header click on a sortable column
    pub fn click_sort(&mut self, field: SortField) -> SortState {
        self.sort = self.sort.click(field);
        self.sort
    }

    pub fn reset_sort(&mut self) {
        self.sort = SortState::default();
    }

    /// Current view: records under the active sort
    pub fn sorted(&self) -> Vec<AdvisorRecord> {
        sort_records(&self.records, self.sort)
    }

    /// Concatenate records onto the working set. Duplicate codes are kept.
    pub fn append(&mut self, records: Vec<AdvisorRecord>) {
        self.records.extend(records);
    }

    /// Import one in-memory workbook, returning the number of records appended
    pub fn import_bytes(&mut self, source: &str, bytes: &[u8]) -> AdvisorResult<usize> {
        let records = parse_workbook(source, bytes)?;
        let count = records.len();
        self.append(records);
        Ok(count)
    }

    /// Read and import one file; on failure the working set is unchanged
    pub fn import_file(&mut self, path: &Path) -> AdvisorResult<usize> {
        let bytes = std::fs::read(path).map_err(|source| AdvisorError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_bytes(&path.display().to_string(), &bytes)
    }

    /// Import several files concurrently.
    ///
    /// Each file is read and parsed on its own task; results are appended in
    /// completion order, so the working set may not follow argument order.
    pub async fn import_files(&mut self, paths: Vec<PathBuf>) -> Vec<ImportReport> {
        self.import_with(paths, read_and_parse).await
    }

    /// Run `load` for every path on a `JoinSet`. Every path gets a report,
    /// including one whose task panicked.
    async fn import_with<F, Fut>(&mut self, paths: Vec<PathBuf>, load: F) -> Vec<ImportReport>
    where
        F: Fn(PathBuf) -> Fut,
        Fut: Future<Output = AdvisorResult<Vec<AdvisorRecord>>> + Send + 'static,
    {
        info!(files = paths.len(), "Files received");
        let mut tasks = JoinSet::new();
        let mut pending: HashMap<Id, PathBuf> = HashMap::new();
        for path in paths {
            let handle = tasks.spawn(load(path.clone()));
            pending.insert(handle.id(), path);
        }

        let mut reports = Vec::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, outcome),
                Err(e) => (
                    e.id(),
                    Err(AdvisorError::Workbook(format!("Import task failed: {}", e))),
                ),
            };
            let Some(path) = pending.remove(&id) else {
                continue;
            };

            match outcome {
                Ok(records) => {
                    let count = records.len();
                    self.append(records);
                    reports.push(ImportReport {
                        path,
                        outcome: Ok(count),
                    });
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Error processing Excel file");
                    reports.push(ImportReport {
                        path,
                        outcome: Err(e),
                    });
                }
            }
        }
        reports
    }

    /// Rename by advisor code; returns how many records changed
    pub fn edit_name(&mut self, code: &str, name: &str) -> usize {
        let count = self
            .records
            .iter()
            .filter(|r| r.advisor_code == code)
            .count();
        if count == 0 {
            warn!(advisor_code = code, "No record with this advisor code; edit ignored");
            return 0;
        }
        self.records = edit_name(&self.records, code, name);
        count
    }

    /// Empty the working set. Sort and layout are left as they are.
    pub fn clear(&mut self) {
        info!(cleared = self.records.len(), "Clearing data");
        self.records.clear();
    }

    /// Styled spreadsheet of the current view
    pub fn export_sheet(&self) -> AdvisorResult<Vec<u8>> {
        SheetExporter::new(&self.records, self.sort).export_bytes()
    }

    /// Single-page PDF of the current view
    pub fn export_document(&self, brand_mark: BrandMark) -> AdvisorResult<Vec<u8>> {
        PdfExporter::new(&self.records, self.sort, self.layout.clone(), brand_mark).export_bytes()
    }

    /// `active_advisors[_sorted_by_<field>_<order>].<ext>`
    pub fn export_file_name(&self, extension: &str) -> String {
        format!("{}{}.{}", EXPORT_BASE_NAME, self.sort.file_suffix(), extension)
    }
}
