//! Active Advisors - spreadsheet import and styled report export
//!
//! This library reads insurance-advisor workbooks, keeps the advisors whose
//! status is "active", and exports the (optionally sorted and edited) table as
//! a banded spreadsheet or a single-page PDF sized to its content.
//!
//! # Features
//!
//! - Header row located by content, so title rows above it are tolerated
//! - Permissive column mapping: missing columns read as empty/zero
//! - Stable sort by premium or policy count with click-to-toggle semantics
//! - Rank banding (top 3 / top 10 / rest) shared by both export targets
//! - Deterministic PDF page geometry from the row count
//!
//! # Example
//!
//! ```no_run
//! use active_advisors::core::Session;
//! use active_advisors::pdf::BrandMark;
//! use active_advisors::types::SortField;
//! use std::path::Path;
//!
//! let mut session = Session::new();
//! session.import_file(Path::new("advisors.xlsx"))?;
//! session.click_sort(SortField::AnnualizedPremium);
//! session.click_sort(SortField::AnnualizedPremium); // descending
//!
//! let pdf = session.export_document(BrandMark::bundled()?)?;
//! std::fs::write(session.export_file_name("pdf"), pdf)?;
//! # Ok::<(), active_advisors::error::AdvisorError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod pdf;
pub mod types;

// Re-export commonly used types
pub use error::{AdvisorError, AdvisorResult};
pub use types::{AdvisorRecord, ExportLayoutParams, SortField, SortOrder, SortState};
