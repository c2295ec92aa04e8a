//! Session workflow tests: multi-file import, sort toggles, edits, clear, export

mod common;

use active_advisors::core::Session;
use active_advisors::pdf::BrandMark;
use active_advisors::{AdvisorError, ExportLayoutParams, SortField, SortOrder, SortState};
use common::*;
use std::collections::HashSet;
use tempfile::TempDir;

fn codes(session: &Session) -> Vec<String> {
    session.sorted().into_iter().map(|r| r.advisor_code).collect()
}

#[tokio::test]
async fn test_import_files_concatenates_all_files() {
    let dir = TempDir::new().unwrap();
    let jan = write_fixture(
        dir.path(),
        "jan.xlsx",
        &advisor_workbook(&[active("A1", "Jane", 1.0, 100.0), active("A2", "John", 2.0, 200.0)]),
    );
    let feb = write_fixture(
        dir.path(),
        "feb.xlsx",
        &advisor_workbook(&[active("A1", "Jane", 5.0, 500.0)]),
    );

    let mut session = Session::new();
    let reports = session.import_files(vec![jan, feb]).await;

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.is_ok()));
    assert_eq!(reports.iter().map(|r| r.imported()).sum::<usize>(), 3);
    // duplicates across files are kept
    assert_eq!(session.len(), 3);
    let distinct: HashSet<String> = codes(&session).into_iter().collect();
    assert_eq!(distinct.len(), 2);
}

#[tokio::test]
async fn test_failed_file_leaves_working_set_unchanged() {
    let dir = TempDir::new().unwrap();
    let good = write_fixture(
        dir.path(),
        "good.xlsx",
        &advisor_workbook(&[active("G1", "Good", 1.0, 1.0)]),
    );
    let corrupt = write_fixture(dir.path(), "corrupt.xlsx", b"not a workbook");
    let missing = dir.path().join("missing.xlsx");
    let no_header = write_fixture(
        dir.path(),
        "no_header.xlsx",
        &workbook(&[vec![S("Code")], vec![S("X1")]]),
    );

    let mut session = Session::new();
    let reports = session
        .import_files(vec![good, corrupt.clone(), missing.clone(), no_header.clone()])
        .await;

    assert_eq!(session.len(), 1);
    for report in &reports {
        if report.path == corrupt {
            assert!(matches!(report.outcome, Err(AdvisorError::Workbook(_))));
        } else if report.path == missing {
            assert!(matches!(report.outcome, Err(AdvisorError::UnreadableFile { .. })));
        } else if report.path == no_header {
            // a missing header row is silent: zero records, no error
            assert_eq!(report.imported(), 0);
            assert!(report.is_ok());
        } else {
            assert_eq!(report.imported(), 1);
        }
    }
}

#[test]
fn test_import_file_unreadable() {
    let mut session = Session::new();
    let result = session.import_file(std::path::Path::new("/definitely/not/here.xlsx"));
    assert!(matches!(result, Err(AdvisorError::UnreadableFile { .. })));
    assert!(session.is_empty());
}

#[test]
fn test_sort_toggle_workflow() {
    let mut session = Session::new();
    session
        .import_bytes(
            "mem.xlsx",
            &advisor_workbook(&[
                active("A", "Alpha", 2.0, 300.0),
                active("B", "Beta", 1.0, 100.0),
                active("C", "Gamma", 2.0, 200.0),
            ]),
        )
        .unwrap();

    assert_eq!(codes(&session), vec!["A", "B", "C"]);

    session.click_sort(SortField::NoOfPolicies);
    assert_eq!(codes(&session), vec!["B", "A", "C"]);

    session.click_sort(SortField::NoOfPolicies);
    assert_eq!(
        session.sort_state(),
        SortState::new(SortField::NoOfPolicies, SortOrder::Desc)
    );
    // A and C tie on policies and keep their input order
    assert_eq!(codes(&session), vec!["A", "C", "B"]);

    session.click_sort(SortField::AnnualizedPremium);
    assert_eq!(session.sort_state().order, SortOrder::Asc);
    assert_eq!(codes(&session), vec!["B", "C", "A"]);
}

#[test]
fn test_edit_then_export_uses_new_name() {
    let mut session = Session::new();
    session
        .import_bytes(
            "mem.xlsx",
            &advisor_workbook(&[active("A1", "Old Name", 1.0, 1.0), active("A2", "Other", 1.0, 1.0)]),
        )
        .unwrap();

    assert_eq!(session.edit_name("A1", "Brand New Name"), 1);
    assert_eq!(session.edit_name("NOPE", "Ghost"), 0);
    assert_eq!(session.records()[0].advisor_name, "Brand New Name");
    assert_eq!(session.records()[1].advisor_name, "Other");

    let pdf = session.export_document(BrandMark::bundled().unwrap()).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    let xlsx = session.export_sheet().unwrap();
    assert!(xlsx.starts_with(b"PK"));
}

#[test]
fn test_layout_travels_with_session() {
    let layout = ExportLayoutParams::new("ZONE 2 LEADERS", 1.5).unwrap();
    let mut session = Session::with_layout(layout.clone());
    session
        .import_bytes("mem.xlsx", &advisor_workbook(&[active("A1", "Jane", 1.0, 1.0)]))
        .unwrap();

    assert_eq!(session.layout(), &layout);
    session.clear();
    assert_eq!(session.layout().header_text(), "ZONE 2 LEADERS");
}

#[test]
fn test_clear_resets_working_set_only() {
    let mut session = Session::new();
    session
        .import_bytes("mem.xlsx", &advisor_workbook(&[active("A1", "Jane", 1.0, 1.0)]))
        .unwrap();
    session.click_sort(SortField::AnnualizedPremium);
    session.edit_name("A1", "Edited");

    session.clear();
    assert!(session.is_empty());
    assert_eq!(session.sort_state().field, Some(SortField::AnnualizedPremium));
    assert_eq!(
        session.export_file_name("xlsx"),
        "active_advisors_sorted_by_annualized_premium_asc.xlsx"
    );
}
