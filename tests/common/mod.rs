//! Shared fixtures: advisor workbooks built in memory

#![allow(dead_code)]
#![allow(unused_imports)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// One fixture cell
#[derive(Debug, Clone)]
pub enum Cell {
    S(&'static str),
    N(f64),
    Empty,
}

pub use Cell::{Empty, N, S};

pub const HEADER: [Cell; 5] = [
    S("Advisor Code"),
    S("Advisor Name"),
    S("Advisor Status"),
    S("No of Policies"),
    S("Annualized New Business Premium (RS)"),
];

/// Write rows into the first sheet (and optionally a second sheet) and return the bytes
pub fn workbook_with_sheets(sheets: &[&[Vec<Cell>]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for rows in sheets {
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::S(text) => {
                        worksheet.write_string(r as u32, c as u16, *text).unwrap();
                    }
                    Cell::N(value) => {
                        worksheet.write_number(r as u32, c as u16, *value).unwrap();
                    }
                    Cell::Empty => {}
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

pub fn workbook(rows: &[Vec<Cell>]) -> Vec<u8> {
    workbook_with_sheets(&[rows])
}

/// Standard header followed by `rows`
pub fn advisor_workbook(rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut all = vec![HEADER.to_vec()];
    all.extend(rows.iter().cloned());
    workbook(&all)
}

/// Active advisor row
pub fn active(code: &'static str, name: &'static str, policies: f64, premium: f64) -> Vec<Cell> {
    vec![S(code), S(name), S("Active"), N(policies), N(premium)]
}

/// Write a workbook file into `dir`
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
