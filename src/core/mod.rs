//! Working-set state and ordering

pub mod session;
pub mod sorter;

pub use session::{ImportReport, Session};
pub use sorter::{rank_rows, sort_records, RankedRow};
