//! CLI command handlers

pub mod commands;

pub use commands::{
    export, parse_rename, parse_sort_field, show, ExportFormat, ExportOptions, ViewOptions,
};
