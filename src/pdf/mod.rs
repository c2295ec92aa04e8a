//! Single-page PDF report export
//!
//! The page is sized exactly to the table: see [`layout::PageGeometry`].

pub mod layout;
mod metrics;
mod renderer;

pub use layout::PageGeometry;
pub use renderer::{BrandMark, PdfExporter};
