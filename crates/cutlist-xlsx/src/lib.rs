//! XLSX adapters for the cut-list pipeline.
//!
//! The pipeline core works on [`cutlist_model`] types only; this crate owns
//! every contact point with workbook bytes:
//!
//! - [`load_grid`]: reads the active sheet of an uploaded workbook into a
//!   [`cutlist_model::CellGrid`] (via `calamine`).
//! - [`extract_images`]: walks the Open Packaging Convention ZIP to collect
//!   row-anchored images the cell reader cannot see.
//! - [`write_output_sheet`]: renders an assembled [`cutlist_model::OutputSheet`]
//!   to a styled `.xlsx` file (via `rust_xlsxwriter`).

mod drawings;
mod package;
mod read;
mod write;

use thiserror::Error;

pub use drawings::extract_images;
pub use read::{load_grid, LoadedSheet};
pub use write::write_output_sheet;

#[derive(Debug, Error)]
pub enum XlsxReadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("spreadsheet error: {0}")]
    Sheet(#[from] calamine::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("xml error: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("workbook has no sheets")]
    NoSheets,
    #[error("invalid workbook: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum XlsxWriteError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
