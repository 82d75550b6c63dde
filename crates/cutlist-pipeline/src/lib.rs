//! Cut-list processing pipeline.
//!
//! One run reads an order sheet (as a [`cutlist_model::CellGrid`] plus its
//! anchored images), validates rows into advisory remarks, classifies each
//! row by material type via a registry snapshot, regroups rows per type with
//! object-group clustering, relocates images to their new rows, and writes
//! one workbook per type plus a summary into a flat archive.
//!
//! Stages are free functions over model types so each is testable in
//! isolation; [`run::process`] wires them together.

pub mod assemble;
pub mod classify;
pub mod detect;
pub mod relocate;
pub mod run;
pub mod validate;

use std::path::PathBuf;

use thiserror::Error;

pub use assemble::{output_file_name, slugify, AssembledRun, SUMMARY_FILE_NAME};
pub use classify::{classify, resolve_row, Classified, RowResolution, OTHER_ITEMS_TITLE};
pub use detect::detect_unknown_materials;
pub use relocate::relocate;
pub use run::{inspect, process, FileRef, Inspection, RunInfo, RunOutput};
pub use validate::validate;

/// Terminal failures for a whole run. Row-level conditions (empty or
/// unresolved materials, non-numeric cells) are absorbed by the stages and
/// never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Read(#[from] cutlist_xlsx::XlsxReadError),
    #[error(transparent)]
    Write(#[from] cutlist_xlsx::XlsxWriteError),
    #[error("cannot create output archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("source file not found: {0}")]
    MissingSource(PathBuf),
}
