//! Run orchestration: the two caller-facing operations.
//!
//! `inspect` answers "what will I need to assign, and what looks off" before
//! anything is written; `process` performs the full classify → relocate →
//! assemble sequence. Both take their own registry snapshot from the catalog
//! at the start, so a run never observes concurrent catalog edits.

use std::path::{Path, PathBuf};

use cutlist_model::{AnchoredImage, Catalog, CellGrid, MaterialRegistry, MaterialType, Thresholds};
use serde::Serialize;
use uuid::Uuid;

use crate::assemble::assemble;
use crate::classify::classify;
use crate::detect::detect_unknown_materials;
use crate::validate::validate;
use crate::PipelineError;

/// Identity of one run: an opaque unique token plus the display metadata
/// written into banners, file names and the summary.
#[derive(Clone, Debug)]
pub struct RunInfo {
    pub token: String,
    pub client_name: String,
    pub project_name: String,
    pub source_file_name: String,
    pub author: String,
}

impl RunInfo {
    /// Fresh opaque run token. Tokens are never reused across runs; output
    /// paths derive from them, which is all the run isolation needed.
    pub fn new_token() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Pre-flight report surfaced to the caller before assignments are made.
#[derive(Clone, Debug, Serialize)]
pub struct Inspection {
    pub unknown_materials: Vec<String>,
    pub remarks: Vec<String>,
    /// Known types, sorted by name, for the caller's assignment choices.
    pub material_types: Vec<MaterialType>,
}

/// Detect unknown materials and collect validation remarks, without
/// producing any output files.
pub fn inspect(grid: &CellGrid, catalog: &Catalog, thresholds: &Thresholds) -> Inspection {
    let registry = MaterialRegistry::from_catalog(catalog);
    Inspection {
        unknown_materials: detect_unknown_materials(grid, &registry, thresholds),
        remarks: validate(grid, &registry, thresholds),
        material_types: catalog.types_sorted_by_name(),
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FileRef {
    pub name: String,
    pub path: PathBuf,
}

/// Structured result of a completed run.
#[derive(Clone, Debug, Serialize)]
pub struct RunOutput {
    pub archive_path: PathBuf,
    pub files: Vec<String>,
    pub file_refs: Vec<FileRef>,
    pub remarks: Vec<String>,
}

/// Execute one full run: validate, classify, relocate images, assemble
/// workbooks, summary and archive under `out_dir`.
///
/// Caller-supplied material assignments must already be written to the
/// catalog; the registry snapshot is taken here, once, and used for every
/// stage of the run.
pub fn process(
    grid: &CellGrid,
    images: &[AnchoredImage],
    catalog: &Catalog,
    thresholds: &Thresholds,
    info: &RunInfo,
    out_dir: &Path,
) -> Result<RunOutput, PipelineError> {
    let registry = MaterialRegistry::from_catalog(catalog);
    let remarks = validate(grid, &registry, thresholds);
    let classified = classify(grid, &registry, thresholds);
    log::info!(
        "run {}: {} groups, {} remarks",
        info.token,
        classified.groups.len(),
        remarks.len()
    );

    let assembled = assemble(
        info,
        &classified,
        images,
        thresholds.object_name_column,
        &remarks,
        out_dir,
    )?;

    Ok(RunOutput {
        archive_path: assembled.archive_path,
        files: assembled.files,
        file_refs: assembled
            .file_paths
            .into_iter()
            .map(|(name, path)| FileRef { name, path })
            .collect(),
        remarks,
    })
}
