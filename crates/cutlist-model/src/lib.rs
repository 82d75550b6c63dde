//! `cutlist-model` defines the core in-memory data structures for the
//! cut-list processing pipeline.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the classification/validation pipeline (`cutlist-pipeline`)
//! - `.xlsx` read/write adapters (`cutlist-xlsx`)
//! - callers embedding the pipeline behind their own transport

mod drawings;
mod grid;
mod material;
mod output;
mod settings;
mod value;

pub use drawings::{AnchoredImage, EmuOffset, EmuSize, ImageData, ImageFormat, EMU_PER_PIXEL};
pub use grid::CellGrid;
pub use material::{
    Catalog, CatalogError, Material, MaterialRegistry, MaterialType, MaterialTypeId,
    RegisteredMaterial,
};
pub use output::{OutputRow, OutputSheet, RowRemap, TypeGroup, DATA_START_ROW, HEADER_DEST_ROW};
pub use settings::{Settings, Thresholds};
pub use value::ScalarValue;
