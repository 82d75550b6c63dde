use std::collections::BTreeMap;

use crate::{AnchoredImage, MaterialType, ScalarValue};

/// Destination row of the copied source header (row 1 of the banner sits
/// above it).
pub const HEADER_DEST_ROW: u32 = 2;

/// First destination row of regrouped content.
pub const DATA_START_ROW: u32 = 3;

/// Source row index -> destination row index, one per output group.
///
/// Always contains `1 -> HEADER_DEST_ROW` plus one entry per emitted data
/// row. Built incrementally during emission and consumed read-only by the
/// image relocator.
pub type RowRemap = BTreeMap<u32, u32>;

/// One row of the append-only output arena. The destination row of the row
/// at arena index `i` is `DATA_START_ROW + i`.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputRow {
    /// Blank spacer between object-group sections.
    Spacer,
    /// Bold/shaded section header carrying an object-group token (or the
    /// "Other items" title) in the object-name column.
    SectionHeader(String),
    /// A data row copied from the source sheet.
    Data {
        values: Vec<ScalarValue>,
        source_row: u32,
    },
}

/// Rows regrouped for one material type, in emission order, together with
/// the source->destination remap produced while emitting them.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeGroup {
    pub material_type: MaterialType,
    pub rows: Vec<OutputRow>,
    pub remap: RowRemap,
}

impl TypeGroup {
    /// Destination row of the arena entry at `index`.
    pub fn destination_row(index: usize) -> u32 {
        DATA_START_ROW + index as u32
    }
}

/// Complete description of one output workbook sheet, ready for a writer.
///
/// Keeps the pipeline decoupled from the write-side codec: the assembler
/// produces these and `cutlist-xlsx` turns them into `.xlsx` bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputSheet {
    pub client_name: String,
    pub project_name: String,
    /// Header row copied verbatim from source row 1.
    pub header: Vec<ScalarValue>,
    /// Regrouped content, starting at [`DATA_START_ROW`].
    pub rows: Vec<OutputRow>,
    /// The object-name column (1-based) that section headers are written to.
    pub object_name_column: u32,
    /// Images already re-anchored at destination rows.
    pub images: Vec<AnchoredImage>,
}
