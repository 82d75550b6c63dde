use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use cutlist_model::{CellGrid, ScalarValue};

use crate::XlsxReadError;

/// The decoded active sheet of an uploaded workbook.
#[derive(Clone, Debug)]
pub struct LoadedSheet {
    pub grid: CellGrid,
    pub sheet_name: String,
}

/// Load the first sheet of `path` into a 1-indexed [`CellGrid`].
///
/// Cached values are used as-is; the pipeline never re-evaluates formulas.
pub fn load_grid(path: &Path) -> Result<LoadedSheet, XlsxReadError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(XlsxReadError::NoSheets)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut grid = CellGrid::new();
    if let Some((start_row, start_col)) = range.start() {
        // calamine ranges are 0-based and anchored at the first used cell;
        // the grid is 1-based and absolute.
        for (r, row) in range.rows().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let value = convert_cell(cell);
                if !value.is_empty() {
                    grid.set(start_row + r as u32 + 1, start_col + c as u32 + 1, value);
                }
            }
        }
    }

    log::debug!(
        "loaded sheet {:?}: {} rows x {} cols",
        sheet_name,
        grid.highest_row(),
        grid.highest_col()
    );

    Ok(LoadedSheet { grid, sheet_name })
}

fn convert_cell(data: &Data) -> ScalarValue {
    match data {
        Data::Empty | Data::Error(_) => ScalarValue::Empty,
        Data::Int(i) => ScalarValue::Number(*i as f64),
        Data::Float(f) => ScalarValue::Number(*f),
        Data::String(s) => ScalarValue::String(s.clone()),
        Data::Bool(b) => ScalarValue::Boolean(*b),
        Data::DateTime(dt) => ScalarValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => ScalarValue::String(s.clone()),
    }
}
