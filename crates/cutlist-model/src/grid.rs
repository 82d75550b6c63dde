use std::collections::HashMap;

use crate::ScalarValue;

static EMPTY_CELL: ScalarValue = ScalarValue::Empty;

/// A 1-indexed `(row, column) -> ScalarValue` view of one sheet.
///
/// The grid is populated once by a codec adapter and treated as immutable by
/// the pipeline; the pipeline never writes back into the source grid.
#[derive(Clone, Debug, Default)]
pub struct CellGrid {
    cells: HashMap<(u32, u32), ScalarValue>,
    highest_row: u32,
    highest_col: u32,
}

impl CellGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cell value. Both coordinates are 1-based; empty values are
    /// dropped so `highest_row`/`highest_col` track real data extent.
    pub fn set(&mut self, row: u32, col: u32, value: impl Into<ScalarValue>) {
        debug_assert!(row >= 1 && col >= 1, "cell coordinates are 1-based");
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.highest_row = self.highest_row.max(row);
        self.highest_col = self.highest_col.max(col);
        self.cells.insert((row, col), value);
    }

    /// Value at `(row, col)`; absent cells read as [`ScalarValue::Empty`].
    pub fn value(&self, row: u32, col: u32) -> &ScalarValue {
        self.cells.get(&(row, col)).unwrap_or(&EMPTY_CELL)
    }

    /// Highest 1-based row index containing a non-empty value (0 if none).
    pub fn highest_row(&self) -> u32 {
        self.highest_row
    }

    /// Highest 1-based column index containing a non-empty value (0 if none).
    pub fn highest_col(&self) -> u32 {
        self.highest_col
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All values of one row, columns `1..=highest_col`, in order.
    pub fn row_values(&self, row: u32) -> Vec<ScalarValue> {
        (1..=self.highest_col)
            .map(|col| self.value(row, col).clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_data_extent() {
        let mut grid = CellGrid::new();
        grid.set(2, 3, "x");
        grid.set(5, 1, 42.0);
        assert_eq!(grid.highest_row(), 5);
        assert_eq!(grid.highest_col(), 3);
        assert_eq!(grid.value(2, 3), &ScalarValue::from("x"));
        assert_eq!(grid.value(1, 1), &ScalarValue::Empty);
    }

    #[test]
    fn empty_values_do_not_extend_the_grid() {
        let mut grid = CellGrid::new();
        grid.set(10, 10, ScalarValue::Empty);
        assert!(grid.is_empty());
        assert_eq!(grid.highest_row(), 0);
    }

    #[test]
    fn row_values_cover_all_columns() {
        let mut grid = CellGrid::new();
        grid.set(1, 1, "a");
        grid.set(1, 3, "c");
        assert_eq!(
            grid.row_values(1),
            vec![
                ScalarValue::from("a"),
                ScalarValue::Empty,
                ScalarValue::from("c")
            ]
        );
    }
}
