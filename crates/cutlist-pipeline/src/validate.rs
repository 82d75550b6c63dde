use cutlist_model::{CellGrid, MaterialRegistry, ScalarValue, Thresholds};

/// Scan data rows and emit ordered advisory remarks.
///
/// Rows run from 2 to `highest_row` exclusive: the last data row of these
/// sheets is a totals row and is deliberately not validated. A row is only
/// examined when its length cell is numeric; the rules below then apply
/// independently, in fixed order, so one row can produce several remarks.
pub fn validate(
    grid: &CellGrid,
    registry: &MaterialRegistry,
    thresholds: &Thresholds,
) -> Vec<String> {
    let mut remarks = Vec::new();

    for row in 2..grid.highest_row() {
        let length = grid.value(row, thresholds.length_column);
        let Some(length_num) = length.as_number() else {
            log::debug!("row {row}: non-numeric length, no validation");
            continue;
        };

        if length_num > thresholds.max_length {
            remarks.push(format!(
                "row {row}: length exceeds {} mm.",
                ScalarValue::Number(thresholds.max_length)
            ));
        }

        let width = grid.value(row, thresholds.width_column);
        if width.as_number().is_some_and(|w| w > thresholds.max_width) {
            remarks.push(format!(
                "row {row}: width exceeds {} mm.",
                ScalarValue::Number(thresholds.max_width)
            ));
        }

        // No edge-banding on either axis and thicker than an HDF back panel.
        let abs_length = number_or_zero(grid.value(row, thresholds.abs_length_column));
        let abs_width = number_or_zero(grid.value(row, thresholds.abs_width_column));
        let thickness = grid.value(row, thresholds.thickness_column).as_number();
        if abs_length == 0.0
            && abs_width == 0.0
            && thickness.is_some_and(|t| t > thresholds.max_hdf_thickness)
        {
            remarks.push(format!("row {row}: part is not edge-banded."));
        }

        let name = grid.value(row, thresholds.name_column).trimmed().to_uppercase();
        if name == "FRONT" {
            let material_name = grid.value(row, thresholds.material_column).to_string();
            if let Some(material) = registry.resolve(&material_name) {
                let continuation = grid
                    .value(row, thresholds.grain_continuation_column)
                    .trimmed();
                if material.has_grain && continuation.is_empty() {
                    remarks.push(format!("row {row}: missing grain continuation."));
                }
            }
        }

        if has_decimal_separator(width) || has_decimal_separator(length) {
            remarks.push(format!("row {row}: dimensions must be whole numbers."));
        }
    }

    remarks
}

fn number_or_zero(value: &ScalarValue) -> f64 {
    value.as_number().unwrap_or(0.0)
}

fn has_decimal_separator(value: &ScalarValue) -> bool {
    let s = value.to_string();
    s.contains('.') || s.contains(',')
}
