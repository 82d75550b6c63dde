use std::collections::HashMap;

use cutlist_model::{
    CellGrid, MaterialRegistry, MaterialType, MaterialTypeId, OutputRow, RowRemap, ScalarValue,
    Thresholds, TypeGroup, HEADER_DEST_ROW,
};

/// Section title collecting rows without an object-group token.
pub const OTHER_ITEMS_TITLE: &str = "Other items";

/// Outcome of resolving one data row against the registry.
///
/// The skip variants are not errors: skipped rows are silently excluded from
/// every output, with no remark and no surfaced count.
#[derive(Clone, Debug, PartialEq)]
pub enum RowResolution {
    Resolved { material_type: MaterialType },
    /// Material-name cell empty after trim.
    SkippedEmpty,
    /// Name not present in the registry.
    SkippedUnresolved,
    /// Material known but not assigned to any type.
    SkippedUntyped,
}

/// Resolve the material-name cell of one row.
pub fn resolve_row(
    values: &[ScalarValue],
    registry: &MaterialRegistry,
    material_column: u32,
) -> RowResolution {
    let name = values
        .get(material_column as usize - 1)
        .map(|v| v.trimmed())
        .unwrap_or_default();
    if name.is_empty() {
        return RowResolution::SkippedEmpty;
    }
    match registry.resolve(&name) {
        None => RowResolution::SkippedUnresolved,
        Some(material) => match &material.material_type {
            None => RowResolution::SkippedUntyped,
            Some(material_type) => RowResolution::Resolved {
                material_type: material_type.clone(),
            },
        },
    }
}

/// The classifier's output: the source header row plus one regrouped
/// [`TypeGroup`] per material type, in first-seen type order.
#[derive(Clone, Debug, PartialEq)]
pub struct Classified {
    pub header: Vec<ScalarValue>,
    pub groups: Vec<TypeGroup>,
}

/// Classify data rows by material type and regroup each type's rows into an
/// output arena with object-group clustering.
pub fn classify(
    grid: &CellGrid,
    registry: &MaterialRegistry,
    thresholds: &Thresholds,
) -> Classified {
    let header = grid.row_values(1);

    let mut order: Vec<MaterialTypeId> = Vec::new();
    let mut pending: HashMap<MaterialTypeId, (MaterialType, Vec<(u32, Vec<ScalarValue>)>)> =
        HashMap::new();

    for row in 2..=grid.highest_row() {
        let values = grid.row_values(row);
        match resolve_row(&values, registry, thresholds.material_column) {
            RowResolution::Resolved { material_type } => {
                let entry = pending.entry(material_type.id).or_insert_with(|| {
                    order.push(material_type.id);
                    (material_type, Vec::new())
                });
                entry.1.push((row, values));
            }
            skipped => log::debug!("row {row} dropped from classification: {skipped:?}"),
        }
    }

    let groups = order
        .iter()
        .filter_map(|id| pending.remove(id))
        .map(|(material_type, rows)| {
            build_group(material_type, rows, thresholds.object_name_column)
        })
        .collect();

    Classified { header, groups }
}

/// Re-derive one group's output order.
///
/// Rows are first stably sorted by the object-name column's string form so
/// rows of one logical object become contiguous, then emitted left to right:
/// a digit-leading first-column token opens a section (spacer unless the
/// group starts here, then a shaded header carrying the token), everything
/// else lands in a single trailing "Other items" section. The remap is built
/// alongside emission; destination rows are arena indices offset by the
/// banner and header rows.
fn build_group(
    material_type: MaterialType,
    mut rows: Vec<(u32, Vec<ScalarValue>)>,
    object_name_column: u32,
) -> TypeGroup {
    let sort_key = |values: &[ScalarValue]| -> String {
        values
            .get(object_name_column as usize - 1)
            .map(|v| v.to_string())
            .unwrap_or_default()
    };
    rows.sort_by(|a, b| sort_key(&a.1).cmp(&sort_key(&b.1)));

    let mut arena: Vec<OutputRow> = Vec::new();
    let mut remap = RowRemap::new();
    remap.insert(1, HEADER_DEST_ROW);

    let mut previous_token: Option<String> = None;
    let mut inserted_other_section = false;

    for (source_row, values) in rows {
        let token = values.first().map(|v| v.trimmed()).unwrap_or_default();
        let starts_with_digit = token.chars().next().is_some_and(|c| c.is_ascii_digit());

        if starts_with_digit && previous_token.as_deref() != Some(token.as_str()) {
            if !arena.is_empty() {
                arena.push(OutputRow::Spacer);
            }
            arena.push(OutputRow::SectionHeader(token.clone()));
            previous_token = Some(token);
        } else if !starts_with_digit && !inserted_other_section {
            arena.push(OutputRow::Spacer);
            arena.push(OutputRow::SectionHeader(OTHER_ITEMS_TITLE.to_string()));
            inserted_other_section = true;
        }

        remap.insert(source_row, TypeGroup::destination_row(arena.len()));
        arena.push(OutputRow::Data { values, source_row });
    }

    TypeGroup {
        material_type,
        rows: arena,
        remap,
    }
}
