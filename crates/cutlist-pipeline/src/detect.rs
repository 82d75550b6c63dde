use std::collections::HashSet;

use cutlist_model::{CellGrid, MaterialRegistry, Thresholds};

/// Distinct material names present in the sheet but unknown to the registry,
/// in first-seen order.
///
/// Collection deduplicates by exact trimmed value; registry membership is
/// tested case-insensitively, so `"oak"` in the sheet never reports for a
/// registered `"Oak"`.
pub fn detect_unknown_materials(
    grid: &CellGrid,
    registry: &MaterialRegistry,
    thresholds: &Thresholds,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for row in 2..=grid.highest_row() {
        let name = grid.value(row, thresholds.material_column).trimmed();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }

    names
        .into_iter()
        .filter(|name| !registry.contains(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutlist_model::{Catalog, Material, MaterialRegistry, MaterialType, MaterialTypeId};
    use pretty_assertions::assert_eq;

    fn registry_with(names: &[&str]) -> MaterialRegistry {
        MaterialRegistry::from_catalog(&Catalog {
            types: vec![MaterialType {
                id: MaterialTypeId(1),
                name: "Board".to_string(),
            }],
            materials: names
                .iter()
                .map(|name| Material {
                    name: name.to_string(),
                    has_grain: false,
                    material_type_id: Some(MaterialTypeId(1)),
                })
                .collect(),
        })
    }

    #[test]
    fn reports_unknown_names_in_first_seen_order() {
        let mut grid = CellGrid::new();
        grid.set(1, 10, "MATERIAL");
        grid.set(2, 10, "Oak");
        grid.set(3, 10, " Walnut ");
        grid.set(4, 10, "Oak");
        grid.set(5, 10, "Birch");
        let unknown =
            detect_unknown_materials(&grid, &registry_with(&["Birch"]), &Thresholds::default());
        assert_eq!(unknown, vec!["Oak".to_string(), "Walnut".to_string()]);
    }

    #[test]
    fn registered_names_never_report_regardless_of_case() {
        let mut grid = CellGrid::new();
        grid.set(2, 10, "OAK");
        grid.set(3, 10, "oak");
        let unknown =
            detect_unknown_materials(&grid, &registry_with(&["Oak"]), &Thresholds::default());
        assert!(unknown.is_empty());
    }

    #[test]
    fn empty_cells_are_ignored() {
        let mut grid = CellGrid::new();
        grid.set(2, 10, "   ");
        grid.set(3, 2, 100.0);
        let unknown = detect_unknown_materials(&grid, &registry_with(&[]), &Thresholds::default());
        assert!(unknown.is_empty());
    }
}
