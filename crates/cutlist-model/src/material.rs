use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a material type (the grouping key for output workbooks).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MaterialTypeId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialType {
    pub id: MaterialTypeId,
    pub name: String,
}

/// A named substance/finish, belonging to at most one material type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub has_grain: bool,
    #[serde(default)]
    pub material_type_id: Option<MaterialTypeId>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted material catalog: the record storage the pipeline snapshots at
/// run start. Stored as a JSON document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub types: Vec<MaterialType>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn material_type(&self, id: MaterialTypeId) -> Option<&MaterialType> {
        self.types.iter().find(|t| t.id == id)
    }

    /// Case-insensitive type lookup by display name.
    pub fn type_by_name(&self, name: &str) -> Option<&MaterialType> {
        let needle = name.trim().to_lowercase();
        self.types.iter().find(|t| t.name.to_lowercase() == needle)
    }

    /// Material types sorted by name, as surfaced to callers for the
    /// unknown-material assignment step.
    pub fn types_sorted_by_name(&self) -> Vec<MaterialType> {
        let mut types = self.types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }

    /// Create or update a material assignment (matched by name, case
    /// insensitively). Used by callers to register previously unknown
    /// materials before a run snapshots the registry.
    pub fn upsert_assignment(&mut self, name: &str, type_id: MaterialTypeId, has_grain: bool) {
        let key = name.trim().to_lowercase();
        if let Some(existing) = self
            .materials
            .iter_mut()
            .find(|m| m.name.trim().to_lowercase() == key)
        {
            existing.material_type_id = Some(type_id);
            existing.has_grain = has_grain;
        } else {
            self.materials.push(Material {
                name: name.trim().to_string(),
                has_grain,
                material_type_id: Some(type_id),
            });
        }
    }
}

/// Registry entry: a material joined with its resolved type.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisteredMaterial {
    pub name: String,
    pub has_grain: bool,
    pub material_type: Option<MaterialType>,
}

/// Immutable per-run snapshot of known materials, keyed by lower-cased
/// trimmed name for O(1) case-insensitive resolution.
///
/// Each run builds its own snapshot at start; concurrent catalog edits never
/// leak into a running pipeline.
#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    by_name: HashMap<String, RegisteredMaterial>,
}

impl MaterialRegistry {
    /// Build a snapshot from the persisted catalog. O(n) in catalog size.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut by_name = HashMap::with_capacity(catalog.materials.len());
        for material in &catalog.materials {
            let material_type = material
                .material_type_id
                .and_then(|id| catalog.material_type(id))
                .cloned();
            by_name.insert(
                material.name.trim().to_lowercase(),
                RegisteredMaterial {
                    name: material.name.clone(),
                    has_grain: material.has_grain,
                    material_type,
                },
            );
        }
        Self { by_name }
    }

    /// Exact-match lookup on the full trimmed name, case insensitive.
    pub fn resolve(&self, name: &str) -> Option<&RegisteredMaterial> {
        self.by_name.get(&name.trim().to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        Catalog {
            types: vec![
                MaterialType {
                    id: MaterialTypeId(1),
                    name: "Chipboard".to_string(),
                },
                MaterialType {
                    id: MaterialTypeId(2),
                    name: "HDF".to_string(),
                },
            ],
            materials: vec![
                Material {
                    name: "Oak Veneer".to_string(),
                    has_grain: true,
                    material_type_id: Some(MaterialTypeId(1)),
                },
                Material {
                    name: "White HDF".to_string(),
                    has_grain: false,
                    material_type_id: None,
                },
            ],
        }
    }

    #[test]
    fn resolve_is_case_insensitive_and_trimmed() {
        let registry = MaterialRegistry::from_catalog(&catalog());
        let hit = registry.resolve("  oak veneer ").unwrap();
        assert_eq!(hit.name, "Oak Veneer");
        assert!(hit.has_grain);
        assert_eq!(
            hit.material_type.as_ref().map(|t| t.name.as_str()),
            Some("Chipboard")
        );
        assert!(registry.resolve("oak").is_none());
    }

    #[test]
    fn untyped_material_resolves_without_type() {
        let registry = MaterialRegistry::from_catalog(&catalog());
        let hit = registry.resolve("WHITE HDF").unwrap();
        assert_eq!(hit.material_type, None);
    }

    #[test]
    fn upsert_updates_existing_by_name() {
        let mut cat = catalog();
        cat.upsert_assignment("OAK VENEER", MaterialTypeId(2), false);
        assert_eq!(cat.materials.len(), 2);
        let material = &cat.materials[0];
        assert_eq!(material.material_type_id, Some(MaterialTypeId(2)));
        assert!(!material.has_grain);

        cat.upsert_assignment("Birch Ply", MaterialTypeId(1), true);
        assert_eq!(cat.materials.len(), 3);
    }

    #[test]
    fn catalog_roundtrips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let cat = catalog();
        cat.save(&path).unwrap();
        assert_eq!(Catalog::load(&path).unwrap(), cat);
    }

    #[test]
    fn types_sorted_by_name() {
        let cat = catalog();
        let names: Vec<_> = cat
            .types_sorted_by_name()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Chipboard".to_string(), "HDF".to_string()]);
    }
}
