use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// Named numeric key/value configuration store.
///
/// Every key has a built-in default used when absent, so an empty store is a
/// fully working configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, f64>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn set(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).copied().unwrap_or(default)
    }

    /// 1-based column index setting. Values below 1 fall back to the default.
    pub fn get_column(&self, key: &str, default: u32) -> u32 {
        match self.0.get(key) {
            Some(&v) if v >= 1.0 => v as u32,
            Some(_) => default,
            None => default,
        }
    }
}

/// Validation threshold set: a configuration snapshot read once per run.
///
/// All column indices are 1-based; maxima are in millimetres.
#[derive(Clone, Debug, PartialEq)]
pub struct Thresholds {
    pub length_column: u32,
    pub width_column: u32,
    pub abs_length_column: u32,
    pub abs_width_column: u32,
    pub thickness_column: u32,
    pub name_column: u32,
    pub grain_continuation_column: u32,
    pub material_column: u32,
    pub object_name_column: u32,
    pub max_length: f64,
    pub max_width: f64,
    pub max_hdf_thickness: f64,
}

impl Thresholds {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            length_column: settings.get_column("length_column_index", 2),
            width_column: settings.get_column("width_column_index", 3),
            abs_length_column: settings.get_column("abs_length_column_index", 6),
            abs_width_column: settings.get_column("abs_width_column_index", 7),
            thickness_column: settings.get_column("thickness_column_index", 5),
            name_column: settings.get_column("name_column_index", 2),
            grain_continuation_column: settings.get_column("grain_continuation_column_index", 11),
            material_column: settings.get_column("material_column_index", 10),
            object_name_column: settings.get_column("object_name_column_index", 1),
            max_length: settings.get("max_length", 2800.0),
            max_width: settings.get("max_width", 2070.0),
            max_hdf_thickness: settings.get("max_hdf_thickness", 5.0),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from_settings(&Settings::new())
    }
}
