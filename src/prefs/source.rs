//! The seam to the persistence collaborator that owns the preference files.

use {
    crate::prefs::{Category, PREF_STORAGE, PreferenceSet},
    anyhow::{Context, Result},
    std::{
        collections::HashMap,
        fs,
        path::{Path, PathBuf},
    },
};

/// Abstract interface for reading persisted preferences. The store only cares
/// that the two resources can be probed for existence and parsed into
/// name -> active mappings; the file format belongs to the implementation.
pub trait PreferenceSource {
    /// Whether the preferences directory exists at all.
    fn available(&self) -> bool;
    fn has_calc_resource(&self) -> bool;
    fn has_column_resource(&self) -> bool;
    fn load_calc_preferences(&self, category: Category) -> Result<PreferenceSet>;
    fn load_column_preferences(&self, category: Category) -> Result<PreferenceSet>;
}

/// File-backed source reading JSON objects from the `preferences` subdirectory
/// beneath a base directory. Each resource holds one object per category:
/// `{"Market": {"NAME": true, ...}, "Sector": {...}}`.
pub struct JsonPreferenceSource {
    dir: PathBuf,
}

impl JsonPreferenceSource {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: base_dir.as_ref().join(PREF_STORAGE.directory),
        }
    }

    fn read_category(&self, filename: &str, category: Category) -> Result<PreferenceSet> {
        let path = self.dir.join(filename);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut by_category: HashMap<Category, PreferenceSet> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed preference file {}", path.display()))?;

        // A file that omits a category yields an empty set; the store's
        // replacement guard decides what that means.
        Ok(by_category.remove(&category).unwrap_or_default())
    }
}

impl PreferenceSource for JsonPreferenceSource {
    fn available(&self) -> bool {
        self.dir.is_dir()
    }

    fn has_calc_resource(&self) -> bool {
        self.dir.join(PREF_STORAGE.calc_file).is_file()
    }

    fn has_column_resource(&self) -> bool {
        self.dir.join(PREF_STORAGE.column_file).is_file()
    }

    fn load_calc_preferences(&self, category: Category) -> Result<PreferenceSet> {
        self.read_category(PREF_STORAGE.calc_file, category)
    }

    fn load_column_preferences(&self, category: Category) -> Result<PreferenceSet> {
        self.read_category(PREF_STORAGE.column_file, category)
    }
}
