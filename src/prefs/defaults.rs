//! Storage naming convention and seed data for the preference files.

use crate::prefs::{Category, PreferenceSet};

/// Configuration for Preference File Persistence
pub struct PreferenceStorageConfig {
    /// Subdirectory beneath the application base directory
    pub directory: &'static str,
    /// Resource gating the calculation-preferences load branch
    pub calc_file: &'static str,
    /// Resource gating the column-preferences load branch
    pub column_file: &'static str,
}

pub const PREF_STORAGE: PreferenceStorageConfig = PreferenceStorageConfig {
    directory: "preferences",
    calc_file: "calc_preferences.json",
    column_file: "column_preferences.json",
};

/// Columns the Markets grid shows out of the box.
pub const MARKET_COLUMNS: &[&str] = &[
    "NAME",
    "SYMBOL",
    "SMA200",
    "SMA50",
    "SMA20",
    "CHART_PATTERN",
    "UNEXPECTED_ITEMS",
    "INDIVIDUAL_RATING",
];

/// Columns the Sectors grid shows out of the box (Markets set plus FINVIZ_RANK).
pub const SECTOR_COLUMNS: &[&str] = &[
    "NAME",
    "SYMBOL",
    "SMA200",
    "SMA50",
    "SMA20",
    "CHART_PATTERN",
    "UNEXPECTED_ITEMS",
    "FINVIZ_RANK",
    "INDIVIDUAL_RATING",
];

pub fn default_columns(category: Category) -> &'static [&'static str] {
    match category {
        Category::Market => MARKET_COLUMNS,
        Category::Sector => SECTOR_COLUMNS,
    }
}

/// Builds the full default column set for a category, everything active.
pub(crate) fn seeded_column_set(category: Category) -> PreferenceSet {
    default_columns(category)
        .iter()
        .map(|name| (name.to_string(), true))
        .collect()
}
