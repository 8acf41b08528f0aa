//! Preference and scoring configuration for the screener.

// Can all be private now because we have a public re-export.
mod scores;
mod source;
mod store;
mod types;

// Public so callers can reach the default column lists and file names
pub mod defaults;

// Re-export commonly used items
pub use defaults::PREF_STORAGE;
pub use scores::ScoreTable;
pub use source::{JsonPreferenceSource, PreferenceSource};
pub use store::PreferenceStore;
pub use types::{Category, LoadedFlags, PreferenceDomain, PreferenceMatrix, PreferenceSet};
