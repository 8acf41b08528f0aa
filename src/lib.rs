// Core modules
pub mod domain;
pub mod prefs;

// Re-export commonly used types outside of crate
pub use domain::Stock;
pub use prefs::{
    Category, JsonPreferenceSource, PreferenceDomain, PreferenceSource, PreferenceStore,
};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory the `preferences` subdirectory lives beneath
    #[arg(long, default_value = ".")]
    pub base_dir: std::path::PathBuf,
}
