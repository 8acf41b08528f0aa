//! Closed key types for the preference store.
//!
//! The original screener kept everything in one nested map keyed by magic
//! strings ("CALC"/"COL") and chars ('M'/'S'). Here the keys are closed enums
//! and the four domain x category cells are named fields, so an invalid key
//! can't exist at runtime.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::{Display, EnumIter};

/// Name -> active flag for one (domain, category) cell.
/// Names are instrument symbols for the calculation domain and column
/// identifiers for the column domain.
pub type PreferenceSet = HashMap<String, bool>;

/// Which aspect of the screener a preference controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum PreferenceDomain {
    /// Which instruments feed the aggregate score.
    Calculation,
    /// Which fields the grids display.
    Column,
}

/// The two instrument classifications preferences are scoped to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, Default,
)]
pub enum Category {
    #[default]
    Market,
    Sector,
}

/// The four preference sets, one per (domain, category) cell.
#[derive(Debug, Clone, Default)]
pub struct PreferenceMatrix {
    pub(crate) calc_markets: PreferenceSet,
    pub(crate) calc_sectors: PreferenceSet,
    pub(crate) col_markets: PreferenceSet,
    pub(crate) col_sectors: PreferenceSet,
}

impl PreferenceMatrix {
    pub fn get(&self, domain: PreferenceDomain, category: Category) -> &PreferenceSet {
        match (domain, category) {
            (PreferenceDomain::Calculation, Category::Market) => &self.calc_markets,
            (PreferenceDomain::Calculation, Category::Sector) => &self.calc_sectors,
            (PreferenceDomain::Column, Category::Market) => &self.col_markets,
            (PreferenceDomain::Column, Category::Sector) => &self.col_sectors,
        }
    }

    pub(crate) fn get_mut(
        &mut self,
        domain: PreferenceDomain,
        category: Category,
    ) -> &mut PreferenceSet {
        match (domain, category) {
            (PreferenceDomain::Calculation, Category::Market) => &mut self.calc_markets,
            (PreferenceDomain::Calculation, Category::Sector) => &mut self.calc_sectors,
            (PreferenceDomain::Column, Category::Market) => &mut self.col_markets,
            (PreferenceDomain::Column, Category::Sector) => &mut self.col_sectors,
        }
    }
}

/// Tracks which cells have been replaced by persisted data.
/// Starts all-false; a successful load flips exactly one cell true.
/// Nothing ever resets a cell back to false.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadedFlags {
    calc_markets: bool,
    calc_sectors: bool,
    col_markets: bool,
    col_sectors: bool,
}

impl LoadedFlags {
    pub fn get(&self, domain: PreferenceDomain, category: Category) -> bool {
        match (domain, category) {
            (PreferenceDomain::Calculation, Category::Market) => self.calc_markets,
            (PreferenceDomain::Calculation, Category::Sector) => self.calc_sectors,
            (PreferenceDomain::Column, Category::Market) => self.col_markets,
            (PreferenceDomain::Column, Category::Sector) => self.col_sectors,
        }
    }

    pub(crate) fn mark(&mut self, domain: PreferenceDomain, category: Category) {
        match (domain, category) {
            (PreferenceDomain::Calculation, Category::Market) => self.calc_markets = true,
            (PreferenceDomain::Calculation, Category::Sector) => self.calc_sectors = true,
            (PreferenceDomain::Column, Category::Market) => self.col_markets = true,
            (PreferenceDomain::Column, Category::Sector) => self.col_sectors = true,
        }
    }
}
