//! Runtime preference store for the screener.
//!
//! Owns the calculation/column preference sets for Markets and Sectors, the
//! fixed scoring table, and the loaded-from-disk tracking. Configuration must
//! never crash the host: every edge case (missing files, empty payloads,
//! unscored attributes, duplicate inserts) degrades to a safe default, with a
//! log line so a rejected update is at least visible.

use {
    crate::{
        domain::Stock,
        prefs::{
            Category, LoadedFlags, PreferenceDomain, PreferenceMatrix, PreferenceSet,
            PreferenceSource, ScoreTable, defaults::seeded_column_set,
        },
    },
    itertools::Itertools,
    strum::IntoEnumIterator,
};

pub struct PreferenceStore {
    prefs: PreferenceMatrix,
    scores: ScoreTable,
    loaded: LoadedFlags,
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore {
    /// Seeds empty calculation sets, fully-active default column sets and the
    /// fixed score table. Nothing counts as loaded yet.
    pub fn new() -> Self {
        let mut prefs = PreferenceMatrix::default();
        for category in Category::iter() {
            *prefs.get_mut(PreferenceDomain::Column, category) = seeded_column_set(category);
        }

        Self {
            prefs,
            scores: ScoreTable::new(),
            loaded: LoadedFlags::default(),
        }
    }

    // --- QUERIES ---

    /// Symbols of the stocks selected to feed the overall calculation.
    pub fn calculation_preferences(&self, category: Category) -> Vec<String> {
        self.active_names(PreferenceDomain::Calculation, category)
    }

    /// Identifiers of the columns configured to display.
    pub fn column_preferences(&self, category: Category) -> Vec<String> {
        self.active_names(PreferenceDomain::Column, category)
    }

    fn active_names(&self, domain: PreferenceDomain, category: Category) -> Vec<String> {
        self.prefs
            .get(domain, category)
            .iter()
            .filter(|(_, active)| **active)
            .map(|(name, _)| name.clone())
            .sorted()
            .collect()
    }

    /// Full name -> active mapping for the calculation domain.
    pub fn calculation_map(&self, category: Category) -> &PreferenceSet {
        self.prefs.get(PreferenceDomain::Calculation, category)
    }

    /// Full name -> active mapping for the column domain.
    pub fn column_map(&self, category: Category) -> &PreferenceSet {
        self.prefs.get(PreferenceDomain::Column, category)
    }

    /// Score for a stock attribute/value pair; 0 when the pair is unscored.
    pub fn score(&self, attribute: &str, value: &str) -> f64 {
        self.scores.score(attribute, value)
    }

    pub fn score_table(&self) -> &ScoreTable {
        &self.scores
    }

    /// Whether persisted data has replaced the defaults for this cell.
    pub fn is_loaded(&self, domain: PreferenceDomain, category: Category) -> bool {
        self.loaded.get(domain, category)
    }

    // --- MUTATIONS ---

    /// Replaces the whole preference set for a cell. An empty replacement is
    /// ignored: garbage from a loader must never erase configuration.
    pub fn set_preference(
        &mut self,
        domain: PreferenceDomain,
        category: Category,
        set: PreferenceSet,
    ) {
        if set.is_empty() {
            log::warn!("Ignoring empty {domain} preference replacement for {category}");
            return;
        }
        *self.prefs.get_mut(domain, category) = set;
    }

    /// Registers a stock in the calculation set, seeded from its own
    /// used-in-calculation flag. A stock already present has its flag updated
    /// instead, so re-registering after a toggle sticks.
    pub fn add_instrument(&mut self, category: Category, stock: &Stock) {
        let set = self.prefs.get_mut(PreferenceDomain::Calculation, category);
        if let Some(flag) = set.get_mut(stock.symbol.as_str()) {
            log::debug!("Updating calculation flag for {} ({category})", stock.symbol);
            *flag = stock.used_in_calculation;
        } else {
            set.insert(stock.symbol.clone(), stock.used_in_calculation);
        }
    }

    // --- LOAD PIPELINE ---

    /// Startup entry point. Pulls persisted preferences from `source`, one
    /// explicit step per domain: calculation sets are replaced as-is, column
    /// sets go through the replacement guard and the at-least-one-visible
    /// validation. Absent directory or files is the normal "use defaults"
    /// path, never an error.
    pub fn load_all(&mut self, source: &dyn PreferenceSource) {
        if !source.available() {
            log::debug!("No preferences directory; keeping built-in defaults");
            return;
        }

        if source.has_calc_resource() {
            for category in Category::iter() {
                self.load_calculation(source, category);
            }
        }

        if source.has_column_resource() {
            for category in Category::iter() {
                self.load_and_validate_columns(source, category);
            }
        }
    }

    /// Calculation preferences are taken verbatim, empty or not: an empty
    /// file legitimately means "no stocks selected". Asymmetric with the
    /// column branch on purpose.
    fn load_calculation(&mut self, source: &dyn PreferenceSource, category: Category) {
        match source.load_calc_preferences(category) {
            Ok(set) => {
                *self.prefs.get_mut(PreferenceDomain::Calculation, category) = set;
                self.loaded.mark(PreferenceDomain::Calculation, category);
            }
            Err(err) => {
                log::warn!("Keeping prior {category} calculation preferences: {err:#}");
            }
        }
    }

    fn load_and_validate_columns(&mut self, source: &dyn PreferenceSource, category: Category) {
        match source.load_column_preferences(category) {
            Ok(set) => self.set_preference(PreferenceDomain::Column, category, set),
            Err(err) => {
                log::warn!("Keeping prior {category} column preferences: {err:#}");
                return;
            }
        }

        // A grid with zero visible columns is unusable; restore the full
        // default set rather than keeping whatever partial key list the
        // loader handed us.
        if self.displayed_column_count(category) == 0 {
            log::warn!("All {category} columns inactive after load; restoring defaults");
            *self.prefs.get_mut(PreferenceDomain::Column, category) = seeded_column_set(category);
        }

        let count = self.displayed_column_count(category);
        let total = self.prefs.get(PreferenceDomain::Column, category).len();
        // The upper bound can't actually fail once the restore above has run,
        // but the original guarded it and clarifying intent is still pending.
        if count > 0 && count <= total {
            self.loaded.mark(PreferenceDomain::Column, category);
        }
    }

    fn displayed_column_count(&self, category: Category) -> usize {
        self.prefs
            .get(PreferenceDomain::Column, category)
            .values()
            .filter(|active| **active)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::defaults::{MARKET_COLUMNS, SECTOR_COLUMNS};
    use anyhow::{Result, anyhow};
    use std::collections::HashMap;

    /// Scripted source: per-category payloads, or errors, per domain.
    #[derive(Default)]
    struct FakeSource {
        available: bool,
        calc: Option<HashMap<Category, PreferenceSet>>,
        columns: Option<HashMap<Category, PreferenceSet>>,
        fail_calc: bool,
        fail_columns: bool,
    }

    impl PreferenceSource for FakeSource {
        fn available(&self) -> bool {
            self.available
        }
        fn has_calc_resource(&self) -> bool {
            self.calc.is_some() || self.fail_calc
        }
        fn has_column_resource(&self) -> bool {
            self.columns.is_some() || self.fail_columns
        }
        fn load_calc_preferences(&self, category: Category) -> Result<PreferenceSet> {
            if self.fail_calc {
                return Err(anyhow!("scripted read failure"));
            }
            Ok(self
                .calc
                .as_ref()
                .and_then(|m| m.get(&category))
                .cloned()
                .unwrap_or_default())
        }
        fn load_column_preferences(&self, category: Category) -> Result<PreferenceSet> {
            if self.fail_columns {
                return Err(anyhow!("scripted read failure"));
            }
            Ok(self
                .columns
                .as_ref()
                .and_then(|m| m.get(&category))
                .cloned()
                .unwrap_or_default())
        }
    }

    fn set(pairs: &[(&str, bool)]) -> PreferenceSet {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn construction_seeds_documented_defaults() {
        let store = PreferenceStore::new();

        assert_eq!(
            store.column_preferences(Category::Market),
            sorted(MARKET_COLUMNS)
        );
        assert_eq!(
            store.column_preferences(Category::Sector),
            sorted(SECTOR_COLUMNS)
        );
        assert!(store.calculation_preferences(Category::Market).is_empty());
        assert!(store.calculation_preferences(Category::Sector).is_empty());
        assert!(!store.is_loaded(PreferenceDomain::Column, Category::Market));
    }

    #[test]
    fn empty_replacement_is_ignored() {
        let mut store = PreferenceStore::new();
        let before = store.column_map(Category::Market).clone();

        store.set_preference(PreferenceDomain::Column, Category::Market, PreferenceSet::new());

        assert_eq!(store.column_map(Category::Market), &before);
    }

    #[test]
    fn non_empty_replacement_is_wholesale() {
        let mut store = PreferenceStore::new();
        store.set_preference(
            PreferenceDomain::Column,
            Category::Market,
            set(&[("NAME", true), ("SYMBOL", false)]),
        );

        assert_eq!(store.column_map(Category::Market).len(), 2);
        assert_eq!(store.column_preferences(Category::Market), sorted(&["NAME"]));
    }

    #[test]
    fn add_instrument_inserts_then_updates() {
        let mut store = PreferenceStore::new();
        let spy = Stock::new("SPY", true);
        store.add_instrument(Category::Market, &spy);
        store.add_instrument(Category::Market, &spy);

        let map = store.calculation_map(Category::Market);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("SPY"), Some(&true));

        // Same symbol with a toggled flag updates in place.
        store.add_instrument(Category::Market, &Stock::new("SPY", false));
        let map = store.calculation_map(Category::Market);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("SPY"), Some(&false));
        // The other category is untouched.
        assert!(store.calculation_map(Category::Sector).is_empty());
    }

    #[test]
    fn absent_directory_keeps_everything_unloaded() {
        let mut store = PreferenceStore::new();
        store.load_all(&FakeSource::default());

        assert!(!store.is_loaded(PreferenceDomain::Calculation, Category::Market));
        assert!(store.calculation_preferences(Category::Market).is_empty());
        assert_eq!(
            store.column_preferences(Category::Market),
            sorted(MARKET_COLUMNS)
        );
    }

    #[test]
    fn calculation_load_is_taken_verbatim() {
        let mut store = PreferenceStore::new();
        let source = FakeSource {
            available: true,
            calc: Some(HashMap::from([(
                Category::Market,
                set(&[("SPY", true), ("QQQ", false)]),
            )])),
            ..Default::default()
        };
        store.load_all(&source);

        assert_eq!(
            store.calculation_preferences(Category::Market),
            sorted(&["SPY"])
        );
        // Sector had no payload: replaced with empty, still marked loaded.
        assert!(store.calculation_preferences(Category::Sector).is_empty());
        assert!(store.is_loaded(PreferenceDomain::Calculation, Category::Market));
        assert!(store.is_loaded(PreferenceDomain::Calculation, Category::Sector));
        // Column branch never ran.
        assert!(!store.is_loaded(PreferenceDomain::Column, Category::Market));
    }

    #[test]
    fn all_inactive_columns_self_heal_to_full_defaults() {
        let mut store = PreferenceStore::new();
        let all_false: PreferenceSet = MARKET_COLUMNS
            .iter()
            .map(|name| (name.to_string(), false))
            .collect();
        let source = FakeSource {
            available: true,
            columns: Some(HashMap::from([(Category::Market, all_false)])),
            ..Default::default()
        };
        store.load_all(&source);

        assert_eq!(
            store.column_preferences(Category::Market),
            sorted(MARKET_COLUMNS)
        );
        assert!(store.is_loaded(PreferenceDomain::Column, Category::Market));
    }

    #[test]
    fn partial_all_inactive_mapping_heals_to_full_defaults() {
        let mut store = PreferenceStore::new();
        let source = FakeSource {
            available: true,
            columns: Some(HashMap::from([(
                Category::Market,
                set(&[("NAME", false), ("SYMBOL", false)]),
            )])),
            ..Default::default()
        };
        store.load_all(&source);

        // The two-key all-false set replaced the defaults, then the heal
        // restored the full eight-column set.
        assert_eq!(
            store.column_preferences(Category::Market),
            sorted(MARKET_COLUMNS)
        );
        assert!(store.is_loaded(PreferenceDomain::Column, Category::Market));
    }

    #[test]
    fn partial_active_mapping_sticks_without_healing() {
        let mut store = PreferenceStore::new();
        let source = FakeSource {
            available: true,
            columns: Some(HashMap::from([(
                Category::Sector,
                set(&[("NAME", true), ("SYMBOL", false), ("SMA200", true)]),
            )])),
            ..Default::default()
        };
        store.load_all(&source);

        assert_eq!(
            store.column_preferences(Category::Sector),
            sorted(&["NAME", "SMA200"])
        );
        assert!(store.is_loaded(PreferenceDomain::Column, Category::Sector));
        // Market's payload was empty: guard kept the defaults, and the heal
        // had nothing to do, so the cell still counts as loaded.
        assert_eq!(
            store.column_preferences(Category::Market),
            sorted(MARKET_COLUMNS)
        );
        assert!(store.is_loaded(PreferenceDomain::Column, Category::Market));
    }

    #[test]
    fn calc_loader_failure_keeps_prior_state_and_stays_unloaded() {
        let mut store = PreferenceStore::new();
        store.add_instrument(Category::Market, &Stock::new("SPY", true));
        let before = store.calculation_map(Category::Market).clone();

        let source = FakeSource {
            available: true,
            fail_calc: true,
            ..Default::default()
        };
        store.load_all(&source);

        assert_eq!(store.calculation_map(Category::Market), &before);
        assert!(!store.is_loaded(PreferenceDomain::Calculation, Category::Market));
        assert!(!store.is_loaded(PreferenceDomain::Calculation, Category::Sector));
    }

    #[test]
    fn loader_failure_keeps_prior_state_and_stays_unloaded() {
        let mut store = PreferenceStore::new();
        let source = FakeSource {
            available: true,
            fail_columns: true,
            ..Default::default()
        };
        store.load_all(&source);

        assert_eq!(
            store.column_preferences(Category::Market),
            sorted(MARKET_COLUMNS)
        );
        assert!(!store.is_loaded(PreferenceDomain::Column, Category::Market));
    }

    #[test]
    fn loaded_flags_survive_reads() {
        let mut store = PreferenceStore::new();
        let source = FakeSource {
            available: true,
            calc: Some(HashMap::new()),
            ..Default::default()
        };
        store.load_all(&source);
        assert!(store.is_loaded(PreferenceDomain::Calculation, Category::Market));

        let _ = store.calculation_preferences(Category::Market);
        let _ = store.score("SMA200", "Up");
        let _ = store.column_map(Category::Sector);

        assert!(store.is_loaded(PreferenceDomain::Calculation, Category::Market));
    }

    #[test]
    fn end_to_end_load_from_json_files() {
        use crate::prefs::{JsonPreferenceSource, PREF_STORAGE};
        use std::fs;

        let base = std::env::temp_dir().join(format!("tds_store_e2e_{}", std::process::id()));
        let _ = fs::remove_dir_all(&base);
        let dir = base.join(PREF_STORAGE.directory);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(PREF_STORAGE.calc_file),
            r#"{"Market": {"SPY": true, "DIA": false}, "Sector": {}}"#,
        )
        .unwrap();
        fs::write(
            dir.join(PREF_STORAGE.column_file),
            r#"{"Market": {"NAME": true, "SYMBOL": true}, "Sector": {"NAME": false}}"#,
        )
        .unwrap();

        let mut store = PreferenceStore::new();
        store.load_all(&JsonPreferenceSource::new(&base));

        assert_eq!(
            store.calculation_preferences(Category::Market),
            sorted(&["SPY"])
        );
        assert!(store.calculation_preferences(Category::Sector).is_empty());
        assert!(store.is_loaded(PreferenceDomain::Calculation, Category::Sector));

        assert_eq!(
            store.column_preferences(Category::Market),
            sorted(&["NAME", "SYMBOL"])
        );
        // Sector's single all-false column healed back to the full defaults.
        assert_eq!(
            store.column_preferences(Category::Sector),
            sorted(SECTOR_COLUMNS)
        );
        assert!(store.is_loaded(PreferenceDomain::Column, Category::Sector));

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn score_delegates_to_the_fixed_table() {
        let store = PreferenceStore::new();
        assert_eq!(store.score("CHART_PATTERN", "Bear Consolidation"), 2.5);
        assert_eq!(store.score("CHART_PATTERN", "Sideways"), 0.0);
    }
}
