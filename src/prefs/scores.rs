//! Fixed attribute scoring table used by the rating calculation.

use std::collections::HashMap;

/// Maps a qualitative stock attribute value (e.g. SMA200 = "Up") to the
/// numeric score the calculation engine feeds into the overall rating.
/// Populated once at construction; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct ScoreTable {
    table: HashMap<String, HashMap<String, f64>>,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreTable {
    pub fn new() -> Self {
        let mut table = HashMap::new();
        table.insert(
            "SMA200".to_string(),
            values(&[("Up", 10.0), ("Up and Down", 5.0), ("Down", 0.0)]),
        );
        table.insert(
            "SMA50/20".to_string(),
            values(&[("Above", 10.0), ("At", 5.0), ("Below", 0.0)]),
        );
        table.insert(
            "CHART_PATTERN".to_string(),
            values(&[
                ("Bull Run", 10.0),
                ("Bull Consolidation", 7.5),
                ("Consolidation", 5.0),
                ("Bear Consolidation", 2.5),
                ("Bear Run", 0.0),
            ]),
        );
        table.insert(
            "UNEXPECTED_ITEMS".to_string(),
            values(&[
                ("Very Good", 10.0),
                ("Good", 7.5),
                ("Average", 5.5),
                ("Bad", 3.5),
                ("Very Bad", 1.0),
                ("No News", 5.5),
            ]),
        );

        Self { table }
    }

    /// Score for an attribute/value pair. An unknown attribute or value is a
    /// valid "unscored" outcome and returns 0, never an error.
    pub fn score(&self, attribute: &str, value: &str) -> f64 {
        self.table
            .get(attribute)
            .and_then(|scores| scores.get(value))
            .copied()
            .unwrap_or(0.0)
    }

    /// The attributes this table can score, for display purposes.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Value -> score rows for one attribute. Empty iterator for unknown attributes.
    pub fn values_for(&self, attribute: &str) -> impl Iterator<Item = (&str, f64)> {
        self.table
            .get(attribute)
            .into_iter()
            .flat_map(|scores| scores.iter().map(|(v, s)| (v.as_str(), *s)))
    }
}

fn values(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs
        .iter()
        .map(|(value, score)| (value.to_string(), *score))
        .collect()
}
