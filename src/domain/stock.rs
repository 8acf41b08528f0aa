use serde::{Deserialize, Serialize};

/// A tracked instrument. The preference store only consumes the symbol and
/// the used-in-calculation flag; the rest of the stock's analysis data lives
/// with the calculation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    pub used_in_calculation: bool,
}

impl Stock {
    pub fn new(symbol: impl Into<String>, used_in_calculation: bool) -> Self {
        Self {
            symbol: symbol.into(),
            used_in_calculation,
        }
    }
}
