//! Market reference rate snapshot

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current market reference rates, both annual percentages (12.0 = 12%).
///
/// Treated as an immutable snapshot for the duration of a projection call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketRates {
    /// Interbank reference index (CDI-style) annual rate
    pub reference_index_annual_rate: f64,

    /// Projected annual inflation rate
    pub inflation_annual_rate: f64,
}

impl MarketRates {
    pub fn new(reference_index_annual_rate: f64, inflation_annual_rate: f64) -> Self {
        Self {
            reference_index_annual_rate,
            inflation_annual_rate,
        }
    }

    /// Load a snapshot from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }
}
