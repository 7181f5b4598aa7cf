//! Deposit-insurance coverage ceilings

use serde::{Deserialize, Serialize};

/// Default aggregate ceiling per investor across all institutions
pub const DEFAULT_GLOBAL_LIMIT: f64 = 1_000_000.0;

/// Default ceiling per investor per institution
pub const DEFAULT_PER_INSTITUTION_LIMIT: f64 = 250_000.0;

/// Share of the global ceiling above which exposure is flagged
pub const DEFAULT_WARNING_RATIO: f64 = 0.8;

/// Coverage ceilings used to classify exposure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageLimits {
    pub global_limit: f64,
    pub per_institution_limit: f64,
    pub warning_ratio: f64,
}

impl Default for CoverageLimits {
    fn default() -> Self {
        Self {
            global_limit: DEFAULT_GLOBAL_LIMIT,
            per_institution_limit: DEFAULT_PER_INSTITUTION_LIMIT,
            warning_ratio: DEFAULT_WARNING_RATIO,
        }
    }
}

/// Portfolio-level insurance risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    Warning,
    Over,
}

impl CoverageLimits {
    /// Threshold above which a total is classified as `Warning`
    pub fn warning_threshold(&self) -> f64 {
        self.global_limit * self.warning_ratio
    }

    /// Classify a global total: `Over` strictly above the ceiling,
    /// `Warning` strictly above the warning threshold, otherwise `Safe`
    pub fn classify(&self, global_total: f64) -> RiskLevel {
        if global_total > self.global_limit {
            RiskLevel::Over
        } else if global_total > self.warning_threshold() {
            RiskLevel::Warning
        } else {
            RiskLevel::Safe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let limits = CoverageLimits::default();
        assert_eq!(limits.classify(0.0), RiskLevel::Safe);
        assert_eq!(limits.classify(350_000.0), RiskLevel::Safe);
        assert_eq!(limits.classify(800_000.0), RiskLevel::Safe);
        assert_eq!(limits.classify(850_000.0), RiskLevel::Warning);
        assert_eq!(limits.classify(1_000_000.0), RiskLevel::Warning);
        assert_eq!(limits.classify(1_050_000.0), RiskLevel::Over);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let limits: CoverageLimits = serde_json::from_str(r#"{"global_limit": 500000}"#).unwrap();
        assert_eq!(limits.global_limit, 500_000.0);
        assert_eq!(limits.per_institution_limit, DEFAULT_PER_INSTITUTION_LIMIT);
        assert_eq!(limits.classify(450_000.0), RiskLevel::Warning);
    }
}
