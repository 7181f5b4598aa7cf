//! Engine configuration
//!
//! Coverage ceilings change by regulation, so they are read from the
//! environment (or a JSON file) rather than compiled in:
//!   GLOBAL_COVERAGE_LIMIT, INSTITUTION_COVERAGE_LIMIT, COVERAGE_WARNING_RATIO
//! Batch recompute parallelism: PARALLEL_THRESHOLD

use crate::exposure::{CoverageLimits, ExposureAggregator};
use crate::recalc::{Recalculator, DEFAULT_PARALLEL_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub limits: CoverageLimits,

    /// Batches larger than this are projected on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            limits: CoverageLimits::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any environment variables that parse
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Load from a JSON file, then apply environment overrides
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let mut config: Self = serde_json::from_str(&text)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_f64("GLOBAL_COVERAGE_LIMIT") {
            self.limits.global_limit = v;
        }
        if let Some(v) = env_f64("INSTITUTION_COVERAGE_LIMIT") {
            self.limits.per_institution_limit = v;
        }
        if let Some(v) = env_f64("COVERAGE_WARNING_RATIO") {
            self.limits.warning_ratio = v;
        }
        if let Some(v) = env::var("PARALLEL_THRESHOLD")
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            self.parallel_threshold = v;
        }
    }

    pub fn aggregator(&self) -> ExposureAggregator {
        ExposureAggregator::new(self.limits)
    }

    pub fn recalculator(&self) -> Recalculator {
        Recalculator::with_parallel_threshold(self.parallel_threshold)
    }
}

fn env_f64(key: &str) -> Option<f64> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a number", key, raw);
            None
        }
    }
}
