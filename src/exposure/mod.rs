//! Deposit-insurance exposure monitoring
//!
//! Groups projected gross values by issuing institution and classifies the
//! portfolio total against the per-investor coverage ceiling.

mod aggregator;
mod limits;

pub use aggregator::{
    summarize_exposure, ExposureAggregator, ExposureReport, ExposureSource, InstitutionExposure,
};
pub use limits::{
    CoverageLimits, RiskLevel, DEFAULT_GLOBAL_LIMIT, DEFAULT_PER_INSTITUTION_LIMIT,
    DEFAULT_WARNING_RATIO,
};
