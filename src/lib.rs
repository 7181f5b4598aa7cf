//! Fixed Income Tracker - projection and exposure engine for fixed-income positions
//!
//! This library provides:
//! - Effective rate resolution for post-fixed, inflation-linked and fixed-rate positions
//! - Gross/net maturity value projection with tax on gains
//! - Per-institution exposure aggregation against deposit-insurance ceilings
//! - Batch recompute of stored positions when market rates change

pub mod config;
pub mod error;
pub mod exposure;
pub mod market;
pub mod position;
pub mod projection;
pub mod recalc;
pub mod store;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{ProjectionError, ProjectionResult, StoreError};
pub use exposure::{summarize_exposure, ExposureAggregator, ExposureReport, RiskLevel};
pub use market::MarketRates;
pub use position::{IndexRegime, Position};
pub use projection::{project, CalculationResult, ProjectionEngine};
pub use recalc::Recalculator;
