//! Rate resolution and maturity value projection

pub mod rate;
mod engine;
mod result;

pub use rate::effective_annual_rate;
pub use engine::{project, ProjectionEngine, DAYS_PER_YEAR};
pub use result::{round_cents, CalculationResult, ProjectedPosition, ProjectionBreakdown};
