//! Projection output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Gross and net projected value at maturity, rounded to cents.
///
/// `net <= gross` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub gross: f64,
    pub net: f64,
}

impl CalculationResult {
    /// Tax withheld on the gain (zero for losses)
    pub fn tax_withheld(&self) -> f64 {
        round_cents(self.gross - self.net)
    }
}

/// Intermediate values of one projection, for preview surfaces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionBreakdown {
    /// Effective annual nominal rate as a fraction
    pub effective_annual_rate: f64,

    /// Holding period in years under the ACT/365 convention
    pub period_years: f64,

    /// Gross minus principal, unrounded (negative for a loss)
    pub gain: f64,

    /// Rounded output values
    pub result: CalculationResult,
}

/// A stored position's identity paired with its fresh projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPosition {
    pub id: u64,
    pub institution: String,
    pub principal: f64,
    pub due_date: NaiveDate,
    pub result: CalculationResult,
}

/// Round a currency amount to its minor unit (2 decimal places)
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
