//! Compounding engine: gross and net projected value at maturity

use crate::error::{ProjectionError, ProjectionResult};
use crate::market::MarketRates;
use crate::position::Position;
use super::rate::effective_annual_rate;
use super::result::{round_cents, CalculationResult, ProjectionBreakdown};

/// Day-count basis. Holding periods are calendar days / 365 (ACT/365),
/// never business days.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Projects positions against one immutable market-rate snapshot.
///
/// Every call is a pure function of the position and the snapshot, so
/// repeated calls return bit-identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionEngine {
    rates: MarketRates,
}

impl ProjectionEngine {
    pub fn new(rates: MarketRates) -> Self {
        Self { rates }
    }

    /// The snapshot this engine projects against
    pub fn rates(&self) -> &MarketRates {
        &self.rates
    }

    /// Project a position to maturity
    pub fn project(&self, position: &Position) -> ProjectionResult<CalculationResult> {
        self.project_detailed(position).map(|b| b.result)
    }

    /// Project a position, keeping the intermediate rate, period and gain
    pub fn project_detailed(&self, position: &Position) -> ProjectionResult<ProjectionBreakdown> {
        if position.principal <= 0.0 {
            return Err(ProjectionError::InvalidPrincipal(position.principal));
        }
        if position.due_date <= position.start_date {
            return Err(ProjectionError::InvalidPeriod {
                start: position.start_date,
                due: position.due_date,
            });
        }

        let rate = effective_annual_rate(&position.regime, &self.rates);
        let period_years = position.holding_days() as f64 / DAYS_PER_YEAR;

        // Fractional exponent: sub-year and broken periods compound exactly.
        // A rate below -100% is a total loss, not a negative base.
        let growth = (1.0 + rate).max(0.0).powf(period_years);
        let gross = position.principal * growth;
        let gain = gross - position.principal;

        // Tax is withheld on gains only; a loss never produces a tax credit
        let net = if gain >= 0.0 {
            position.principal + gain * (1.0 - position.tax_rate / 100.0)
        } else {
            gross
        };

        log::debug!(
            "Projected {} {:?}: rate={:.6} years={:.6} gross={:.4} net={:.4}",
            position.institution,
            position.regime.kind(),
            rate,
            period_years,
            gross,
            net
        );

        // Rounded only here, never between steps
        Ok(ProjectionBreakdown {
            effective_annual_rate: rate,
            period_years,
            gain,
            result: CalculationResult {
                gross: round_cents(gross),
                net: round_cents(net),
            },
        })
    }
}

/// Project a single position against a market-rate snapshot
pub fn project(position: &Position, rates: &MarketRates) -> ProjectionResult<CalculationResult> {
    ProjectionEngine::new(*rates).project(position)
}
