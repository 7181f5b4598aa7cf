//! Effective annual rate resolution by indexation regime

use crate::market::MarketRates;
use crate::position::IndexRegime;

/// Resolve the effective annual nominal rate, as a fraction (0.12 = 12%).
///
/// - Post-fixed: `index/100 * percent_of_index/100`
/// - Inflation-linked: `(1 + inflation/100) * (1 + spread/100) - 1`
/// - Fixed nominal: `annual_rate/100`, independent of market rates
pub fn effective_annual_rate(regime: &IndexRegime, rates: &MarketRates) -> f64 {
    match *regime {
        IndexRegime::PostFixed { percent_of_index } => {
            (rates.reference_index_annual_rate / 100.0) * (percent_of_index / 100.0)
        }
        IndexRegime::InflationLinked { real_spread } => {
            (1.0 + rates.inflation_annual_rate / 100.0) * (1.0 + real_spread / 100.0) - 1.0
        }
        IndexRegime::FixedNominal { annual_rate } => annual_rate / 100.0,
    }
}
