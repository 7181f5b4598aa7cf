//! Per-institution exposure aggregation

use super::limits::{CoverageLimits, RiskLevel};
use crate::position::normalize_institution;
use crate::projection::{round_cents, ProjectedPosition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anything carrying an issuing institution and a projected gross value
pub trait ExposureSource {
    /// Institution name as entered (normalized by the aggregator)
    fn institution(&self) -> &str;

    /// Projected gross value at maturity
    fn projected_gross(&self) -> f64;
}

impl ExposureSource for ProjectedPosition {
    fn institution(&self) -> &str {
        &self.institution
    }

    fn projected_gross(&self) -> f64 {
        self.result.gross
    }
}

impl<S: AsRef<str>> ExposureSource for (S, f64) {
    fn institution(&self) -> &str {
        self.0.as_ref()
    }

    fn projected_gross(&self) -> f64 {
        self.1
    }
}

/// Exposure to a single institution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionExposure {
    /// Normalized institution name
    pub institution: String,

    /// Sum of projected gross values
    pub total_gross: f64,

    pub position_count: usize,

    /// `total_gross / per_institution_limit`, as a fraction
    pub limit_usage: f64,
}

/// Exposure summary across a position collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureReport {
    /// Sorted by total descending, then name ascending
    pub institutions: Vec<InstitutionExposure>,

    pub global_total: f64,

    pub risk_level: RiskLevel,

    /// `global_total / global_limit`, as a fraction
    pub global_limit_usage: f64,

    /// Remaining coverage before the global ceiling (never negative)
    pub headroom: f64,
}

impl ExposureReport {
    /// Look up one institution; the name is normalized before matching
    pub fn institution(&self, name: &str) -> Option<&InstitutionExposure> {
        let key = normalize_institution(name);
        self.institutions.iter().find(|e| e.institution == key)
    }
}

/// Groups projected gross exposure by institution and classifies the total
#[derive(Debug, Clone, Copy, Default)]
pub struct ExposureAggregator {
    limits: CoverageLimits,
}

impl ExposureAggregator {
    pub fn new(limits: CoverageLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &CoverageLimits {
        &self.limits
    }

    /// Summarize exposure. Total over any input, including an empty one.
    ///
    /// Coverage is assessed on gross value, before tax.
    pub fn summarize<T: ExposureSource>(&self, positions: &[T]) -> ExposureReport {
        let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        let mut global_total = 0.0;

        for position in positions {
            let gross = position.projected_gross();
            let entry = groups
                .entry(normalize_institution(position.institution()))
                .or_insert((0.0, 0));
            entry.0 += gross;
            entry.1 += 1;
            global_total += gross;
        }

        let mut institutions: Vec<InstitutionExposure> = groups
            .into_iter()
            .map(|(institution, (total, count))| {
                let total_gross = round_cents(total);
                InstitutionExposure {
                    institution,
                    total_gross,
                    position_count: count,
                    limit_usage: usage(total_gross, self.limits.per_institution_limit),
                }
            })
            .collect();

        institutions.sort_by(|a, b| {
            b.total_gross
                .total_cmp(&a.total_gross)
                .then_with(|| a.institution.cmp(&b.institution))
        });

        let global_total = round_cents(global_total);
        let risk_level = self.limits.classify(global_total);

        log::debug!(
            "Exposure across {} institutions: total={:.2} risk={:?}",
            institutions.len(),
            global_total,
            risk_level
        );

        ExposureReport {
            institutions,
            global_total,
            risk_level,
            global_limit_usage: usage(global_total, self.limits.global_limit),
            headroom: round_cents((self.limits.global_limit - global_total).max(0.0)),
        }
    }
}

fn usage(total: f64, limit: f64) -> f64 {
    if limit > 0.0 {
        total / limit
    } else {
        0.0
    }
}

/// Summarize exposure against the default coverage limits
pub fn summarize_exposure<T: ExposureSource>(positions: &[T]) -> ExposureReport {
    ExposureAggregator::default().summarize(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_collection_is_safe() {
        let report = summarize_exposure::<(&str, f64)>(&[]);
        assert!(report.institutions.is_empty());
        assert_eq!(report.global_total, 0.0);
        assert_eq!(report.risk_level, RiskLevel::Safe);
        assert_eq!(report.headroom, 1_000_000.0);
    }

    #[test]
    fn test_groups_and_sorts_by_total() {
        let positions = [
            ("Banco X", 200_000.0),
            ("Banco Y", 50_000.0),
            ("Banco X", 100_000.0),
        ];
        let report = summarize_exposure(&positions);

        assert_eq!(report.global_total, 350_000.0);
        assert_eq!(report.risk_level, RiskLevel::Safe);
        assert_eq!(report.institutions.len(), 2);
        assert_eq!(report.institutions[0].institution, "BANCO X");
        assert_eq!(report.institutions[0].total_gross, 300_000.0);
        assert_eq!(report.institutions[0].position_count, 2);
        assert_eq!(report.institutions[1].institution, "BANCO Y");
        assert_eq!(report.institutions[1].total_gross, 50_000.0);
    }

    #[test]
    fn test_case_and_whitespace_variants_merge() {
        let positions = [("Banco X", 1_000.0), ("banco x ", 2_500.0), ("  BANCO X", 500.0)];
        let report = summarize_exposure(&positions);

        assert_eq!(report.institutions.len(), 1);
        assert_eq!(report.institutions[0].total_gross, 4_000.0);
        assert!(report.institution("Banco x").is_some());
    }

    #[test]
    fn test_ties_break_by_name() {
        let positions = [("Zeta", 10_000.0), ("Alfa", 10_000.0), ("Mid", 10_000.0)];
        let report = summarize_exposure(&positions);
        let names: Vec<_> = report.institutions.iter().map(|e| e.institution.as_str()).collect();
        assert_eq!(names, ["ALFA", "MID", "ZETA"]);
    }

    #[test]
    fn test_warning_and_over_classification() {
        let warning = summarize_exposure(&[("A", 600_000.0), ("B", 250_000.0)]);
        assert_eq!(warning.global_total, 850_000.0);
        assert_eq!(warning.risk_level, RiskLevel::Warning);
        assert_eq!(warning.headroom, 150_000.0);

        let over = summarize_exposure(&[("A", 800_000.0), ("B", 250_000.0)]);
        assert_eq!(over.global_total, 1_050_000.0);
        assert_eq!(over.risk_level, RiskLevel::Over);
        assert_eq!(over.headroom, 0.0);
    }

    #[test]
    fn test_limit_usage_per_institution() {
        let aggregator = ExposureAggregator::new(CoverageLimits {
            per_institution_limit: 250_000.0,
            ..Default::default()
        });
        let report = aggregator.summarize(&[("Banco X", 300_000.0), ("Banco Y", 125_000.0)]);

        assert_relative_eq!(report.institutions[0].limit_usage, 1.2);
        assert_relative_eq!(report.institutions[1].limit_usage, 0.5);
        assert_relative_eq!(report.global_limit_usage, 0.425);
    }
}
