//! Position data structures

use crate::error::{ProjectionError, ProjectionResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Withholding tax ceiling under the regressive schedule convention (percent)
pub const MAX_TAX_RATE: f64 = 22.5;

/// Indexation regime, carrying the regime-specific rate parameter (percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "regime", rename_all = "snake_case")]
pub enum IndexRegime {
    /// Earns a percentage of the reference index (100.0 = 100% of the index)
    PostFixed { percent_of_index: f64 },
    /// Earns projected inflation compounded with a real spread
    InflationLinked { real_spread: f64 },
    /// Earns a flat contracted nominal annual rate
    FixedNominal { annual_rate: f64 },
}

/// Regime discriminant without payload, as stored in records and CSV columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegimeKind {
    PostFixed,
    InflationLinked,
    FixedNominal,
}

impl RegimeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegimeKind::PostFixed => "POST_FIXED",
            RegimeKind::InflationLinked => "INFLATION",
            RegimeKind::FixedNominal => "FIXED",
        }
    }
}

impl FromStr for RegimeKind {
    type Err = ProjectionError;

    /// Accepts the canonical codes plus the market shorthands (CDI, IPCA, PRE)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POST_FIXED" | "POSTFIXED" | "CDI" => Ok(RegimeKind::PostFixed),
            "INFLATION" | "INFLATION_LINKED" | "IPCA" => Ok(RegimeKind::InflationLinked),
            "FIXED" | "FIXED_NOMINAL" | "PRE" => Ok(RegimeKind::FixedNominal),
            _ => Err(ProjectionError::InvalidRegime(s.to_string())),
        }
    }
}

impl fmt::Display for RegimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IndexRegime {
    /// Build a regime from its kind and the record's single rate parameter
    pub fn from_kind(kind: RegimeKind, rate_parameter: f64) -> Self {
        match kind {
            RegimeKind::PostFixed => IndexRegime::PostFixed {
                percent_of_index: rate_parameter,
            },
            RegimeKind::InflationLinked => IndexRegime::InflationLinked {
                real_spread: rate_parameter,
            },
            RegimeKind::FixedNominal => IndexRegime::FixedNominal {
                annual_rate: rate_parameter,
            },
        }
    }

    /// Parse a regime code and attach its rate parameter
    pub fn parse(code: &str, rate_parameter: f64) -> ProjectionResult<Self> {
        Ok(Self::from_kind(code.parse()?, rate_parameter))
    }

    pub fn kind(&self) -> RegimeKind {
        match self {
            IndexRegime::PostFixed { .. } => RegimeKind::PostFixed,
            IndexRegime::InflationLinked { .. } => RegimeKind::InflationLinked,
            IndexRegime::FixedNominal { .. } => RegimeKind::FixedNominal,
        }
    }

    /// The regime's rate parameter in percent, as a record would store it
    pub fn rate_parameter(&self) -> f64 {
        match *self {
            IndexRegime::PostFixed { percent_of_index } => percent_of_index,
            IndexRegime::InflationLinked { real_spread } => real_spread,
            IndexRegime::FixedNominal { annual_rate } => annual_rate,
        }
    }
}

/// Terms of a single fixed-income position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Issuing institution as entered by the user
    pub institution: String,

    /// Amount invested
    pub principal: f64,

    /// Indexation regime and its rate parameter
    #[serde(flatten)]
    pub regime: IndexRegime,

    /// Withholding tax on the gain, percent (0 to 22.5)
    pub tax_rate: f64,

    pub start_date: NaiveDate,

    pub due_date: NaiveDate,
}

impl Position {
    pub fn new(
        institution: impl Into<String>,
        principal: f64,
        regime: IndexRegime,
        tax_rate: f64,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            institution: institution.into(),
            principal,
            regime,
            tax_rate,
            start_date,
            due_date,
        }
    }

    /// Holding period in calendar days (may be zero or negative for bad input)
    pub fn holding_days(&self) -> i64 {
        (self.due_date - self.start_date).num_days()
    }

    /// Institution key used for exposure grouping
    pub fn institution_key(&self) -> String {
        normalize_institution(&self.institution)
    }
}

/// Normalize an institution name for grouping: trimmed and upper-cased.
///
/// Names differing only in case or surrounding whitespace share one bucket.
pub fn normalize_institution(name: &str) -> String {
    name.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_codes() {
        assert_eq!("CDI".parse::<RegimeKind>().unwrap(), RegimeKind::PostFixed);
        assert_eq!(" ipca ".parse::<RegimeKind>().unwrap(), RegimeKind::InflationLinked);
        assert_eq!("pre".parse::<RegimeKind>().unwrap(), RegimeKind::FixedNominal);
        assert_eq!("FIXED".parse::<RegimeKind>().unwrap(), RegimeKind::FixedNominal);
    }

    #[test]
    fn test_unknown_regime_is_rejected() {
        let err = IndexRegime::parse("SELIC_PLUS", 100.0).unwrap_err();
        assert_eq!(err, ProjectionError::InvalidRegime("SELIC_PLUS".to_string()));
    }

    #[test]
    fn test_rate_parameter_round_trips_through_kind() {
        let regime = IndexRegime::parse("IPCA", 6.2).unwrap();
        assert_eq!(regime, IndexRegime::InflationLinked { real_spread: 6.2 });
        assert_eq!(regime.kind(), RegimeKind::InflationLinked);
        assert_eq!(regime.rate_parameter(), 6.2);
    }

    #[test]
    fn test_normalize_institution() {
        assert_eq!(normalize_institution("Banco X"), "BANCO X");
        assert_eq!(normalize_institution("  banco x "), "BANCO X");
    }

    #[test]
    fn test_holding_days() {
        let position = Position::new(
            "Banco X",
            1_000.0,
            IndexRegime::FixedNominal { annual_rate: 10.0 },
            15.0,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        );
        assert_eq!(position.holding_days(), 365);
    }
}
