//! Load positions from a CSV export

use super::{IndexRegime, Position, MAX_TAX_RATE};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use csv::Reader;
use std::collections::HashSet;
use std::path::Path;

/// Raw CSV row matching the positions export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Id")]
    id: u64,
    #[serde(rename = "Institution")]
    institution: String,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "Regime")]
    regime: String,
    #[serde(rename = "RateParameter")]
    rate_parameter: f64,
    #[serde(rename = "TaxRate")]
    tax_rate: f64,
    #[serde(rename = "StartDate")]
    start_date: NaiveDate,
    #[serde(rename = "DueDate")]
    due_date: NaiveDate,
}

impl CsvRow {
    fn into_position(self) -> Result<(u64, Position)> {
        let regime = IndexRegime::parse(&self.regime, self.rate_parameter)
            .with_context(|| format!("position {}", self.id))?;

        if !(0.0..=MAX_TAX_RATE).contains(&self.tax_rate) {
            bail!(
                "position {}: tax rate {} outside [0, {}]",
                self.id,
                self.tax_rate,
                MAX_TAX_RATE
            );
        }
        if self.rate_parameter < 0.0 {
            bail!("position {}: negative rate parameter {}", self.id, self.rate_parameter);
        }

        Ok((
            self.id,
            Position::new(
                self.institution,
                self.principal,
                regime,
                self.tax_rate,
                self.start_date,
                self.due_date,
            ),
        ))
    }
}

/// Load all positions from a CSV file, keyed by their record id
pub fn load_positions<P: AsRef<Path>>(path: P) -> Result<Vec<(u64, Position)>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening positions file {}", path.display()))?;
    load_positions_from_reader(file)
}

/// Load positions from any reader (e.g., string buffer, network stream).
///
/// Ids must be unique; a repeated id fails the whole load.
pub fn load_positions_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<(u64, Position)>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut positions = Vec::new();
    let mut seen = HashSet::new();

    for (line, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        if !seen.insert(row.id) {
            bail!("row {}: duplicate position id {}", line + 1, row.id);
        }
        positions.push(row.into_position()?);
    }

    log::debug!("Loaded {} positions", positions.len());
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Id,Institution,Principal,Regime,RateParameter,TaxRate,StartDate,DueDate
1,Banco X,10000.00,CDI,100,15,2024-01-01,2024-12-31
2,banco x ,5000.00,IPCA,6.5,15,2024-03-01,2029-03-01
3,Banco Y,2500.50,PRE,11.2,17.5,2024-06-10,2026-06-10
";

    #[test]
    fn test_load_positions_from_reader() {
        let positions = load_positions_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(positions.len(), 3);

        let (id, first) = &positions[0];
        assert_eq!(*id, 1);
        assert_eq!(first.regime, IndexRegime::PostFixed { percent_of_index: 100.0 });
        assert_eq!(first.holding_days(), 365);

        let (_, third) = &positions[2];
        assert_eq!(third.regime, IndexRegime::FixedNominal { annual_rate: 11.2 });
        assert_eq!(third.institution_key(), "BANCO Y");
    }

    #[test]
    fn test_unknown_regime_fails_load() {
        let csv = "\
Id,Institution,Principal,Regime,RateParameter,TaxRate,StartDate,DueDate
7,Banco X,100.00,SELIC,100,15,2024-01-01,2025-01-01
";
        let err = load_positions_from_reader(csv.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid index regime"));
    }

    #[test]
    fn test_duplicate_id_fails_load() {
        let csv = "\
Id,Institution,Principal,Regime,RateParameter,TaxRate,StartDate,DueDate
1,Banco X,10000.00,CDI,100,15,2024-01-01,2025-01-01
1,Banco Y,50000.00,CDI,100,15,2024-01-01,2025-01-01
";
        let err = load_positions_from_reader(csv.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate position id 1"));
    }

    #[test]
    fn test_tax_rate_above_ceiling_fails_load() {
        let csv = "\
Id,Institution,Principal,Regime,RateParameter,TaxRate,StartDate,DueDate
8,Banco X,100.00,CDI,100,27.5,2024-01-01,2025-01-01
";
        assert!(load_positions_from_reader(csv.as_bytes()).is_err());
    }
}
