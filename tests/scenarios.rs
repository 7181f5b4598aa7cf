//! End-to-end scenarios: load, recompute, summarize.

use fixed_income_tracker::exposure::{CoverageLimits, ExposureAggregator};
use fixed_income_tracker::position::load_positions_from_reader;
use fixed_income_tracker::store::{
    InMemoryRatesStore, InMemoryStore, MarketRatesStore, PositionStore,
};
use fixed_income_tracker::{
    summarize_exposure, CalculationResult, MarketRates, Recalculator, RiskLevel,
};

const PORTFOLIO: &str = "\
Id,Institution,Principal,Regime,RateParameter,TaxRate,StartDate,DueDate
1,Banco X,10000.00,CDI,100,15,2023-01-02,2024-01-02
2,banco x ,2500.00,PRE,10,17.5,2023-01-02,2024-01-02
3,Banco Y,4000.00,IPCA,6,15,2023-01-02,2025-01-01
4,Banco Z,1500.00,CDI,100,15,2024-05-01,2024-05-01
";

#[test]
fn test_recompute_then_summarize_portfolio() {
    let records = load_positions_from_reader(PORTFOLIO.as_bytes()).unwrap();
    let mut store = InMemoryStore::from_records(records).unwrap();
    let mut rates = InMemoryRatesStore::new(MarketRates::new(10.0, 4.0));

    let outcome = Recalculator::new()
        .on_rates_changed(&mut store, &mut rates, MarketRates::new(12.0, 4.0))
        .unwrap();

    // Position 4 matures on its start date and is rejected
    assert_eq!(outcome.projected.len(), 3);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].0, 4);

    assert_eq!(
        store.get(1).unwrap().projection,
        Some(CalculationResult { gross: 11_200.00, net: 11_020.00 })
    );
    assert_eq!(
        store.get(2).unwrap().projection,
        Some(CalculationResult { gross: 2_750.00, net: 2_706.25 })
    );
    assert_eq!(rates.current(), MarketRates::new(12.0, 4.0));

    let report = summarize_exposure(&outcome.projected);
    assert_eq!(report.institutions.len(), 2);
    assert_eq!(report.institutions[0].institution, "BANCO X");
    assert_eq!(report.institutions[0].total_gross, 13_950.00);
    assert_eq!(report.institutions[0].position_count, 2);
    assert_eq!(report.risk_level, RiskLevel::Safe);
}

#[test]
fn test_exposure_scenarios() {
    let safe = summarize_exposure(&[
        ("Banco X", 200_000.0),
        ("Banco X", 100_000.0),
        ("Banco Y", 50_000.0),
    ]);
    assert_eq!(safe.global_total, 350_000.0);
    assert_eq!(safe.risk_level, RiskLevel::Safe);
    let totals: Vec<_> = safe
        .institutions
        .iter()
        .map(|e| (e.institution.as_str(), e.total_gross))
        .collect();
    assert_eq!(totals, vec![("BANCO X", 300_000.0), ("BANCO Y", 50_000.0)]);

    assert_eq!(summarize_exposure(&[("A", 1_050_000.0)]).risk_level, RiskLevel::Over);
    assert_eq!(summarize_exposure(&[("A", 850_000.0)]).risk_level, RiskLevel::Warning);
}

#[test]
fn test_configured_ceiling_changes_classification() {
    let aggregator = ExposureAggregator::new(CoverageLimits {
        global_limit: 2_000_000.0,
        ..Default::default()
    });
    assert_eq!(aggregator.summarize(&[("A", 1_050_000.0)]).risk_level, RiskLevel::Safe);
}

#[test]
fn test_stored_positions_feed_exposure_directly() {
    let records = load_positions_from_reader(PORTFOLIO.as_bytes()).unwrap();
    let mut store = InMemoryStore::from_records(records).unwrap();
    Recalculator::new()
        .recompute(&mut store, &MarketRates::new(12.0, 4.0))
        .unwrap();

    // The rejected position keeps no projection and counts at principal
    let report = summarize_exposure(&store.list_by_due_date());
    assert_eq!(report.institution("banco z").unwrap().total_gross, 1_500.00);
    assert_eq!(report.institution("Banco X").unwrap().total_gross, 13_950.00);
}
