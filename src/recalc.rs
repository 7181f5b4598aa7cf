//! Bulk recompute of stored positions after a market-rate change
//!
//! Projects every stored position against one snapshot, then writes the
//! results back as a single batch. `&mut` access to the store means only
//! one recompute can be in flight per store.

use crate::error::ProjectionError;
use crate::exposure::{ExposureAggregator, ExposureReport};
use crate::market::MarketRates;
use crate::projection::{ProjectedPosition, ProjectionEngine};
use crate::store::{MarketRatesStore, PositionStore, StoredPosition};
use rayon::prelude::*;
use thiserror::Error;

/// Collections at or below this size are projected sequentially
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Projections computed in one recompute pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecomputeOutcome {
    /// Successfully projected positions, in due-date order
    pub projected: Vec<ProjectedPosition>,

    /// Positions whose terms failed validation, left untouched in the store
    pub failures: Vec<(u64, ProjectionError)>,
}

/// The store rejected the batch write.
///
/// Nothing from `computed` is durable; recomputing and resubmitting yields
/// identical values, so a retry is always safe.
#[derive(Error, Debug)]
#[error("writing {} projections failed: {source}", .computed.len())]
pub struct BatchWriteError<E: std::error::Error + 'static> {
    #[source]
    pub source: E,
    pub computed: Vec<ProjectedPosition>,
}

/// Runs bulk recomputes against a position store
#[derive(Debug, Clone, Copy)]
pub struct Recalculator {
    parallel_threshold: usize,
}

impl Recalculator {
    pub fn new() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn with_parallel_threshold(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    /// Project a set of stored positions without touching storage
    pub fn project_all(
        &self,
        positions: &[StoredPosition],
        rates: &MarketRates,
    ) -> RecomputeOutcome {
        let engine = ProjectionEngine::new(*rates);
        let project_one = |stored: &StoredPosition| {
            engine
                .project(&stored.position)
                .map(|result| ProjectedPosition {
                    id: stored.id,
                    institution: stored.position.institution.clone(),
                    principal: stored.position.principal,
                    due_date: stored.position.due_date,
                    result,
                })
                .map_err(|e| (stored.id, e))
        };

        let results: Vec<_> = if positions.len() > self.parallel_threshold {
            positions.par_iter().map(project_one).collect()
        } else {
            positions.iter().map(project_one).collect()
        };

        let mut outcome = RecomputeOutcome::default();
        for result in results {
            match result {
                Ok(projected) => outcome.projected.push(projected),
                Err((id, e)) => {
                    log::warn!("Skipping position {}: {}", id, e);
                    outcome.failures.push((id, e));
                }
            }
        }
        outcome
    }

    /// Recompute every stored position and write the batch back
    pub fn recompute<S: PositionStore>(
        &self,
        store: &mut S,
        rates: &MarketRates,
    ) -> Result<RecomputeOutcome, BatchWriteError<S::Error>> {
        let positions = store.list_by_due_date();
        let outcome = self.project_all(&positions, rates);

        if let Err(source) = store.apply_projections(&outcome.projected) {
            return Err(BatchWriteError {
                source,
                computed: outcome.projected,
            });
        }

        log::info!(
            "Recomputed {} positions ({} failed validation)",
            outcome.projected.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }

    /// Recompute, then summarize exposure over every stored position.
    ///
    /// Positions that failed validation stay in the report at their last
    /// written projection, or at principal if never projected.
    pub fn recompute_with_exposure<S: PositionStore>(
        &self,
        store: &mut S,
        rates: &MarketRates,
        aggregator: &ExposureAggregator,
    ) -> Result<(RecomputeOutcome, ExposureReport), BatchWriteError<S::Error>> {
        let outcome = self.recompute(store, rates)?;
        let report = aggregator.summarize(&store.list_by_due_date());
        Ok((outcome, report))
    }

    /// Record a new market-rate snapshot, then recompute against it
    pub fn on_rates_changed<S: PositionStore, R: MarketRatesStore>(
        &self,
        store: &mut S,
        rates_store: &mut R,
        rates: MarketRates,
    ) -> Result<RecomputeOutcome, BatchWriteError<S::Error>> {
        rates_store.set(rates);
        self.recompute(store, &rates)
    }
}

impl Default for Recalculator {
    fn default() -> Self {
        Self::new()
    }
}
