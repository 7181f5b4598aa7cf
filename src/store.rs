//! Collaborator interfaces for position and market-rate storage
//!
//! The engine never reads or writes storage itself; these traits describe
//! what the surrounding application provides. The in-memory implementations
//! back the CLI and tests.

use crate::error::StoreError;
use crate::exposure::ExposureSource;
use crate::market::MarketRates;
use crate::position::Position;
use crate::projection::{CalculationResult, ProjectedPosition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A persisted position with its last written projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPosition {
    pub id: u64,
    pub position: Position,
    /// Derived view, `None` until a projection has been written back
    pub projection: Option<CalculationResult>,
}

impl ExposureSource for StoredPosition {
    fn institution(&self) -> &str {
        &self.position.institution
    }

    /// Falls back to principal for positions never projected
    fn projected_gross(&self) -> f64 {
        self.projection
            .map(|p| p.gross)
            .unwrap_or(self.position.principal)
    }
}

/// Position persistence
pub trait PositionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store a new position and return its assigned id
    fn create(&mut self, position: Position) -> u64;

    fn get(&self, id: u64) -> Option<StoredPosition>;

    /// Replace a position's terms; its stale projection is cleared
    fn update(&mut self, id: u64, position: Position) -> Result<(), Self::Error>;

    fn delete(&mut self, id: u64) -> Result<StoredPosition, Self::Error>;

    /// All positions ordered by due date (then id)
    fn list_by_due_date(&self) -> Vec<StoredPosition>;

    /// Write a batch of projections back. All-or-nothing.
    fn apply_projections(&mut self, batch: &[ProjectedPosition]) -> Result<(), Self::Error>;
}

/// Storage for the single current market-rate snapshot
pub trait MarketRatesStore {
    fn current(&self) -> MarketRates;

    fn set(&mut self, rates: MarketRates);
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    positions: BTreeMap<u64, StoredPosition>,
    next_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            positions: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Seed from records that already carry ids (e.g., a CSV export).
    ///
    /// Fails on a repeated id rather than dropping the earlier record.
    pub fn from_records(records: Vec<(u64, Position)>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for (id, position) in records {
            if store.positions.contains_key(&id) {
                return Err(StoreError::DuplicateId(id));
            }
            store.positions.insert(
                id,
                StoredPosition {
                    id,
                    position,
                    projection: None,
                },
            );
            store.next_id = store.next_id.max(id + 1);
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl PositionStore for InMemoryStore {
    type Error = StoreError;

    fn create(&mut self, position: Position) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.positions.insert(
            id,
            StoredPosition {
                id,
                position,
                projection: None,
            },
        );
        id
    }

    fn get(&self, id: u64) -> Option<StoredPosition> {
        self.positions.get(&id).cloned()
    }

    fn update(&mut self, id: u64, position: Position) -> Result<(), StoreError> {
        let stored = self.positions.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        stored.position = position;
        stored.projection = None;
        Ok(())
    }

    fn delete(&mut self, id: u64) -> Result<StoredPosition, StoreError> {
        self.positions.remove(&id).ok_or(StoreError::NotFound(id))
    }

    fn list_by_due_date(&self) -> Vec<StoredPosition> {
        let mut all: Vec<_> = self.positions.values().cloned().collect();
        all.sort_by_key(|p| (p.position.due_date, p.id));
        all
    }

    fn apply_projections(&mut self, batch: &[ProjectedPosition]) -> Result<(), StoreError> {
        if let Some(missing) = batch.iter().find(|p| !self.positions.contains_key(&p.id)) {
            return Err(StoreError::NotFound(missing.id));
        }
        for projected in batch {
            if let Some(stored) = self.positions.get_mut(&projected.id) {
                stored.projection = Some(projected.result);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryRatesStore {
    rates: MarketRates,
}

impl InMemoryRatesStore {
    pub fn new(rates: MarketRates) -> Self {
        Self { rates }
    }
}

impl MarketRatesStore for InMemoryRatesStore {
    fn current(&self) -> MarketRates {
        self.rates
    }

    fn set(&mut self, rates: MarketRates) {
        self.rates = rates;
    }
}
