//! Position data structures and CSV loading

mod data;
pub mod loader;

pub use data::{normalize_institution, IndexRegime, Position, RegimeKind, MAX_TAX_RATE};
pub use loader::{load_positions, load_positions_from_reader};
