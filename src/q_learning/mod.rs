//! Tabular Q-learning for grid navigation
//!
//! The learner keeps one value per (state, destination cell) pair. States are
//! keyed by their canonical text encoding, so lookup is exact-match.
//!
//! ## Update rule
//!
//! After choosing a move `a` in state `s`, the agent stores
//!
//! ```text
//! Q(s, a) = r(s, a) + γ · max_a' Q(s', a')
//! ```
//!
//! where `s'` is `s` with the agent moved to `a`. Missing values are seeded
//! with their immediate reward.
//!
//! ## Usage Example
//!
//! ```
//! use gridnav::perception::PerceivedState;
//! use gridnav::q_learning::{QTable, RewardModel};
//! use gridnav::types::Position;
//!
//! let table = QTable::default();
//! let rewards = RewardModel::default();
//! let state = PerceivedState::at(Position::new(1, 1)).with_exit(Position::new(2, 1));
//!
//! let best = table.best_action(&state, &[Position::new(1, 2), Position::new(2, 1)], &rewards);
//! assert_eq!(best.action, Some(Position::new(2, 1)));
//! ```

pub mod q_table;
pub mod rewards;
pub mod serialization;

// Public re-exports
pub use q_table::{BestAction, DEFAULT_DISCOUNT_FACTOR, NO_ACTION_VALUE, QTable};
pub use rewards::{RewardEvent, RewardModel};
pub use serialization::{LoadReport, TableRecord, read_table, write_table};
