//! Shared Q-table for grid navigation

use dashmap::DashMap;

use crate::{
    identifiers::{StateActionKey, StateKey},
    perception::PerceivedState,
    q_learning::RewardModel,
    types::Position,
};

/// Value reported by [`QTable::best_action`] when there is nothing to choose.
///
/// Agents in exploitation mode also treat a best value at or below this as
/// "nothing learned worth following" and explore instead.
pub const NO_ACTION_VALUE: f64 = -100.0;

/// Discount factor γ applied to the bootstrapped next-state value.
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.8;

/// Result of a greedy lookup over candidate actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestAction {
    pub value: f64,
    pub action: Option<Position>,
}

impl BestAction {
    /// The outcome when no action is available.
    pub const NONE: BestAction = BestAction {
        value: NO_ACTION_VALUE,
        action: None,
    };
}

/// Q-table mapping (encoded state, destination cell) pairs to Q-values.
///
/// The table is meant to be shared behind an `Arc` by every agent of a run.
/// All operations take `&self`: seeding a missing entry is atomic per key,
/// and explicit updates are last-write-wins. Entries are never removed.
#[derive(Debug)]
pub struct QTable {
    q_values: DashMap<StateActionKey, f64>,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new(discount_factor: f64) -> Self {
        Self {
            q_values: DashMap::new(),
            discount_factor,
        }
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Stored Q-value, if any
    pub fn get(&self, state: &StateKey, action: Position) -> Option<f64> {
        self.q_values
            .get(&StateActionKey::new(state.clone(), action))
            .map(|value| *value)
    }

    /// Stored Q-value, seeding it with the immediate reward on a miss.
    ///
    /// `state_key` must be the key of `state`; it is taken separately so
    /// callers iterating over many actions encode the state once.
    pub fn get_or_seed(
        &self,
        state_key: &StateKey,
        action: Position,
        state: &PerceivedState,
        rewards: &RewardModel,
    ) -> f64 {
        *self
            .q_values
            .entry(StateActionKey::new(state_key.clone(), action))
            .or_insert_with(|| rewards.reward_for(state, action))
    }

    /// Overwrite the Q-value for a state-action pair
    pub fn update(&self, state: &StateKey, action: Position, value: f64) {
        self.q_values
            .insert(StateActionKey::new(state.clone(), action), value);
    }

    /// Insert a persisted entry, returning the value it replaced.
    pub fn insert_loaded(&self, key: StateActionKey, value: f64) -> Option<f64> {
        self.q_values.insert(key, value)
    }

    /// Greedy action among `actions` for `state`.
    ///
    /// Missing entries are seeded on the way. Ties go to the earliest action
    /// in `actions`, so callers pass candidates in compass order.
    pub fn best_action(
        &self,
        state: &PerceivedState,
        actions: &[Position],
        rewards: &RewardModel,
    ) -> BestAction {
        let key = state.key();
        let mut best = BestAction::NONE;

        for &action in actions {
            let value = self.get_or_seed(&key, action, state, rewards);
            if best.action.is_none() || value > best.value {
                best = BestAction {
                    value,
                    action: Some(action),
                };
            }
        }

        best
    }

    /// One-step bootstrapped update for taking `action` in `state`.
    ///
    /// Q(s,a) ← r(s,a) + γ max_a' Q(s',a')
    ///
    /// `s'` is `state` with only the agent's position moved to `action`, and
    /// `next_actions` are the legal moves from there. Returns the stored
    /// value.
    pub fn bootstrap_update(
        &self,
        state: &PerceivedState,
        action: Position,
        next_actions: &[Position],
        rewards: &RewardModel,
    ) -> f64 {
        let immediate = rewards.reward_for(state, action);
        let expected = state.with_self_position(action);
        let next_best = self.best_action(&expected, next_actions, rewards).value;
        let q_value = immediate + self.discount_factor * next_best;
        self.update(&state.key(), action, q_value);
        q_value
    }

    /// Copy of every entry, ordered by key.
    pub fn snapshot(&self) -> Vec<(StateActionKey, f64)> {
        let mut entries: Vec<_> = self
            .q_values
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// Get total number of Q-values stored
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new(DEFAULT_DISCOUNT_FACTOR)
    }
}
