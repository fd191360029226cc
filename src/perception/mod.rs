//! What an agent knows about its surroundings.
//!
//! A [`PerceivedState`] is rebuilt from a local scan every tick
//! ([`scan::perceive`]), folded into the agent's memory with
//! [`PerceivedState::merge`], and turned into a table key by
//! [`codec::encode`].

pub mod codec;
pub mod scan;
pub mod state;

pub use codec::{decode, encode};
pub use scan::perceive;
pub use state::PerceivedState;
