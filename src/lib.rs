//! Persisted-data layer for a leveling-goal plugin of a game-companion app:
//! the one-shot legacy migration, the canonical `p-state.json` document it
//! produces, and the goal-template model shared with the host application.

pub mod migrate;
pub mod paths;
pub mod state;
pub mod template;
