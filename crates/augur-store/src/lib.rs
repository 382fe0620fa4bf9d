//! # augur-store
//!
//! Storage for everything around the prediction engine.
//!
//! This crate provides:
//! - The game catalogue (vocabulary, cooldown, pattern table per game)
//! - The app catalogue
//! - Per-(user, app, game) result histories
//! - Pluggable persistence (JSON file or memory)

mod backend;
mod store;

pub use backend::{HistoryEntry, JsonFileBackend, MemoryBackend, StateBackend, StoreState};
pub use store::GameStore;
