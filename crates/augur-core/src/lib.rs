//! # augur-core
//!
//! Core types for the Augur pattern prediction engine.
//!
//! Augur predicts the next round of a small-vocabulary game ("Big"/"Small",
//! "Big Odd"/"Small Even", ...) from a player's most recent results, using
//! patterns an administrator has written by hand.
//!
//! ## Core Paradigm
//!
//! - Outcomes are opaque labels, compared by exact string equality
//! - Patterns ARE label sequences (no delimiter-joined keys)
//! - A pattern table keeps insertion order, which is also the scan order
//! - Histories hold at most [`MAX_HISTORY`] results, oldest first

pub mod command;
pub mod config;
mod error;
mod types;

pub use command::{parse_labels, parse_remove_pattern, parse_set_pattern, RemovePattern, SetPattern};
pub use config::AugurConfig;
pub use error::{AugurError, Result};
pub use types::*;
