//! # augur-matcher
//!
//! The prediction engine: exact window matching of administrator patterns
//! against a player's recent results, followed by a majority vote.
//!
//! All functions are pure. They borrow their inputs, keep no state and may be
//! called concurrently without coordination.
//!
//! ```
//! use augur_core::{Outcome, Pattern, PatternTable};
//! use augur_matcher::predict;
//!
//! let mut patterns = PatternTable::new();
//! patterns.insert(Pattern::from_labels(["Big", "Small"]), Outcome::from("Big"));
//!
//! let results: Vec<Outcome> = ["Small", "Big", "Small"].into_iter().map(Outcome::from).collect();
//! assert_eq!(predict(&patterns, &results), Some(Outcome::from("Big")));
//! ```

mod matcher;

pub use matcher::{
    find_matches, find_matching_predictions, get_best_prediction, predict, tally, PatternHit,
};
