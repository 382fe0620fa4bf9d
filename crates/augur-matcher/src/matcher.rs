//! Window matching and majority vote

use augur_core::{Outcome, Pattern, PatternTable};
use tracing::debug;

/// One place where a pattern matched the results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternHit<'a> {
    /// The pattern that matched
    pub pattern: &'a Pattern,
    /// The outcome the pattern predicts
    pub outcome: &'a Outcome,
    /// Start of the matching window within the results
    pub offset: usize,
}

/// Find every (pattern, window) pair where the window equals the pattern.
///
/// Patterns are scanned in table order, and each pattern's windows from left
/// to right. Overlapping windows count separately. Patterns longer than
/// `results` (and empty patterns) never match.
pub fn find_matches<'a>(patterns: &'a PatternTable, results: &[Outcome]) -> Vec<PatternHit<'a>> {
    let mut hits = Vec::new();

    if patterns.is_empty() || results.is_empty() {
        return hits;
    }

    for (pattern, outcome) in patterns.iter() {
        let len = pattern.len();
        if len == 0 || len > results.len() {
            continue;
        }

        for (offset, window) in results.windows(len).enumerate() {
            if window == pattern.labels() {
                hits.push(PatternHit {
                    pattern,
                    outcome,
                    offset,
                });
            }
        }
    }

    hits
}

/// Outcomes of all matching (pattern, window) pairs, one entry per match
pub fn find_matching_predictions<'a>(
    patterns: &'a PatternTable,
    results: &[Outcome],
) -> Vec<&'a Outcome> {
    find_matches(patterns, results)
        .into_iter()
        .map(|hit| hit.outcome)
        .collect()
}

/// Count occurrences per distinct outcome, in order of first appearance
pub fn tally<'a>(matches: &[&'a Outcome]) -> Vec<(&'a Outcome, usize)> {
    let mut counts: Vec<(&Outcome, usize)> = Vec::new();

    for &outcome in matches {
        match counts.iter_mut().find(|(label, _)| *label == outcome) {
            Some((_, count)) => *count += 1,
            None => counts.push((outcome, 1)),
        }
    }

    counts
}

/// The most frequent outcome, or `None` when there are no matches.
///
/// Ties go to the outcome that appeared first in `matches`.
pub fn get_best_prediction<'a>(matches: &[&'a Outcome]) -> Option<&'a Outcome> {
    let mut best = None;
    let mut highest = 0;

    for (outcome, count) in tally(matches) {
        if count > highest {
            highest = count;
            best = Some(outcome);
        }
    }

    best
}

/// Predict the next outcome from a pattern table and recent results
pub fn predict(patterns: &PatternTable, results: &[Outcome]) -> Option<Outcome> {
    let matches = find_matching_predictions(patterns, results);
    let prediction = get_best_prediction(&matches).cloned();

    debug!(
        "{} pattern hits over {} results -> {:?}",
        matches.len(),
        results.len(),
        prediction
    );

    prediction
}
