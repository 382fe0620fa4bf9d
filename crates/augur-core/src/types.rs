//! Core type definitions for Augur

use serde::{Deserialize, Serialize};

use crate::{AugurError, Result};

/// Maximum number of results kept in a [`ResultHistory`]
pub const MAX_HISTORY: usize = 10;

/// A single outcome label from a game's vocabulary (e.g. "Big", "Small Odd").
///
/// Labels are opaque: they are only ever compared by exact, case-sensitive
/// string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outcome(String);

impl Outcome {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Outcome {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Outcome {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Outcome {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Outcome {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Outcome {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// An ordered sequence of outcome labels
///
/// Patterns are keyed by the sequence itself, so labels may contain any
/// character. The comma-separated form is only used for display and input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern(Vec<Outcome>);

impl Pattern {
    pub fn new(labels: Vec<Outcome>) -> Self {
        Self(labels)
    }

    /// Build a pattern from anything label-like
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Outcome>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    pub fn labels(&self) -> &[Outcome] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(Outcome::as_str).collect();
        write!(f, "[{}]", labels.join(", "))
    }
}

impl FromIterator<Outcome> for Pattern {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One entry of a [`PatternTable`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    /// The label sequence to look for
    pub pattern: Pattern,
    /// The outcome predicted when the sequence is seen
    pub outcome: Outcome,
}

/// Pattern → outcome table for one game
///
/// Keys are unique. Iteration follows insertion order; re-inserting an
/// existing pattern replaces its outcome without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PatternRule>", into = "Vec<PatternRule>")]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a rule. Returns the previous outcome, if any.
    pub fn insert(&mut self, pattern: Pattern, outcome: Outcome) -> Option<Outcome> {
        match self.rules.iter_mut().find(|r| r.pattern == pattern) {
            Some(rule) => Some(std::mem::replace(&mut rule.outcome, outcome)),
            None => {
                self.rules.push(PatternRule { pattern, outcome });
                None
            }
        }
    }

    /// Remove a rule. Returns its outcome if the pattern was present.
    pub fn remove(&mut self, pattern: &Pattern) -> Option<Outcome> {
        let index = self.rules.iter().position(|r| &r.pattern == pattern)?;
        Some(self.rules.remove(index).outcome)
    }

    pub fn get(&self, pattern: &Pattern) -> Option<&Outcome> {
        self.rules
            .iter()
            .find(|r| &r.pattern == pattern)
            .map(|r| &r.outcome)
    }

    pub fn contains(&self, pattern: &Pattern) -> bool {
        self.get(pattern).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over (pattern, outcome) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Pattern, &Outcome)> {
        self.rules.iter().map(|r| (&r.pattern, &r.outcome))
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }
}

impl From<Vec<PatternRule>> for PatternTable {
    fn from(rules: Vec<PatternRule>) -> Self {
        let mut table = Self::new();
        for rule in rules {
            table.insert(rule.pattern, rule.outcome);
        }
        table
    }
}

impl From<PatternTable> for Vec<PatternRule> {
    fn from(table: PatternTable) -> Self {
        table.rules
    }
}

impl FromIterator<(Pattern, Outcome)> for PatternTable {
    fn from_iter<I: IntoIterator<Item = (Pattern, Outcome)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (pattern, outcome) in iter {
            table.insert(pattern, outcome);
        }
        table
    }
}

/// The most recent results for one (user, app, game), oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Outcome>", into = "Vec<Outcome>")]
pub struct ResultHistory {
    results: Vec<Outcome>,
}

impl ResultHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from up to [`MAX_HISTORY`] results
    pub fn from_results(results: Vec<Outcome>) -> Result<Self> {
        if results.len() > MAX_HISTORY {
            return Err(AugurError::HistoryTooLong {
                len: results.len(),
                max: MAX_HISTORY,
            });
        }
        Ok(Self { results })
    }

    /// Append a confirmed result, evicting the oldest one when full.
    /// Returns the evicted result.
    pub fn push(&mut self, outcome: Outcome) -> Option<Outcome> {
        let evicted = if self.results.len() >= MAX_HISTORY {
            Some(self.results.remove(0))
        } else {
            None
        };
        self.results.push(outcome);
        evicted
    }

    pub fn as_slice(&self) -> &[Outcome] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.results.len() == MAX_HISTORY
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.results.iter()
    }
}

impl TryFrom<Vec<Outcome>> for ResultHistory {
    type Error = AugurError;

    fn try_from(results: Vec<Outcome>) -> Result<Self> {
        Self::from_results(results)
    }
}

impl From<ResultHistory> for Vec<Outcome> {
    fn from(history: ResultHistory) -> Self {
        history.results
    }
}

impl std::fmt::Display for ResultHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.results.is_empty() {
            return write!(f, "No results available");
        }
        let labels: Vec<&str> = self.results.iter().map(Outcome::as_str).collect();
        write!(f, "{}", labels.join(", "))
    }
}

/// Configuration of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game name (e.g. "WINGO")
    pub name: String,
    /// Seconds a player waits between predictions
    #[serde(default)]
    pub cooldown_secs: u64,
    /// The game's outcome vocabulary
    pub result_format: Vec<Outcome>,
    /// Administrator-authored patterns
    #[serde(default)]
    pub patterns: PatternTable,
}

impl GameConfig {
    pub fn new(name: impl Into<String>, cooldown_secs: u64, result_format: Vec<Outcome>) -> Self {
        Self {
            name: name.into(),
            cooldown_secs,
            result_format,
            patterns: PatternTable::new(),
        }
    }

    pub fn with_pattern(mut self, pattern: Pattern, outcome: Outcome) -> Self {
        self.patterns.insert(pattern, outcome);
        self
    }

    /// Whether a label belongs to this game's vocabulary
    pub fn knows(&self, label: &Outcome) -> bool {
        self.result_format.contains(label)
    }

    /// Labels of a pattern (and its outcome) that are outside the vocabulary
    pub fn unknown_labels<'a>(&self, pattern: &'a Pattern, outcome: &'a Outcome) -> Vec<&'a Outcome> {
        pattern
            .labels()
            .iter()
            .chain(std::iter::once(outcome))
            .filter(|label| !self.knows(label))
            .collect()
    }
}

/// Identifies one result history: a user playing one game on one app
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HistoryKey {
    pub user_id: i64,
    pub app: String,
    pub game: String,
}

impl HistoryKey {
    pub fn new(user_id: i64, app: impl Into<String>, game: impl Into<String>) -> Self {
        Self {
            user_id,
            app: app.into(),
            game: game.into(),
        }
    }
}

impl std::fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.user_id, self.app, self.game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<Outcome> {
        items.iter().map(|s| Outcome::from(*s)).collect()
    }

    #[test]
    fn test_pattern_display() {
        let pattern = Pattern::from_labels(["Big", "Big", "Small"]);
        assert_eq!(pattern.to_string(), "[Big, Big, Small]");
        assert_eq!(pattern.len(), 3);
    }

    #[test]
    fn test_pattern_labels_may_contain_commas() {
        let a = Pattern::from_labels(["Big,Small"]);
        let b = Pattern::from_labels(["Big", "Small"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_table_replace_keeps_position() {
        let mut table = PatternTable::new();
        table.insert(Pattern::from_labels(["Big"]), "Small".into());
        table.insert(Pattern::from_labels(["Small"]), "Big".into());

        let previous = table.insert(Pattern::from_labels(["Big"]), "Big".into());
        assert_eq!(previous, Some(Outcome::from("Small")));
        assert_eq!(table.len(), 2);

        let order: Vec<String> = table.iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(order, vec!["[Big]", "[Small]"]);
        assert_eq!(table.get(&Pattern::from_labels(["Big"])), Some(&Outcome::from("Big")));
    }

    #[test]
    fn test_table_remove() {
        let mut table: PatternTable = [
            (Pattern::from_labels(["Big", "Big"]), Outcome::from("Small")),
            (Pattern::from_labels(["Small", "Small"]), Outcome::from("Big")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            table.remove(&Pattern::from_labels(["Big", "Big"])),
            Some(Outcome::from("Small"))
        );
        assert_eq!(table.remove(&Pattern::from_labels(["Big", "Big"])), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_serde_preserves_order_and_dedupes() {
        let json = r#"[
            {"pattern": ["Small", "Big"], "outcome": "Big"},
            {"pattern": ["Big", "Small"], "outcome": "Small"},
            {"pattern": ["Small", "Big"], "outcome": "Small"}
        ]"#;
        let table: PatternTable = serde_json::from_str(json).unwrap();

        assert_eq!(table.len(), 2);
        let (first, outcome) = table.iter().next().unwrap();
        assert_eq!(first, &Pattern::from_labels(["Small", "Big"]));
        assert_eq!(outcome, "Small");

        let round: PatternTable =
            serde_json::from_str(&serde_json::to_string(&table).unwrap()).unwrap();
        assert_eq!(round, table);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = ResultHistory::from_results(labels(&[
            "Big", "Small", "Big", "Small", "Big", "Small", "Big", "Small", "Big", "Small",
        ]))
        .unwrap();
        assert!(history.is_full());

        let evicted = history.push("Big".into());
        assert_eq!(evicted, Some(Outcome::from("Big")));
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.as_slice()[0], "Small");
        assert_eq!(history.as_slice()[MAX_HISTORY - 1], "Big");
    }

    #[test]
    fn test_history_grows_until_full() {
        let mut history = ResultHistory::new();
        assert_eq!(history.push("Big".into()), None);
        assert_eq!(history.len(), 1);
        assert!(!history.is_full());
    }

    #[test]
    fn test_history_rejects_too_many_results() {
        let err = ResultHistory::from_results(labels(&["Big"; 11])).unwrap_err();
        assert!(matches!(err, AugurError::HistoryTooLong { len: 11, max: 10 }));

        let parsed: std::result::Result<ResultHistory, _> =
            serde_json::from_str(r#"["Big","Big","Big","Big","Big","Big","Big","Big","Big","Big","Big"]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_history_display() {
        assert_eq!(ResultHistory::new().to_string(), "No results available");
        let history = ResultHistory::from_results(labels(&["Big", "Small"])).unwrap();
        assert_eq!(history.to_string(), "Big, Small");
    }

    #[test]
    fn test_game_unknown_labels() {
        let game = GameConfig::new("WINGO", 0, labels(&["Big", "Small"]));
        let pattern = Pattern::from_labels(["Big", "big"]);
        let outcome = Outcome::from("Medium");

        let unknown: Vec<&str> = game
            .unknown_labels(&pattern, &outcome)
            .into_iter()
            .map(Outcome::as_str)
            .collect();
        assert_eq!(unknown, vec!["big", "Medium"]);
    }

    #[test]
    fn test_history_key_display() {
        let key = HistoryKey::new(42, "1win", "WINGO");
        assert_eq!(key.to_string(), "42/1win/WINGO");
    }
}
