//! Administrator pattern commands
//!
//! Two notations are accepted for the left-hand side:
//!
//! ```text
//! WINGO [Big, Big, Small] → Small
//! WINGO Big, Big, Small = Small
//! ```
//!
//! The removal form is the same without `→ outcome`. A leading command word
//! (`/setpattern`, `/removepattern`) is ignored.

use regex::Regex;
use std::sync::OnceLock;

use crate::{AugurError, Outcome, Pattern, Result};

const ARROW: char = '→';
const EQUALS: char = '=';

/// A parsed "set pattern" command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPattern {
    pub game: String,
    pub pattern: Pattern,
    pub outcome: Outcome,
}

/// A parsed "remove pattern" command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovePattern {
    pub game: String,
    pub pattern: Pattern,
}

fn bracket_form() -> &'static Regex {
    static BRACKET: OnceLock<Regex> = OnceLock::new();
    BRACKET.get_or_init(|| {
        Regex::new(r"^(?P<game>[^\[\]]+?)\s*\[(?P<labels>[^\[\]]*)\]$").expect("valid regex")
    })
}

/// Parse `GAME [A, B, C] → X` (or any of the accepted notations)
pub fn parse_set_pattern(text: &str) -> Result<SetPattern> {
    let text = strip_command_word(text);

    let separator = if text.contains(ARROW) {
        ARROW
    } else if text.contains(EQUALS) {
        EQUALS
    } else {
        return Err(AugurError::InvalidCommand(format!(
            "expected '{}' or '{}' before the outcome",
            ARROW, EQUALS
        )));
    };

    let parts: Vec<&str> = text.split(separator).collect();
    if parts.len() != 2 {
        return Err(AugurError::InvalidCommand(format!(
            "expected exactly one '{}'",
            separator
        )));
    }

    let outcome = parts[1].trim();
    if outcome.is_empty() {
        return Err(AugurError::InvalidCommand("missing outcome".to_string()));
    }

    let (game, pattern) = parse_game_and_pattern(parts[0])?;
    Ok(SetPattern {
        game,
        pattern,
        outcome: Outcome::from(outcome),
    })
}

/// Parse `GAME [A, B, C]` or `GAME A, B, C`
pub fn parse_remove_pattern(text: &str) -> Result<RemovePattern> {
    let (game, pattern) = parse_game_and_pattern(strip_command_word(text))?;
    Ok(RemovePattern { game, pattern })
}

/// Split a comma-separated label list, trimming each label
pub fn parse_labels(text: &str) -> Result<Vec<Outcome>> {
    let labels: Vec<&str> = text.split(',').map(str::trim).collect();
    if labels.iter().any(|l| l.is_empty()) {
        return Err(AugurError::InvalidPattern(format!(
            "empty label in '{}'",
            text.trim()
        )));
    }
    Ok(labels.into_iter().map(Outcome::from).collect())
}

fn parse_game_and_pattern(text: &str) -> Result<(String, Pattern)> {
    let text = text.trim();

    let (game, labels) = if text.contains('[') && text.contains(']') {
        let caps = bracket_form().captures(text).ok_or_else(|| {
            AugurError::InvalidCommand(format!("expected 'GAME [A, B, ...]', got '{}'", text))
        })?;
        (
            caps["game"].trim().to_string(),
            caps.name("labels").map_or("", |m| m.as_str()).to_string(),
        )
    } else {
        let mut split = text.splitn(2, char::is_whitespace);
        match (split.next(), split.next()) {
            (Some(game), Some(rest)) if !game.is_empty() && !rest.trim().is_empty() => {
                (game.to_string(), rest.to_string())
            }
            _ => {
                return Err(AugurError::InvalidCommand(format!(
                    "expected 'GAME A, B, ...', got '{}'",
                    text
                )))
            }
        }
    };

    if game.is_empty() {
        return Err(AugurError::InvalidCommand("missing game name".to_string()));
    }

    Ok((game, Pattern::new(parse_labels(&labels)?)))
}

fn strip_command_word(text: &str) -> &str {
    let text = text.trim();
    if text.starts_with('/') {
        text.split_once(char::is_whitespace)
            .map_or("", |(_, rest)| rest.trim())
    } else {
        text
    }
}
