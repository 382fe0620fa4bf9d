//! Game catalogue, pattern tables and player histories

use augur_core::{
    AugurConfig, AugurError, GameConfig, HistoryKey, Outcome, Pattern, Result, ResultHistory,
    MAX_HISTORY,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::backend::{HistoryEntry, StateBackend, StoreState};

/// Store for games, apps and result histories
///
/// Every mutation is written through the backend before it returns.
pub struct GameStore<B: StateBackend> {
    backend: B,
    config: AugurConfig,
    state: StoreState,
}

impl<B: StateBackend> GameStore<B> {
    /// Open the store, seeding it from `config` if the backend is empty
    pub async fn open(backend: B, config: AugurConfig) -> Result<Self> {
        let state = match backend.load().await? {
            Some(state) => {
                info!(
                    "Loaded {} games and {} histories from {}",
                    state.games.len(),
                    state.histories.len(),
                    backend.describe()
                );
                state
            }
            None => {
                info!("No saved store at {}, using defaults", backend.describe());
                StoreState::seeded(&config)
            }
        };

        Ok(Self {
            backend,
            config,
            state,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    async fn persist(&self) -> Result<()> {
        self.backend.save(&self.state).await
    }

    // Games

    pub fn games(&self) -> &[GameConfig] {
        &self.state.games
    }

    pub fn game(&self, name: &str) -> Option<&GameConfig> {
        self.state.games.iter().find(|g| g.name == name)
    }

    fn game_mut(&mut self, name: &str) -> Result<&mut GameConfig> {
        self.state
            .games
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| AugurError::GameNotFound(name.to_string()))
    }

    /// Add a game. Missing (or empty) settings fall back to the config defaults.
    pub async fn add_game(
        &mut self,
        name: &str,
        cooldown_secs: Option<u64>,
        result_format: Option<Vec<Outcome>>,
    ) -> Result<()> {
        if self.game(name).is_some() {
            return Err(AugurError::GameExists(name.to_string()));
        }

        let result_format = result_format
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| self.config.default_result_format.clone());
        let cooldown_secs = cooldown_secs.unwrap_or(self.config.default_cooldown_secs);

        self.state
            .games
            .push(GameConfig::new(name, cooldown_secs, result_format));
        self.persist().await?;

        info!("Added game {} (cooldown {}s)", name, cooldown_secs);
        Ok(())
    }

    /// Delete a game. Deleting the last game restores the default games.
    pub async fn delete_game(&mut self, name: &str) -> Result<()> {
        let index = self
            .state
            .games
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| AugurError::GameNotFound(name.to_string()))?;
        self.state.games.remove(index);

        if self.state.games.is_empty() {
            info!("Last game deleted, restoring default games");
            self.state.games = self.config.default_games.clone();
        }

        self.persist().await?;
        info!("Deleted game {}", name);
        Ok(())
    }

    pub async fn set_cooldown(&mut self, name: &str, cooldown_secs: u64) -> Result<()> {
        self.game_mut(name)?.cooldown_secs = cooldown_secs;
        self.persist().await?;

        info!("Set cooldown of {} to {}s", name, cooldown_secs);
        Ok(())
    }

    // Apps

    pub fn apps(&self) -> &[String] {
        &self.state.apps
    }

    pub async fn add_app(&mut self, name: &str) -> Result<()> {
        if self.state.apps.iter().any(|a| a == name) {
            return Err(AugurError::AppExists(name.to_string()));
        }

        self.state.apps.push(name.to_string());
        self.persist().await?;

        info!("Added app {}", name);
        Ok(())
    }

    /// Delete an app. Deleting the last app restores the default apps.
    pub async fn delete_app(&mut self, name: &str) -> Result<()> {
        let index = self
            .state
            .apps
            .iter()
            .position(|a| a == name)
            .ok_or_else(|| AugurError::AppNotFound(name.to_string()))?;
        self.state.apps.remove(index);

        if self.state.apps.is_empty() {
            info!("Last app deleted, restoring default apps");
            self.state.apps = self.config.default_apps.clone();
        }

        self.persist().await?;
        info!("Deleted app {}", name);
        Ok(())
    }

    // Patterns

    /// Add or replace a pattern. Returns the outcome it replaced, if any.
    pub async fn add_pattern(
        &mut self,
        game: &str,
        pattern: Pattern,
        outcome: Outcome,
    ) -> Result<Option<Outcome>> {
        if pattern.is_empty() {
            return Err(AugurError::InvalidPattern("pattern is empty".to_string()));
        }

        let config = self.game_mut(game)?;

        if pattern.len() > MAX_HISTORY {
            warn!(
                "Pattern {} has {} labels and can never match a {}-result history",
                pattern,
                pattern.len(),
                MAX_HISTORY
            );
        }
        let unknown: Vec<String> = config
            .unknown_labels(&pattern, &outcome)
            .into_iter()
            .map(ToString::to_string)
            .collect();
        if !unknown.is_empty() {
            warn!("Labels {:?} are not in the {} result format", unknown, game);
        }

        info!("Set pattern {} -> {} for {}", pattern, outcome, game);
        let previous = config.patterns.insert(pattern, outcome);
        self.persist().await?;

        Ok(previous)
    }

    /// Remove a pattern. Returns whether it existed.
    pub async fn remove_pattern(&mut self, game: &str, pattern: &Pattern) -> Result<bool> {
        if self.game_mut(game)?.patterns.remove(pattern).is_none() {
            return Ok(false);
        }

        self.persist().await?;
        info!("Removed pattern {} from {}", pattern, game);
        Ok(true)
    }

    // Histories

    pub fn history(&self, key: &HistoryKey) -> Option<&ResultHistory> {
        self.state
            .histories
            .iter()
            .find(|h| &h.key == key)
            .map(|h| &h.results)
    }

    /// Replace the results for `key` (at most [`MAX_HISTORY`])
    pub async fn set_history(&mut self, key: HistoryKey, results: Vec<Outcome>) -> Result<()> {
        if self.game(&key.game).is_none() {
            return Err(AugurError::GameNotFound(key.game));
        }
        let results = ResultHistory::from_results(results)?;

        match self.state.histories.iter_mut().find(|h| h.key == key) {
            Some(entry) => {
                entry.results = results;
                entry.updated_at = Utc::now();
            }
            None => self.state.histories.push(HistoryEntry {
                key: key.clone(),
                results,
                updated_at: Utc::now(),
            }),
        }

        self.persist().await?;
        info!("Stored results for {}", key);
        Ok(())
    }

    /// Append a confirmed result to an existing history, evicting the oldest
    /// result once the history is full.
    pub async fn record_result(
        &mut self,
        key: &HistoryKey,
        outcome: Outcome,
    ) -> Result<ResultHistory> {
        let entry = self
            .state
            .histories
            .iter_mut()
            .find(|h| &h.key == key && !h.results.is_empty())
            .ok_or_else(|| AugurError::HistoryNotFound(key.to_string()))?;

        info!("Recorded result {} for {}", outcome, key);
        entry.results.push(outcome);
        entry.updated_at = Utc::now();
        let results = entry.results.clone();

        self.persist().await?;
        Ok(results)
    }

    // Prediction

    /// Predict the next result for a stored history.
    ///
    /// A missing history is treated as empty and yields `None`.
    pub fn predict(&self, key: &HistoryKey) -> Result<Option<Outcome>> {
        let results = self.history(key).map(ResultHistory::as_slice).unwrap_or(&[]);
        let prediction = self.predict_with(&key.game, results)?;

        match &prediction {
            Some(outcome) => info!("Prediction for {}: {}", key, outcome),
            None => info!("No matching pattern for {}", key),
        }

        Ok(prediction)
    }

    /// Predict the next result of `game` from explicit results
    pub fn predict_with(&self, game: &str, results: &[Outcome]) -> Result<Option<Outcome>> {
        let config = self
            .game(game)
            .ok_or_else(|| AugurError::GameNotFound(game.to_string()))?;

        Ok(augur_matcher::predict(&config.patterns, results))
    }
}
