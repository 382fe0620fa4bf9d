//! Persistence backends for the game store

use async_trait::async_trait;
use augur_core::{AugurConfig, GameConfig, HistoryKey, Result, ResultHistory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Everything the store persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    /// Games in catalogue order
    #[serde(default)]
    pub games: Vec<GameConfig>,
    /// App names in catalogue order
    #[serde(default)]
    pub apps: Vec<String>,
    /// Per-(user, app, game) result histories
    #[serde(default)]
    pub histories: Vec<HistoryEntry>,
}

impl StoreState {
    /// A fresh state holding the configured default games and apps
    pub fn seeded(config: &AugurConfig) -> Self {
        Self {
            games: config.default_games.clone(),
            apps: config.default_apps.clone(),
            histories: Vec::new(),
        }
    }
}

/// A stored result history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub key: HistoryKey,
    pub results: ResultHistory,
    /// Last time the results changed
    pub updated_at: DateTime<Utc>,
}

/// Storage for [`StoreState`] (allows swapping the file for memory in tests)
#[async_trait]
pub trait StateBackend: Send + Sync {
    /// Load the saved state, or `None` if nothing has been saved yet
    async fn load(&self) -> Result<Option<StoreState>>;

    /// Replace the saved state
    async fn save(&self, state: &StoreState) -> Result<()>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Pretty-printed JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl StateBackend for JsonFileBackend {
    async fn load(&self) -> Result<Option<StoreState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await?;
        let state: StoreState = serde_json::from_str(&content)?;
        debug!("Loaded store from {:?}", self.path);
        Ok(Some(state))
    }

    async fn save(&self, state: &StoreState) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write beside the target, then swap it in
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!("Saved store to {:?}", self.path);
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<Option<StoreState>>,
    saves: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-saved state
    pub fn with_state(state: StoreState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed saves
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The last saved state
    pub async fn snapshot(&self) -> Option<StoreState> {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl StateBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<StoreState>> {
        Ok(self.state.lock().await.clone())
    }

    async fn save(&self, state: &StoreState) -> Result<()> {
        *self.state.lock().await = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
