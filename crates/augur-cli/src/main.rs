//! Augur CLI - pattern-based next-result prediction
//!
//! Usage:
//!   augur init                              Write default .augur/config.toml
//!   augur predict --game G --results ...    Predict from explicit results
//!   augur predict --game G --user U --app A Predict from stored results
//!   augur games list                        List games and their patterns
//!   augur patterns add "WINGO [Big, Small] → Big"
//!   augur history push --user U --app A --game G Big

use anyhow::{Context, Result};
use augur_core::{parse_labels, parse_remove_pattern, parse_set_pattern, AugurConfig, HistoryKey, Outcome};
use augur_matcher::{find_matches, find_matching_predictions, tally};
use augur_store::{GameStore, JsonFileBackend};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

type Store = GameStore<JsonFileBackend>;

#[derive(Parser)]
#[command(name = "augur")]
#[command(author, version, about = "Pattern-based next-result prediction")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Repository root holding .augur/
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration
    Init,

    /// Predict the next result of a game
    Predict {
        /// Game name
        #[arg(long)]
        game: String,

        /// Up to 10 results, oldest first, comma-separated
        #[arg(long)]
        results: Option<String>,

        /// Player id (stores --results, or reads stored results)
        #[arg(long)]
        user: Option<i64>,

        /// App the player is on
        #[arg(long)]
        app: Option<String>,

        /// Show every matching pattern and the vote
        #[arg(long)]
        explain: bool,
    },

    /// Game management
    Games {
        #[command(subcommand)]
        action: GameCommands,
    },

    /// App management
    Apps {
        #[command(subcommand)]
        action: AppCommands,
    },

    /// Pattern management
    Patterns {
        #[command(subcommand)]
        action: PatternCommands,
    },

    /// Player result history
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },
}

#[derive(Subcommand)]
enum GameCommands {
    /// List all games
    List,

    /// Add a game
    Add {
        /// Game name
        name: String,

        /// Cooldown in seconds
        #[arg(long)]
        cooldown: Option<u64>,

        /// Result vocabulary, comma-separated
        #[arg(long)]
        format: Option<String>,
    },

    /// Delete a game
    Delete {
        /// Game name
        name: String,
    },

    /// Set a game's cooldown
    Cooldown {
        /// Game name
        name: String,

        /// Cooldown in seconds
        seconds: u64,
    },
}

#[derive(Subcommand)]
enum AppCommands {
    /// List all apps
    List,

    /// Add an app
    Add {
        /// App name
        name: String,
    },

    /// Delete an app
    Delete {
        /// App name
        name: String,
    },
}

#[derive(Subcommand)]
enum PatternCommands {
    /// List a game's patterns
    List {
        /// Game name
        game: String,
    },

    /// Add or replace a pattern: "GAME [A, B] → X" or "GAME A, B = X"
    Add {
        /// Pattern command text
        text: String,
    },

    /// Remove a pattern: "GAME [A, B]" or "GAME A, B"
    Remove {
        /// Pattern command text
        text: String,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// Show stored results
    Show {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Replace stored results
    Set {
        #[command(flatten)]
        key: KeyArgs,

        /// Up to 10 results, oldest first, comma-separated
        #[arg(long)]
        results: String,
    },

    /// Append a confirmed result (oldest is dropped once 10 are stored)
    Push {
        #[command(flatten)]
        key: KeyArgs,

        /// The result that actually came up
        outcome: String,
    },
}

#[derive(Args)]
struct KeyArgs {
    /// Player id
    #[arg(long)]
    user: i64,

    /// App name
    #[arg(long)]
    app: String,

    /// Game name
    #[arg(long)]
    game: String,
}

impl From<KeyArgs> for HistoryKey {
    fn from(args: KeyArgs) -> Self {
        HistoryKey::new(args.user, args.app, args.game)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Commands::Init = cli.command {
        return cmd_init(&cli.root);
    }

    let config = AugurConfig::load_or_default(&cli.root).context("Failed to load config")?;
    let backend = JsonFileBackend::new(config.data_path(&cli.root));
    let mut store = GameStore::open(backend, config)
        .await
        .context("Failed to open store")?;

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Predict {
            game,
            results,
            user,
            app,
            explain,
        } => cmd_predict(&mut store, game, results, user, app, explain).await,
        Commands::Games { action } => cmd_games(&mut store, action).await,
        Commands::Apps { action } => cmd_apps(&mut store, action).await,
        Commands::Patterns { action } => cmd_patterns(&mut store, action).await,
        Commands::History { action } => cmd_history(&mut store, action).await,
    }
}

fn cmd_init(root: &Path) -> Result<()> {
    let path = AugurConfig::write_default(root).context("Failed to write config")?;
    info!("Initialized Augur in {:?}", root);

    println!("Created {}", path.display());
    Ok(())
}

fn require_app(store: &Store, app: &str) -> Result<()> {
    if !store.apps().iter().any(|a| a == app) {
        anyhow::bail!("Unknown app: {} (known: {})", app, store.apps().join(", "));
    }
    Ok(())
}

async fn cmd_predict(
    store: &mut Store,
    game: String,
    results: Option<String>,
    user: Option<i64>,
    app: Option<String>,
    explain: bool,
) -> Result<()> {
    let key = match (user, app) {
        (Some(user), Some(app)) => {
            require_app(store, &app)?;
            Some(HistoryKey::new(user, app, game.clone()))
        }
        (None, None) => None,
        _ => anyhow::bail!("--user and --app must be given together"),
    };

    let results: Vec<Outcome> = match (results, &key) {
        (Some(text), Some(key)) => {
            let labels = parse_labels(&text)?;
            store.set_history(key.clone(), labels.clone()).await?;
            labels
        }
        (Some(text), None) => parse_labels(&text)?,
        (None, Some(key)) => store
            .history(key)
            .map(|h| h.as_slice().to_vec())
            .filter(|r| !r.is_empty())
            .with_context(|| format!("No results stored for {}; pass --results", key))?,
        (None, None) => anyhow::bail!("Pass --results, or --user and --app to use stored results"),
    };

    let prediction = match &key {
        Some(key) => store.predict(key)?,
        None => store.predict_with(&game, &results)?,
    };

    println!("Results: {}", join(&results));
    if explain {
        print_explanation(store, &game, &results)?;
    }

    match prediction {
        Some(outcome) => println!("Prediction: {}", outcome),
        None => println!("No matching pattern found. Try with different results."),
    }

    Ok(())
}

fn print_explanation(store: &Store, game: &str, results: &[Outcome]) -> Result<()> {
    let patterns = &store
        .game(game)
        .with_context(|| format!("Game not found: {}", game))?
        .patterns;

    let hits = find_matches(patterns, results);
    if hits.is_empty() {
        println!("No pattern matched any window.");
        return Ok(());
    }

    println!("Matches:");
    for hit in &hits {
        println!("  {} at {} -> {}", hit.pattern, hit.offset, hit.outcome);
    }

    println!("Votes:");
    for (outcome, count) in tally(&find_matching_predictions(patterns, results)) {
        println!("  {}: {}", outcome, count);
    }

    Ok(())
}

async fn cmd_games(store: &mut Store, action: GameCommands) -> Result<()> {
    match action {
        GameCommands::List => {
            println!("Games");
            println!("=====");
            for game in store.games() {
                println!(
                    "{} (cooldown {}s, {} patterns): {}",
                    game.name,
                    game.cooldown_secs,
                    game.patterns.len(),
                    join(&game.result_format)
                );
            }
        }

        GameCommands::Add {
            name,
            cooldown,
            format,
        } => {
            let format = format.as_deref().map(parse_labels).transpose()?;
            store.add_game(&name, cooldown, format).await?;
            println!("Added game {}", name);
        }

        GameCommands::Delete { name } => {
            store.delete_game(&name).await?;
            println!("Deleted game {}", name);
        }

        GameCommands::Cooldown { name, seconds } => {
            store.set_cooldown(&name, seconds).await?;
            println!("Cooldown for {} set to {}s", name, seconds);
        }
    }

    Ok(())
}

async fn cmd_apps(store: &mut Store, action: AppCommands) -> Result<()> {
    match action {
        AppCommands::List => {
            for app in store.apps() {
                println!("{}", app);
            }
        }

        AppCommands::Add { name } => {
            store.add_app(&name).await?;
            println!("Added app {}", name);
        }

        AppCommands::Delete { name } => {
            store.delete_app(&name).await?;
            println!("Deleted app {}", name);
        }
    }

    Ok(())
}

async fn cmd_patterns(store: &mut Store, action: PatternCommands) -> Result<()> {
    match action {
        PatternCommands::List { game } => {
            let config = store
                .game(&game)
                .with_context(|| format!("Game not found: {}", game))?;

            if config.patterns.is_empty() {
                println!("No patterns for {}", game);
            }
            for (pattern, outcome) in config.patterns.iter() {
                println!("{} → {}", pattern, outcome);
            }
        }

        PatternCommands::Add { text } => {
            let cmd = parse_set_pattern(&text)?;
            let previous = store
                .add_pattern(&cmd.game, cmd.pattern.clone(), cmd.outcome.clone())
                .await?;

            match previous {
                Some(old) => println!(
                    "Updated {} {}: {} → {}",
                    cmd.game, cmd.pattern, old, cmd.outcome
                ),
                None => println!("Added {} {} → {}", cmd.game, cmd.pattern, cmd.outcome),
            }
        }

        PatternCommands::Remove { text } => {
            let cmd = parse_remove_pattern(&text)?;
            if store.remove_pattern(&cmd.game, &cmd.pattern).await? {
                println!("Removed {} {}", cmd.game, cmd.pattern);
            } else {
                println!("Pattern {} not found in {}", cmd.pattern, cmd.game);
            }
        }
    }

    Ok(())
}

async fn cmd_history(store: &mut Store, action: HistoryCommands) -> Result<()> {
    match action {
        HistoryCommands::Show { key } => {
            let key = HistoryKey::from(key);
            match store.history(&key) {
                Some(history) => println!("{} ({}/10): {}", key, history.len(), history),
                None => println!("{}: No results available", key),
            }
        }

        HistoryCommands::Set { key, results } => {
            let key = HistoryKey::from(key);
            require_app(store, &key.app)?;
            store.set_history(key.clone(), parse_labels(&results)?).await?;
            println!("Stored results for {}", key);
        }

        HistoryCommands::Push { key, outcome } => {
            let key = HistoryKey::from(key);
            let outcome = Outcome::from(outcome.trim());
            if let Some(game) = store.game(&key.game) {
                if !game.knows(&outcome) {
                    anyhow::bail!(
                        "{} is not a {} result (expected one of: {})",
                        outcome,
                        key.game,
                        join(&game.result_format)
                    );
                }
            }

            let history = store.record_result(&key, outcome).await?;
            println!("New results: {}", history);
        }
    }

    Ok(())
}

fn join(labels: &[Outcome]) -> String {
    labels
        .iter()
        .map(Outcome::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
