use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use swipe_snake::auth::{IdentityService, UserId};
use swipe_snake::game::{GameConfig, GameEngine};
use swipe_snake::modes::PlayMode;
use swipe_snake::store::{JsonFileStore, MemoryStore, ScoreStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swipe_snake")]
#[command(version, about = "Snake with swipe controls and per-user score records")]
struct Cli {
    /// Front end to start
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// JSON file overriding game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start already signed in as this user id
    #[arg(long)]
    user: Option<String>,

    /// Directory for score records (kept in memory when omitted)
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Log file; the terminal belongs to the game
    #[arg(long, default_value = "swipe_snake.log")]
    log_file: PathBuf,

    /// Tick interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play in the terminal; drag with the mouse or use the keyboard
    Play,
}

fn init_logging(path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(interval_ms) = cli.interval_ms {
        config.tick_interval_ms = interval_ms;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = load_config(&cli)?;
    tracing::info!(
        bounds = ?config.bounds,
        tick_interval_ms = config.tick_interval_ms,
        guard_reversals = config.guard_reversals,
        "configuration loaded"
    );

    let store: Arc<dyn ScoreStore> = match &cli.store_dir {
        Some(dir) => Arc::new(JsonFileStore::new(dir)),
        None => Arc::new(MemoryStore::new()),
    };
    tracing::info!(store = %store.describe(), "score store ready");

    let session = cli.user.as_deref().map(UserId::new).transpose()?;
    let identity = Arc::new(IdentityService::new());
    {
        // Initial session check runs off the UI path; the gate shows a spinner meanwhile.
        let identity = Arc::clone(&identity);
        tokio::spawn(async move { identity.resolve_initial(session) });
    }

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };

    match cli.mode {
        Mode::Play => {
            let mut play_mode = PlayMode::new(engine, identity, store);
            play_mode.run().await?;
        }
    }

    Ok(())
}
