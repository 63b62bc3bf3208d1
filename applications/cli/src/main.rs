/// Reprise - resume-where-you-left-off progress tracking for local MP3s
use anyhow::Context;
use clap::{Parser, Subcommand};
use reprise_core::{Clock, ManualClock, PlayerConfig, SystemClock};
use reprise_playback::simulated::{ManualTimer, SimulatedEngine};
use reprise_playback::{list_view, HiddenList, PlaybackController, TrackRegistry, ViewMode};
use reprise_storage::{JsonFileBackend, MemoryBackend, ProgressStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod scan;

/// Log filter when `RUST_LOG` is unset; the `reprise` prefix covers every crate
const DEFAULT_LOG_FILTER: &str = "reprise=info";

#[derive(Parser)]
#[command(name = "reprise")]
#[command(about = "Track listening progress for a folder of MP3s", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "REPRISE_CONFIG")]
    config: Option<PathBuf>,

    /// Progress file (overrides `storage_path` from the configuration)
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tracks of a folder with their progress
    List {
        /// Folder to import
        folder: PathBuf,
        /// Show hidden tracks instead of visible ones
        #[arg(long)]
        hidden: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Hide a track from the default list
    Hide {
        /// Track name (file name without extension)
        name: String,
    },
    /// Show a hidden track again
    Unhide {
        /// Track name (file name without extension)
        name: String,
    },
    /// Forget a track's progress and statistics
    Forget {
        /// Track name (file name without extension)
        name: String,
    },
    /// Simulate listening to a track and record the progress
    Listen {
        /// Folder to import
        folder: PathBuf,
        /// Track name (file name without extension)
        name: String,
        /// Seconds of listening to simulate
        #[arg(short, long)]
        seconds: u32,
        /// Start from this position instead of the saved one
        #[arg(short, long)]
        position: Option<f64>,
        /// Track length in seconds (defaults to the stored duration)
        #[arg(short, long)]
        duration: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = PlayerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let store_path = cli.store.clone().unwrap_or_else(|| config.storage_path.clone());
    let store = open_store(&store_path);

    match cli.command {
        Commands::List {
            folder,
            hidden,
            json,
        } => list(&store, &folder, hidden, json)?,
        Commands::Hide { name } => {
            let mut list = HiddenList::load(store.clone());
            list.hide(&name);
            println!("Hidden '{}' ({} hidden)", name, list.hidden_count());
        }
        Commands::Unhide { name } => {
            let mut list = HiddenList::load(store.clone());
            list.unhide(&name);
            println!("Unhidden '{}' ({} hidden)", name, list.hidden_count());
        }
        Commands::Forget { name } => {
            store.remove(&name);
            println!("Forgot '{}'", name);
        }
        Commands::Listen {
            folder,
            name,
            seconds,
            position,
            duration,
        } => listen(&store, config, &folder, &name, seconds, position, duration)?,
    }

    Ok(())
}

/// Open the JSON progress file, or fall back to memory
fn open_store(path: &Path) -> ProgressStore {
    match JsonFileBackend::open(path) {
        Ok(backend) => ProgressStore::new(backend),
        Err(e) => {
            tracing::warn!(
                "Cannot open {} ({}); progress will not be saved",
                path.display(),
                e
            );
            ProgressStore::new(MemoryBackend::new())
        }
    }
}

fn list(store: &ProgressStore, folder: &Path, hidden: bool, json: bool) -> anyhow::Result<()> {
    let registry = TrackRegistry::import(scan::select_folder(folder)?)?;

    let mut hidden_list = HiddenList::load(store.clone());
    if hidden && hidden_list.view_mode() == ViewMode::Visible {
        hidden_list.toggle_view_mode();
    }

    let rows = list_view(&registry, store, &hidden_list, SystemClock.now_ms());

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No tracks to show");
    }
    for row in rows {
        println!(
            "{:>3}  {:<40}  {:<17}  {}",
            row.ordinal,
            row.name,
            row.progress_text.as_deref().unwrap_or("-"),
            row.stats_text.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn listen(
    store: &ProgressStore,
    config: PlayerConfig,
    folder: &Path,
    name: &str,
    seconds: u32,
    position: Option<f64>,
    duration: Option<f64>,
) -> anyhow::Result<()> {
    let registry = TrackRegistry::import(scan::select_folder(folder)?)?;
    let ordinal = registry
        .position_of(name)
        .with_context(|| format!("No track named '{}' in {}", name, folder.display()))?;

    let duration = duration
        .or_else(|| store.get(name).and_then(|record| record.duration))
        .context("Track length unknown; pass --duration")?;

    let engine = SimulatedEngine::new();
    for track in registry.iter() {
        if track.name == name {
            engine.register(track.source.clone(), duration);
        }
    }
    let timer = ManualTimer::new();
    let clock = ManualClock::new(SystemClock.now_ms());
    let autosave_every = config.autosave_interval_secs.max(1);

    let mut controller = PlaybackController::new(registry, store.clone(), engine.clone(), config)
        .with_clock(clock.clone())
        .with_timer(timer.clone());

    controller.activate(ordinal)?;
    if let Some(position) = position {
        controller.seek(position);
    }
    tracing::info!(
        "Listening to '{}' from {:.0}s for {}s",
        name,
        controller.position(),
        seconds
    );

    for second in 1..=seconds {
        clock.advance_secs(1.0);
        if engine.advance(1.0) {
            controller.on_track_ended();
            break;
        }
        if u64::from(second) % autosave_every == 0 {
            if let Some(token) = timer.token() {
                controller.on_autosave_tick(token);
            }
        }
    }

    // Stop wherever playback ended up (auto-advance may have moved on)
    controller.deactivate_for_navigation_away();

    let record = store.get(name).unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
