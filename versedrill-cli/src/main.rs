//! versedrill CLI: import songs, generate lessons, answer and score them.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use versedrill_core::{CoreError, DrillConfig, LessonService, LoggingConfig, SqliteStore};

mod commands;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "versedrill", version, about = "Practice a language through song lyrics")]
struct Cli {
    /// Config file path (default: ~/.config/versedrill/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a song from a plain text or LRC lyrics file
    Import {
        #[arg(long)]
        title: String,

        #[arg(long)]
        artist: String,

        /// Lyrics file
        #[arg(long)]
        lyrics: PathBuf,
    },

    /// List imported songs
    Songs,

    /// Generate a lesson from a random song
    Lesson {
        /// Learner id
        #[arg(long)]
        user: String,
    },

    /// Submit an answer for one lesson item
    Answer {
        #[arg(long)]
        lesson: String,

        /// Item index within the lesson
        #[arg(long)]
        item: usize,

        /// Declared exercise type: fillblanks or arrange
        #[arg(long, default_value = "fillblanks")]
        kind: String,

        /// Submitted text
        #[arg(long, default_value = "")]
        input: String,
    },

    /// Score a lesson
    Summary {
        #[arg(long)]
        lesson: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Load config before tracing so the log settings apply from the start
    let (config, created_template) = match load_config(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(CoreError::ConfigNotFound { path }) => (DrillConfig::default(), Some(path)),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    init_tracing(&config.logging);

    if let Some(path) = created_template {
        info!(
            "Created config template at {}, using defaults",
            path.display()
        );
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            process::exit(1);
        }
    };

    // Create shared cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    let ctrlc_token = cancel_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, cancelling...");
        ctrlc_token.cancel();
    }) {
        warn!("Failed to set Ctrl+C handler: {}", e);
    }

    let database_path = cli
        .database
        .unwrap_or_else(|| config.storage.database_path());

    let timeout = config.storage.timeout();
    let result = runtime.block_on(execute(cli.command, &database_path, timeout, &cancel_token));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}

/// Open the store, run one command and checkpoint before returning
async fn execute(
    command: Commands,
    database_path: &Path,
    timeout: Duration,
    cancel_token: &CancellationToken,
) -> Result<(), CliError> {
    let store = SqliteStore::open(database_path)
        .await
        .map_err(|source| CoreError::storage("open", source))?;
    let store = Arc::new(store);
    let service = LessonService::with_store(store.clone()).with_timeout(timeout);

    let outcome = tokio::select! {
        () = cancel_token.cancelled() => Err(CliError::Interrupted),
        result = run(command, &service) => result,
    };

    if let Err(e) = store.checkpoint().await {
        warn!("Failed to checkpoint database: {}", e);
    }
    outcome
}

async fn run(command: Commands, service: &LessonService) -> Result<(), CliError> {
    match command {
        Commands::Import {
            title,
            artist,
            lyrics,
        } => commands::import::execute(service, &title, &artist, &lyrics).await,
        Commands::Songs => commands::songs::execute(service).await,
        Commands::Lesson { user } => commands::lesson::execute(service, &user).await,
        Commands::Answer {
            lesson,
            item,
            kind,
            input,
        } => commands::answer::execute(service, &lesson, item, &kind, input).await,
        Commands::Summary { lesson } => commands::summary::execute(service, &lesson).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<DrillConfig, CoreError> {
    match path {
        Some(path) => DrillConfig::load_from(path),
        None => DrillConfig::load_or_create(),
    }
}

/// Initialize tracing on stderr with optional file logging
fn init_tracing(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // Keep stdout for command output
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if logging.file_enabled {
        let log_path = versedrill_core::paths::log_file_path();

        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
