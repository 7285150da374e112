//! Paramscope - passive API-traffic inspector
//!
//! Main entry point for the paramscope CLI.

mod cli;
mod cmd_replay;
mod cmd_watch;
mod command;
mod render;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use paramscope_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig, ValidationResult};

use cli::{Cli, Commands};

/// Config file looked up in the working directory.
const LOCAL_CONFIG: &str = "paramscope.toml";

/// Get the paramscope home directory (~/.paramscope).
fn paramscope_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".paramscope"))
        .unwrap_or_else(|| PathBuf::from(".paramscope"))
}

/// Explicit path, else `./paramscope.toml`, else `~/.paramscope/config.toml`.
fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return local;
    }
    paramscope_dir().join("config.toml")
}

/// Initialize tracing with console and optional file output.
///
/// Console output goes to stderr so it never interleaves with the inspector's
/// own stdout. With `[logging] dir` set, logs are also written there with
/// daily rotation.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr);

    let file = match &logging.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("paramscope")
                .filename_suffix("log")
                .max_log_files(14)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the writer alive for the program duration.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

fn report(path: &Path, result: &ValidationResult) {
    for warning in &result.warnings {
        warn!("{}: {}: {}", path.display(), warning.path, warning.message);
    }
    for err in &result.errors {
        error!("{}: {}: {}", path.display(), err.path, err.message);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let path = config_path(cli.config);
    let config: Config = ConfigLoader::load_or_default(&path)?;

    init_tracing(&config.logging)?;

    let validation = ConfigValidator::validate(&config);

    if let Commands::CheckConfig = cli.command {
        return check_config(&path, &validation);
    }

    report(&path, &validation);
    if let Some(err) = validation.into_error() {
        return Err(err.into());
    }

    match cli.command {
        Commands::Watch { endpoint, target } => {
            cmd_watch::run_watch(&config, endpoint, target).await
        }
        Commands::Replay {
            file,
            search,
            select,
        } => cmd_replay::run_replay(&file, search, select).await,
        Commands::CheckConfig => Ok(()),
    }
}

fn check_config(
    path: &Path,
    validation: &ValidationResult,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };
    println!("Config: {}", source);

    for warning in &validation.warnings {
        println!("  warning: {}: {}", warning.path, warning.message);
    }
    for err in &validation.errors {
        println!("  error:   {}: {}", err.path, err.message);
    }

    if validation.is_valid() {
        println!("OK");
        Ok(())
    } else {
        Err(format!("{} error(s) in configuration", validation.errors.len()).into())
    }
}
