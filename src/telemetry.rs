use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt};

use crate::config::TelemetrySettings;

static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();
static ACTIVE_LOG_FILE: OnceCell<PathBuf> = OnceCell::new();
static TRACING_INITIALIZED: OnceCell<()> = OnceCell::new();

fn install_subscriber<S>(subscriber: S) -> Result<()>
where
    S: Subscriber + Send + Sync + 'static,
{
    if TRACING_INITIALIZED.get().is_some() {
        return Ok(());
    }

    subscriber::set_global_default(subscriber)?;
    let _ = TRACING_INITIALIZED.set(());
    Ok(())
}

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "pagoda=debug" } else { "pagoda=info" }
}

/// Install the console subscriber, plus a JSON file layer when a log
/// directory is configured.
pub fn init_tracing(service: &str, verbose: bool, telemetry: &TelemetrySettings) -> Result<()> {
    let default_level = default_filter(verbose);
    let make_env_filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match build_log_file_layer(service, telemetry)? {
        Some((writer, guard, path)) => {
            let subscriber = tracing_subscriber::registry()
                .with(make_env_filter())
                .with(fmt::layer().with_target(false))
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true)
                        .with_writer(writer)
                        .with_filter(LevelFilter::DEBUG),
                );
            let _ = LOG_GUARD.set(guard);
            let _ = ACTIVE_LOG_FILE.set(path);
            install_subscriber(subscriber)?;
        }
        None => {
            let subscriber = tracing_subscriber::registry()
                .with(make_env_filter())
                .with(fmt::layer().with_target(false));
            install_subscriber(subscriber)?;
        }
    }

    Ok(())
}

/// JSON log file written by the current process, if any.
pub fn current_log_file() -> Option<&'static PathBuf> {
    ACTIVE_LOG_FILE.get()
}

fn build_log_file_layer(
    service: &str,
    settings: &TelemetrySettings,
) -> Result<Option<(NonBlocking, WorkerGuard, PathBuf)>> {
    let Some(directory) = settings.log_dir.as_deref() else {
        return Ok(None);
    };
    fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let path = log_file_path(service, directory);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    Ok(Some((writer, guard, path)))
}

fn log_file_path(service: &str, directory: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%dT%H%M%S");
    directory.join(format!("{service}-{stamp}-{}.jsonl", std::process::id()))
}
