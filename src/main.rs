//! `showcase` binary: parse flags, set up file logging, load the catalog, run the TUI.

use std::path::PathBuf;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use showcase::catalog::Catalog;
use showcase::config::{self, Settings};
use showcase::state::StrategyKind;

/// Browse a catalog of samples and fetch their resources on demand.
#[derive(Debug, Parser)]
#[command(name = "showcase", version, about)]
struct Args {
    /// Manifest (JSON) listing the samples.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,
    /// Directory holding one bundle directory per resource tag.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,
    /// Directory bundles are installed into.
    #[arg(long, value_name = "DIR")]
    cache: Option<PathBuf>,
    /// Start with fuzzy matching instead of substring matching.
    #[arg(long)]
    fuzzy: bool,
    /// Log filter (e.g. `debug`, `showcase=trace`); `RUST_LOG` wins when set.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Args {
    /// Layer command-line flags over the file settings.
    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(p) = self.manifest {
            settings.manifest_path = Some(p);
        }
        if let Some(p) = self.assets {
            settings.assets_dir = Some(p);
        }
        if let Some(p) = self.cache {
            settings.cache_dir = Some(p);
        }
        if self.fuzzy {
            settings.match_strategy = StrategyKind::Fuzzy;
        }
        if let Some(level) = self.log_level {
            settings.log_level = level;
        }
        settings
    }
}

type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

/// What: Install the file logger before anything else can log.
///
/// Inputs:
/// - `level`: Provisional filter (CLI flag or `info`) until settings are known.
///
/// Output:
/// - Writer guard to keep alive, and a handle to swap the filter later.
fn init_logging(level: &str) -> (WorkerGuard, LogFilterHandle) {
    let file_appender = tracing_appender::rolling::daily(config::logs_dir(), "showcase.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(level));
    let (filter, handle) = reload::Layer::new(env_filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    (guard, handle)
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Swap in the filter for `level`; returns `false` when the subscriber is gone.
fn apply_log_level<S>(handle: &reload::Handle<EnvFilter, S>, level: &str) -> bool {
    handle.reload(level_filter(level)).is_ok()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let (_guard, log_filter) = init_logging(args.log_level.as_deref().unwrap_or("info"));
    let settings = args.apply(config::settings());
    if std::env::var_os("RUST_LOG").is_none() && !apply_log_level(&log_filter, &settings.log_level)
    {
        tracing::warn!(level = %settings.log_level, "could not apply log level");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "showcase starting");

    let manifest = settings
        .manifest_path
        .clone()
        .unwrap_or_else(|| config::config_dir().join("catalog.json"));
    let catalog = match Catalog::load(&manifest) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(path = %manifest.display(), error = %e, "failed to load catalog");
            return Err(e.into());
        }
    };

    showcase::app::run(settings, catalog).await
}
