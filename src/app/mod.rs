//! Terminal application runtime: wiring, input reader, and the main loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::Event as CEvent;
use tokio::sync::mpsc;

use crate::catalog::Catalog;
use crate::config::{self, Settings};
use crate::events::handle_event;
use crate::logic::{FetchEvent, SampleBrowser};
use crate::resources::LocalBundleProvider;
use crate::state::{AppState, DetailView, ReadmeLoaded};

mod terminal;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Interval for toast expiry checks.
const TICK: Duration = Duration::from_millis(250);
/// How long the input reader blocks in `poll` before checking for shutdown.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// What: Build the initial [`AppState`] from settings and a loaded catalog.
///
/// Inputs:
/// - `settings`: Effective settings (file plus CLI overrides)
/// - `catalog`: Validated sample catalog
/// - `events_tx`: Sender the fetch tasks report through
/// - `readme_tx`: Sender readmes are delivered on once loaded
///
/// Details:
/// - Bundles are installed from `assets_dir` (default `<config>/assets`) into
///   `cache_dir` (default `<config>/cache`).
pub fn build_state(
    settings: &Settings,
    catalog: Catalog,
    events_tx: mpsc::UnboundedSender<FetchEvent>,
    readme_tx: mpsc::UnboundedSender<ReadmeLoaded>,
) -> AppState {
    let assets: PathBuf = settings
        .assets_dir
        .clone()
        .unwrap_or_else(|| config::config_dir().join("assets"));
    let cache: PathBuf = settings.cache_dir.clone().unwrap_or_else(config::cache_dir);
    tracing::info!(
        assets = %assets.display(),
        cache = %cache.display(),
        samples = catalog.len(),
        "initialising browser"
    );
    let provider = Arc::new(
        LocalBundleProvider::new(assets, cache).with_chunk_size(settings.download_chunk_size),
    );
    let detail = DetailView::new(catalog.base_dir()).with_readme_loader(readme_tx);
    let browser = SampleBrowser::new(catalog.into_samples(), provider, events_tx)
        .with_strategy(settings.match_strategy);
    let mut app = AppState::new(browser, detail);
    app.show_descriptions = settings.show_descriptions;
    app
}

/// What: Run the interactive browser until the user quits.
///
/// Details:
/// - The terminal is always restored, even when the loop fails.
/// - Any in-flight download is cancelled on exit.
pub async fn run(settings: Settings, catalog: Catalog) -> Result<()> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<FetchEvent>();
    let (readme_tx, mut readme_rx) = mpsc::unbounded_channel::<ReadmeLoaded>();
    let mut app = build_state(&settings, catalog, events_tx, readme_tx);

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<CEvent>();
    let reader = spawn_input_reader(input_tx);

    let mut term = terminal::init_terminal()?;
    let mut channels = LoopChannels {
        input: &mut input_rx,
        fetch: &mut events_rx,
        readme: &mut readme_rx,
    };
    let result = run_loop(&mut term, &mut app, &mut channels).await;
    app.browser.clear_selection();
    if let Err(e) = terminal::restore_terminal(&mut term) {
        tracing::warn!(error = %e, "failed to restore terminal");
    }

    // Closing the receiver stops the reader at its next poll.
    drop(input_rx);
    let _ = reader.await;
    tracing::info!("exited");
    result
}

/// Receivers drained by the UI loop.
struct LoopChannels<'a> {
    input: &'a mut mpsc::UnboundedReceiver<CEvent>,
    fetch: &'a mut mpsc::UnboundedReceiver<FetchEvent>,
    readme: &'a mut mpsc::UnboundedReceiver<ReadmeLoaded>,
}

async fn run_loop(
    term: &mut terminal::Term,
    app: &mut AppState,
    rx: &mut LoopChannels<'_>,
) -> Result<()> {
    let mut tick = tokio::time::interval(TICK);
    loop {
        term.draw(|f| crate::ui::draw(f, app))?;
        tokio::select! {
            ev = rx.input.recv() => {
                let Some(ev) = ev else {
                    tracing::warn!("input reader stopped");
                    return Ok(());
                };
                if handle_event(ev, app) {
                    return Ok(());
                }
            }
            Some(ev) = rx.fetch.recv() => {
                if app.browser.apply_fetch_event(ev, &mut app.detail) {
                    app.sync_list_state();
                }
            }
            Some(loaded) = rx.readme.recv() => {
                app.detail.apply_readme(loaded);
            }
            _ = tick.tick() => {
                app.expire_toast(Instant::now());
            }
        }
    }
}

/// What: Forward crossterm events from a blocking thread.
///
/// Details:
/// - Stops when the receiver is dropped or reading from the terminal fails.
fn spawn_input_reader(tx: mpsc::UnboundedSender<CEvent>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            match crossterm::event::poll(INPUT_POLL) {
                Ok(true) => match crossterm::event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "terminal read failed");
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "terminal poll failed");
                    break;
                }
            }
        }
    })
}
