//! On-demand resource fetch driver.
//!
//! A request runs on its own tokio task and reports back to the UI loop as
//! [`FetchEvent`]s tagged with the request's [`FetchToken`]. The UI loop is the
//! only place state changes; it drops events whose token is no longer active.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::resources::{FetchError, ResourceProvider};
use crate::state::FetchToken;

/// Message from a fetch task to the UI loop.
#[derive(Debug)]
pub struct FetchEvent {
    /// Request this event belongs to.
    pub token: FetchToken,
    pub kind: FetchEventKind,
}

#[derive(Debug)]
pub enum FetchEventKind {
    /// Result of the availability check (`true` = already present).
    Availability(bool),
    /// Fractional download progress.
    Progress(f64),
    /// Terminal outcome of the request.
    Finished(Result<(), FetchError>),
}

impl FetchEvent {
    pub fn new(token: FetchToken, kind: FetchEventKind) -> Self {
        Self { token, kind }
    }
}

/// What: Handle to an in-flight request owned by the browser.
///
/// Details:
/// - `cancel` only signals; the task notices cooperatively, cleans up, and still
///   sends a `Finished(Err(DownloadCancelled))` which the browser then ignores.
#[derive(Debug)]
pub struct FetchHandle {
    token: FetchToken,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl FetchHandle {
    pub fn token(&self) -> FetchToken {
        self.token
    }

    /// Signal cancellation to the task and the provider.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// What: Start a resource request for `tags` on a background task.
///
/// Inputs:
/// - `token`: Identity stamped on every event of this request.
/// - `tags`: Dependency tags of the selected sample.
/// - `provider`: Resource facility to query and download from.
/// - `events_tx`: Channel drained by the UI loop.
///
/// Output:
/// - `FetchHandle` used to cancel the request.
///
/// Details:
/// - Must be called from within a tokio runtime.
pub fn spawn_fetch(
    token: FetchToken,
    tags: Vec<String>,
    provider: Arc<dyn ResourceProvider>,
    events_tx: mpsc::UnboundedSender<FetchEvent>,
) -> FetchHandle {
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();
    let task = tokio::spawn(async move {
        let outcome = run_fetch(token, &tags, provider.as_ref(), &events_tx, &task_cancel).await;
        match &outcome {
            Ok(()) => tracing::debug!(%token, "fetch completed"),
            Err(e) if e.is_cancelled() => tracing::debug!(%token, "fetch cancelled"),
            Err(e) => tracing::warn!(%token, error = %e, "fetch failed"),
        }
        let _ = events_tx.send(FetchEvent::new(token, FetchEventKind::Finished(outcome)));
    });
    FetchHandle {
        token,
        cancel,
        task,
    }
}

/// What: Drive one request through check and (if needed) download.
///
/// Output:
/// - Terminal outcome; intermediate events are sent on `events_tx` as they happen.
///
/// Details:
/// - A failing availability check is logged and treated as "not present" so a
///   download is still attempted.
/// - Cancellation wins over a download that completes after the signal.
async fn run_fetch(
    token: FetchToken,
    tags: &[String],
    provider: &dyn ResourceProvider,
    events_tx: &mpsc::UnboundedSender<FetchEvent>,
    cancel: &CancellationToken,
) -> Result<(), FetchError> {
    let available = tokio::select! {
        _ = cancel.cancelled() => return Err(FetchError::DownloadCancelled),
        checked = provider.check_available(tags) => match checked {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(%token, error = %e, "availability check failed; downloading");
                false
            }
        },
    };
    let _ = events_tx.send(FetchEvent::new(token, FetchEventKind::Availability(available)));
    if available {
        return Ok(());
    }

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<f64>();
    let download = provider.download(tags, progress_tx, cancel.clone());
    tokio::pin!(download);
    let result = loop {
        tokio::select! {
            biased;
            Some(p) = progress_rx.recv() => {
                let _ = events_tx.send(FetchEvent::new(token, FetchEventKind::Progress(p)));
            }
            r = &mut download => break r,
        }
    };
    while let Ok(p) = progress_rx.try_recv() {
        let _ = events_tx.send(FetchEvent::new(token, FetchEventKind::Progress(p)));
    }
    if cancel.is_cancelled() {
        return Err(FetchError::DownloadCancelled);
    }
    result
}
