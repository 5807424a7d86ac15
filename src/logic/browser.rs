//! Sample browser list: query, displayed list, expansion, selection, and the
//! single active resource request.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::fetch::{FetchEvent, FetchEventKind, FetchHandle, spawn_fetch};
use super::filter::{MatchStrategy, filter_indices, strategy_for};
use super::presenter::DetailPresenter;
use crate::resources::{FetchError, ResourceProvider};
use crate::state::{FetchPhase, FetchToken, Sample, StrategyKind};

/// State of the searchable sample list.
///
/// All mutation goes through the public operations below; the struct is owned
/// by the UI loop and never shared across threads.
pub struct SampleBrowser {
    /// Full catalog in manifest order.
    samples: Vec<Sample>,
    /// Current (raw) query text.
    query: String,
    /// Catalog indices currently displayed.
    displayed: Vec<usize>,
    /// Displayed-list positions whose detail row is expanded.
    expanded: BTreeSet<usize>,
    /// Highlighted displayed-list position.
    cursor: usize,
    /// Catalog index of the selected sample.
    selected: Option<usize>,
    /// Phase of the latest resource request.
    phase: FetchPhase,
    strategy: Box<dyn MatchStrategy>,
    provider: Arc<dyn ResourceProvider>,
    events_tx: mpsc::UnboundedSender<FetchEvent>,
    /// The one in-flight request, if any.
    active: Option<FetchHandle>,
    next_token: u64,
}

impl std::fmt::Debug for SampleBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleBrowser")
            .field("samples", &self.samples.len())
            .field("query", &self.query)
            .field("displayed", &self.displayed)
            .field("expanded", &self.expanded)
            .field("cursor", &self.cursor)
            .field("selected", &self.selected)
            .field("phase", &self.phase)
            .field("strategy", &self.strategy.kind())
            .field("active", &self.active.as_ref().map(FetchHandle::token))
            .finish()
    }
}

impl SampleBrowser {
    /// What: Create a browser over `samples` showing the full catalog.
    ///
    /// Inputs:
    /// - `samples`: Catalog in manifest order.
    /// - `provider`: Resource facility used for samples with dependencies.
    /// - `events_tx`: Sender side of the channel the UI loop drains into
    ///   [`SampleBrowser::apply_fetch_event`].
    pub fn new(
        samples: Vec<Sample>,
        provider: Arc<dyn ResourceProvider>,
        events_tx: mpsc::UnboundedSender<FetchEvent>,
    ) -> Self {
        let displayed = (0..samples.len()).collect();
        Self {
            samples,
            query: String::new(),
            displayed,
            expanded: BTreeSet::new(),
            cursor: 0,
            selected: None,
            phase: FetchPhase::Idle,
            strategy: strategy_for(StrategyKind::default()),
            provider,
            events_tx,
            active: None,
            next_token: 1,
        }
    }

    pub fn with_strategy(mut self, kind: StrategyKind) -> Self {
        self.set_strategy(kind);
        self
    }

    /// Swap the match strategy and re-apply the current query.
    pub fn set_strategy(&mut self, kind: StrategyKind) {
        if self.strategy.kind() == kind {
            return;
        }
        self.strategy = strategy_for(kind);
        tracing::debug!(strategy = kind.as_config_key(), "match strategy changed");
        self.refilter();
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// What: Update the query and recompute the displayed list.
    ///
    /// Inputs:
    /// - `query`: Raw search text; empty or whitespace shows the whole catalog.
    ///
    /// Details:
    /// - Expansion state survives when the new list is identical to the old one,
    ///   and is cleared otherwise since positions would name different samples.
    /// - The cursor is clamped into the new list.
    pub fn set_query(&mut self, query: &str) {
        if self.query == query {
            return;
        }
        self.query = query.to_string();
        self.refilter();
    }

    fn refilter(&mut self) {
        let next = filter_indices(&self.samples, &self.query, self.strategy.as_ref());
        if next != self.displayed {
            self.expanded.clear();
            self.displayed = next;
        }
        if self.displayed.is_empty() {
            tracing::debug!(query = %self.query, "no results found");
            self.cursor = 0;
        } else if self.cursor >= self.displayed.len() {
            self.cursor = self.displayed.len() - 1;
        }
    }

    /// What: Select the sample at a displayed-list position.
    ///
    /// Inputs:
    /// - `index`: Position in the displayed list; out-of-range positions are ignored.
    /// - `presenter`: Receives `show` immediately for samples without dependencies.
    ///
    /// Details:
    /// - Any in-flight request is cancelled first; its late events become stale.
    /// - Samples with dependency tags start a new request in `Checking`.
    pub fn select_sample(&mut self, index: usize, presenter: &mut dyn DetailPresenter) {
        let Some(&catalog_idx) = self.displayed.get(index) else {
            tracing::debug!(index, len = self.displayed.len(), "select out of range");
            return;
        };
        self.cancel_active();
        self.cursor = index;
        self.selected = Some(catalog_idx);
        let sample = &self.samples[catalog_idx];

        if !sample.has_dependencies() {
            tracing::info!(sample = %sample.id, "sample ready (no dependencies)");
            self.phase = FetchPhase::Ready;
            presenter.show(sample);
            return;
        }

        let token = FetchToken(self.next_token);
        self.next_token += 1;
        tracing::info!(
            sample = %sample.id,
            %token,
            tags = ?sample.dependencies,
            "requesting sample resources"
        );
        self.phase = FetchPhase::Checking;
        self.active = Some(spawn_fetch(
            token,
            sample.dependencies.clone(),
            Arc::clone(&self.provider),
            self.events_tx.clone(),
        ));
    }

    /// Flip whether the row at displayed position `index` is expanded.
    pub fn toggle_expansion(&mut self, index: usize) {
        if index >= self.displayed.len() {
            return;
        }
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
    }

    /// What: Drop the selection, cancelling any in-flight request.
    ///
    /// Details:
    /// - Idempotent; the phase returns to `Idle`.
    pub fn clear_selection(&mut self) {
        self.cancel_active();
        self.selected = None;
        self.phase = FetchPhase::Idle;
    }

    /// What: User-initiated cancel of the in-flight request.
    ///
    /// Output:
    /// - `true` if a request was cancelled; `false` when nothing was in flight.
    ///
    /// Details:
    /// - Silent: phase becomes `Cancelled`, the selection is cleared, nothing is alerted.
    pub fn cancel_fetch(&mut self) -> bool {
        if self.active.is_none() {
            return false;
        }
        self.cancel_active();
        self.selected = None;
        self.phase = FetchPhase::Cancelled;
        true
    }

    fn cancel_active(&mut self) {
        if let Some(handle) = self.active.take() {
            tracing::info!(
                token = %handle.token(),
                finished = handle.is_finished(),
                "cancelling resource request"
            );
            handle.cancel();
        }
    }

    /// What: Apply an event from a fetch task.
    ///
    /// Inputs:
    /// - `event`: Message received from the fetch channel.
    /// - `presenter`: Receives `show` on success and `alert` on failure.
    ///
    /// Output:
    /// - `true` when the event belonged to the active request and was applied;
    ///   `false` when it was stale and dropped.
    pub fn apply_fetch_event(
        &mut self,
        event: FetchEvent,
        presenter: &mut dyn DetailPresenter,
    ) -> bool {
        let active = self.active.as_ref().map(FetchHandle::token);
        if active != Some(event.token) {
            tracing::debug!(token = %event.token, ?active, "dropping stale fetch event");
            return false;
        }
        match event.kind {
            FetchEventKind::Availability(true) => {
                self.phase = FetchPhase::AlreadyAvailable;
            }
            FetchEventKind::Availability(false) => {
                self.phase = FetchPhase::Downloading { progress: 0.0 };
            }
            FetchEventKind::Progress(p) => {
                if let FetchPhase::Downloading { progress } = &mut self.phase {
                    let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
                    if p > *progress {
                        *progress = p;
                    }
                }
            }
            FetchEventKind::Finished(result) => {
                self.active = None;
                self.finish(result, presenter);
            }
        }
        true
    }

    fn finish(&mut self, result: Result<(), FetchError>, presenter: &mut dyn DetailPresenter) {
        match result {
            Ok(()) => {
                self.phase = FetchPhase::Ready;
                if let Some(sample) = self.selected.and_then(|i| self.samples.get(i)) {
                    tracing::info!(sample = %sample.id, "sample resources ready");
                    presenter.show(sample);
                }
            }
            Err(FetchError::DownloadCancelled) => {
                self.selected = None;
                self.phase = FetchPhase::Cancelled;
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "sample resources unavailable");
                self.selected = None;
                self.phase = FetchPhase::Failed {
                    message: message.clone(),
                };
                presenter.alert(&message);
            }
        }
    }

    /// Move the cursor by `delta` rows, clamped to the displayed list.
    pub fn move_cursor(&mut self, delta: isize) {
        if self.displayed.is_empty() {
            self.cursor = 0;
            return;
        }
        let max = self.displayed.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Samples in displayed order.
    pub fn displayed(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.displayed.iter().map(|&i| &self.samples[i])
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    pub fn selected(&self) -> Option<&Sample> {
        self.selected.and_then(|i| self.samples.get(i))
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    pub fn expanded(&self) -> &BTreeSet<usize> {
        &self.expanded
    }

    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    /// Token of the in-flight request, if one is active.
    pub fn active_token(&self) -> Option<FetchToken> {
        self.active.as_ref().map(FetchHandle::token)
    }
}
