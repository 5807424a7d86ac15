//! Global test utilities: environment locks and scripted collaborators.

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(test)]
use tokio_util::sync::CancellationToken;

#[cfg(test)]
use crate::logic::DetailPresenter;
#[cfg(test)]
use crate::resources::{FetchError, ProgressSender, ResourceProvider};
#[cfg(test)]
use crate::state::Sample;

#[cfg(test)]
/// Global mutex for tests that modify the HOME environment variable.
///
/// Since `std::env::set_var` affects the entire process, all tests that
/// modify HOME must serialize their execution using this mutex.
static HOME_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

#[cfg(test)]
/// Acquire the global HOME mutex to safely modify HOME environment variable.
///
/// Details:
/// - Automatically recovers from poisoned mutex (from panicked tests).
pub fn lock_home_mutex() -> std::sync::MutexGuard<'static, ()> {
    HOME_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
/// Build a sample whose id is derived from its name.
pub fn sample(name: &str, deps: &[&str]) -> Sample {
    Sample {
        name: name.to_string(),
        description: format!("{name} description"),
        id: name.to_lowercase().replace(' ', "-"),
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
        readme: None,
        category: None,
    }
}

#[cfg(test)]
/// What a [`ScriptedProvider`] answers to `check_available`.
#[derive(Debug, Clone, Copy)]
pub enum Availability {
    Present,
    Missing,
    CheckFails,
}

#[cfg(test)]
/// How a [`ScriptedProvider`] download ends.
#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed,
    Fail(String),
    /// Park until the cancellation token fires.
    WaitForCancel,
}

#[cfg(test)]
/// Resource provider double with canned answers and call counters.
#[derive(Debug)]
pub struct ScriptedProvider {
    availability: Availability,
    outcome: Outcome,
    progress: Vec<f64>,
    checks: AtomicUsize,
    downloads: AtomicUsize,
}

#[cfg(test)]
impl ScriptedProvider {
    pub fn new(availability: Availability, outcome: Outcome) -> Self {
        Self {
            availability,
            outcome,
            progress: Vec::new(),
            checks: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
        }
    }

    /// Progress values sent before the outcome is applied.
    pub fn with_progress(mut self, steps: Vec<f64>) -> Self {
        self.progress = steps;
        self
    }

    pub fn check_calls(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl ResourceProvider for ScriptedProvider {
    async fn check_available(&self, _tags: &[String]) -> Result<bool, FetchError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        match self.availability {
            Availability::Present => Ok(true),
            Availability::Missing => Ok(false),
            Availability::CheckFails => Err(FetchError::DownloadFailed("probe failed".into())),
        }
    }

    async fn download(
        &self,
        _tags: &[String],
        progress: ProgressSender,
        cancel: CancellationToken,
    ) -> Result<(), FetchError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        for p in &self.progress {
            let _ = progress.send(*p);
        }
        match &self.outcome {
            Outcome::Succeed => Ok(()),
            Outcome::Fail(msg) => Err(FetchError::DownloadFailed(msg.clone())),
            Outcome::WaitForCancel => {
                cancel.cancelled().await;
                Err(FetchError::DownloadCancelled)
            }
        }
    }
}

#[cfg(test)]
/// Presenter double recording every signal it receives.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub shown: Vec<String>,
    pub alerts: Vec<String>,
}

#[cfg(test)]
impl DetailPresenter for RecordingPresenter {
    fn show(&mut self, sample: &Sample) {
        self.shown.push(sample.id.clone());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
