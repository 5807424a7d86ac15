//! Asset bundle providers used to make a sample's dependencies available.
//!
//! The browser only talks to the [`ResourceProvider`] trait; the shipped
//! implementation installs bundles from a local directory into a cache.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

mod local;

pub use local::LocalBundleProvider;

/// Channel on which providers report fractional download progress (`0.0..=1.0`).
pub type ProgressSender = mpsc::UnboundedSender<f64>;

/// Ways a resource request can end without the assets becoming available.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transfer or install failed; the message is shown to the user.
    #[error("Download failed: {0}")]
    DownloadFailed(String),
    /// The user cancelled the request. Never surfaced as an error.
    #[error("Download cancelled")]
    DownloadCancelled,
    /// No bundle exists for the requested tag.
    #[error("No resources found for tag '{0}'")]
    NotFound(String),
}

impl FetchError {
    /// Whether this outcome is a silent user cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::DownloadCancelled)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::DownloadFailed(e.to_string())
    }
}

/// What: Capability set of an on-demand asset facility.
///
/// Details:
/// - `check_available` must not mutate anything; it only reports presence.
/// - `download` reports progress on `progress` and must observe `cancel`
///   cooperatively, returning [`FetchError::DownloadCancelled`] and leaving
///   no partially installed bundle behind when it fires.
#[async_trait::async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Report whether every bundle named by `tags` is already installed.
    async fn check_available(&self, tags: &[String]) -> Result<bool, FetchError>;

    /// Install every missing bundle named by `tags`.
    async fn download(
        &self,
        tags: &[String],
        progress: ProgressSender,
        cancel: CancellationToken,
    ) -> Result<(), FetchError>;
}
