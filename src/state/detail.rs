//! Detail presenter backing the terminal UI.

use std::io::Read;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use crate::catalog::readme_path;
use crate::logic::DetailPresenter;
use crate::state::{Modal, Sample};

/// Readmes larger than this are truncated when shown.
const MAX_README_BYTES: usize = 256 * 1024;

/// Readme text loaded off the UI loop for a presented sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeLoaded {
    /// Sample the text belongs to.
    pub sample_id: String,
    pub body: String,
}

/// What: Presenter that turns browser signals into modal overlays.
///
/// Details:
/// - `show` opens the detail screen with the description right away; when the
///   sample has a readme and a loader channel is attached, the file is read on
///   the blocking pool and delivered as a [`ReadmeLoaded`] for
///   [`DetailView::apply_readme`].
#[derive(Debug, Default)]
pub struct DetailView {
    /// Current overlay.
    pub modal: Modal,
    /// Directory readme references resolve against.
    readme_base: PathBuf,
    readme_tx: Option<mpsc::UnboundedSender<ReadmeLoaded>>,
}

impl DetailView {
    pub fn new(readme_base: impl Into<PathBuf>) -> Self {
        Self {
            modal: Modal::None,
            readme_base: readme_base.into(),
            readme_tx: None,
        }
    }

    /// Deliver loaded readmes on `tx`; without it only descriptions are shown.
    pub fn with_readme_loader(mut self, tx: mpsc::UnboundedSender<ReadmeLoaded>) -> Self {
        self.readme_tx = Some(tx);
        self
    }

    /// Close whatever overlay is open.
    pub fn dismiss(&mut self) {
        self.modal = Modal::None;
    }

    pub fn is_showing_detail(&self) -> bool {
        matches!(self.modal, Modal::Detail { .. })
    }

    /// Scroll the detail body by `delta` lines; no-op for other overlays.
    pub fn scroll(&mut self, delta: i32) {
        if let Modal::Detail { scroll, .. } = &mut self.modal {
            *scroll = (i32::from(*scroll) + delta).clamp(0, i32::from(u16::MAX)) as u16;
        }
    }

    /// What: Replace the detail body with a loaded readme.
    ///
    /// Output:
    /// - `true` when applied; `false` when the detail screen was closed or now
    ///   shows another sample.
    pub fn apply_readme(&mut self, loaded: ReadmeLoaded) -> bool {
        match &mut self.modal {
            Modal::Detail {
                sample_id, body, ..
            } if *sample_id == loaded.sample_id => {
                *body = loaded.body;
                true
            }
            _ => {
                tracing::debug!(sample = %loaded.sample_id, "dropping stale readme");
                false
            }
        }
    }

    fn spawn_readme_load(&self, sample: &Sample) {
        let (Some(tx), Some(path)) = (&self.readme_tx, readme_path(&self.readme_base, sample))
        else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(sample = %sample.id, "no runtime; readme not loaded");
            return;
        };
        let tx = tx.clone();
        let sample_id = sample.id.clone();
        handle.spawn_blocking(move || match read_readme(&path) {
            Ok(body) => {
                let _ = tx.send(ReadmeLoaded { sample_id, body });
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "readme unavailable");
            }
        });
    }
}

fn fallback_body(sample: &Sample) -> String {
    if sample.description.is_empty() {
        format!("{} ({})", sample.name, sample.id)
    } else {
        sample.description.clone()
    }
}

/// What: Read a readme, keeping at most [`MAX_README_BYTES`].
///
/// Output:
/// - File text, with a trailing `…` line when truncated; `InvalidData` for non-UTF-8 files.
///
/// Details:
/// - Never reads more than one byte past the cap; a character split by the cut is dropped.
fn read_readme(path: &Path) -> std::io::Result<String> {
    let file = std::fs::File::open(path)?;
    let mut buf = Vec::new();
    file.take(MAX_README_BYTES as u64 + 1)
        .read_to_end(&mut buf)?;
    let truncated = buf.len() > MAX_README_BYTES;
    if truncated {
        buf.truncate(MAX_README_BYTES);
        let split_char = std::str::from_utf8(&buf)
            .err()
            .filter(|e| e.error_len().is_none())
            .map(|e| e.valid_up_to());
        if let Some(cut) = split_char {
            buf.truncate(cut);
        }
    }
    let mut text = String::from_utf8(buf)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    if truncated {
        text.push_str("\n…");
    }
    Ok(text)
}

impl DetailPresenter for DetailView {
    fn show(&mut self, sample: &Sample) {
        tracing::debug!(sample = %sample.id, "presenting detail");
        self.modal = Modal::Detail {
            sample_id: sample.id.clone(),
            title: sample.name.clone(),
            body: fallback_body(sample),
            scroll: 0,
        };
        self.spawn_readme_load(sample);
    }

    fn alert(&mut self, message: &str) {
        self.modal = Modal::Alert {
            message: message.to_string(),
        };
    }
}
