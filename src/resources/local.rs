use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::{FetchError, ProgressSender, ResourceProvider};

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
/// Prefix of in-progress install directories inside the cache.
const STAGING_PREFIX: &str = ".partial-";

/// What: Directory-backed resource provider.
///
/// Inputs:
/// - `source_dir`: Holds one sub-directory per tag (the "remote" bundles).
/// - `cache_dir`: Receives installed bundles, one sub-directory per tag.
///
/// Details:
/// - A bundle is copied into `cache_dir/.partial-<tag>-<n>` and renamed to
///   `cache_dir/<tag>` only once every file is written, so the presence of
///   `cache_dir/<tag>` always means a complete install.
/// - Installs are serialised through `install_lock` (shared by clones): a
///   request cancelled mid-copy finishes its cleanup before the next one
///   touches the cache.
#[derive(Debug, Clone)]
pub struct LocalBundleProvider {
    source_dir: PathBuf,
    cache_dir: PathBuf,
    chunk_size: usize,
    install_lock: Arc<Mutex<()>>,
    staging_seq: Arc<AtomicU64>,
}

#[derive(Debug)]
struct PlannedFile {
    src: PathBuf,
    rel: PathBuf,
    len: u64,
}

#[derive(Debug)]
struct PlannedBundle {
    tag: String,
    files: Vec<PlannedFile>,
}

impl LocalBundleProvider {
    pub fn new(source_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            cache_dir: cache_dir.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            install_lock: Arc::new(Mutex::new(())),
            staging_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Override the copy buffer size; values below one byte are raised to one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Location of the installed bundle for `tag`.
    pub fn installed_path(&self, tag: &str) -> PathBuf {
        self.cache_dir.join(tag)
    }

    /// Fresh staging directory for one install attempt of `tag`.
    fn staging_path(&self, tag: &str) -> PathBuf {
        let n = self.staging_seq.fetch_add(1, Ordering::Relaxed);
        self.cache_dir.join(format!("{STAGING_PREFIX}{tag}-{n}"))
    }

    /// What: Remove staging directories left by interrupted runs.
    ///
    /// Details:
    /// - Only called while holding `install_lock`, so no live install owns them.
    async fn sweep_staging(&self) -> Result<(), FetchError> {
        let mut entries = tokio::fs::read_dir(&self.cache_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_string_lossy().starts_with(STAGING_PREFIX) {
                tracing::debug!(path = %entry.path().display(), "removing stale staging directory");
                let _ = tokio::fs::remove_dir_all(entry.path()).await;
            }
        }
        Ok(())
    }

    async fn is_installed(&self, tag: &str) -> Result<bool, FetchError> {
        match tokio::fs::metadata(self.installed_path(tag)).await {
            Ok(m) => Ok(m.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// What: Copy one planned bundle into its staging directory and promote it.
    ///
    /// Inputs:
    /// - `plan`: Files to copy for a single tag.
    /// - `staging`: Unused directory to copy into.
    /// - `copied`/`total`: Running byte counters across the whole request.
    ///
    /// Output:
    /// - `Ok(())` once `cache_dir/<tag>` exists; the staging directory is left
    ///   for the caller to remove on error.
    async fn install_bundle(
        &self,
        plan: &PlannedBundle,
        staging: &Path,
        copied: &mut u64,
        total: u64,
        progress: &ProgressSender,
        cancel: &CancellationToken,
    ) -> Result<(), FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::DownloadCancelled);
        }
        tokio::fs::create_dir_all(staging).await?;

        let mut buf = vec![0u8; self.chunk_size];
        for file in &plan.files {
            let dest = staging.join(&file.rel);
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let mut src = tokio::fs::File::open(&file.src).await?;
            let mut dst = tokio::fs::File::create(&dest).await?;
            loop {
                if cancel.is_cancelled() {
                    return Err(FetchError::DownloadCancelled);
                }
                let n = src.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                dst.write_all(&buf[..n]).await?;
                *copied += n as u64;
                if total > 0 {
                    let _ = progress.send(*copied as f64 / total as f64);
                }
            }
            dst.flush().await?;
            tracing::debug!(tag = %plan.tag, file = %file.rel.display(), bytes = file.len, "copied bundle file");
        }

        if cancel.is_cancelled() {
            return Err(FetchError::DownloadCancelled);
        }
        tokio::fs::rename(staging, self.installed_path(&plan.tag)).await?;
        Ok(())
    }
}

/// What: Reject tags that would escape the bundle directories.
///
/// Output:
/// - `Err(DownloadFailed)` for empty tags, path separators, `.`/`..`, or the staging prefix.
fn validate_tag(tag: &str) -> Result<(), FetchError> {
    let bad = tag.is_empty()
        || tag == "."
        || tag == ".."
        || tag.contains(['/', '\\'])
        || tag.starts_with(STAGING_PREFIX);
    if bad {
        return Err(FetchError::DownloadFailed(format!(
            "invalid resource tag '{tag}'"
        )));
    }
    Ok(())
}

/// What: Enumerate the files of a source bundle.
///
/// Inputs:
/// - `source_dir`: Root holding one directory per tag.
/// - `tag`: Bundle to enumerate.
///
/// Output:
/// - `PlannedBundle` with files sorted by relative path; `NotFound` when the directory is missing.
///
/// Details:
/// - Blocking filesystem walk; callers run it on the blocking pool.
fn plan_bundle(source_dir: &Path, tag: &str) -> Result<PlannedBundle, FetchError> {
    let root = source_dir.join(tag);
    if !root.is_dir() {
        return Err(FetchError::NotFound(tag.to_string()));
    }
    let mut files = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let ft = entry.file_type()?;
            if ft.is_dir() {
                stack.push(path);
            } else if ft.is_file() {
                let len = entry.metadata()?.len();
                let rel = path
                    .strip_prefix(&root)
                    .map(Path::to_path_buf)
                    .map_err(|e| FetchError::DownloadFailed(e.to_string()))?;
                files.push(PlannedFile {
                    src: path,
                    rel,
                    len,
                });
            }
        }
    }
    files.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(PlannedBundle {
        tag: tag.to_string(),
        files,
    })
}

#[async_trait::async_trait]
impl ResourceProvider for LocalBundleProvider {
    async fn check_available(&self, tags: &[String]) -> Result<bool, FetchError> {
        for tag in tags {
            validate_tag(tag)?;
            if !self.is_installed(tag).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn download(
        &self,
        tags: &[String],
        progress: ProgressSender,
        cancel: CancellationToken,
    ) -> Result<(), FetchError> {
        for tag in tags {
            validate_tag(tag)?;
        }
        let _guard = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::DownloadCancelled),
            guard = self.install_lock.lock() => guard,
        };
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        self.sweep_staging().await?;

        // re-checked under the lock: a previous request may have finished the install
        let mut missing = Vec::new();
        for tag in tags {
            if !self.is_installed(tag).await? {
                missing.push(tag.clone());
            }
        }

        let source_dir = self.source_dir.clone();
        let plans = tokio::task::spawn_blocking(move || {
            missing
                .iter()
                .map(|t| plan_bundle(&source_dir, t))
                .collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(|e| FetchError::DownloadFailed(format!("bundle scan failed: {e}")))??;

        let total: u64 = plans
            .iter()
            .flat_map(|p| p.files.iter())
            .map(|f| f.len)
            .sum();
        tracing::info!(
            bundles = plans.len(),
            bytes = total,
            cache = %self.cache_dir.display(),
            "installing asset bundles"
        );
        let _ = progress.send(0.0);

        let mut copied = 0u64;
        for plan in &plans {
            let staging = self.staging_path(&plan.tag);
            if let Err(e) = self
                .install_bundle(plan, &staging, &mut copied, total, &progress, &cancel)
                .await
            {
                let _ = tokio::fs::remove_dir_all(&staging).await;
                if e.is_cancelled() {
                    tracing::info!(tag = %plan.tag, "bundle install cancelled");
                } else {
                    tracing::warn!(tag = %plan.tag, error = %e, "bundle install failed");
                }
                return Err(e);
            }
            tracing::info!(tag = %plan.tag, files = plan.files.len(), "bundle installed");
        }
        let _ = progress.send(1.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn seed_bundle(root: &Path, tag: &str, files: &[(&str, &[u8])]) {
        for (rel, body) in files {
            let p = root.join(tag).join(rel);
            std::fs::create_dir_all(p.parent().unwrap()).unwrap();
            std::fs::write(&p, body).unwrap();
        }
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn staging_dirs(cache: &Path) -> Vec<String> {
        std::fs::read_dir(cache)
            .map(|rd| {
                rd.filter_map(Result::ok)
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .filter(|n| n.starts_with(STAGING_PREFIX))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[tokio::test]
    /// What: Install a nested bundle and observe progress ending at completion.
    ///
    /// Inputs:
    /// - Source bundle `basemap` with two files, one in a sub-directory.
    ///
    /// Output:
    /// - Not available before, available after; copied files match; last progress is `1.0`.
    async fn download_installs_bundle_and_reports_progress() {
        let src = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        seed_bundle(
            src.path(),
            "basemap",
            &[("tiles.vtpk", &[7u8; 300]), ("style/root.json", b"{}")],
        );
        let provider = LocalBundleProvider::new(src.path(), cache.path()).with_chunk_size(64);
        let t = tags(&["basemap"]);
        assert!(!provider.check_available(&t).await.unwrap());

        let (tx, mut rx) = mpsc::unbounded_channel();
        provider
            .download(&t, tx, CancellationToken::new())
            .await
            .unwrap();
        let mut seen = Vec::new();
        while let Ok(p) = rx.try_recv() {
            seen.push(p);
        }
        assert!(seen.len() > 2);
        assert_eq!(seen.last().copied(), Some(1.0));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));

        assert!(provider.check_available(&t).await.unwrap());
        let installed = provider.installed_path("basemap");
        assert_eq!(
            std::fs::read(installed.join("tiles.vtpk")).unwrap().len(),
            300
        );
        assert_eq!(
            std::fs::read_to_string(installed.join("style/root.json")).unwrap(),
            "{}"
        );
        assert!(staging_dirs(cache.path()).is_empty());
    }

    #[tokio::test]
    async fn download_reports_missing_bundle() {
        let src = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        let provider = LocalBundleProvider::new(src.path(), cache.path());
        let (tx, _rx) = mpsc::unbounded_channel();
        let err = provider
            .download(&tags(&["nope"]), tx, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound(ref t) if t == "nope"));
    }

    #[tokio::test]
    /// What: Ensure path-like tags are refused before touching the filesystem.
    async fn traversal_tags_are_rejected() {
        let src = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        let provider = LocalBundleProvider::new(src.path(), cache.path());
        for bad in ["", "..", "a/b", ".partial-x"] {
            let err = provider.check_available(&tags(&[bad])).await.unwrap_err();
            assert!(matches!(err, FetchError::DownloadFailed(_)), "{bad}");
        }
    }

    #[tokio::test]
    /// What: A token cancelled up front leaves neither staging nor installed directories.
    async fn cancelled_before_start_leaves_nothing_behind() {
        let src = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        seed_bundle(src.path(), "x", &[("a.bin", &[1u8; 16])]);
        let provider = LocalBundleProvider::new(src.path(), cache.path());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (tx, _rx) = mpsc::unbounded_channel();
        let err = provider
            .download(&tags(&["x"]), tx, cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(!cache.path().join("x").exists());
        assert!(staging_dirs(cache.path()).is_empty());
    }

    #[tokio::test]
    /// What: Cancel while bytes are being copied.
    ///
    /// Inputs:
    /// - 64 KiB bundle copied one byte per chunk so the transfer is long-running.
    ///
    /// Output:
    /// - `DownloadCancelled` and the staging directory removed.
    async fn cancel_mid_copy_removes_staging() {
        let src = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        seed_bundle(src.path(), "big", &[("blob.bin", &vec![9u8; 64 * 1024])]);
        let provider =
            Arc::new(LocalBundleProvider::new(src.path(), cache.path()).with_chunk_size(1));
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = {
            let provider = provider.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { provider.download(&tags(&["big"]), tx, cancel).await })
        };
        // wait for the first real chunk
        loop {
            let p = rx.recv().await.expect("progress");
            if p > 0.0 {
                break;
            }
        }
        cancel.cancel();
        let err = task.await.unwrap().unwrap_err();
        assert!(err.is_cancelled());
        assert!(!cache.path().join("big").exists());
        assert!(staging_dirs(cache.path()).is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    /// What: Restarting a tag right after cancelling it yields a complete install.
    ///
    /// Inputs:
    /// - Bundle `big` of 20 files x 4 KiB, copied in 16-byte chunks.
    /// - Per round: start A, wait for progress, cancel A, start B at once.
    ///
    /// Output:
    /// - A ends cancelled, B succeeds, every installed file is intact, and no
    ///   staging directory remains.
    async fn cancel_then_restart_same_tag_installs_intact_bundle() {
        let src = tempfile::tempdir().unwrap();
        let files: Vec<(String, Vec<u8>)> = (0..20u8)
            .map(|i| (format!("part-{i:02}.bin"), vec![i; 4096]))
            .collect();
        let borrowed: Vec<(&str, &[u8])> = files
            .iter()
            .map(|(n, b)| (n.as_str(), b.as_slice()))
            .collect();
        seed_bundle(src.path(), "big", &borrowed);

        for round in 0..5 {
            let cache = tempfile::tempdir().unwrap();
            let provider =
                Arc::new(LocalBundleProvider::new(src.path(), cache.path()).with_chunk_size(16));

            let cancel_a = CancellationToken::new();
            let (tx_a, mut rx_a) = mpsc::unbounded_channel();
            let first = {
                let provider = provider.clone();
                let cancel = cancel_a.clone();
                tokio::spawn(async move { provider.download(&tags(&["big"]), tx_a, cancel).await })
            };
            loop {
                let p = rx_a.recv().await.expect("progress");
                if p > 0.0 {
                    break;
                }
            }
            cancel_a.cancel();
            let (tx_b, _rx_b) = mpsc::unbounded_channel();
            let second = {
                let provider = provider.clone();
                tokio::spawn(async move {
                    provider
                        .download(&tags(&["big"]), tx_b, CancellationToken::new())
                        .await
                })
            };

            let r1 = first.await.unwrap();
            let r2 = second.await.unwrap();
            assert!(matches!(r1, Err(FetchError::DownloadCancelled)), "round {round}: {r1:?}");
            assert!(r2.is_ok(), "round {round}: {r2:?}");
            let installed = provider.installed_path("big");
            for (name, body) in &files {
                let got = std::fs::read(installed.join(name)).unwrap();
                assert_eq!(&got, body, "round {round}: {name}");
            }
            assert!(staging_dirs(cache.path()).is_empty(), "round {round}");
        }
    }

    #[tokio::test]
    /// What: Already-installed tags are skipped and an empty plan still completes.
    async fn installed_tags_are_not_copied_again() {
        let src = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(cache.path().join("done")).unwrap();
        let provider = LocalBundleProvider::new(src.path(), cache.path());
        let (tx, mut rx) = mpsc::unbounded_channel();
        provider
            .download(&tags(&["done"]), tx, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(rx.try_recv().ok(), Some(0.0));
        assert_eq!(rx.try_recv().ok(), Some(1.0));
    }
}
