use std::path::PathBuf;

use crate::state::StrategyKind;

/// User settings loaded from `settings.conf`, then overridden by CLI flags.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Manifest describing the catalog; defaults to `<config>/catalog.json`.
    pub manifest_path: Option<PathBuf>,
    /// Directory holding one sub-directory per downloadable tag.
    pub assets_dir: Option<PathBuf>,
    /// Install location for bundles; defaults to `<config>/cache`.
    pub cache_dir: Option<PathBuf>,
    /// Search box filtering behaviour.
    pub match_strategy: StrategyKind,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Copy buffer size in bytes for bundle installs.
    pub download_chunk_size: usize,
    /// Show the description line under every result, not only expanded rows.
    pub show_descriptions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest_path: None,
            assets_dir: None,
            cache_dir: None,
            match_strategy: StrategyKind::Substring,
            log_level: "info".to_string(),
            download_chunk_size: 64 * 1024,
            show_descriptions: false,
        }
    }
}
