use std::fs;
use std::path::PathBuf;

use super::paths::resolve_settings_config_path;
use super::types::Settings;
use crate::state::StrategyKind;
use crate::util::{parse_bool, strip_inline_comment};

/// Smallest and largest accepted copy buffer.
const MIN_CHUNK: usize = 1024;
const MAX_CHUNK: usize = 16 * 1024 * 1024;

/// What: Load user settings from `settings.conf` under HOME/XDG.
///
/// Output:
/// - A `Settings` value; falls back to `Settings::default()` when missing or unreadable.
pub fn settings() -> Settings {
    let Some(path) = resolve_settings_config_path() else {
        return Settings::default();
    };
    match fs::read_to_string(&path) {
        Ok(content) => parse_settings(&content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read settings; using defaults");
            Settings::default()
        }
    }
}

/// What: Parse `key = value` settings text.
///
/// Inputs:
/// - `content`: Full file contents.
///
/// Output:
/// - `Settings` with recognised keys applied over the defaults.
///
/// Details:
/// - Blank lines and lines starting with `#` or `//` are skipped; trailing inline
///   comments are stripped.
/// - Keys are case-insensitive; `.`, `-`, and spaces are treated as `_`.
/// - Unknown keys and unparsable values are ignored (logged at debug).
pub fn parse_settings(content: &str) -> Settings {
    let mut out = Settings::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        let Some((raw_key, val_raw)) = trimmed.split_once('=') else {
            continue;
        };
        let key = raw_key.trim().to_lowercase().replace(['.', '-', ' '], "_");
        let val = strip_inline_comment(val_raw.trim());
        match key.as_str() {
            "manifest_path" | "manifest" | "catalog" => {
                out.manifest_path = non_empty_path(val);
            }
            "assets_dir" | "assets" | "bundles_dir" => {
                out.assets_dir = non_empty_path(val);
            }
            "cache_dir" | "cache" => {
                out.cache_dir = non_empty_path(val);
            }
            "match_strategy" | "search_mode" => match StrategyKind::from_config_key(val) {
                Some(kind) => out.match_strategy = kind,
                None => tracing::debug!(value = val, "unknown match strategy"),
            },
            "log_level" => {
                if !val.is_empty() {
                    out.log_level = val.to_string();
                }
            }
            "download_chunk_size" | "chunk_size" => {
                if let Ok(v) = val.parse::<usize>() {
                    out.download_chunk_size = v.clamp(MIN_CHUNK, MAX_CHUNK);
                }
            }
            "show_descriptions" | "descriptions_visible" => {
                out.show_descriptions = parse_bool(val);
            }
            _ => tracing::debug!(key = %key, "ignoring unknown settings key"),
        }
    }
    out
}

fn non_empty_path(val: &str) -> Option<PathBuf> {
    if val.is_empty() {
        return None;
    }
    if let Some(rest) = val.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return Some(PathBuf::from(home).join(rest));
    }
    Some(PathBuf::from(val))
}
