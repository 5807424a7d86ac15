use std::env;
use std::path::{Path, PathBuf};

/// What: Locate the settings file, checking `$HOME` before `XDG_CONFIG_HOME`.
///
/// Inputs:
/// - None (reads environment variables to build candidate paths).
///
/// Output:
/// - `Some(PathBuf)` pointing to the first existing `settings.conf`; `None` when nothing exists.
pub(crate) fn resolve_settings_config_path() -> Option<PathBuf> {
    let home = env::var("HOME").ok();
    let xdg_config = env::var("XDG_CONFIG_HOME").ok();
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(h) = home.as_deref() {
        candidates.push(
            Path::new(h)
                .join(".config")
                .join("showcase")
                .join("settings.conf"),
        );
    }
    if let Some(xdg) = xdg_config.as_deref() {
        candidates.push(Path::new(xdg).join("showcase").join("settings.conf"));
    }
    candidates.into_iter().find(|p| p.is_file())
}

/// What: Resolve an XDG base directory, falling back to `$HOME` with provided segments.
///
/// Inputs:
/// - `var`: Environment variable name, e.g., `XDG_CONFIG_HOME`.
/// - `home_default`: Path segments appended to `$HOME` when the variable is unset.
///
/// Output:
/// - `PathBuf` pointing to the derived base directory.
///
/// Details:
/// - Treats empty environment values as unset and gracefully handles missing `$HOME`.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// Build `$HOME/.config/showcase`, creating it; `None` if `$HOME` is unset or not writable.
fn home_config_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        let dir = Path::new(&home).join(".config").join("showcase");
        if std::fs::create_dir_all(&dir).is_ok() {
            return Some(dir);
        }
    }
    #[cfg(windows)]
    {
        if let Ok(appdata) = env::var("APPDATA") {
            let dir = Path::new(&appdata).join("showcase");
            if std::fs::create_dir_all(&dir).is_ok() {
                return Some(dir);
            }
        }
    }
    None
}

/// What: Resolve the configuration directory, ensuring it exists on disk.
///
/// Output:
/// - `PathBuf` pointing to the config directory.
///
/// Details:
/// - Prefers `$HOME/.config/showcase`, falling back to `XDG_CONFIG_HOME/showcase`.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = home_config_dir() {
        return dir;
    }
    let base = xdg_base_dir("XDG_CONFIG_HOME", &[".config"]);
    let dir = base.join("showcase");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Logs directory inside the config folder (created if missing).
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// What: Default install location for asset bundles.
///
/// Output:
/// - `PathBuf` leading to the `cache` directory (created if missing).
pub fn cache_dir() -> PathBuf {
    let dir = config_dir().join("cache");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

#[cfg(test)]
mod tests {
    #[test]
    /// What: Verify path helpers resolve under the config directory rooted at `HOME`.
    ///
    /// Inputs:
    /// - Temporary `HOME` directory substituted to capture generated paths.
    ///
    /// Output:
    /// - `config_dir`, `logs_dir`, and `cache_dir` end with `showcase`, `logs`, and `cache`.
    ///
    /// Details:
    /// - Restores the original `HOME` afterwards to avoid polluting the real configuration tree.
    fn paths_config_logs_cache_under_home() {
        let _guard = crate::test_utils::lock_home_mutex();
        let orig_home = std::env::var_os("HOME");
        let base = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var("HOME", base.path().display().to_string()) };
        let cfg = super::config_dir();
        let logs = super::logs_dir();
        let cache = super::cache_dir();
        assert!(cfg.ends_with(".config/showcase"));
        assert!(logs.ends_with("logs") && logs.is_dir());
        assert!(cache.ends_with("cache") && cache.is_dir());
        assert!(cfg.starts_with(base.path()));
        assert!(super::resolve_settings_config_path().is_none());
        std::fs::write(cfg.join("settings.conf"), "log_level = debug\n").unwrap();
        assert_eq!(
            super::resolve_settings_config_path(),
            Some(cfg.join("settings.conf"))
        );
        unsafe {
            if let Some(v) = orig_home {
                std::env::set_var("HOME", v);
            } else {
                std::env::remove_var("HOME");
            }
        }
    }
}
