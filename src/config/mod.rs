//! Configuration: directory layout and the `settings.conf` file.
//!
//! Public re-exports keep the `crate::config::*` API flat.

mod paths;
mod settings;
mod types;

pub use paths::{cache_dir, config_dir, logs_dir};
pub use settings::{parse_settings, settings};
pub use types::Settings;
