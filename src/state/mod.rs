//! Application state split into small files.
//!
//! The public API stays flat under `crate::state::*` via re-exports.

pub mod app_state;
pub mod detail;
pub mod modal;
pub mod types;

pub use app_state::AppState;
pub use detail::{DetailView, ReadmeLoaded};
pub use modal::Modal;
pub use types::{FetchPhase, FetchToken, Focus, Sample, StrategyKind};
