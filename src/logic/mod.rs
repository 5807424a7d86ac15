//! Core non-UI logic split into modular submodules.

pub mod browser;
pub mod fetch;
pub mod filter;
pub mod presenter;

// Re-export public APIs so callers can use `crate::logic::...` directly
pub use browser::SampleBrowser;
pub use fetch::{FetchEvent, FetchEventKind, FetchHandle, spawn_fetch};
pub use filter::{FuzzyMatch, MatchStrategy, SubstringMatch, filter_indices, strategy_for};
pub use presenter::DetailPresenter;
