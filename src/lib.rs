//! Library entry for showcase: catalog, browser logic, resource fetching, and the TUI.

pub mod app;
pub mod catalog;
pub mod config;
pub mod events;
pub mod logic;
pub mod resources;
pub mod state;
pub mod ui;
pub mod util;

#[cfg(test)]
mod test_utils;
