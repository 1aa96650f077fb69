//! Terminal UI layer for the practice dashboard.
//!
//! Provides themes, the header and section-bar components, the per-tab
//! table and chart renderers, and the application event loop built on
//! [`ratatui`].

pub mod app;
pub mod components;
pub mod table_view;
pub mod themes;

pub use practice_core as core;
