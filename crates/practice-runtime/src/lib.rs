//! Runtime layer for the practice dashboard.
//!
//! Holds the loaded export snapshots and exposes the per-filter views the
//! presentation layer and the JSON export draw from.

pub mod context;
pub mod views;

pub use practice_core as core;
pub use practice_data as data;
