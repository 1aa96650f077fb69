//! Data layer for the practice dashboard.
//!
//! Reads the JSON exports and the event stream, normalizes them into typed
//! records and computes the analytic tables: song plays per instrument,
//! weekly practice time, practice-versus-play minutes per song and the
//! latest section progress of an exercise.

pub mod aggregator;
pub mod catalog;
pub mod normalizer;
pub mod progress;
pub mod reader;

pub use practice_core as core;
