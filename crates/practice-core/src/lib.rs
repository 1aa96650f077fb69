//! Shared foundation for the practice dashboard.
//!
//! Record types for the four export sources, the error type, command-line
//! settings, lenient value coercion and display formatting helpers.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{PracticeError, Result};
