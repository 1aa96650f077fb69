//! Loaded export snapshots shared by every view.
//!
//! [`DashboardContext::load`] reads and normalizes all four sources once.
//! Views borrow the normalized records and recompute their tables on demand;
//! [`DashboardContext::reload`] swaps in a fresh load, keeping the previous
//! snapshots when the new load fails.

use practice_core::error::Result;
use practice_core::models::{ExerciseProgressRecord, HistoryRecord, SongEvent, StatsRecord};
use practice_core::settings::DataPaths;
use practice_data::catalog;
use practice_data::normalizer::{
    normalize_events, normalize_exercise_progress, normalize_history, normalize_stats,
};
use practice_data::reader::{read_json_document, read_jsonl};

// ── DashboardContext ──────────────────────────────────────────────────────────

/// Normalized records from one load of the exports.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    paths: DataPaths,
    pub history: Vec<HistoryRecord>,
    pub stats: Vec<StatsRecord>,
    pub exercise_progress: Vec<ExerciseProgressRecord>,
    pub events: Vec<SongEvent>,
    last_error: Option<String>,
}

impl DashboardContext {
    /// Read every source under `paths`.
    ///
    /// The three JSON documents are required; a missing or malformed one is
    /// returned as an error. A missing event stream loads as no events.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let history = normalize_history(&read_json_document(&paths.history())?);
        let stats = normalize_stats(&read_json_document(&paths.stats())?);
        let exercise_progress =
            normalize_exercise_progress(&read_json_document(&paths.exercise_progress())?);
        let events = normalize_events(&read_jsonl(&paths.events()));

        tracing::debug!(
            history = history.len(),
            stats = stats.len(),
            exercise_progress = exercise_progress.len(),
            events = events.len(),
            "exports normalized"
        );

        Ok(Self {
            paths: paths.clone(),
            history,
            stats,
            exercise_progress,
            events,
            last_error: None,
        })
    }

    /// Re-read all sources from the same paths.
    ///
    /// On failure the current snapshots stay in place, the error is kept for
    /// [`last_error`](Self::last_error) and also returned.
    pub fn reload(&mut self) -> Result<()> {
        match Self::load(&self.paths) {
            Ok(fresh) => {
                *self = fresh;
                tracing::info!("exports reloaded");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed; keeping previous data");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// Message from the last failed reload, cleared by a successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Instruments available to the instrument selector.
    pub fn instruments(&self) -> Vec<String> {
        catalog::instruments(&self.history, &self.stats)
    }

    /// Exercise ids available to the exercise selector.
    pub fn exercise_ids(&self) -> Vec<String> {
        catalog::exercise_ids(&self.exercise_progress)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
