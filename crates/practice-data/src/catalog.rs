//! Selector sources: the instruments and exercises present in the exports,
//! and the instrument filter applied before aggregation.

use std::collections::{BTreeSet, HashSet};

use practice_core::models::{ExerciseProgressRecord, HistoryRecord, StatsRecord};

/// Every instrument named in history or stats, sorted and deduplicated.
pub fn instruments(history: &[HistoryRecord], stats: &[StatsRecord]) -> Vec<String> {
    let names: BTreeSet<&str> = history
        .iter()
        .filter_map(|h| h.instrument.as_deref())
        .chain(stats.iter().filter_map(|s| s.instrument.as_deref()))
        .collect();
    names.into_iter().map(str::to_string).collect()
}

/// Exercise ids in order of first appearance.
pub fn exercise_ids(records: &[ExerciseProgressRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.exercise_id.as_deref())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Restricts records to a set of instruments. Empty means all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentFilter {
    selected: Vec<String>,
}

impl InstrumentFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(selected: impl IntoIterator<Item = String>) -> Self {
        Self {
            selected: selected.into_iter().collect(),
        }
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_all(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether a record with this instrument passes.
    ///
    /// With an active filter, records that have no instrument are excluded.
    pub fn matches(&self, instrument: Option<&str>) -> bool {
        if self.is_all() {
            return true;
        }
        instrument.is_some_and(|i| self.selected.iter().any(|s| s == i))
    }

    pub fn history(&self, records: &[HistoryRecord]) -> Vec<HistoryRecord> {
        records
            .iter()
            .filter(|r| self.matches(r.instrument.as_deref()))
            .cloned()
            .collect()
    }

    pub fn stats(&self, records: &[StatsRecord]) -> Vec<StatsRecord> {
        records
            .iter()
            .filter(|r| self.matches(r.instrument.as_deref()))
            .cloned()
            .collect()
    }

    /// Short label for headers: `"all"` or the comma-joined selection.
    pub fn label(&self) -> String {
        if self.is_all() {
            "all".to_string()
        } else {
            self.selected.join(", ")
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
