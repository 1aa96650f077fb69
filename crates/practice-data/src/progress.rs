//! Latest-snapshot lookup for exercise section progress.

use std::fmt;

use chrono::{DateTime, Utc};
use practice_core::models::ExerciseProgressRecord;
use serde::Serialize;
use tracing::debug;

/// Completion ratio of one exercise section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectionProgress {
    pub section: i64,
    pub ratio: f64,
}

/// The most recent snapshot of one exercise, sections in numeric order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseSnapshot {
    pub exercise_id: String,
    pub instrument: Option<String>,
    pub success_ratio: Option<f64>,
    pub time: Option<DateTime<Utc>>,
    pub sections: Vec<SectionProgress>,
}

/// Outcome of [`latest_section_progress`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressLookup {
    /// No exercise id was supplied.
    NoSelection,
    /// No snapshot carries the requested id.
    NoRecords { exercise_id: String },
    /// The latest snapshot has no numeric-keyed sections.
    NoSections { exercise_id: String },
    Found(ExerciseSnapshot),
}

impl ProgressLookup {
    pub fn snapshot(&self) -> Option<&ExerciseSnapshot> {
        match self {
            Self::Found(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

impl fmt::Display for ProgressLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSelection => write!(f, "No exercise selected."),
            Self::NoRecords { exercise_id } => write!(f, "No records found for {}.", exercise_id),
            Self::NoSections { exercise_id } => {
                write!(f, "No section progress found for {}.", exercise_id)
            }
            Self::Found(snapshot) => write!(
                f,
                "{} sections for {}",
                snapshot.sections.len(),
                snapshot.exercise_id
            ),
        }
    }
}

/// Find the latest snapshot for `exercise_id` and expand its sections.
///
/// "Latest" is the maximum `time`; snapshots without a time sort below all
/// timed ones, and among equal times the one appearing last in the input
/// wins. Section keys are parsed as integers (surrounding whitespace
/// ignored); keys that do not parse are skipped. Sections come back in
/// numeric order, so `"10"` follows `"2"`.
pub fn latest_section_progress(
    records: &[ExerciseProgressRecord],
    exercise_id: Option<&str>,
) -> ProgressLookup {
    let Some(exercise_id) = exercise_id else {
        return ProgressLookup::NoSelection;
    };

    let mut latest: Option<&ExerciseProgressRecord> = None;
    for rec in records
        .iter()
        .filter(|r| r.exercise_id.as_deref() == Some(exercise_id))
    {
        // `>=` lets the later record win ties; `None < Some(_)` for Option.
        if latest.map_or(true, |best| rec.time >= best.time) {
            latest = Some(rec);
        }
    }

    let Some(latest) = latest else {
        return ProgressLookup::NoRecords {
            exercise_id: exercise_id.to_string(),
        };
    };

    let mut sections: Vec<SectionProgress> = latest
        .progress
        .iter()
        .filter_map(|(key, ratio)| match key.trim().parse::<i64>() {
            Ok(section) => Some(SectionProgress {
                section,
                ratio: *ratio,
            }),
            Err(_) => {
                debug!("Skipping non-numeric section key {:?}", key);
                None
            }
        })
        .collect();

    if sections.is_empty() {
        return ProgressLookup::NoSections {
            exercise_id: exercise_id.to_string(),
        };
    }
    sections.sort_by_key(|s| s.section);

    ProgressLookup::Found(ExerciseSnapshot {
        exercise_id: exercise_id.to_string(),
        instrument: latest.instrument.clone(),
        success_ratio: latest.success_ratio,
        time: latest.time,
        sections,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn snapshot(id: &str, time: Option<&str>, progress: &[(&str, f64)]) -> ExerciseProgressRecord {
        ExerciseProgressRecord {
            exercise_id: Some(id.to_string()),
            time: time.map(ts),
            instrument: Some("guitar".to_string()),
            success_ratio: Some(0.75),
            progress: progress
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn test_no_selection() {
        let lookup = latest_section_progress(&[], None);
        assert_eq!(lookup, ProgressLookup::NoSelection);
        assert_eq!(lookup.to_string(), "No exercise selected.");
    }

    #[test]
    fn test_no_records_for_id() {
        let records = vec![snapshot("ex-1", Some("2024-01-01T00:00:00Z"), &[("1", 0.5)])];
        let lookup = latest_section_progress(&records, Some("ex-2"));
        assert_eq!(lookup.to_string(), "No records found for ex-2.");
        assert!(lookup.snapshot().is_none());
    }

    #[test]
    fn test_numeric_section_order() {
        let records = vec![snapshot(
            "ex-1",
            Some("2024-01-01T00:00:00Z"),
            &[("2", 0.5), ("10", 1.0), ("1", 0.2)],
        )];

        let lookup = latest_section_progress(&records, Some("ex-1"));
        let sections: Vec<i64> = lookup
            .snapshot()
            .unwrap()
            .sections
            .iter()
            .map(|s| s.section)
            .collect();
        assert_eq!(sections, vec![1, 2, 10]);
    }

    #[test]
    fn test_latest_snapshot_wins() {
        let records = vec![
            snapshot("ex-1", Some("2024-03-01T00:00:00Z"), &[("1", 0.9)]),
            snapshot("ex-1", Some("2024-01-01T00:00:00Z"), &[("1", 0.1)]),
            snapshot("ex-1", None, &[("1", 0.0)]),
        ];

        let lookup = latest_section_progress(&records, Some("ex-1"));
        let snap = lookup.snapshot().unwrap();
        assert_eq!(snap.sections[0].ratio, 0.9);
        assert_eq!(snap.time, Some(ts("2024-03-01T00:00:00Z")));
    }

    #[test]
    fn test_equal_times_last_record_wins() {
        let t = Some("2024-03-01T00:00:00Z");
        let records = vec![
            snapshot("ex-1", t, &[("1", 0.3)]),
            snapshot("ex-1", t, &[("1", 0.6)]),
        ];
        let lookup = latest_section_progress(&records, Some("ex-1"));
        assert_eq!(lookup.snapshot().unwrap().sections[0].ratio, 0.6);
    }

    #[test]
    fn test_untimed_only_still_found() {
        let records = vec![snapshot("ex-1", None, &[("3", 0.4)])];
        let lookup = latest_section_progress(&records, Some("ex-1"));
        assert_eq!(lookup.snapshot().unwrap().sections.len(), 1);
    }

    #[test]
    fn test_non_numeric_keys_skipped() {
        let records = vec![snapshot(
            "ex-1",
            Some("2024-01-01T00:00:00Z"),
            &[(" 4 ", 0.4), ("intro", 1.0), ("2", 0.2)],
        )];
        let lookup = latest_section_progress(&records, Some("ex-1"));
        let sections = &lookup.snapshot().unwrap().sections;
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].section, 4);
    }

    #[test]
    fn test_no_numeric_sections() {
        let records = vec![snapshot("ex-1", Some("2024-01-01T00:00:00Z"), &[("intro", 1.0)])];
        let lookup = latest_section_progress(&records, Some("ex-1"));
        assert_eq!(lookup.to_string(), "No section progress found for ex-1.");
    }
}
