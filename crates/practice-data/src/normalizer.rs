//! Conversion of raw JSON records into typed records.
//!
//! This is the single place where field defaults and type coercion happen.
//! Timestamps that do not parse become `None`, counters that are missing or
//! non-numeric become `0`, and non-object entries are dropped. The
//! aggregators downstream never test for field presence.

use practice_core::data_processors::{FieldExtractor, TimestampProcessor, ValueCoercer};
use practice_core::models::{
    ExerciseProgressRecord, HistoryRecord, SongEvent, StatsRecord, SONG_ITEM_TYPE,
    UNKNOWN_ITEM_NAME, UNKNOWN_PLAY_MODE,
};
use serde_json::Value;
use tracing::debug;

/// Fields checked, in order, for the event-name tag of a stream line.
pub const EVENT_TAG_KEYS: &[&str] = &["event", "event_name", "name", "type"];

/// Fields checked, in order, for a song title.
pub const TITLE_KEYS: &[&str] = &["song_name", "song_title", "title"];

// ── history.json ──────────────────────────────────────────────────────────────

/// Normalize played-item records.
///
/// Column-level defaults follow the export's shape as a whole: when no
/// record carries an `item_type` key every row counts as a song, and when no
/// record carries an `item_name` key every row is named `"Unknown"`. A key
/// that is present on some records but not others leaves the others `None`.
pub fn normalize_history(records: &[Value]) -> Vec<HistoryRecord> {
    let has_item_type = has_column(records, "item_type");
    let has_item_name = has_column(records, "item_name");

    records
        .iter()
        .filter(|rec| keep_object(rec))
        .map(|rec| HistoryRecord {
            instrument: ValueCoercer::string(rec.get("instrument")),
            item_type: if has_item_type {
                ValueCoercer::string(rec.get("item_type"))
            } else {
                Some(SONG_ITEM_TYPE.to_string())
            },
            item_name: if has_item_name {
                ValueCoercer::string(rec.get("item_name"))
            } else {
                Some(UNKNOWN_ITEM_NAME.to_string())
            },
            time: rec.get("time").and_then(TimestampProcessor::parse),
        })
        .collect()
}

// ── stats.json ────────────────────────────────────────────────────────────────

/// Normalize weekly rollups, flattening the nested `stats` object.
///
/// `stats.duration` becomes `duration_sec`; `stars`, `notes` and `chords`
/// keep their names. Each defaults to `0`.
pub fn normalize_stats(records: &[Value]) -> Vec<StatsRecord> {
    records
        .iter()
        .filter(|rec| keep_object(rec))
        .map(|rec| {
            let stats = rec.get("stats").filter(|s| s.is_object());
            let counter = |key: &str| ValueCoercer::non_negative_int(stats.and_then(|s| s.get(key)));

            StatsRecord {
                instrument: ValueCoercer::string(rec.get("instrument")),
                week: rec.get("week").and_then(TimestampProcessor::parse),
                duration_sec: counter("duration"),
                stars: counter("stars"),
                notes: counter("notes"),
                chords: counter("chords"),
            }
        })
        .collect()
}

// ── exercise_progress.json ────────────────────────────────────────────────────

/// Normalize exercise snapshots.
///
/// Progress entries whose ratio is not numeric are dropped here; section keys
/// are left as strings.
pub fn normalize_exercise_progress(records: &[Value]) -> Vec<ExerciseProgressRecord> {
    records
        .iter()
        .filter(|rec| keep_object(rec))
        .map(|rec| {
            let progress = match rec.get("progress") {
                Some(Value::Object(map)) => map
                    .iter()
                    .filter_map(|(section, ratio)| match ValueCoercer::float(Some(ratio)) {
                        Some(r) => Some((section.clone(), r)),
                        None => {
                            debug!("Dropping non-numeric progress for section {}", section);
                            None
                        }
                    })
                    .collect(),
                _ => Vec::new(),
            };

            ExerciseProgressRecord {
                exercise_id: ValueCoercer::identifier(rec.get("exercise_id")),
                time: rec.get("time").and_then(TimestampProcessor::parse),
                instrument: ValueCoercer::string(rec.get("instrument")),
                success_ratio: ValueCoercer::float(rec.get("success_ratio")),
                progress,
            }
        })
        .collect()
}

// ── ysapi.jsonl ───────────────────────────────────────────────────────────────

/// Normalize raw event-stream lines.
///
/// Every line that is a JSON object becomes a [`SongEvent`], including lines
/// that are not song plays: those still contribute titles.
pub fn normalize_events(records: &[Value]) -> Vec<SongEvent> {
    records
        .iter()
        .filter(|rec| rec.is_object())
        .map(|rec| SongEvent {
            event: FieldExtractor::first_str(rec, EVENT_TAG_KEYS).map(str::to_string),
            song_id: ValueCoercer::identifier(rec.get("song_id")),
            title: FieldExtractor::first_text(rec, TITLE_KEYS),
            play_mode: ValueCoercer::identifier(rec.get("play_mode"))
                .unwrap_or_else(|| UNKNOWN_PLAY_MODE.to_string()),
            duration_sec: ValueCoercer::non_negative_int(rec.get("duration")),
        })
        .collect()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// `true` when at least one record carries `key`, even with a `null` value.
fn has_column(records: &[Value], key: &str) -> bool {
    records.iter().any(|rec| rec.get(key).is_some())
}

fn keep_object(rec: &Value) -> bool {
    if rec.is_object() {
        true
    } else {
        debug!("Skipping non-object record: {}", rec);
        false
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
