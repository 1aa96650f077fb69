use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event-name tag carried by song play events in the event stream.
pub const SONG_PLAYED_EVENT: &str = "song_played";

/// Canonical play mode for practice attempts.
pub const PLAY_MODE_PRACTICE: &str = "practice";

/// Canonical play mode for full play-throughs.
pub const PLAY_MODE_PLAY: &str = "play";

/// Play mode assigned to song events that carry none.
pub const UNKNOWN_PLAY_MODE: &str = "unknown";

/// Item type marking a history row as a song.
pub const SONG_ITEM_TYPE: &str = "song";

/// Item name used when the history export has no `item_name` column at all.
pub const UNKNOWN_ITEM_NAME: &str = "Unknown";

/// One played item from `history.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Instrument the item was played on (e.g. `"guitar"`).
    pub instrument: Option<String>,
    /// Kind of item, e.g. `"song"` or `"exercise"`.
    pub item_type: Option<String>,
    /// Display name of the item.
    pub item_name: Option<String>,
    /// When the item was played; `None` when the source value did not parse.
    pub time: Option<DateTime<Utc>>,
}

/// One weekly rollup per instrument from `stats.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub instrument: Option<String>,
    /// Start of the week this rollup covers.
    pub week: Option<DateTime<Utc>>,
    /// Practice duration in seconds, coerced to a non-negative integer.
    pub duration_sec: u64,
    pub stars: u64,
    pub notes: u64,
    pub chords: u64,
}

impl StatsRecord {
    /// Practice duration converted to minutes.
    pub fn duration_min(&self) -> f64 {
        self.duration_sec as f64 / 60.0
    }
}

/// A timestamped snapshot of per-section completion for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgressRecord {
    pub exercise_id: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub instrument: Option<String>,
    pub success_ratio: Option<f64>,
    /// `(section key, completion ratio)` pairs as decoded from the export.
    ///
    /// Keys stay strings here; numeric ordering is applied by the progress
    /// aggregator.
    pub progress: Vec<(String, f64)>,
}

/// One normalized line of the raw event stream.
///
/// Only the fields the song time split needs survive normalization. Every
/// default is applied here so downstream passes never check for presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongEvent {
    /// Event-name tag, if the line carried one.
    pub event: Option<String>,
    /// Song identifier in string form.
    pub song_id: Option<String>,
    /// First title-like value on this line (`song_name`, `song_title`, `title`).
    pub title: Option<String>,
    /// Play mode, `"unknown"` when absent.
    pub play_mode: String,
    /// Duration in seconds, `0` when absent or non-numeric.
    pub duration_sec: u64,
}

impl SongEvent {
    /// `true` when this line is a `song_played` event with a song id.
    pub fn is_song_played(&self) -> bool {
        self.song_id.is_some() && self.event.as_deref() == Some(SONG_PLAYED_EVENT)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
