//! Analytic tables built from the normalized records.
//!
//! Every function here is a pure transformation over borrowed records. An
//! empty input always yields an empty table with the same column set.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use practice_core::models::{
    HistoryRecord, SongEvent, StatsRecord, PLAY_MODE_PLAY, PLAY_MODE_PRACTICE, SONG_ITEM_TYPE,
};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

// ── Song plays ────────────────────────────────────────────────────────────────

/// Play count and first/last play per `(instrument, song)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongPlayRow {
    pub instrument: String,
    pub item_name: String,
    pub plays: u64,
    pub first_play: Option<DateTime<Utc>>,
    pub last_play: Option<DateTime<Utc>>,
}

impl SongPlayRow {
    pub const COLUMNS: [&'static str; 5] =
        ["instrument", "item_name", "plays", "first_play", "last_play"];

    fn new(instrument: String, item_name: String) -> Self {
        Self {
            instrument,
            item_name,
            plays: 0,
            first_play: None,
            last_play: None,
        }
    }

    fn add_play(&mut self, time: Option<DateTime<Utc>>) {
        self.plays += 1;
        if let Some(t) = time {
            self.first_play = Some(self.first_play.map_or(t, |f| f.min(t)));
            self.last_play = Some(self.last_play.map_or(t, |l| l.max(t)));
        }
    }
}

/// Group song plays by `(instrument, item_name)`.
///
/// Only rows typed `"song"` with a name and an instrument qualify. The result
/// is ordered by instrument ascending, then plays descending; ties keep the
/// song-name order the grouping produced.
pub fn songs_by_instrument(history: &[HistoryRecord]) -> Vec<SongPlayRow> {
    let mut groups: BTreeMap<(String, String), SongPlayRow> = BTreeMap::new();

    for rec in history {
        if rec.item_type.as_deref() != Some(SONG_ITEM_TYPE) {
            continue;
        }
        let (Some(instrument), Some(item_name)) = (&rec.instrument, &rec.item_name) else {
            continue;
        };
        groups
            .entry((instrument.clone(), item_name.clone()))
            .or_insert_with(|| SongPlayRow::new(instrument.clone(), item_name.clone()))
            .add_play(rec.time);
    }

    let mut rows: Vec<SongPlayRow> = groups.into_values().collect();
    // sort_by is stable.
    rows.sort_by(|a, b| {
        a.instrument
            .cmp(&b.instrument)
            .then_with(|| b.plays.cmp(&a.plays))
    });
    rows
}

/// The `limit` most-played songs across instruments, most plays first.
pub fn top_songs_by_plays(rows: &[SongPlayRow], limit: usize) -> Vec<SongPlayRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.plays.cmp(&a.plays));
    sorted.truncate(limit);
    sorted
}

// ── Weekly practice ───────────────────────────────────────────────────────────

/// One weekly rollup with its duration in minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPracticeRow {
    pub instrument: Option<String>,
    pub week: Option<DateTime<Utc>>,
    pub duration_sec: u64,
    pub stars: u64,
    pub notes: u64,
    pub chords: u64,
    pub duration_min: f64,
}

impl WeeklyPracticeRow {
    pub const COLUMNS: [&'static str; 7] = [
        "instrument",
        "week",
        "duration_sec",
        "stars",
        "notes",
        "chords",
        "duration_min",
    ];
}

/// Append `duration_min` to every stats row, preserving source order.
///
/// Duplicate instrument-week pairs are passed through unmerged.
pub fn practice_time_by_week(stats: &[StatsRecord]) -> Vec<WeeklyPracticeRow> {
    stats
        .iter()
        .map(|s| WeeklyPracticeRow {
            instrument: s.instrument.clone(),
            week: s.week,
            duration_sec: s.duration_sec,
            stars: s.stars,
            notes: s.notes,
            chords: s.chords,
            duration_min: s.duration_min(),
        })
        .collect()
}

/// Weekly minutes for one instrument, ordered by week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentSeries {
    pub instrument: String,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

/// Split weekly rows into one series per instrument for charting.
///
/// Rows without an instrument or week cannot be placed and are left out.
/// Series are ordered by instrument name; points by week ascending.
pub fn weekly_series(rows: &[WeeklyPracticeRow]) -> Vec<InstrumentSeries> {
    let mut by_instrument: BTreeMap<&str, Vec<(DateTime<Utc>, f64)>> = BTreeMap::new();
    for row in rows {
        if let (Some(instrument), Some(week)) = (row.instrument.as_deref(), row.week) {
            by_instrument
                .entry(instrument)
                .or_default()
                .push((week, row.duration_min));
        }
    }

    by_instrument
        .into_iter()
        .map(|(instrument, mut points)| {
            points.sort_by_key(|(week, _)| *week);
            InstrumentSeries {
                instrument: instrument.to_string(),
                points,
            }
        })
        .collect()
}

// ── Song time split ───────────────────────────────────────────────────────────

/// Summed duration and session count for one play mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModeTotals {
    pub total_duration_sec: u64,
    pub sessions: u64,
}

impl ModeTotals {
    fn add(&mut self, duration_sec: u64) {
        self.total_duration_sec += duration_sec;
        self.sessions += 1;
    }

    pub fn minutes(&self) -> f64 {
        self.total_duration_sec as f64 / 60.0
    }
}

/// One `(song_id, title, play_mode)` group of `song_played` events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongModeSummary {
    pub song_id: String,
    pub title: Option<String>,
    pub play_mode: String,
    pub total_duration_sec: u64,
    pub sessions: u64,
}

/// Group `song_played` events by song and play mode.
///
/// Titles are resolved in a first pass over *all* events: for each song id
/// the first title seen wins, whichever event carried it. The second pass
/// sums durations and counts sessions. Output is ordered by song id, then
/// play mode.
pub fn song_time_summary(events: &[SongEvent]) -> Vec<SongModeSummary> {
    let mut titles: HashMap<&str, &str> = HashMap::new();
    for event in events {
        if let (Some(id), Some(title)) = (event.song_id.as_deref(), event.title.as_deref()) {
            titles.entry(id).or_insert(title);
        }
    }

    let mut groups: BTreeMap<(&str, &str), ModeTotals> = BTreeMap::new();
    for event in events.iter().filter(|e| e.is_song_played()) {
        let Some(id) = event.song_id.as_deref() else {
            continue;
        };
        groups
            .entry((id, event.play_mode.as_str()))
            .or_default()
            .add(event.duration_sec);
    }

    groups
        .into_iter()
        .map(|((id, mode), totals)| SongModeSummary {
            song_id: id.to_string(),
            title: titles.get(id).map(|t| t.to_string()),
            play_mode: mode.to_string(),
            total_duration_sec: totals.total_duration_sec,
            sessions: totals.sessions,
        })
        .collect()
}

/// Practice-versus-play minutes for one song.
///
/// The canonical `practice` and `play` modes always have fields, zero when
/// the song has no events in that mode. Any other mode lands in
/// `other_modes` and still counts toward `total_min`.
#[derive(Debug, Clone, PartialEq)]
pub struct SongTimeRow {
    pub song_id: String,
    pub title: Option<String>,
    pub practice_min: f64,
    pub play_min: f64,
    pub total_min: f64,
    pub practice_sessions: u64,
    pub play_sessions: u64,
    pub other_modes: BTreeMap<String, ModeTotals>,
}

impl SongTimeRow {
    /// Title for display, falling back to the song id.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.song_id)
    }

    /// Minutes recorded under `mode`, zero when the song has none.
    pub fn minutes_for(&self, mode: &str) -> f64 {
        match mode {
            PLAY_MODE_PRACTICE => self.practice_min,
            PLAY_MODE_PLAY => self.play_min,
            other => self.other_modes.get(other).map_or(0.0, ModeTotals::minutes),
        }
    }

    /// Sessions recorded under `mode`, zero when the song has none.
    pub fn sessions_for(&self, mode: &str) -> u64 {
        match mode {
            PLAY_MODE_PRACTICE => self.practice_sessions,
            PLAY_MODE_PLAY => self.play_sessions,
            other => self.other_modes.get(other).map_or(0, |t| t.sessions),
        }
    }
}

/// The song minutes table: rows plus the dynamic mode set that shapes its
/// columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongTimeTable {
    /// Non-canonical play modes seen anywhere in the data, sorted.
    pub extra_modes: Vec<String>,
    /// Column stem per entry of `extra_modes`, unique across the table.
    column_stems: Vec<String>,
    /// Rows ordered by practice minutes, descending.
    pub rows: Vec<SongTimeRow>,
}

/// Columns present in every song minutes table, empty or not.
pub const SONG_TIME_BASE_COLUMNS: [&str; 5] =
    ["song_id", "title", "practice_min", "play_min", "total_min"];

/// Session columns present in every song minutes table.
pub const SONG_TIME_SESSION_COLUMNS: [&str; 2] = ["practice_sessions", "play_sessions"];

impl SongTimeTable {
    /// Full column list: the fixed columns, then one minutes and one sessions
    /// column per extra mode.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = SONG_TIME_BASE_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect();
        columns.extend(self.column_stems.iter().map(|stem| format!("{}_min", stem)));
        columns.extend(SONG_TIME_SESSION_COLUMNS.iter().map(|c| c.to_string()));
        columns.extend(self.column_stems.iter().map(|stem| format!("{}_sessions", stem)));
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `limit` rows (the table is already ordered by practice
    /// minutes).
    pub fn top(&self, limit: usize) -> &[SongTimeRow] {
        &self.rows[..self.rows.len().min(limit)]
    }

    /// Serialize each row as a map keyed by this table's columns.
    ///
    /// Extra-mode columns are filled for every row, zero where a song has no
    /// events in that mode.
    pub fn records(&self) -> Vec<SongTimeRecord<'_>> {
        self.rows
            .iter()
            .map(|row| SongTimeRecord {
                row,
                extra_modes: &self.extra_modes,
                column_stems: &self.column_stems,
            })
            .collect()
    }
}

/// Column-ordered view of one [`SongTimeRow`] within its table.
pub struct SongTimeRecord<'a> {
    row: &'a SongTimeRow,
    extra_modes: &'a [String],
    column_stems: &'a [String],
}

impl Serialize for SongTimeRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let row = self.row;
        let mut map = serializer.serialize_map(Some(7 + 2 * self.extra_modes.len()))?;
        map.serialize_entry("song_id", &row.song_id)?;
        map.serialize_entry("title", &row.title)?;
        map.serialize_entry("practice_min", &row.practice_min)?;
        map.serialize_entry("play_min", &row.play_min)?;
        map.serialize_entry("total_min", &row.total_min)?;
        for (mode, stem) in self.extra_modes.iter().zip(self.column_stems) {
            map.serialize_entry(&format!("{}_min", stem), &row.minutes_for(mode))?;
        }
        map.serialize_entry("practice_sessions", &row.practice_sessions)?;
        map.serialize_entry("play_sessions", &row.play_sessions)?;
        for (mode, stem) in self.extra_modes.iter().zip(self.column_stems) {
            map.serialize_entry(&format!("{}_sessions", stem), &row.sessions_for(mode))?;
        }
        map.end()
    }
}

/// Pivot the per-mode summary into one row per song.
///
/// Builds a `mode → (sum, count)` mapping per `(song_id, title)`, then
/// projects the canonical columns and a total over every mode. Rows are
/// ordered by practice minutes descending; ties keep song-id order.
pub fn build_song_minutes_table(summary: &[SongModeSummary]) -> SongTimeTable {
    let mut per_song: BTreeMap<(&str, Option<&str>), BTreeMap<&str, ModeTotals>> =
        BTreeMap::new();
    let mut extra_modes: BTreeSet<&str> = BTreeSet::new();

    for group in summary {
        let modes = per_song
            .entry((group.song_id.as_str(), group.title.as_deref()))
            .or_default();
        let totals = modes.entry(group.play_mode.as_str()).or_default();
        totals.total_duration_sec += group.total_duration_sec;
        totals.sessions += group.sessions;

        if !is_canonical_mode(&group.play_mode) {
            extra_modes.insert(group.play_mode.as_str());
        }
    }

    let mut rows: Vec<SongTimeRow> = per_song
        .into_iter()
        .map(|((song_id, title), modes)| {
            let practice = modes.get(PLAY_MODE_PRACTICE).copied().unwrap_or_default();
            let play = modes.get(PLAY_MODE_PLAY).copied().unwrap_or_default();
            let total_min: f64 = modes.values().map(ModeTotals::minutes).sum();
            let other_modes = modes
                .iter()
                .filter(|(mode, _)| !is_canonical_mode(mode))
                .map(|(mode, totals)| (mode.to_string(), *totals))
                .collect();

            SongTimeRow {
                song_id: song_id.to_string(),
                title: title.map(str::to_string),
                practice_min: practice.minutes(),
                play_min: play.minutes(),
                total_min,
                practice_sessions: practice.sessions,
                play_sessions: play.sessions,
                other_modes,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.practice_min
            .partial_cmp(&a.practice_min)
            .unwrap_or(Ordering::Equal)
    });

    let extra_modes: Vec<String> = extra_modes.into_iter().map(str::to_string).collect();
    SongTimeTable {
        column_stems: mode_column_stems(&extra_modes),
        extra_modes,
        rows,
    }
}

/// Full song time split: title resolution, grouping and pivot.
pub fn song_time_split(events: &[SongEvent]) -> SongTimeTable {
    build_song_minutes_table(&song_time_summary(events))
}

fn is_canonical_mode(mode: &str) -> bool {
    mode == PLAY_MODE_PRACTICE || mode == PLAY_MODE_PLAY
}

/// Column stem for each extra mode, e.g. `jam` → `jam` (`jam_min`,
/// `jam_sessions`).
///
/// A mode literally named `total` would shadow `total_min`, so it is
/// renamed by appending `_mode` until the stem is not taken by any other
/// mode. Stems are unique, so no mode loses its columns.
pub fn mode_column_stems(modes: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = modes
        .iter()
        .filter(|m| m.as_str() != RESERVED_STEM)
        .cloned()
        .collect();

    modes
        .iter()
        .map(|mode| {
            if mode != RESERVED_STEM {
                return mode.clone();
            }
            let mut stem = format!("{}_mode", mode);
            while taken.contains(&stem) {
                stem.push_str("_mode");
            }
            debug!("Play mode {:?} reported under column stem {:?}", mode, stem);
            taken.insert(stem.clone());
            stem
        })
        .collect()
}

const RESERVED_STEM: &str = "total";

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::models::UNKNOWN_PLAY_MODE;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn history(instrument: &str, item_type: &str, name: Option<&str>, time: &str) -> HistoryRecord {
        HistoryRecord {
            instrument: Some(instrument.to_string()),
            item_type: Some(item_type.to_string()),
            item_name: name.map(str::to_string),
            time: Some(ts(time)),
        }
    }

    fn played(song_id: &str, mode: Option<&str>, duration: u64) -> SongEvent {
        SongEvent {
            event: Some("song_played".to_string()),
            song_id: Some(song_id.to_string()),
            title: None,
            play_mode: mode.unwrap_or(UNKNOWN_PLAY_MODE).to_string(),
            duration_sec: duration,
        }
    }

    fn titled(song_id: &str, title: Option<&str>) -> SongEvent {
        SongEvent {
            event: Some("song_opened".to_string()),
            song_id: Some(song_id.to_string()),
            title: title.map(str::to_string),
            play_mode: UNKNOWN_PLAY_MODE.to_string(),
            duration_sec: 0,
        }
    }

    // ── songs_by_instrument ───────────────────────────────────────────────────

    #[test]
    fn test_songs_empty_input() {
        let rows = songs_by_instrument(&[]);
        assert!(rows.is_empty());
        assert_eq!(SongPlayRow::COLUMNS.len(), 5);
    }

    #[test]
    fn test_songs_counts_and_extrema() {
        let recs = vec![
            history("guitar", "song", Some("Wonderwall"), "2024-01-03T10:00:00Z"),
            history("guitar", "song", Some("Wonderwall"), "2024-01-01T10:00:00Z"),
            history("guitar", "song", Some("Wonderwall"), "2024-01-05T10:00:00Z"),
        ];

        let rows = songs_by_instrument(&recs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].plays, 3);
        assert_eq!(rows[0].first_play, Some(ts("2024-01-01T10:00:00Z")));
        assert_eq!(rows[0].last_play, Some(ts("2024-01-05T10:00:00Z")));
    }

    #[test]
    fn test_songs_single_play_first_equals_last() {
        let recs = vec![history("piano", "song", Some("Clocks"), "2024-02-02T09:00:00Z")];
        let rows = songs_by_instrument(&recs);
        assert_eq!(rows[0].first_play, rows[0].last_play);
    }

    #[test]
    fn test_songs_filters_non_songs_and_nameless() {
        let recs = vec![
            history("guitar", "exercise", Some("Scales"), "2024-01-01T10:00:00Z"),
            history("guitar", "song", None, "2024-01-01T10:00:00Z"),
            history("guitar", "song", Some("Creep"), "2024-01-01T10:00:00Z"),
        ];
        let rows = songs_by_instrument(&recs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_name, "Creep");
    }

    #[test]
    fn test_songs_skips_null_instrument() {
        let mut rec = history("guitar", "song", Some("Creep"), "2024-01-01T10:00:00Z");
        rec.instrument = None;
        assert!(songs_by_instrument(&[rec]).is_empty());
    }

    #[test]
    fn test_songs_null_time_counts_but_no_extrema() {
        let mut rec = history("bass", "song", Some("Money"), "2024-01-01T10:00:00Z");
        rec.time = None;
        let rows = songs_by_instrument(&[rec]);
        assert_eq!(rows[0].plays, 1);
        assert!(rows[0].first_play.is_none());
        assert!(rows[0].last_play.is_none());
    }

    #[test]
    fn test_songs_sort_order_with_stable_ties() {
        let t = "2024-01-01T10:00:00Z";
        let recs = vec![
            history("piano", "song", Some("Z"), t),
            history("guitar", "song", Some("B"), t),
            history("guitar", "song", Some("C"), t),
            history("guitar", "song", Some("C"), t),
            history("guitar", "song", Some("A"), t),
        ];

        let order: Vec<(String, String, u64)> = songs_by_instrument(&recs)
            .into_iter()
            .map(|r| (r.instrument, r.item_name, r.plays))
            .collect();
        assert_eq!(
            order,
            vec![
                ("guitar".to_string(), "C".to_string(), 2),
                ("guitar".to_string(), "A".to_string(), 1),
                ("guitar".to_string(), "B".to_string(), 1),
                ("piano".to_string(), "Z".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_songs_by_plays() {
        let t = "2024-01-01T10:00:00Z";
        let recs = vec![
            history("guitar", "song", Some("A"), t),
            history("piano", "song", Some("B"), t),
            history("piano", "song", Some("B"), t),
        ];
        let rows = songs_by_instrument(&recs);
        let top = top_songs_by_plays(&rows, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].item_name, "B");
    }

    // ── practice_time_by_week ─────────────────────────────────────────────────

    fn stats(instrument: &str, week: &str, duration: u64) -> StatsRecord {
        StatsRecord {
            instrument: Some(instrument.to_string()),
            week: Some(ts(week)),
            duration_sec: duration,
            stars: 1,
            notes: 2,
            chords: 3,
        }
    }

    #[test]
    fn test_weekly_empty_input() {
        assert!(practice_time_by_week(&[]).is_empty());
        assert!(WeeklyPracticeRow::COLUMNS.contains(&"duration_min"));
    }

    #[test]
    fn test_weekly_appends_minutes_and_keeps_duplicates() {
        let recs = vec![
            stats("guitar", "2024-01-08T00:00:00Z", 1800),
            stats("guitar", "2024-01-08T00:00:00Z", 600),
        ];
        let rows = practice_time_by_week(&recs);
        assert_eq!(rows.len(), 2);
        assert!((rows[0].duration_min - 30.0).abs() < 1e-9);
        assert!((rows[1].duration_min - 10.0).abs() < 1e-9);
        assert_eq!(rows[0].chords, 3);
    }

    #[test]
    fn test_weekly_series_sorted_per_instrument() {
        let recs = vec![
            stats("piano", "2024-01-15T00:00:00Z", 60),
            stats("guitar", "2024-01-15T00:00:00Z", 120),
            stats("guitar", "2024-01-08T00:00:00Z", 180),
        ];
        let series = weekly_series(&practice_time_by_week(&recs));

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].instrument, "guitar");
        assert_eq!(series[0].points[0].0, ts("2024-01-08T00:00:00Z"));
        assert!((series[0].points[0].1 - 3.0).abs() < 1e-9);
        assert_eq!(series[1].instrument, "piano");
    }

    // ── song_time_summary ─────────────────────────────────────────────────────

    #[test]
    fn test_title_first_non_null_wins() {
        let events = vec![
            titled("7", None),
            titled("7", Some("Wonderwall")),
            titled("7", Some("Other")),
            played("7", Some("practice"), 60),
        ];
        let summary = song_time_summary(&events);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].title.as_deref(), Some("Wonderwall"));
    }

    #[test]
    fn test_title_resolved_from_later_event() {
        let events = vec![played("9", Some("play"), 30), titled("9", Some("Late Title"))];
        let summary = song_time_summary(&events);
        assert_eq!(summary[0].title.as_deref(), Some("Late Title"));
    }

    #[test]
    fn test_summary_groups_and_counts() {
        let events = vec![
            played("1", Some("practice"), 100),
            played("1", Some("practice"), 20),
            played("1", None, 5),
            titled("1", Some("Song One")),
        ];
        let summary = song_time_summary(&events);

        assert_eq!(summary.len(), 2);
        let practice = summary.iter().find(|s| s.play_mode == "practice").unwrap();
        assert_eq!(practice.total_duration_sec, 120);
        assert_eq!(practice.sessions, 2);
        let unknown = summary.iter().find(|s| s.play_mode == "unknown").unwrap();
        assert_eq!(unknown.sessions, 1);
    }

    #[test]
    fn test_summary_ignores_other_events_and_missing_ids() {
        let mut no_id = played("x", Some("play"), 50);
        no_id.song_id = None;
        let mut other = played("2", Some("play"), 50);
        other.event = Some("song_paused".to_string());

        assert!(song_time_summary(&[no_id, other]).is_empty());
    }

    // ── build_song_minutes_table ──────────────────────────────────────────────

    #[test]
    fn test_song_minutes_empty_has_canonical_columns() {
        let table = song_time_split(&[]);
        assert!(table.is_empty());
        assert_eq!(
            table.columns(),
            vec![
                "song_id",
                "title",
                "practice_min",
                "play_min",
                "total_min",
                "practice_sessions",
                "play_sessions",
            ]
        );
    }

    #[test]
    fn test_song_minutes_practice_and_play() {
        let events = vec![
            played("5", Some("practice"), 120),
            played("5", Some("play"), 60),
        ];
        let table = song_time_split(&events);

        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert!((row.practice_min - 2.0).abs() < 1e-9);
        assert!((row.play_min - 1.0).abs() < 1e-9);
        assert!((row.total_min - 3.0).abs() < 1e-9);
        assert_eq!(row.practice_sessions, 1);
        assert_eq!(row.play_sessions, 1);
    }

    #[test]
    fn test_song_minutes_unknown_mode_tolerated() {
        let events = vec![played("8", Some("jam"), 30)];
        let table = song_time_split(&events);

        assert_eq!(table.extra_modes, vec!["jam"]);
        assert!(table.columns().contains(&"jam_min".to_string()));
        assert!(table.columns().contains(&"jam_sessions".to_string()));

        let row = &table.rows[0];
        assert!((row.minutes_for("jam") - 0.5).abs() < 1e-9);
        assert!((row.total_min - 0.5).abs() < 1e-9);
        assert_eq!(row.practice_min, 0.0);
        assert_eq!(row.play_min, 0.0);
        assert_eq!(row.practice_sessions, 0);
        assert_eq!(row.play_sessions, 0);
    }

    #[test]
    fn test_song_minutes_duration_not_a_number_contributes_zero() {
        // Normalization turns "not-a-number" into 0.
        let events = vec![played("3", Some("practice"), 0), played("3", Some("practice"), 90)];
        let summary = song_time_summary(&events);
        assert_eq!(summary[0].total_duration_sec, 90);
        assert_eq!(summary[0].sessions, 2);
    }

    #[test]
    fn test_song_minutes_sorted_by_practice_desc() {
        let events = vec![
            played("a", Some("practice"), 60),
            played("b", Some("practice"), 600),
            played("c", Some("play"), 6000),
        ];
        let table = song_time_split(&events);
        let ids: Vec<&str> = table.rows.iter().map(|r| r.song_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(table.top(2).len(), 2);
        assert_eq!(table.top(10).len(), 3);
    }

    #[test]
    fn test_song_minutes_untitled_song_kept() {
        let table = song_time_split(&[played("42", Some("play"), 60)]);
        assert!(table.rows[0].title.is_none());
        assert_eq!(table.rows[0].display_title(), "42");
    }

    #[test]
    fn test_song_minutes_records_fill_extra_columns() {
        let events = vec![played("1", Some("jam"), 60), played("2", Some("practice"), 60)];
        let table = song_time_split(&events);
        let json = serde_json::to_value(table.records()).unwrap();

        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        for row in rows {
            let obj = row.as_object().unwrap();
            assert_eq!(obj.len(), table.columns().len());
            assert!(obj.contains_key("jam_min"));
            assert!(obj.contains_key("jam_sessions"));
        }
        let song_two = rows.iter().find(|r| r["song_id"] == "2").unwrap();
        assert_eq!(song_two["jam_min"], 0.0);
    }

    #[test]
    fn test_mode_column_total_is_renamed() {
        let modes = vec!["jam".to_string(), "total".to_string()];
        assert_eq!(mode_column_stems(&modes), vec!["jam", "total_mode"]);
    }

    #[test]
    fn test_total_mode_does_not_collide_with_real_mode() {
        let events = vec![
            played("1", Some("total"), 60),
            played("1", Some("total_mode"), 120),
            played("1", Some("total_mode_mode"), 180),
        ];
        let table = song_time_split(&events);

        let columns = table.columns();
        let unique: HashSet<&String> = columns.iter().collect();
        assert_eq!(unique.len(), columns.len());
        assert!(columns.contains(&"total_mode_mode_mode_min".to_string()));

        let records = serde_json::to_value(table.records()).unwrap();
        let row = records[0].as_object().unwrap();
        assert_eq!(row.len(), columns.len());
        assert_eq!(row["total_mode_min"], 2.0);
        assert_eq!(row["total_mode_mode_min"], 3.0);
        assert_eq!(row["total_mode_mode_mode_min"], 1.0);
        assert_eq!(row["total_min"], 6.0);
    }
}
