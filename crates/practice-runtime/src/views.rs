//! Per-filter views over a [`DashboardContext`].
//!
//! Each function filters the normalized records and re-runs the matching
//! aggregator. Nothing is cached between calls.

use std::fmt;
use std::str::FromStr;

use practice_core::error::{PracticeError, Result};
use practice_data::aggregator::{
    practice_time_by_week, song_time_split, songs_by_instrument, top_songs_by_plays,
    weekly_series, InstrumentSeries, SongPlayRow, SongTimeTable, WeeklyPracticeRow,
};
use practice_data::catalog::InstrumentFilter;
use practice_data::progress::{latest_section_progress, ProgressLookup};
use serde::Serialize;
use serde_json::{json, Value};

use crate::context::DashboardContext;

// ── ViewKind ──────────────────────────────────────────────────────────────────

/// The tables the dashboard can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Songs,
    Weekly,
    SongMinutes,
    Exercise,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Songs,
        ViewKind::SongMinutes,
        ViewKind::Weekly,
        ViewKind::Exercise,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Songs => "songs",
            ViewKind::Weekly => "weekly",
            ViewKind::SongMinutes => "song-minutes",
            ViewKind::Exercise => "exercise",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = PracticeError;

    fn from_str(s: &str) -> Result<Self> {
        ViewKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PracticeError::Config(format!("unknown view: {}", s)))
    }
}

// ── Views ─────────────────────────────────────────────────────────────────────

/// Song plays per instrument for the selected instruments.
pub fn song_plays(ctx: &DashboardContext, filter: &InstrumentFilter) -> Vec<SongPlayRow> {
    songs_by_instrument(&filter.history(&ctx.history))
}

/// The most-played songs for the selected instruments.
pub fn top_song_plays(
    ctx: &DashboardContext,
    filter: &InstrumentFilter,
    limit: usize,
) -> Vec<SongPlayRow> {
    top_songs_by_plays(&song_plays(ctx, filter), limit)
}

/// Weekly practice rows for the selected instruments.
pub fn weekly_practice(ctx: &DashboardContext, filter: &InstrumentFilter) -> Vec<WeeklyPracticeRow> {
    practice_time_by_week(&filter.stats(&ctx.stats))
}

/// Weekly minutes split per instrument, for charting.
pub fn weekly_chart(ctx: &DashboardContext, filter: &InstrumentFilter) -> Vec<InstrumentSeries> {
    weekly_series(&weekly_practice(ctx, filter))
}

/// Practice-versus-play minutes per song.
///
/// Events carry no instrument, so this view ignores the instrument filter.
pub fn song_minutes(ctx: &DashboardContext) -> SongTimeTable {
    song_time_split(&ctx.events)
}

/// Section progress for `exercise_id`, or for the first exercise in the
/// export when none is given.
pub fn exercise_progress(ctx: &DashboardContext, exercise_id: Option<&str>) -> ProgressLookup {
    let default_id = ctx.exercise_ids().into_iter().next();
    let selected = exercise_id.or(default_id.as_deref());
    latest_section_progress(&ctx.exercise_progress, selected)
}

// ── JSON export ───────────────────────────────────────────────────────────────

/// Render one view as a JSON value.
///
/// Table views export `{"view", "columns", "rows"}` where each row is keyed
/// by the column names, so the schema is present even with zero rows. The
/// exercise view exports the snapshot when found and otherwise an object
/// carrying the no-data message.
pub fn export_json(
    ctx: &DashboardContext,
    kind: ViewKind,
    filter: &InstrumentFilter,
    exercise_id: Option<&str>,
) -> Result<Value> {
    let value = match kind {
        ViewKind::Songs => table_json(kind, &SongPlayRow::COLUMNS, song_plays(ctx, filter))?,
        ViewKind::Weekly => table_json(
            kind,
            &WeeklyPracticeRow::COLUMNS,
            weekly_practice(ctx, filter),
        )?,
        ViewKind::SongMinutes => {
            let table = song_minutes(ctx);
            table_json(kind, &table.columns(), table.records())?
        }
        ViewKind::Exercise => match exercise_progress(ctx, exercise_id) {
            ProgressLookup::Found(snapshot) => serde_json::to_value(snapshot)?,
            other => json!({ "message": other.to_string() }),
        },
    };
    Ok(value)
}

fn table_json<C, R>(kind: ViewKind, columns: &[C], rows: R) -> Result<Value>
where
    C: Serialize,
    R: Serialize,
{
    Ok(json!({
        "view": kind.as_str(),
        "columns": columns,
        "rows": serde_json::to_value(rows)?,
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
