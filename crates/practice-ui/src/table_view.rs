//! Tab bodies for the practice dashboard.
//!
//! Each renderer takes already-computed rows and draws them; no aggregation
//! happens here.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{Axis, BarChart, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use practice_core::formatting::{format_minutes, format_number, format_ratio, title_case};
use practice_core::time_utils::TimezoneHandler;
use practice_data::aggregator::{
    InstrumentSeries, SongPlayRow, SongTimeTable, WeeklyPracticeRow,
};
use practice_data::progress::ProgressLookup;

use crate::components::progress_bar::SectionBar;
use crate::themes::Theme;

/// Height of the top-N bar charts above the song tables.
const CHART_HEIGHT: u16 = 12;

/// Maximum display width of a song title in tables and chart labels.
const TITLE_WIDTH: usize = 32;

// ── Songs ─────────────────────────────────────────────────────────────────────

/// Top-N plays bar chart above the full song-plays table.
pub fn render_song_plays(
    frame: &mut Frame,
    area: Rect,
    rows: &[SongPlayRow],
    top: &[SongPlayRow],
    tz: &TimezoneHandler,
    scroll: usize,
    theme: &Theme,
) {
    if rows.is_empty() {
        render_no_data(frame, area, "No song plays found.", theme);
        return;
    }

    let [chart_area, table_area] = split_chart_table(area);

    let labels: Vec<String> = top
        .iter()
        .map(|r| truncate_to_width(&r.item_name, 12))
        .collect();
    let bars: Vec<(&str, u64)> = labels
        .iter()
        .zip(top)
        .map(|(label, row)| (label.as_str(), row.plays))
        .collect();
    let chart = BarChart::default()
        .block(titled_block(&format!("Top {} Songs by Plays", top.len())))
        .bar_width(6)
        .bar_gap(1)
        .bar_style(theme.bar)
        .value_style(theme.value)
        .label_style(theme.label)
        .data(bars.as_slice());
    frame.render_widget(chart, chart_area);

    let header = header_row(&["Instrument", "Song", "Plays", "First Play", "Last Play"], theme);
    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .skip(scroll)
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(title_case(&row.instrument)),
                Cell::from(truncate_to_width(&row.item_name, TITLE_WIDTH)),
                Cell::from(format_number(row.plays as f64, 0)),
                Cell::from(tz.format_datetime(row.first_play)),
                Cell::from(tz.format_datetime(row.last_play)),
            ])
            .style(row_style(i, theme))
        })
        .collect();
    let widths = [
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(18),
        Constraint::Length(18),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .block(titled_block("Songs by Instrument"))
        .style(theme.text);
    frame.render_widget(table, table_area);
}

// ── Song minutes ──────────────────────────────────────────────────────────────

/// Practice-minutes bar chart above the practice-versus-play table.
///
/// Columns for modes other than `practice` and `play` are appended after
/// the fixed ones.
pub fn render_song_minutes(
    frame: &mut Frame,
    area: Rect,
    table: &SongTimeTable,
    top_n: usize,
    scroll: usize,
    theme: &Theme,
) {
    if table.is_empty() {
        render_no_data(frame, area, "No song_played events found.", theme);
        return;
    }

    let [chart_area, table_area] = split_chart_table(area);

    let top = table.top(top_n);
    let labels: Vec<String> = top
        .iter()
        .map(|r| truncate_to_width(r.display_title(), 12))
        .collect();
    let bars: Vec<(&str, u64)> = labels
        .iter()
        .zip(top)
        .map(|(label, row)| (label.as_str(), row.practice_min.round() as u64))
        .collect();
    let chart = BarChart::default()
        .block(titled_block(&format!("Top {} Songs by Practice Minutes", top.len())))
        .bar_width(6)
        .bar_gap(1)
        .bar_style(theme.bar)
        .value_style(theme.value)
        .label_style(theme.label)
        .data(bars.as_slice());
    frame.render_widget(chart, chart_area);

    let mut titles: Vec<String> = vec![
        "Song".to_string(),
        "Practice".to_string(),
        "Play".to_string(),
        "Total".to_string(),
    ];
    titles.extend(table.extra_modes.iter().map(|m| title_case(m)));
    titles.push("Practice #".to_string());
    titles.push("Play #".to_string());
    let title_refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    let header = header_row(&title_refs, theme);

    let body: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .skip(scroll)
        .map(|(i, row)| {
            let mut cells = vec![
                Cell::from(truncate_to_width(row.display_title(), TITLE_WIDTH)),
                Cell::from(format_minutes(row.practice_min)),
                Cell::from(format_minutes(row.play_min)),
                Cell::from(format_minutes(row.total_min)),
            ];
            cells.extend(
                table
                    .extra_modes
                    .iter()
                    .map(|m| Cell::from(format_minutes(row.minutes_for(m)))),
            );
            cells.push(Cell::from(row.practice_sessions.to_string()));
            cells.push(Cell::from(row.play_sessions.to_string()));
            Row::new(cells).style(row_style(i, theme))
        })
        .collect();

    let mut widths = vec![Constraint::Min(20)];
    widths.extend(std::iter::repeat(Constraint::Length(10)).take(titles.len() - 1));

    let widget = Table::new(body, widths)
        .header(header)
        .block(titled_block("Practice vs Play Minutes"))
        .style(theme.text);
    frame.render_widget(widget, table_area);
}

// ── Weekly practice ───────────────────────────────────────────────────────────

/// One line per instrument of weekly minutes, above the weekly rows.
pub fn render_weekly(
    frame: &mut Frame,
    area: Rect,
    rows: &[WeeklyPracticeRow],
    series: &[InstrumentSeries],
    tz: &TimezoneHandler,
    scroll: usize,
    theme: &Theme,
) {
    if rows.is_empty() {
        render_no_data(frame, area, "No weekly practice stats found.", theme);
        return;
    }

    let [chart_area, table_area] = split_chart_table(area);

    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .map(|(week, minutes)| (week.timestamp() as f64, *minutes))
                .collect()
        })
        .collect();
    let datasets: Vec<Dataset> = series
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (s, data))| {
            Dataset::default()
                .name(title_case(&s.instrument))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.series_color(i)))
                .data(data)
        })
        .collect();

    let weeks = series.iter().flat_map(|s| s.points.iter().map(|(w, _)| *w));
    let first = weeks.clone().min();
    let last = weeks.max();
    let x_bounds = match (first, last) {
        (Some(a), Some(b)) if a < b => [a.timestamp() as f64, b.timestamp() as f64],
        (Some(a), _) => [a.timestamp() as f64 - 1.0, a.timestamp() as f64 + 1.0],
        _ => [0.0, 1.0],
    };
    let max_minutes = points
        .iter()
        .flatten()
        .map(|(_, m)| *m)
        .fold(0.0_f64, f64::max);
    let y_top = if max_minutes > 0.0 { max_minutes * 1.1 } else { 1.0 };

    let chart = Chart::new(datasets)
        .block(titled_block("Practice Minutes per Week"))
        .x_axis(
            Axis::default()
                .style(theme.dim)
                .bounds(x_bounds)
                .labels(vec![tz.format_date(first), tz.format_date(last)]),
        )
        .y_axis(
            Axis::default()
                .style(theme.dim)
                .bounds([0.0, y_top])
                .labels(vec!["0".to_string(), format_minutes(y_top)]),
        );
    frame.render_widget(chart, chart_area);

    let header = header_row(
        &["Instrument", "Week", "Minutes", "Stars", "Notes", "Chords"],
        theme,
    );
    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .skip(scroll)
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(
                    row.instrument
                        .as_deref()
                        .map(title_case)
                        .unwrap_or_else(|| "n/a".to_string()),
                ),
                Cell::from(tz.format_date(row.week)),
                Cell::from(format_minutes(row.duration_min)),
                Cell::from(format_number(row.stars as f64, 0)),
                Cell::from(format_number(row.notes as f64, 0)),
                Cell::from(format_number(row.chords as f64, 0)),
            ])
            .style(row_style(i, theme))
        })
        .collect();
    let widths = [
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .block(titled_block("Weekly Practice"))
        .style(theme.text);
    frame.render_widget(table, table_area);
}

// ── Exercise progress ─────────────────────────────────────────────────────────

/// Exercise selector on the left, latest section progress on the right.
pub fn render_exercise(
    frame: &mut Frame,
    area: Rect,
    exercise_ids: &[String],
    selected: usize,
    lookup: &ProgressLookup,
    tz: &TimezoneHandler,
    theme: &Theme,
) {
    let [list_area, detail_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .areas(area);

    let list_rows: Vec<Row> = exercise_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let style = if i == selected {
                theme.table_selected
            } else {
                row_style(i, theme)
            };
            Row::new(vec![Cell::from(truncate_to_width(id, 26))]).style(style)
        })
        .collect();
    let list = Table::new(list_rows, [Constraint::Min(10)])
        .block(titled_block("Exercises"))
        .style(theme.text);
    frame.render_widget(list, list_area);

    let ProgressLookup::Found(snapshot) = lookup else {
        render_no_data(frame, detail_area, &lookup.to_string(), theme);
        return;
    };

    let bar_width = detail_area.width.saturating_sub(22).clamp(10, 50);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Instrument: ", theme.label),
            Span::styled(
                snapshot
                    .instrument
                    .as_deref()
                    .map(title_case)
                    .unwrap_or_else(|| "n/a".to_string()),
                theme.value,
            ),
            Span::styled("   Success: ", theme.label),
            Span::styled(
                snapshot
                    .success_ratio
                    .map(format_ratio)
                    .unwrap_or_else(|| "n/a".to_string()),
                theme.value,
            ),
            Span::styled("   Updated: ", theme.label),
            Span::styled(tz.format_datetime(snapshot.time), theme.value),
        ]),
        Line::from(""),
    ];
    lines.extend(
        snapshot
            .sections
            .iter()
            .map(|s| SectionBar::new(s, theme).with_width(bar_width).to_line()),
    );

    frame.render_widget(
        Paragraph::new(lines).block(titled_block(&format!("Sections: {}", snapshot.exercise_id))),
        detail_area,
    );
}

// ── Shared ────────────────────────────────────────────────────────────────────

/// Render a "no data" placeholder carrying `message`.
pub fn render_no_data(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Press 'r' to reload, Tab to switch views, 'q' to exit",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

/// Cut `s` to at most `max_width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return s.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn split_chart_table(area: Rect) -> [Rect; 2] {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CHART_HEIGHT), Constraint::Min(5)])
        .areas(area)
}

fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
}

fn header_row<'a>(titles: &[&'a str], theme: &Theme) -> Row<'a> {
    Row::new(
        titles
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1)
}

fn row_style(index: usize, theme: &Theme) -> Style {
    if index % 2 == 0 {
        theme.table_row
    } else {
        theme.table_row_alt
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use practice_core::models::SongEvent;
    use practice_data::aggregator::{practice_time_by_week, song_time_split, weekly_series};
    use practice_data::progress::{ExerciseSnapshot, SectionProgress};
    use practice_core::models::StatsRecord;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(130, 40)).unwrap()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn song_rows() -> Vec<SongPlayRow> {
        vec![
            SongPlayRow {
                instrument: "guitar".to_string(),
                item_name: "Wonderwall".to_string(),
                plays: 3,
                first_play: Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
                last_play: Some(Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap()),
            },
            SongPlayRow {
                instrument: "piano".to_string(),
                item_name: "Clocks".to_string(),
                plays: 1,
                first_play: None,
                last_play: None,
            },
        ]
    }

    fn played(id: &str, mode: &str, duration: u64) -> SongEvent {
        SongEvent {
            event: Some("song_played".to_string()),
            song_id: Some(id.to_string()),
            title: Some(format!("Song {}", id)),
            play_mode: mode.to_string(),
            duration_sec: duration,
        }
    }

    // ── truncate_to_width ─────────────────────────────────────────────────────

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_to_width("Clocks", 10), "Clocks");
    }

    #[test]
    fn test_truncate_long_string() {
        let out = truncate_to_width("Smells Like Teen Spirit", 10);
        assert_eq!(out, "Smells Li…");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK character is two columns wide.
        let out = truncate_to_width("夜に駆ける夜に駆ける", 7);
        assert_eq!(out, "夜に駆…");
    }

    // ── Render (does not panic) ───────────────────────────────────────────────

    #[test]
    fn test_render_song_plays() {
        let mut terminal = terminal();
        let theme = Theme::dark();
        let rows = song_rows();
        let tz = TimezoneHandler::default();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_song_plays(frame, area, &rows, &rows[..1], &tz, 0, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("Wonderwall"));
    }

    #[test]
    fn test_render_song_plays_empty_shows_message() {
        let mut terminal = terminal();
        let theme = Theme::dark();
        let tz = TimezoneHandler::default();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_song_plays(frame, area, &[], &[], &tz, 0, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("No song plays found."));
    }

    #[test]
    fn test_render_song_minutes_with_extra_mode() {
        let mut terminal = terminal();
        let theme = Theme::light();
        let table = song_time_split(&[
            played("1", "practice", 120),
            played("1", "play", 60),
            played("2", "jam", 30),
        ]);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_song_minutes(frame, area, &table, 20, 0, &theme);
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Song 1"));
        assert!(text.contains("Jam"));
    }

    #[test]
    fn test_render_weekly() {
        let mut terminal = terminal();
        let theme = Theme::classic();
        let tz = TimezoneHandler::default();
        let stats: Vec<StatsRecord> = (0..3)
            .map(|i| StatsRecord {
                instrument: Some("guitar".to_string()),
                week: Some(Utc.with_ymd_and_hms(2024, 1, 1 + 7 * i, 0, 0, 0).unwrap()),
                duration_sec: 600 * (i as u64 + 1),
                stars: 1,
                notes: 100,
                chords: 10,
            })
            .collect();
        let rows = practice_time_by_week(&stats);
        let series = weekly_series(&rows);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_weekly(frame, area, &rows, &series, &tz, 0, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("Weekly Practice"));
    }

    #[test]
    fn test_render_exercise_found() {
        let mut terminal = terminal();
        let theme = Theme::dark();
        let tz = TimezoneHandler::default();
        let lookup = ProgressLookup::Found(ExerciseSnapshot {
            exercise_id: "ex-1".to_string(),
            instrument: Some("guitar".to_string()),
            success_ratio: Some(0.8),
            time: None,
            sections: vec![
                SectionProgress { section: 1, ratio: 0.2 },
                SectionProgress { section: 2, ratio: 1.0 },
            ],
        });

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_exercise(frame, area, &["ex-1".to_string()], 0, &lookup, &tz, &theme);
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Section   2"));
        assert!(text.contains("80%"));
    }

    #[test]
    fn test_render_exercise_message() {
        let mut terminal = terminal();
        let theme = Theme::dark();
        let tz = TimezoneHandler::default();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_exercise(frame, area, &[], 0, &ProgressLookup::NoSelection, &tz, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("No exercise selected."));
    }
}
