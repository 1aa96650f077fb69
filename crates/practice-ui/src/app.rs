//! Main application state and TUI event loop for the practice dashboard.
//!
//! [`App`] owns the theme, the active tab and the selector state (instrument
//! filter, exercise). Every frame recomputes the active tab's table from the
//! [`DashboardContext`] through the runtime views.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame, Terminal,
};

use practice_core::formatting::title_case;
use practice_core::time_utils::TimezoneHandler;
use practice_data::catalog::InstrumentFilter;
use practice_runtime::context::DashboardContext;
use practice_runtime::views;

use crate::components::header::Header;
use crate::table_view;
use crate::themes::Theme;

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Which table the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Songs,
    SongMinutes,
    Weekly,
    Exercise,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Songs, Tab::SongMinutes, Tab::Weekly, Tab::Exercise];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Songs => "Songs",
            Tab::SongMinutes => "Song Minutes",
            Tab::Weekly => "Weekly Practice",
            Tab::Exercise => "Exercise",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub tab: Tab,
    /// Display timezone for timestamps.
    pub timezone: TimezoneHandler,
    pub filter: InstrumentFilter,
    /// Instruments available to the filter, refreshed on reload.
    pub instruments: Vec<String>,
    /// Exercise ids available to the selector, refreshed on reload.
    pub exercise_ids: Vec<String>,
    pub selected_exercise: usize,
    /// First visible table row on the table tabs.
    pub scroll: usize,
    /// Bar count for the top-N charts.
    pub top_n: usize,
    /// One-line status shown in the footer (reload results).
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Construct the application for an already loaded context.
    ///
    /// `exercise` preselects an exercise id; when absent or unknown the first
    /// exercise is selected.
    pub fn new(
        theme_name: &str,
        timezone: &str,
        filter: InstrumentFilter,
        exercise: Option<&str>,
        top_n: usize,
        ctx: &DashboardContext,
    ) -> Self {
        let exercise_ids = ctx.exercise_ids();
        let selected_exercise = exercise
            .and_then(|id| exercise_ids.iter().position(|e| e == id))
            .unwrap_or(0);

        Self {
            theme: Theme::from_name(theme_name),
            tab: Tab::Songs,
            timezone: TimezoneHandler::new(timezone),
            filter,
            instruments: ctx.instruments(),
            exercise_ids,
            selected_exercise,
            scroll: 0,
            top_n,
            status: None,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// on the current thread.
    pub async fn run(mut self, mut ctx: DashboardContext) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame, &ctx)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key, &mut ctx),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut DashboardContext) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.switch_tab(self.tab.next()),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.tab.previous()),
            KeyCode::Char('i') => self.cycle_instrument(),
            KeyCode::Up => self.move_selection(-1, ctx),
            KeyCode::Down => self.move_selection(1, ctx),
            KeyCode::Char('r') => self.reload(ctx),
            _ => {}
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.scroll = 0;
    }

    /// Step the filter through all → each instrument → all.
    pub fn cycle_instrument(&mut self) {
        let current = match self.filter.selected() {
            [single] => self.instruments.iter().position(|i| i == single),
            _ => None,
        };
        let next = match current {
            None if self.filter.is_all() => self.instruments.first(),
            None => None,
            Some(idx) => self.instruments.get(idx + 1),
        };
        self.filter = match next {
            Some(instrument) => InstrumentFilter::new(vec![instrument.clone()]),
            None => InstrumentFilter::all(),
        };
        self.scroll = 0;
        tracing::debug!(filter = %self.filter.label(), "instrument filter changed");
    }

    /// Move the exercise selection on the exercise tab, scroll elsewhere.
    ///
    /// Scrolling stops at the last row of the active table.
    pub fn move_selection(&mut self, delta: isize, ctx: &DashboardContext) {
        if self.tab == Tab::Exercise {
            if self.exercise_ids.is_empty() {
                return;
            }
            let last = self.exercise_ids.len() - 1;
            self.selected_exercise = self
                .selected_exercise
                .saturating_add_signed(delta)
                .min(last);
        } else {
            let last = self.row_count(ctx).saturating_sub(1);
            self.scroll = self.scroll.saturating_add_signed(delta).min(last);
        }
    }

    /// Rows in the table of the active tab.
    fn row_count(&self, ctx: &DashboardContext) -> usize {
        match self.tab {
            Tab::Songs => views::song_plays(ctx, &self.filter).len(),
            Tab::SongMinutes => views::song_minutes(ctx).rows.len(),
            Tab::Weekly => views::weekly_practice(ctx, &self.filter).len(),
            Tab::Exercise => self.exercise_ids.len(),
        }
    }

    /// Re-read the exports; on failure the previous data stays on screen.
    pub fn reload(&mut self, ctx: &mut DashboardContext) {
        let selected_id = self.selected_exercise_id().map(str::to_string);
        match ctx.reload() {
            Ok(()) => {
                self.instruments = ctx.instruments();
                self.exercise_ids = ctx.exercise_ids();
                self.selected_exercise = selected_id
                    .and_then(|id| self.exercise_ids.iter().position(|e| *e == id))
                    .unwrap_or(0);
                self.scroll = 0;
                self.status = Some("Reloaded exports.".to_string());
            }
            Err(e) => {
                self.status = Some(format!("Reload failed: {}", e));
            }
        }
    }

    pub fn selected_exercise_id(&self) -> Option<&str> {
        self.exercise_ids
            .get(self.selected_exercise)
            .map(String::as_str)
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render header, tab bar, the active tab and the footer.
    pub fn render(&self, frame: &mut Frame, ctx: &DashboardContext) {
        let [header_area, tabs_area, body_area, footer_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Header::HEIGHT),
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .areas(frame.area());

        let filter_label = if self.filter.is_all() {
            "all instruments".to_string()
        } else {
            title_case(&self.filter.label())
        };
        let tz_name = self.timezone.display_tz().name().to_string();
        let header = Header::new(&filter_label, &tz_name, &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .select(self.tab.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active);
        frame.render_widget(tabs, tabs_area);

        self.render_body(frame, body_area, ctx);
        self.render_footer(frame, footer_area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect, ctx: &DashboardContext) {
        match self.tab {
            Tab::Songs => {
                let rows = views::song_plays(ctx, &self.filter);
                let top = views::top_song_plays(ctx, &self.filter, self.top_n);
                table_view::render_song_plays(
                    frame,
                    area,
                    &rows,
                    &top,
                    &self.timezone,
                    self.scroll,
                    &self.theme,
                );
            }
            Tab::SongMinutes => {
                let table = views::song_minutes(ctx);
                table_view::render_song_minutes(
                    frame,
                    area,
                    &table,
                    self.top_n,
                    self.scroll,
                    &self.theme,
                );
            }
            Tab::Weekly => {
                let rows = views::weekly_practice(ctx, &self.filter);
                let series = views::weekly_chart(ctx, &self.filter);
                table_view::render_weekly(
                    frame,
                    area,
                    &rows,
                    &series,
                    &self.timezone,
                    self.scroll,
                    &self.theme,
                );
            }
            Tab::Exercise => {
                let lookup = views::exercise_progress(ctx, self.selected_exercise_id());
                table_view::render_exercise(
                    frame,
                    area,
                    &self.exercise_ids,
                    self.selected_exercise,
                    &lookup,
                    &self.timezone,
                    &self.theme,
                );
            }
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            "Tab switch view · i instrument · ↑/↓ select · r reload · q quit",
            self.theme.dim,
        )];
        if let Some(status) = &self.status {
            let style = if status.starts_with("Reload failed") {
                self.theme.error
            } else {
                self.theme.info
            };
            spans.push(Span::styled("   ", self.theme.dim));
            spans.push(Span::styled(status.clone(), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
