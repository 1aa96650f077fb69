use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative notes placed either side of the application title.
pub const NOTES: &str = "♪ ♫ ♪";

/// Dashboard header rendering three lines:
///
/// 1. Application title between note decorations.
/// 2. A 60-column `=` separator.
/// 3. Active filter and display timezone in `[ instruments | timezone ]` format.
pub struct Header<'a> {
    /// Instrument filter label, e.g. `"all"` or `"guitar, piano"`.
    pub instruments: &'a str,
    /// Display timezone name.
    pub timezone: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(instruments: &'a str, timezone: &'a str, theme: &'a Theme) -> Self {
        Self {
            instruments,
            timezone,
            theme,
        }
    }

    /// Number of lines [`to_lines`](Self::to_lines) produces.
    pub const HEIGHT: u16 = 3;

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(NOTES, self.theme.header_accent),
                Span::styled(" PRACTICE DASHBOARD ", self.theme.header),
                Span::styled(NOTES, self.theme.header_accent),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.instruments.to_string(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone.to_string(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
