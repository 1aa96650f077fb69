use crate::themes::Theme;
use practice_core::formatting::format_ratio;
use practice_data::progress::SectionProgress;
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of a section bar.
pub struct ProgressBarConfig {
    /// Width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── SectionBar ───────────────────────────────────────────────────────────────

/// One exercise section drawn as `Section N  ████░░░░ 50%`.
///
/// Ratios outside `[0, 1]` are clamped for the fill; the label shows the
/// value as recorded.
pub struct SectionBar<'a> {
    pub section: i64,
    pub ratio: f64,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
}

impl<'a> SectionBar<'a> {
    pub fn new(progress: &SectionProgress, theme: &'a Theme) -> Self {
        Self {
            section: progress.section,
            ratio: progress.ratio,
            theme,
            config: ProgressBarConfig::default(),
        }
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.config.width = width;
        self
    }

    /// Number of filled cells for the current ratio and width.
    pub fn filled_cells(&self) -> u16 {
        let clamped = if self.ratio.is_finite() {
            self.ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        (clamped * self.config.width as f64).round() as u16
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled_cells();
        let empty = self.config.width.saturating_sub(filled);

        Line::from(vec![
            Span::styled(format!("Section {:>3}  ", self.section), self.theme.label),
            Span::styled(
                self.config.filled_char.to_string().repeat(filled as usize),
                self.theme.progress_style(self.ratio),
            ),
            Span::styled(
                self.config.empty_char.to_string().repeat(empty as usize),
                self.theme.progress_empty,
            ),
            Span::styled(
                format!(" {}", format_ratio(self.ratio)),
                self.theme.progress_label,
            ),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
