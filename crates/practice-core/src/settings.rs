use clap::Parser;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name of the played-items export.
pub const HISTORY_FILE: &str = "history.json";
/// File name of the weekly stats export.
pub const STATS_FILE: &str = "stats.json";
/// File name of the exercise progress export.
pub const EXERCISE_PROGRESS_FILE: &str = "exercise_progress.json";
/// File name of the raw event stream.
pub const EVENTS_FILE: &str = "ysapi.jsonl";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Practice-session analytics dashboard for music-learning exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "practice-dash",
    about = "Practice-session analytics dashboard for music-learning exports",
    version
)]
pub struct Settings {
    /// Directory holding history.json, stats.json and exercise_progress.json
    #[arg(long, env = "YUSICIAN_DATA_ROOT", default_value = "data")]
    pub data_root: PathBuf,

    /// Directory holding ysapi.jsonl (defaults to the data root)
    #[arg(long, env = "YUSICIAN_EVENTS_ROOT")]
    pub events_root: Option<PathBuf>,

    /// What to show: the interactive dashboard, or one table as JSON
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "songs", "weekly", "song-minutes", "exercise"])]
    pub view: String,

    /// Only include these instruments (repeatable; default: all)
    #[arg(long = "instrument")]
    pub instruments: Vec<String>,

    /// Exercise id for the exercise view (default: first exercise found)
    #[arg(long)]
    pub exercise: Option<String>,

    /// Row limit for "top N" charts (1-500)
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(1..=500))]
    pub top: u32,

    /// Display timezone (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (logs go to stderr when unset)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args(args: Vec<OsString>) -> Self {
        Self::parse_from(args).resolve()
    }

    /// Resolve `"auto"` sentinels, expand `~/` in paths and apply `--debug`.
    pub fn resolve(mut self) -> Self {
        self.timezone = crate::time_utils::resolve_timezone(&self.timezone);
        self.data_root = expand_home(&self.data_root);
        self.events_root = self.events_root.as_deref().map(expand_home);
        self.log_file = self.log_file.as_deref().map(expand_home);
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    /// The input file locations these settings point at.
    pub fn data_paths(&self) -> DataPaths {
        DataPaths::new(self.data_root.clone(), self.events_root.clone())
    }
}

// ── DataPaths ──────────────────────────────────────────────────────────────────

/// The two configured roots and the four input files beneath them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    pub data_root: PathBuf,
    pub events_root: PathBuf,
}

impl DataPaths {
    /// Build paths; the events root falls back to the data root.
    pub fn new(data_root: PathBuf, events_root: Option<PathBuf>) -> Self {
        let events_root = events_root.unwrap_or_else(|| data_root.clone());
        Self {
            data_root,
            events_root,
        }
    }

    pub fn history(&self) -> PathBuf {
        self.data_root.join(HISTORY_FILE)
    }

    pub fn stats(&self) -> PathBuf {
        self.data_root.join(STATS_FILE)
    }

    pub fn exercise_progress(&self) -> PathBuf {
        self.data_root.join(EXERCISE_PROGRESS_FILE)
    }

    pub fn events(&self) -> PathBuf {
        self.events_root.join(EVENTS_FILE)
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Expand a leading `~/` (or a bare `~`) to the user's home directory.
///
/// Paths from environment variables are not shell-expanded, so this is done
/// here. Other paths are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
