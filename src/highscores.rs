//! Score log
//!
//! Append-only, tab-separated, one result per line:
//! `DD.MM.YYYY (HH:MM:SS)\t<nickname>\t<length>`.
//! The high score is the largest length across all lines (0 when empty).

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use crate::consts::DEFAULT_NICKNAME;

/// Timestamp layout used in the log
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y (%H:%M:%S)";

#[derive(Debug, Error)]
pub enum ScoreLogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: length field is not a number: {content:?}")]
    Malformed { line: usize, content: String },
    #[error("storage unavailable: {0}")]
    Storage(String),
}

/// One finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub timestamp: NaiveDateTime,
    pub nickname: String,
    pub length: u32,
}

impl ScoreRecord {
    /// Record stamped with the current local time
    pub fn now(nickname: &str, length: u32) -> Self {
        Self::at(Local::now().naive_local(), nickname, length)
    }

    pub fn at(timestamp: NaiveDateTime, nickname: &str, length: u32) -> Self {
        Self {
            timestamp,
            nickname: sanitize_nickname(nickname),
            length,
        }
    }
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.nickname,
            self.length
        )
    }
}

/// Keep a nickname on one line and in one field
fn sanitize_nickname(nickname: &str) -> String {
    let cleaned: String = nickname
        .chars()
        .map(|c| if c == '\t' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_NICKNAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Largest length recorded in `text`, floored at 0.
///
/// Blank lines are skipped; any other line whose last field isn't an
/// integer is an error. Out-of-range integers saturate.
pub fn parse_high_score(text: &str) -> Result<u32, ScoreLogError> {
    let mut best: i64 = 0;
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let field = line.rsplit('\t').next().unwrap_or(line).trim();
        let length = match field.parse::<i64>() {
            Ok(length) => length,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
            Err(e) if *e.kind() == IntErrorKind::NegOverflow => i64::MIN,
            Err(_) => {
                return Err(ScoreLogError::Malformed {
                    line: idx + 1,
                    content: line.to_string(),
                });
            }
        };
        best = best.max(length);
    }
    Ok(u32::try_from(best).unwrap_or(u32::MAX))
}

/// Persistent score storage
pub trait ScoreLog {
    /// Maximum recorded length, 0 for an empty or missing log
    fn read_high_score(&self) -> Result<u32, ScoreLogError>;

    /// Append one result
    fn append_result(&mut self, record: &ScoreRecord) -> Result<(), ScoreLogError>;
}

/// Score log backed by a text file
#[derive(Debug, Clone)]
pub struct FileScoreLog {
    path: PathBuf,
}

impl FileScoreLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreLog for FileScoreLog {
    fn read_high_score(&self) -> Result<u32, ScoreLogError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => parse_high_score(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn append_result(&mut self, record: &ScoreRecord) -> Result<(), ScoreLogError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{record}")?;
        log::info!("Result saved to {}: {}", self.path.display(), record);
        Ok(())
    }
}

/// In-process score log (tests, or when no file should be touched)
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreLog {
    lines: Vec<String>,
}

impl MemoryScoreLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing log text
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl ScoreLog for MemoryScoreLog {
    fn read_high_score(&self) -> Result<u32, ScoreLogError> {
        parse_high_score(&self.lines.join("\n"))
    }

    fn append_result(&mut self, record: &ScoreRecord) -> Result<(), ScoreLogError> {
        self.lines.push(record.to_string());
        Ok(())
    }
}

/// Score log kept in LocalStorage as the same line-oriented text (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageScoreLog;

#[cfg(target_arch = "wasm32")]
impl LocalStorageScoreLog {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "grid_snake_results";

    fn storage() -> Result<web_sys::Storage, ScoreLogError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| ScoreLogError::Storage("LocalStorage not available".into()))
    }

    fn read_text() -> Result<String, ScoreLogError> {
        let storage = Self::storage()?;
        let text = storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|e| ScoreLogError::Storage(format!("{e:?}")))?;
        Ok(text.unwrap_or_default())
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreLog for LocalStorageScoreLog {
    fn read_high_score(&self) -> Result<u32, ScoreLogError> {
        parse_high_score(&Self::read_text()?)
    }

    fn append_result(&mut self, record: &ScoreRecord) -> Result<(), ScoreLogError> {
        let mut text = Self::read_text()?;
        text.push_str(&record.to_string());
        text.push('\n');
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &text)
            .map_err(|e| ScoreLogError::Storage(format!("{e:?}")))?;
        log::info!("Result saved: {}", record);
        Ok(())
    }
}
