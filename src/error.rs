//! Crate error types

use thiserror::Error;

use crate::highscores::ScoreLogError;
use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("score log: {0}")]
    ScoreLog(#[from] ScoreLogError),
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("terminal I/O: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T = ()> = std::result::Result<T, Error>;
