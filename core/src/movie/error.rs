//! Movie error types

use std::io;
use std::path::PathBuf;

use super::session::PlayMode;

/// Error raised by movie configuration, loading or saving
///
/// None of these abort emulation; the session drops to idle instead.
#[derive(Debug, thiserror::Error)]
pub enum MovieError {
    /// Both a playback source and a recording destination were configured
    #[error("cannot both play and record a movie")]
    ConfigConflict,

    /// Playback or recording requested while the session is not idle
    #[error("movie session is already {0:?}")]
    AlreadyActive(PlayMode),

    /// Bad magic or a header cut short
    #[error("invalid movie file: {0}")]
    Format(String),

    /// Open, read or write failure on a movie file
    #[error("movie file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failure on a movie stream with no path attached
    #[error("movie stream error: {0}")]
    Stream(#[from] io::Error),

    /// Movie configuration could not be parsed
    #[error("invalid movie config: {0}")]
    Config(String),
}

impl MovieError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MovieError::Io {
            path: path.into(),
            source,
        }
    }
}
