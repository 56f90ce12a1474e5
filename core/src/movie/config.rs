//! Movie configuration (`movie.toml`)
//!
//! Settings live under a `[movie]` table in the platform config directory.
//! Command line flags are merged on top by the frontend.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::MovieError;

/// File name inside the config directory
pub const CONFIG_FILE_NAME: &str = "movie.toml";

/// On-disk layout of `movie.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub movie: MovieConfig,
}

/// Where to play a movie from or record one to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MovieConfig {
    /// Movie to play back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play: Option<PathBuf>,
    /// Destination for a new recording
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<PathBuf>,
    /// Screenshot and exit once playback finishes (default: false)
    #[serde(default)]
    pub exit_on_complete: bool,
}

fn non_empty(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

impl MovieConfig {
    /// Playback source, ignoring empty paths
    pub fn play_path(&self) -> Option<&Path> {
        non_empty(&self.play)
    }

    /// Recording destination, ignoring empty paths
    pub fn record_path(&self) -> Option<&Path> {
        non_empty(&self.record)
    }

    /// Reject configurations that ask for playback and recording at once
    pub fn validate(&self) -> Result<(), MovieError> {
        if self.play_path().is_some() && self.record_path().is_some() {
            return Err(MovieError::ConfigConflict);
        }
        Ok(())
    }

    /// Overlay values from `other` (e.g. command line flags) onto `self`
    pub fn merge(mut self, other: MovieConfig) -> Self {
        let play_set = other.play_path().is_some();
        let record_set = other.record_path().is_some();
        if play_set {
            self.play = other.play;
        }
        if record_set {
            self.record = other.record;
        }
        self.exit_on_complete |= other.exit_on_complete;
        self
    }

    /// Parse the `[movie]` table from a TOML document
    pub fn from_toml(content: &str) -> Result<Self, MovieError> {
        toml::from_str::<ConfigFile>(content)
            .map(|file| file.movie)
            .map_err(|e| MovieError::Config(e.to_string()))
    }

    /// Serialize as a `movie.toml` document
    pub fn to_toml(&self) -> Result<String, MovieError> {
        toml::to_string_pretty(&ConfigFile {
            movie: self.clone(),
        })
        .map_err(|e| MovieError::Config(e.to_string()))
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/ctm`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "ctm", "ctm").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the movie configuration from `dir/movie.toml`.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load_from(dir: &Path) -> MovieConfig {
    let path = dir.join(CONFIG_FILE_NAME);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return MovieConfig::default();
    };
    MovieConfig::from_toml(&content).unwrap_or_else(|e| {
        tracing::warn!("Ignoring {}: {}", path.display(), e);
        MovieConfig::default()
    })
}

/// Loads the movie configuration from the platform config directory.
pub fn load() -> MovieConfig {
    config_dir()
        .map(|dir| load_from(&dir))
        .unwrap_or_default()
}

/// Saves the movie configuration to `dir/movie.toml`, creating `dir`.
pub fn save_to(dir: &Path, config: &MovieConfig) -> Result<(), MovieError> {
    let path = dir.join(CONFIG_FILE_NAME);
    std::fs::create_dir_all(dir).map_err(|e| MovieError::io(dir, e))?;
    std::fs::write(&path, config.to_toml()?).map_err(|e| MovieError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let config = MovieConfig::default();
        assert!(config.play_path().is_none());
        assert!(config.record_path().is_none());
        assert!(!config.exit_on_complete);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_both_paths_conflict() {
        let config = MovieConfig {
            play: Some("in.ctm".into()),
            record: Some("out.ctm".into()),
            exit_on_complete: false,
        };
        assert!(matches!(config.validate(), Err(MovieError::ConfigConflict)));
    }

    #[test]
    fn test_empty_path_is_unset() {
        let config = MovieConfig {
            play: Some(PathBuf::new()),
            record: Some("out.ctm".into()),
            exit_on_complete: false,
        };
        assert!(config.play_path().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = MovieConfig::from_toml(
            r#"
            [movie]
            play = "runs/any.ctm"
            exit_on_complete = true
            "#,
        )
        .unwrap();
        assert_eq!(config.play_path(), Some(Path::new("runs/any.ctm")));
        assert!(config.record.is_none());
        assert!(config.exit_on_complete);
    }

    #[test]
    fn test_parse_missing_table_defaults() {
        assert_eq!(MovieConfig::from_toml("").unwrap(), MovieConfig::default());
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(matches!(
            MovieConfig::from_toml("[movie]\nplay = 3"),
            Err(MovieError::Config(_))
        ));
    }

    #[test]
    fn test_merge_flags_override_file() {
        let file = MovieConfig {
            play: Some("file.ctm".into()),
            record: None,
            exit_on_complete: false,
        };
        let flags = MovieConfig {
            play: Some("flag.ctm".into()),
            record: None,
            exit_on_complete: true,
        };
        let merged = file.merge(flags);
        assert_eq!(merged.play_path(), Some(Path::new("flag.ctm")));
        assert!(merged.exit_on_complete);
    }

    #[test]
    fn test_merge_keeps_file_values_for_unset_flags() {
        let file = MovieConfig {
            play: None,
            record: Some("file.ctm".into()),
            exit_on_complete: true,
        };
        let flags = MovieConfig {
            play: Some(PathBuf::new()),
            record: None,
            exit_on_complete: false,
        };
        let merged = file.merge(flags);
        assert!(merged.play_path().is_none());
        assert_eq!(merged.record_path(), Some(Path::new("file.ctm")));
        assert!(merged.exit_on_complete);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = MovieConfig {
            play: None,
            record: Some("out.ctm".into()),
            exit_on_complete: true,
        };
        save_to(dir.path(), &config).unwrap();
        assert_eq!(load_from(dir.path()), config);
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_from(dir.path()), MovieConfig::default());
    }
}
