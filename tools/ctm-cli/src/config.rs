//! Show the effective movie configuration

use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use ctm_core::movie::{MovieConfig, MovieError, config};

#[derive(Args)]
pub struct ConfigArgs {
    /// Movie to play back
    #[arg(short = 'p', long = "movie-play")]
    pub play: Option<PathBuf>,

    /// Record a movie to this path
    #[arg(short = 'r', long = "movie-record")]
    pub record: Option<PathBuf>,

    /// Screenshot and exit once playback finishes
    #[arg(short = 't', long = "movie-test")]
    pub exit_on_complete: bool,

    /// Read movie.toml from this directory instead of the platform default
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

impl ConfigArgs {
    fn flags(&self) -> MovieConfig {
        MovieConfig {
            play: self.play.clone(),
            record: self.record.clone(),
            exit_on_complete: self.exit_on_complete,
        }
    }
}

/// Resolve the configuration file merged with the command line flags
pub fn resolve(args: &ConfigArgs) -> MovieConfig {
    let file = match &args.config_dir {
        Some(dir) => config::load_from(dir),
        None => config::load(),
    };
    file.merge(args.flags())
}

/// Print the effective configuration and the mode a session would start in
pub fn execute(args: ConfigArgs, out: &mut impl Write) -> Result<()> {
    match config::config_dir() {
        Some(dir) if args.config_dir.is_none() => {
            writeln!(out, "Config file: {}", dir.join(config::CONFIG_FILE_NAME).display())?
        }
        _ => {}
    }

    let effective = resolve(&args);
    write!(out, "{}", effective.to_toml()?)?;
    writeln!(out)?;

    match effective.validate() {
        Ok(()) => {
            let mode = if let Some(path) = effective.play_path() {
                format!("Playing ({})", path.display())
            } else if let Some(path) = effective.record_path() {
                format!("Recording ({})", path.display())
            } else {
                "Idle".to_string()
            };
            writeln!(out, "Session mode: {}", mode)?;
            Ok(())
        }
        Err(e @ MovieError::ConfigConflict) => {
            writeln!(out, "Session mode: Idle")?;
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn args(dir: &Path) -> ConfigArgs {
        ConfigArgs {
            play: None,
            record: None,
            exit_on_complete: false,
            config_dir: Some(dir.to_path_buf()),
        }
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(config::CONFIG_FILE_NAME),
            "[movie]\nplay = \"file.ctm\"\n",
        )
        .unwrap();

        let mut a = args(dir.path());
        a.play = Some("flag.ctm".into());
        a.exit_on_complete = true;

        let effective = resolve(&a);
        assert_eq!(effective.play_path(), Some(Path::new("flag.ctm")));
        assert!(effective.exit_on_complete);
    }

    #[test]
    fn test_reports_recording_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(dir.path());
        a.record = Some("out.ctm".into());

        let mut buffer = Vec::new();
        execute(a, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Session mode: Recording (out.ctm)"));
    }

    #[test]
    fn test_conflict_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(config::CONFIG_FILE_NAME),
            "[movie]\nrecord = \"out.ctm\"\n",
        )
        .unwrap();

        let mut a = args(dir.path());
        a.play = Some("in.ctm".into());

        let mut buffer = Vec::new();
        let err = execute(a, &mut buffer).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MovieError>(),
            Some(MovieError::ConfigConflict)
        ));
    }
}
