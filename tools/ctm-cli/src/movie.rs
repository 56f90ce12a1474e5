//! Movie inspection commands

use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use ctm_core::movie::{ChannelKind, ChannelSample, DecodeError, MovieFile, RECORD_SIZE};

#[derive(Args)]
pub struct InfoArgs {
    /// Movie file (.ctm)
    pub movie: PathBuf,
}

#[derive(Args)]
pub struct DumpArgs {
    /// Movie file (.ctm)
    pub movie: PathBuf,

    /// Stop after this many records
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Movie file (.ctm)
    pub movie: PathBuf,

    /// Expected program id (hex, optional 0x prefix)
    #[arg(long, value_parser = parse_program_id)]
    pub program_id: u64,

    /// Expected build revision (40 hex digits)
    #[arg(long)]
    pub revision: Option<String>,
}

/// Parse a hex program id such as `0004000000055D00` or `0x55d00`
pub fn parse_program_id(s: &str) -> Result<u64, String> {
    let digits = s.trim().trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid program id '{}': {}", s, e))
}

fn load(path: &Path) -> Result<MovieFile> {
    MovieFile::load(path).with_context(|| format!("Failed to load movie: {}", path.display()))
}

/// Print header fields and a per-channel histogram
pub fn info(args: InfoArgs, out: &mut impl Write) -> Result<()> {
    let movie = load(&args.movie)?;

    let mut counts: BTreeMap<ChannelKind, usize> = BTreeMap::new();
    let mut unknown = 0usize;
    for chunk in movie.log.records() {
        match ChannelKind::from_tag(chunk[0]) {
            Some(kind) => *counts.entry(kind).or_default() += 1,
            None => unknown += 1,
        }
    }

    writeln!(out, "=== {} ===", args.movie.display())?;
    writeln!(out, "Program id: {:016X}", movie.header.program_id)?;
    writeln!(out, "Revision:   {}", movie.header.revision_hex())?;
    writeln!(out, "Records:    {}", movie.log.record_count())?;
    if movie.log.trailing_bytes() > 0 {
        writeln!(out, "Trailing:   {} bytes (partial record)", movie.log.trailing_bytes())?;
    }

    writeln!(out)?;
    for kind in ChannelKind::ALL {
        writeln!(out, "{:<16} {}", kind.name(), counts.get(&kind).copied().unwrap_or(0))?;
    }
    if unknown > 0 {
        writeln!(out, "{:<16} {}", "(unknown tag)", unknown)?;
    }

    Ok(())
}

/// Print every decoded record
pub fn dump(args: DumpArgs, out: &mut impl Write) -> Result<()> {
    let mut movie = load(&args.movie)?;
    let limit = args.limit.unwrap_or(usize::MAX);

    let mut index = 0usize;
    while let Some(record) = movie.log.read_next() {
        if index >= limit {
            break;
        }
        let offset = index * RECORD_SIZE;
        match ChannelSample::decode(&record) {
            Ok(sample) => writeln!(out, "{:>6} @{:<8} {}", index, offset, sample)?,
            Err(DecodeError::UnknownChannel(tag)) => writeln!(
                out,
                "{:>6} @{:<8} <unknown tag {}> {:02X?}",
                index, offset, tag, record
            )?,
            Err(e) => writeln!(out, "{:>6} @{:<8} <{}>", index, offset, e)?,
        }
        index += 1;
    }

    Ok(())
}

fn status(matches: bool) -> &'static str {
    if matches { "ok" } else { "MISMATCH" }
}

/// Validate a header against the expected title and build
pub fn check(args: CheckArgs, out: &mut impl Write) -> Result<()> {
    let movie = load(&args.movie)?;
    let header = &movie.header;

    // Without an expected revision, compare the header against itself
    let revision = args.revision.clone().unwrap_or_else(|| header.revision_hex());
    let result = header.check(args.program_id, &revision);

    writeln!(
        out,
        "Program id: {:016X} ({})",
        header.program_id,
        status(result.program_matches)
    )?;
    if !result.program_matches {
        writeln!(out, "  expected {:016X}", args.program_id)?;
    }

    if args.revision.is_some() {
        writeln!(
            out,
            "Revision:   {} ({})",
            header.revision_hex(),
            status(result.revision_matches)
        )?;
        if !result.revision_matches {
            writeln!(out, "  expected {}", revision)?;
        }
    } else {
        writeln!(out, "Revision:   {} (not checked)", header.revision_hex())?;
    }

    if result.is_exact() {
        writeln!(out, "Movie should play back in sync.")?;
    } else {
        writeln!(out, "Movie will play, but may desync.")?;
    }

    if movie.log.record_count() == 0 {
        writeln!(out, "Movie contains no input records; playback will not start.")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctm_core::movie::{InputLog, MovieHeader};
    use ctm_core::PadState;

    const REV: &str = "89abcdef0123456789abcdef0123456789abcdef";

    fn write_movie(dir: &Path) -> PathBuf {
        let mut log = InputLog::new();
        log.append(
            &ChannelSample::PadAndCircle {
                buttons: PadState::A,
                circle_x: 0,
                circle_y: 0,
            }
            .encode(),
        );
        log.append(&ChannelSample::Touch { x: 1, y: 2, valid: true }.encode());
        log.append(&ChannelSample::Touch { x: 3, y: 4, valid: false }.encode());

        let path = dir.join("test.ctm");
        MovieFile {
            header: MovieHeader::new(0x55D00, REV),
            log,
        }
        .save(&path)
        .unwrap();
        path
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_parse_program_id() {
        assert_eq!(parse_program_id("0004000000055D00"), Ok(0x0004_0000_0005_5D00));
        assert_eq!(parse_program_id("0x55d00"), Ok(0x55D00));
        assert!(parse_program_id("xyz").is_err());
    }

    #[test]
    fn test_info_counts_channels() {
        let dir = tempfile::tempdir().unwrap();
        let movie = write_movie(dir.path());

        let text = output(|out| info(InfoArgs { movie }, out));
        assert!(text.contains("Program id: 0000000000055D00"));
        assert!(text.contains(&format!("Revision:   {}", REV)));
        assert!(text.contains("Records:    3"));
        assert!(text.lines().any(|l| l.starts_with("Touch") && l.ends_with(" 2")));
        assert!(text.lines().any(|l| l.starts_with("Gyroscope") && l.ends_with(" 0")));
    }

    #[test]
    fn test_dump_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let movie = write_movie(dir.path());

        let text = output(|out| {
            dump(
                DumpArgs {
                    movie,
                    limit: Some(2),
                },
                out,
            )
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("PadAndCircle buttons=A"));
        assert!(lines[1].contains("Touch (1, 2) valid=true"));
    }

    #[test]
    fn test_check_reports_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let movie = write_movie(dir.path());

        let text = output(|out| {
            check(
                CheckArgs {
                    movie,
                    program_id: 0x1,
                    revision: Some(REV.to_uppercase()),
                },
                out,
            )
        });
        assert!(text.contains("MISMATCH"));
        assert!(text.contains("may desync"));
    }

    #[test]
    fn test_check_matching_movie_is_in_sync() {
        let dir = tempfile::tempdir().unwrap();
        let movie = write_movie(dir.path());

        let text = output(|out| {
            check(
                CheckArgs {
                    movie,
                    program_id: 0x55D00,
                    revision: Some(REV.to_string()),
                },
                out,
            )
        });
        assert!(!text.contains("MISMATCH"));
        assert!(text.contains("should play back in sync"));
    }

    #[test]
    fn test_check_bad_magic_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.ctm");
        std::fs::write(&path, vec![0u8; 300]).unwrap();

        let mut buffer = Vec::new();
        let result = check(
            CheckArgs {
                movie: path,
                program_id: 0,
                revision: None,
            },
            &mut buffer,
        );
        assert!(result.is_err());
    }
}
