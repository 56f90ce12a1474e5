//! Validate an input script without running it

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use ctm_core::script::{InputScript, validate_script};

#[derive(Args)]
pub struct ScriptArgs {
    /// Input script (.toml)
    pub script: PathBuf,
}

/// Validate an input script and print its summary
pub fn execute(args: ScriptArgs, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Validating script: {}", args.script.display())?;

    let script = InputScript::from_file(&args.script)
        .with_context(|| format!("Failed to parse script: {}", args.script.display()))?;
    validate_script(&script)
        .with_context(|| format!("Invalid script: {}", args.script.display()))?;

    writeln!(out)?;
    writeln!(out, "=== Script Valid ===")?;
    writeln!(out, "Steps: {}", script.steps.len())?;
    writeln!(out, "Frames: {}", script.frame_count())?;
    writeln!(out, "Screenshots: {}", script.screenshot_count())?;

    // A screenshot lands after every frame of the steps before it
    let shots: Vec<String> = script
        .steps
        .iter()
        .scan(0u64, |frame, step| {
            *frame += u64::from(step.frames);
            Some(step.screenshot.then(|| frame.to_string()))
        })
        .flatten()
        .collect();
    if !shots.is_empty() {
        writeln!(out, "Screenshot frames: {}", shots.join(", "))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(content: &str) -> Result<String> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.toml");
        std::fs::write(&path, content).unwrap();

        let mut buffer = Vec::new();
        execute(ScriptArgs { script: path }, &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn test_valid_script_summary() {
        let text = run(r#"
            [[steps]]
            frames = 3
            buttons = ["a"]

            [[steps]]
            screenshot = true

            [[steps]]
            frames = 2
            buttons = ["zl", "up"]

            [[steps]]
            screenshot = true
            "#)
        .unwrap();

        assert!(text.contains("Steps: 4"));
        assert!(text.contains("Frames: 5"));
        assert!(text.contains("Screenshots: 2"));
        assert!(text.contains("Screenshot frames: 3, 5"));
    }

    #[test]
    fn test_long_script_summary_is_immediate() {
        let text = run(r#"
            [[steps]]
            frames = 4000000000

            [[steps]]
            screenshot = true

            [[steps]]
            frames = 4000000000
            buttons = ["b"]

            [[steps]]
            screenshot = true
            "#)
        .unwrap();

        assert!(text.contains("Frames: 8000000000"));
        assert!(text.contains("Screenshot frames: 4000000000, 8000000000"));
    }

    #[test]
    fn test_unknown_button_fails() {
        let err = run(r#"
            [[steps]]
            frames = 1
            buttons = ["turbo"]
            "#)
        .unwrap_err();
        assert!(format!("{:#}", err).contains("turbo"));
    }

    #[test]
    fn test_malformed_toml_fails() {
        assert!(run("[[steps]\nframes = 1").is_err());
    }
}
