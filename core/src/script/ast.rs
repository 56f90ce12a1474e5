//! Input script types.

use serde::{Deserialize, Serialize};

/// Complete input script file (TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputScript {
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

/// One script step: either hold buttons for some frames, or take a screenshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Number of frames to hold `buttons` for
    #[serde(default, skip_serializing_if = "is_zero")]
    pub frames: u32,

    /// Buttons held during this step: ["a", "up"]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<String>,

    /// Capture a screenshot once the previous step has finished
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub screenshot: bool,
}

fn is_zero(frames: &u32) -> bool {
    *frames == 0
}

impl ScriptStep {
    /// Hold `buttons` for `frames` frames
    pub fn run(frames: u32, buttons: &[&str]) -> Self {
        Self {
            frames,
            buttons: buttons.iter().map(|b| b.to_string()).collect(),
            screenshot: false,
        }
    }

    /// Screenshot marker
    pub fn screenshot() -> Self {
        Self {
            screenshot: true,
            ..Default::default()
        }
    }
}

impl InputScript {
    /// Total frames covered by run steps
    pub fn frame_count(&self) -> u64 {
        self.steps.iter().map(|s| s.frames as u64).sum()
    }

    /// Number of screenshot steps
    pub fn screenshot_count(&self) -> usize {
        self.steps.iter().filter(|s| s.screenshot).count()
    }
}
