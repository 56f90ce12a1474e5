//! Script runner
//!
//! Steps through a validated script one emulated frame at a time.

use crate::hid::{IrPadState, PadState};

use super::ast::InputScript;
use super::validation::{ValidationError, button_state, validate_script};

/// Run step with its buttons resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunStep {
    frames: u32,
    pad: PadState,
    ir: IrPadState,
    /// Screenshot steps that follow this one
    screenshots_after: usize,
}

/// What happened when a frame finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// Still inside the script
    Continue,
    /// One or more screenshot steps were reached; capture before the next frame
    Screenshot(usize),
    /// Script exhausted; buttons are released
    Finished,
}

/// Frame-by-frame script state
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    steps: Vec<RunStep>,
    step_index: usize,
    step_frame: u32,
    frame_number: u64,
}

impl ScriptRunner {
    /// Validate and prepare a script
    pub fn new(script: &InputScript) -> Result<Self, ValidationError> {
        validate_script(script)?;

        let mut steps: Vec<RunStep> = Vec::new();
        for step in &script.steps {
            if step.screenshot {
                // Validation guarantees a run step precedes every screenshot
                if let Some(last) = steps.last_mut() {
                    last.screenshots_after += 1;
                }
                continue;
            }

            let (pad, ir) = step
                .buttons
                .iter()
                .filter_map(|name| button_state(name))
                .fold((PadState::empty(), IrPadState::empty()), |(p, i), (bp, bi)| {
                    (p | bp, i | bi)
                });
            steps.push(RunStep {
                frames: step.frames,
                pad,
                ir,
                screenshots_after: 0,
            });
        }

        Ok(Self {
            steps,
            step_index: 0,
            step_frame: 0,
            frame_number: 0,
        })
    }

    /// Whether there are frames left to run
    pub fn has_script(&self) -> bool {
        self.step_index < self.steps.len()
    }

    /// HID buttons held for the current frame
    pub fn pad_state(&self) -> PadState {
        self.steps
            .get(self.step_index)
            .map(|s| s.pad)
            .unwrap_or_default()
    }

    /// IR buttons held for the current frame
    pub fn ir_state(&self) -> IrPadState {
        self.steps
            .get(self.step_index)
            .map(|s| s.ir)
            .unwrap_or_default()
    }

    /// Frames finished so far
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Advance by one finished frame
    pub fn notify_frame_finished(&mut self) -> StepEvent {
        let Some(step) = self.steps.get(self.step_index).copied() else {
            return StepEvent::Finished;
        };

        self.frame_number += 1;
        self.step_frame += 1;
        if self.step_frame < step.frames {
            return StepEvent::Continue;
        }

        self.step_frame = 0;
        self.step_index += 1;
        tracing::debug!(
            "Script step {} done at frame {}",
            self.step_index,
            self.frame_number
        );

        if step.screenshots_after > 0 {
            StepEvent::Screenshot(step.screenshots_after)
        } else if self.has_script() {
            StepEvent::Continue
        } else {
            StepEvent::Finished
        }
    }
}
