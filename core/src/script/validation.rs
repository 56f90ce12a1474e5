//! Input script validation.

use crate::hid::{IrPadState, PadState};

use super::ast::InputScript;

/// Button names accepted in scripts
pub const BUTTON_NAMES: [&str; 14] = [
    "a", "b", "x", "y", "up", "down", "left", "right", "l", "r", "start", "select", "zl", "zr",
];

/// Look up a script button name
///
/// ZL and ZR live on the IR pad; everything else on the HID pad.
pub fn button_state(name: &str) -> Option<(PadState, IrPadState)> {
    let pad = match name.to_ascii_lowercase().as_str() {
        "a" => PadState::A,
        "b" => PadState::B,
        "x" => PadState::X,
        "y" => PadState::Y,
        "up" => PadState::UP,
        "down" => PadState::DOWN,
        "left" => PadState::LEFT,
        "right" => PadState::RIGHT,
        "l" => PadState::L,
        "r" => PadState::R,
        "start" => PadState::START,
        "select" => PadState::SELECT,
        "zl" => return Some((PadState::empty(), IrPadState::ZL)),
        "zr" => return Some((PadState::empty(), IrPadState::ZR)),
        _ => return None,
    };
    Some((pad, IrPadState::empty()))
}

/// Validation errors for input scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Step neither runs frames nor takes a screenshot.
    EmptyStep(usize),
    /// Step both runs frames and takes a screenshot.
    AmbiguousStep(usize),
    /// Screenshot step lists buttons.
    ScreenshotWithButtons(usize),
    /// First step is a screenshot, before any frame has run.
    LeadingScreenshot,
    /// Button name not recognised.
    UnknownButton { step: usize, name: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyStep(step) => {
                write!(f, "step {} has neither frames nor screenshot", step)
            }
            ValidationError::AmbiguousStep(step) => {
                write!(f, "step {} sets both frames and screenshot", step)
            }
            ValidationError::ScreenshotWithButtons(step) => {
                write!(f, "screenshot step {} cannot hold buttons", step)
            }
            ValidationError::LeadingScreenshot => {
                write!(f, "script cannot start with a screenshot")
            }
            ValidationError::UnknownButton { step, name } => write!(
                f,
                "unknown button '{}' in step {} (expected one of: {})",
                name,
                step,
                BUTTON_NAMES.join(", ")
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed input script before running it.
pub fn validate_script(script: &InputScript) -> Result<(), ValidationError> {
    if script.steps.first().is_some_and(|s| s.screenshot) {
        return Err(ValidationError::LeadingScreenshot);
    }

    for (index, step) in script.steps.iter().enumerate() {
        match (step.frames > 0, step.screenshot) {
            (false, false) => return Err(ValidationError::EmptyStep(index)),
            (true, true) => return Err(ValidationError::AmbiguousStep(index)),
            (false, true) if !step.buttons.is_empty() => {
                return Err(ValidationError::ScreenshotWithButtons(index));
            }
            _ => {}
        }

        if let Some(name) = step.buttons.iter().find(|b| button_state(b).is_none()) {
            return Err(ValidationError::UnknownButton {
                step: index,
                name: name.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptStep;

    fn script(steps: Vec<ScriptStep>) -> InputScript {
        InputScript { steps }
    }

    #[test]
    fn test_every_listed_button_resolves() {
        for name in BUTTON_NAMES {
            assert!(button_state(name).is_some(), "{name}");
        }
        assert_eq!(button_state("ZL"), Some((PadState::empty(), IrPadState::ZL)));
        assert_eq!(button_state("home"), None);
    }

    #[test]
    fn test_valid_script() {
        let s = script(vec![
            ScriptStep::run(5, &["a"]),
            ScriptStep::screenshot(),
            ScriptStep::run(1, &["zr", "left"]),
        ]);
        assert_eq!(validate_script(&s), Ok(()));
    }

    #[test]
    fn test_empty_script_is_valid() {
        assert_eq!(validate_script(&InputScript::default()), Ok(()));
    }

    #[test]
    fn test_rejects_empty_step() {
        let s = script(vec![ScriptStep::run(1, &[]), ScriptStep::run(0, &["a"])]);
        assert_eq!(validate_script(&s), Err(ValidationError::EmptyStep(1)));
    }

    #[test]
    fn test_rejects_ambiguous_step() {
        let mut step = ScriptStep::run(2, &[]);
        step.screenshot = true;
        let s = script(vec![ScriptStep::run(1, &[]), step]);
        assert_eq!(validate_script(&s), Err(ValidationError::AmbiguousStep(1)));
    }

    #[test]
    fn test_rejects_screenshot_with_buttons() {
        let mut step = ScriptStep::screenshot();
        step.buttons.push("a".to_string());
        let s = script(vec![ScriptStep::run(1, &[]), step]);
        assert_eq!(
            validate_script(&s),
            Err(ValidationError::ScreenshotWithButtons(1))
        );
    }

    #[test]
    fn test_rejects_leading_screenshot() {
        let s = script(vec![ScriptStep::screenshot(), ScriptStep::run(1, &[])]);
        assert_eq!(validate_script(&s), Err(ValidationError::LeadingScreenshot));
    }

    #[test]
    fn test_rejects_unknown_button() {
        let s = script(vec![ScriptStep::run(1, &["a", "home"])]);
        assert_eq!(
            validate_script(&s),
            Err(ValidationError::UnknownButton {
                step: 0,
                name: "home".to_string()
            })
        );
    }
}
