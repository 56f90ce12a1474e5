//! Scripted input (.toml)
//!
//! Drives the pad from a script instead of a controller, so input sequences
//! can be authored and replayed without anyone holding the device. The
//! movie session records scripted input like any other.
//!
//! # Example Script
//!
//! ```toml
//! [[steps]]
//! frames = 60            # hold nothing for one second
//!
//! [[steps]]
//! frames = 5
//! buttons = ["a", "right"]
//!
//! [[steps]]
//! screenshot = true      # taken once the previous step has finished
//!
//! [[steps]]
//! frames = 30
//! buttons = ["zl"]
//! ```
//!
//! # Buttons
//!
//! `a b x y up down left right l r start select zl zr`

mod ast;
mod parser;
mod runner;
mod validation;

pub use ast::{InputScript, ScriptStep};
pub use parser::ParseError;
pub use runner::{ScriptRunner, StepEvent};
pub use validation::{BUTTON_NAMES, ValidationError, button_state, validate_script};
