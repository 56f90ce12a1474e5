//! CTM Core - Deterministic input movies
//!
//! This crate records every polled input channel of the emulated handheld
//! into a compact movie file, and replays such files in lockstep with the
//! frame clock so a run can be reproduced bit-for-bit.
//!
//! # Architecture
//!
//! - [`hid`] - Live input structures owned by the HID and IR services
//! - [`movie`] - Record codec, input log, session state machine and file format
//! - [`script`] - Scripted pad input for unattended runs

pub mod hid;
#[cfg(test)]
mod integration;
pub mod movie;
pub mod script;

// Re-export core types
pub use hid::{
    AccelerometerDataEntry, CirclePadResponse, GyroscopeDataEntry, IrPadState, PadState,
    TouchDataEntry,
};
pub use movie::{
    ChannelKind, ChannelSample, InputLog, MovieConfig, MovieError, MovieFile, MovieHeader,
    MovieSession, PlayMode, SessionContext,
};
pub use script::{InputScript, ScriptRunner, StepEvent};
