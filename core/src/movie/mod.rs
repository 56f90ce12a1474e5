//! Movie (input recording and playback)
//!
//! Captures every polled input channel into a compact log so an emulation
//! run can be replayed bit-for-bit, or replays a saved log in lockstep with
//! the frame clock.
//!
//! # Architecture
//!
//! ```text
//! HID / IR services ──► MovieSession ──► codec ──► InputLog ──► MovieFile (.ctm)
//!   (one hook per        (Idle /         (7-byte    (append /    (256-byte header
//!    channel per frame)   Recording /     records)   read_next)   + records)
//!                         Playing)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ctm_core::movie::{MovieSession, SessionContext};
//!
//! let config = ctm_core::movie::config::load();
//! let mut session = MovieSession::init(&config, SessionContext::new(program_id, revision));
//! session.set_on_complete(|| println!("movie done"));
//!
//! // Once per frame, from the owning services:
//! session.handle_pad_and_circle(&mut pad, &mut circle_x, &mut circle_y);
//! session.handle_touch(&mut touch);
//!
//! // On exit (also attempted on drop):
//! session.shutdown()?;
//! ```

pub mod codec;
pub mod config;
mod error;
mod file;
mod header;
mod log;
mod session;

pub use codec::{ChannelKind, ChannelSample, DecodeError, RECORD_SIZE, Record};
pub use config::MovieConfig;
pub use error::MovieError;
pub use file::{MovieFile, MovieReader, MovieWriter};
pub use header::{HEADER_SIZE, HeaderCheck, MOVIE_MAGIC, MovieHeader, REVISION_SIZE};
pub use log::InputLog;
pub use session::{MovieSession, PlayMode, SessionContext};
