//! Movie session
//!
//! Owns the play mode and the input log for one emulation session. The
//! HID and IR services call one hook per channel per frame; the session
//! either records the live state, overwrites it from the log, or does
//! nothing.
//!
//! ```text
//!            start_recording               shutdown / drop
//!   Idle ─────────────────────► Recording ─────────────────► Idle (saved)
//!     │
//!     │ start_playback          log exhausted
//!     └─────────────────────► Playing ─────────────────────► Idle (on_complete)
//! ```

use std::path::{Path, PathBuf};

use crate::hid::{
    AccelerometerDataEntry, CirclePadResponse, GyroscopeDataEntry, IrPadState, PadState,
    TouchDataEntry,
};

use super::codec::{ChannelSample, DecodeError};
use super::config::MovieConfig;
use super::error::MovieError;
use super::file::MovieFile;
use super::header::MovieHeader;
use super::log::InputLog;

/// Current session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    #[default]
    Idle,
    Recording,
    Playing,
}

/// Identity of the running title and build
///
/// Written into new movies and compared against loaded ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionContext {
    /// Title id of the loaded program
    pub program_id: u64,
    /// Build revision as a 40-digit hex string
    pub revision: String,
}

impl SessionContext {
    pub fn new(program_id: u64, revision: impl Into<String>) -> Self {
        Self {
            program_id,
            revision: revision.into(),
        }
    }
}

type CompletionHook = Box<dyn FnMut()>;

/// Input recording/playback state for one emulation session
pub struct MovieSession {
    mode: PlayMode,
    log: InputLog,
    context: SessionContext,
    record_path: Option<PathBuf>,
    exit_on_complete: bool,
    on_complete: Option<CompletionHook>,
    records_processed: u64,
    desync_count: u64,
}

impl MovieSession {
    /// Create an idle session
    pub fn new(context: SessionContext) -> Self {
        Self {
            mode: PlayMode::Idle,
            log: InputLog::new(),
            context,
            record_path: None,
            exit_on_complete: false,
            on_complete: None,
            records_processed: 0,
            desync_count: 0,
        }
    }

    /// Resolve the starting mode from configuration
    ///
    /// Any failure is logged and leaves the session idle; emulation carries
    /// on without the movie.
    pub fn init(config: &MovieConfig, context: SessionContext) -> Self {
        match Self::try_init(config, context.clone()) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Movie disabled: {}", e);
                let mut session = Self::new(context);
                session.exit_on_complete = config.exit_on_complete;
                session
            }
        }
    }

    /// Resolve the starting mode from configuration, reporting failures
    pub fn try_init(config: &MovieConfig, context: SessionContext) -> Result<Self, MovieError> {
        config.validate()?;

        let mut session = Self::new(context);
        session.exit_on_complete = config.exit_on_complete;

        if let Some(path) = config.play_path() {
            session.start_playback(path)?;
        } else if let Some(path) = config.record_path() {
            session.start_recording(path);
        }

        Ok(session)
    }

    /// Load a movie from disk and start playing it
    pub fn start_playback(&mut self, path: &Path) -> Result<(), MovieError> {
        self.ensure_idle()?;
        tracing::info!("Loading movie for playback: {}", path.display());
        let movie = MovieFile::load(path)?;
        self.start_playback_from(movie)
    }

    /// Start playing an already loaded movie
    ///
    /// Revision and program id mismatches are warnings only. A movie with no
    /// complete record leaves the session idle.
    pub fn start_playback_from(&mut self, movie: MovieFile) -> Result<(), MovieError> {
        self.ensure_idle()?;

        movie
            .header
            .check(self.context.program_id, &self.context.revision)
            .warn();

        self.log = movie.log;
        self.log.reset();
        self.records_processed = 0;
        self.desync_count = 0;

        if !self.log.has_next() {
            tracing::info!("Movie contains no input records, playback not started");
            return Ok(());
        }

        tracing::info!("Playing back {} input records", self.log.record_count());
        self.mode = PlayMode::Playing;
        Ok(())
    }

    /// Start recording; the movie is written to `path` on shutdown
    pub fn start_recording(&mut self, path: impl Into<PathBuf>) {
        if let Err(e) = self.ensure_idle() {
            tracing::error!("Movie recording not started: {}", e);
            return;
        }

        let path = path.into();
        tracing::info!("Enabling movie recording to {}", path.display());
        self.log = InputLog::new();
        self.record_path = Some(path);
        self.records_processed = 0;
        self.desync_count = 0;
        self.mode = PlayMode::Recording;
    }

    fn ensure_idle(&self) -> Result<(), MovieError> {
        match self.mode {
            PlayMode::Idle => Ok(()),
            mode => Err(MovieError::AlreadyActive(mode)),
        }
    }

    /// Stop recording and hand over the recorded movie
    ///
    /// Returns `None` when not recording.
    pub fn finish_recording(&mut self) -> Option<MovieFile> {
        if self.mode != PlayMode::Recording {
            return None;
        }

        self.mode = PlayMode::Idle;
        Some(MovieFile {
            header: MovieHeader::new(self.context.program_id, &self.context.revision),
            log: std::mem::take(&mut self.log),
        })
    }

    /// End the session, saving the recording if there is one
    ///
    /// A failed save is logged and returned; it never panics.
    pub fn shutdown(&mut self) -> Result<(), MovieError> {
        if self.mode == PlayMode::Playing {
            tracing::info!("Movie playback stopped early");
            self.mode = PlayMode::Idle;
            return Ok(());
        }

        let Some(movie) = self.finish_recording() else {
            return Ok(());
        };
        let Some(path) = self.record_path.take() else {
            return Ok(());
        };

        tracing::info!("Saving movie to {}", path.display());
        movie.save(&path).inspect_err(|e| {
            tracing::error!("Error saving movie: {}", e);
        })
    }

    /// Register a listener run once playback reaches the end of the log
    pub fn set_on_complete(&mut self, hook: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(hook));
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn is_playing(&self) -> bool {
        self.mode == PlayMode::Playing
    }

    pub fn is_recording(&self) -> bool {
        self.mode == PlayMode::Recording
    }

    /// Whether the frontend asked to screenshot and exit after playback
    pub fn exit_on_complete(&self) -> bool {
        self.exit_on_complete
    }

    /// Records read (playback) or written (recording) so far
    pub fn records_processed(&self) -> u64 {
        self.records_processed
    }

    /// Records skipped during playback because they did not fit the channel
    pub fn desync_count(&self) -> u64 {
        self.desync_count
    }

    pub fn log(&self) -> &InputLog {
        &self.log
    }

    /// Consume the next record and write it into live state
    ///
    /// A record that does not decode into the polled channel is still
    /// consumed; the live state is left as the service produced it.
    fn play(&mut self, apply: impl FnOnce(&ChannelSample) -> Result<(), DecodeError>) {
        if let Some(record) = self.log.read_next() {
            self.records_processed += 1;
            let applied = ChannelSample::decode(&record).and_then(|sample| apply(&sample));
            if let Err(e) = applied {
                self.desync_count += 1;
                tracing::warn!(
                    "Record {}: {}. Your playback will be out of sync",
                    self.records_processed,
                    e
                );
            }
        }
        self.check_input_end();
    }

    fn check_input_end(&mut self) {
        if self.mode != PlayMode::Playing || self.log.has_next() {
            return;
        }

        tracing::info!("Playback finished");
        self.mode = PlayMode::Idle;
        if let Some(hook) = self.on_complete.as_mut() {
            hook();
        }
    }

    fn record(&mut self, sample: ChannelSample) {
        self.log.append(&sample.encode());
        self.records_processed += 1;
    }

    pub fn handle_pad_and_circle(
        &mut self,
        pad: &mut PadState,
        circle_x: &mut i16,
        circle_y: &mut i16,
    ) {
        match self.mode {
            PlayMode::Playing => self.play(|s| s.apply_pad_and_circle(pad, circle_x, circle_y)),
            PlayMode::Recording => {
                self.record(ChannelSample::from_pad_and_circle(*pad, *circle_x, *circle_y))
            }
            PlayMode::Idle => {}
        }
    }

    pub fn handle_touch(&mut self, touch: &mut TouchDataEntry) {
        match self.mode {
            PlayMode::Playing => self.play(|s| s.apply_touch(touch)),
            PlayMode::Recording => self.record(ChannelSample::from_touch(touch)),
            PlayMode::Idle => {}
        }
    }

    pub fn handle_accelerometer(&mut self, accel: &mut AccelerometerDataEntry) {
        match self.mode {
            PlayMode::Playing => self.play(|s| s.apply_accelerometer(accel)),
            PlayMode::Recording => self.record(ChannelSample::from_accelerometer(accel)),
            PlayMode::Idle => {}
        }
    }

    pub fn handle_gyroscope(&mut self, gyro: &mut GyroscopeDataEntry) {
        match self.mode {
            PlayMode::Playing => self.play(|s| s.apply_gyroscope(gyro)),
            PlayMode::Recording => self.record(ChannelSample::from_gyroscope(gyro)),
            PlayMode::Idle => {}
        }
    }

    pub fn handle_c_stick(
        &mut self,
        pad: &mut IrPadState,
        c_stick_x: &mut i16,
        c_stick_y: &mut i16,
    ) {
        match self.mode {
            PlayMode::Playing => self.play(|s| s.apply_c_stick(pad, c_stick_x, c_stick_y)),
            PlayMode::Recording => {
                self.record(ChannelSample::from_c_stick(*pad, *c_stick_x, *c_stick_y))
            }
            PlayMode::Idle => {}
        }
    }

    pub fn handle_circle_pad(&mut self, response: &mut CirclePadResponse) {
        match self.mode {
            PlayMode::Playing => self.play(|s| s.apply_circle_pad(response)),
            PlayMode::Recording => self.record(ChannelSample::from_circle_pad(response)),
            PlayMode::Idle => {}
        }
    }
}

impl Drop for MovieSession {
    fn drop(&mut self) {
        if self.mode == PlayMode::Recording {
            // Errors were already logged by shutdown
            let _ = self.shutdown();
        }
    }
}

impl std::fmt::Debug for MovieSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieSession")
            .field("mode", &self.mode)
            .field("records", &self.log.record_count())
            .field("cursor", &self.log.cursor())
            .field("record_path", &self.record_path)
            .field("exit_on_complete", &self.exit_on_complete)
            .field("has_on_complete", &self.on_complete.is_some())
            .finish()
    }
}
