//! Scripted input recorded into a movie and played back

use crate::hid::{IrPadState, PadState};
use crate::movie::{MovieConfig, MovieSession, SessionContext};
use crate::script::{InputScript, ScriptRunner, StepEvent};

const SCRIPT: &str = r#"
[[steps]]
frames = 2

[[steps]]
frames = 3
buttons = ["a", "right"]

[[steps]]
screenshot = true

[[steps]]
frames = 1
buttons = ["zr"]
"#;

fn context() -> SessionContext {
    SessionContext::new(0x0004_0000_000E_DF00, "0123456789012345678901234567890123456789")
}

#[test]
fn test_scripted_run_replays_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scripted.ctm");

    let script = InputScript::from_toml(SCRIPT).unwrap();
    let mut runner = ScriptRunner::new(&script).unwrap();
    let mut session = MovieSession::init(
        &MovieConfig {
            record: Some(path.clone()),
            ..Default::default()
        },
        context(),
    );

    let mut recorded = Vec::new();
    let mut screenshots = Vec::new();
    loop {
        let mut pad = runner.pad_state();
        let (mut circle_x, mut circle_y) = (0i16, 0i16);
        let mut ir = runner.ir_state();
        let (mut c_x, mut c_y) = (0i16, 0i16);
        session.handle_pad_and_circle(&mut pad, &mut circle_x, &mut circle_y);
        session.handle_c_stick(&mut ir, &mut c_x, &mut c_y);
        recorded.push((pad, ir));

        match runner.notify_frame_finished() {
            StepEvent::Continue => {}
            StepEvent::Screenshot(n) => screenshots.push((runner.frame_number(), n)),
            StepEvent::Finished => break,
        }
    }
    session.shutdown().unwrap();

    assert_eq!(recorded.len(), 6);
    assert_eq!(recorded[2].0, PadState::A | PadState::RIGHT);
    assert_eq!(recorded[5].1, IrPadState::ZR);
    assert_eq!(screenshots, vec![(5, 1)]);

    let mut replay = MovieSession::init(
        &MovieConfig {
            play: Some(path),
            ..Default::default()
        },
        context(),
    );
    let mut replayed = Vec::new();
    while replay.is_playing() {
        let mut pad = PadState::empty();
        let (mut circle_x, mut circle_y) = (0i16, 0i16);
        let mut ir = IrPadState::empty();
        let (mut c_x, mut c_y) = (0i16, 0i16);
        replay.handle_pad_and_circle(&mut pad, &mut circle_x, &mut circle_y);
        replay.handle_c_stick(&mut ir, &mut c_x, &mut c_y);
        replayed.push((pad, ir));
    }

    assert_eq!(replayed, recorded);
    assert_eq!(replay.desync_count(), 0);
}
