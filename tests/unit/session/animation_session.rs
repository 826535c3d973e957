use super::*;

use crate::foundation::clock::ManualClock;
use crate::foundation::core::{Background, DrawStyle, FrameRGBA, Resolution};
use crate::host::SceneObject;
use crate::host::memory::{HeadlessViewport, MemoryObject, MemoryScene};
use crate::state::transform::Transform;

/// Viewport whose event loop presses a stop button after a number of turns.
struct StoppingViewport {
    inner: HeadlessViewport,
    control: PlaybackControl,
    command: Command,
    after: u64,
    pressed: Option<InbetweenResult<()>>,
}

impl StoppingViewport {
    fn new(control: PlaybackControl, command: Command, after: u64) -> Self {
        Self {
            inner: HeadlessViewport::new(),
            control,
            command,
            after,
            pressed: None,
        }
    }
}

impl Viewport for StoppingViewport {
    fn capture_frame(
        &mut self,
        resolution: Resolution,
        background: Background,
    ) -> InbetweenResult<FrameRGBA> {
        self.inner.capture_frame(resolution, background)
    }

    fn process_events(&mut self) {
        self.inner.process_events();
        if self.inner.events_processed != self.after {
            return;
        }
        // Pressing the other button first must be refused in the current mode.
        let (wrong, right) = match self.command {
            Command::Pause => (self.control.abort_render(), self.control.pause()),
            _ => (self.control.pause(), self.control.abort_render()),
        };
        assert!(wrong.is_err());
        self.pressed = Some(right);
    }
}

fn move_arm(scene: &mut MemoryScene, x: f64) {
    scene
        .get_mut("Arm")
        .unwrap()
        .set_placement(&Transform::from_translation(x, 0.0, 0.0));
}

fn arm_x(scene: &MemoryScene) -> f64 {
    scene.get("Arm").unwrap().transform().unwrap().translation()[0]
}

/// Session bound to "Doc" with steps at x = 0, 10, 20; the scene is left at x = 20.
fn session_with_steps(scene: &mut MemoryScene) -> AnimationSession {
    let mut session = AnimationSession::default();
    session
        .on_document_activated(DocumentId::new("Doc"), None)
        .unwrap();
    session.create_animation(scene).unwrap();
    move_arm(scene, 10.0);
    session.add_step(scene).unwrap();
    move_arm(scene, 20.0);
    session.add_step(scene).unwrap();
    session
}

fn scene() -> MemoryScene {
    MemoryScene::new().with(MemoryObject::link("Arm"))
}

#[test]
fn create_needs_a_document_and_no_animation() {
    let mut session = AnimationSession::default();
    assert!(!session.is_enabled(Command::CreateAnimation));
    assert!(session.create_animation(&scene()).is_err());

    session
        .on_document_activated(DocumentId::new("Doc"), None)
        .unwrap();
    assert!(session.is_enabled(Command::CreateAnimation));
    session.create_animation(&scene()).unwrap();
    assert!(!session.is_enabled(Command::CreateAnimation));
    assert_eq!(session.animation().unwrap().len(), 1);
}

#[test]
fn enablement_follows_playback_state() {
    let mut scene = scene();
    let mut session = session_with_steps(&mut scene);
    assert_eq!(session.current_step(), 2);

    let enabled: Vec<_> = Command::ALL
        .into_iter()
        .filter(|c| session.is_enabled(*c))
        .collect();
    assert_eq!(
        enabled,
        [
            Command::FirstStep,
            Command::PrevStep,
            Command::Play,
            Command::AddStep,
            Command::CopyStep,
            Command::UpdateStep,
            Command::RemoveStep,
            Command::RenderFrame,
        ]
    );

    session.animation_mut().unwrap().settings_mut().encoder_path =
        Some(PathBuf::from("/usr/bin/ffmpeg"));
    assert!(session.is_enabled(Command::RenderVideo));
    assert!(session.is_enabled(Command::RenderGif));

    session.playback.playing = true;
    assert!(session.is_enabled(Command::Pause));
    assert!(!session.is_enabled(Command::AbortRender));
    assert!(!session.is_enabled(Command::FirstStep));
    assert!(matches!(session.add_step(&scene), Err(InbetweenError::Busy(_))));

    session.playback.rendering = true;
    assert!(!session.is_enabled(Command::Pause));
    assert!(session.is_enabled(Command::AbortRender));
    session.abort_render().unwrap();
    assert!(session.cancel_token().is_cancelled());
}

#[test]
fn navigation_applies_steps_instantly() {
    let mut scene = scene();
    let mut session = session_with_steps(&mut scene);

    assert_eq!(session.first_step(&mut scene).unwrap(), 0);
    assert_eq!(arm_x(&scene), 0.0);
    assert!(session.prev_step(&mut scene).is_err());

    assert_eq!(session.next_step(&mut scene).unwrap(), 1);
    assert_eq!(arm_x(&scene), 10.0);
    assert_eq!(session.last_step(&mut scene).unwrap(), 2);
    assert_eq!(arm_x(&scene), 20.0);
    assert!(session.next_step(&mut scene).is_err());
    assert_eq!(session.prev_step(&mut scene).unwrap(), 1);
}

#[test]
fn copy_step_inserts_after_current() {
    let mut scene = scene();
    let mut session = session_with_steps(&mut scene);
    session.first_step(&mut scene).unwrap();
    move_arm(&mut scene, 5.0);

    assert_eq!(session.copy_step(&scene).unwrap(), 1);
    assert_eq!(session.current_step(), 1);
    let names: Vec<_> = session
        .animation()
        .unwrap()
        .steps()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(names, ["Step", "Step003", "Step001", "Step002"]);

    session.last_step(&mut scene).unwrap();
    assert_eq!(session.copy_step(&scene).unwrap(), 4);
}

#[test]
fn update_and_remove_work_on_the_current_step() {
    let mut scene = scene();
    let mut session = session_with_steps(&mut scene);
    move_arm(&mut scene, 42.0);
    session.update_step(&scene).unwrap();
    let anim = session.animation().unwrap();
    assert_eq!(
        anim.steps()[2].state("Arm").unwrap().transform.translation()[0],
        42.0
    );

    session.remove_step().unwrap();
    assert_eq!(session.current_step(), 1);
    session.remove_step().unwrap();
    assert_eq!(session.current_step(), 0);
    assert!(!session.is_enabled(Command::RemoveStep));
    assert!(session.remove_step().is_err());
}

#[test]
fn selecting_a_step_object_jumps_to_it() {
    let mut scene = scene();
    let mut session = session_with_steps(&mut scene);
    assert!(session.on_step_selected("Step001", &mut scene).unwrap());
    assert_eq!(session.current_step(), 1);
    assert_eq!(arm_x(&scene), 10.0);
    assert!(!session.on_step_selected("Arm", &mut scene).unwrap());
    assert_eq!(session.current_step(), 1);
}

#[test]
fn document_switch_restores_persisted_animation() {
    let mut scene = scene();
    let mut session = session_with_steps(&mut scene);
    let saved = session.persist().unwrap().unwrap();

    session
        .on_document_activated(DocumentId::new("Other"), None)
        .unwrap();
    assert!(session.animation().is_none());
    assert_eq!(session.current_step(), 0);

    session
        .on_document_activated(DocumentId::new("Doc"), Some(saved))
        .unwrap();
    assert_eq!(session.animation().unwrap().len(), 3);

    let bad = serde_json::json!({ "settings": {}, "steps": [] });
    assert!(
        session
            .on_document_activated(DocumentId::new("Broken"), Some(bad))
            .is_err()
    );
    assert!(session.animation().is_none());
    assert_eq!(session.document(), Some(&DocumentId::new("Broken")));

    session.on_document_deleted(&DocumentId::new("Elsewhere"));
    assert!(session.document().is_some());
    session.on_document_deleted(&DocumentId::new("Broken"));
    assert!(session.document().is_none());
    assert!(session.playback().is_idle());
}

#[test]
fn pause_from_the_event_loop_stops_playback() {
    let mut scene = scene();
    let mut session = session_with_steps(&mut scene);
    let control = session.control();
    let mut view = StoppingViewport::new(control.clone(), Command::Pause, 5);
    let clock = ManualClock::new();

    let mut ctx = HostContext::new(&mut scene, &mut view, &clock);
    let report = session.play(&mut ctx).unwrap();
    assert!(matches!(view.pressed, Some(Ok(()))));
    assert!(report.cancelled);
    assert_eq!(report.frames, 5);
    assert!(session.playback().is_idle());
    assert_eq!(control.mode(), PlaybackMode::Idle);
    assert!(control.pause().is_err());
    assert!(session.pause().is_err());
}

#[cfg(unix)]
#[test]
fn abort_from_the_event_loop_stops_the_render() {
    // Any executable that starts and exits will do; the abort lands before the first frame.
    let encoder = PathBuf::from("/bin/true");
    if !encoder.exists() {
        return;
    }
    let mut scene = scene();
    let mut session = session_with_steps(&mut scene);
    let settings = session.animation_mut().unwrap().settings_mut();
    settings.encoder_path = Some(encoder);
    settings.custom_resolution = Some("4x4".to_string());
    settings.output_path = std::env::temp_dir()
        .join(format!("inbetween-abort-{}", std::process::id()))
        .join("video.mp4");

    let control = session.control();
    let mut view = StoppingViewport::new(control.clone(), Command::AbortRender, 1);
    let clock = ManualClock::new();

    let mut ctx = HostContext::new(&mut scene, &mut view, &clock);
    let report = session.render_video(&mut ctx).unwrap();
    assert!(matches!(view.pressed, Some(Ok(()))));
    assert_eq!(report.playback.frames, 1);
    assert!(session.playback().is_idle());
    assert_eq!(control.mode(), PlaybackMode::Idle);
    assert!(control.abort_render().is_err());
    if let Some(dir) = session.animation().unwrap().settings().output_path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

#[test]
fn failing_encoder_leaves_the_session_idle() {
    let mut scene = scene();
    let mut session = session_with_steps(&mut scene);
    let mut view = HeadlessViewport::new();
    let clock = ManualClock::new();

    let mut ctx = HostContext::new(&mut scene, &mut view, &clock);
    assert!(matches!(
        session.render_video(&mut ctx),
        Err(InbetweenError::EncoderNotConfigured)
    ));
    assert!(matches!(
        session.render_gif(&mut ctx),
        Err(InbetweenError::EncoderNotConfigured)
    ));

    let settings = session.animation_mut().unwrap().settings_mut();
    settings.encoder_path = Some(PathBuf::from("/nonexistent/inbetween/ffmpeg"));
    settings.output_path = std::env::temp_dir().join("inbetween-session/video.mp4");
    let err = session.render_video(&mut ctx).unwrap_err();
    assert!(matches!(err, InbetweenError::EncoderProcess(_)));
    assert!(session.playback().is_idle());
    assert_eq!(view.draw_styles.last(), Some(&DrawStyle::FlatLines));
}

#[test]
fn render_frame_writes_a_still() {
    let mut scene = scene();
    let mut session = session_with_steps(&mut scene);
    session
        .animation_mut()
        .unwrap()
        .settings_mut()
        .custom_resolution = Some("6x4".to_string());
    let path = std::env::temp_dir()
        .join(format!("inbetween-session-{}", std::process::id()))
        .join(STILL_FRAME_PATH);

    let mut view = HeadlessViewport::new();
    session
        .render_frame(&mut view, &ManualClock::new(), &path)
        .unwrap();
    assert_eq!(image::open(&path).unwrap().to_rgba8().width(), 6);
    assert_eq!(view.frames_captured, 1);
    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}
