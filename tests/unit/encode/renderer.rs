use super::*;

use crate::encode::sink::InMemorySink;
use crate::foundation::clock::ManualClock;
use crate::foundation::core::FrameRGBA;
use crate::host::memory::HeadlessViewport;

struct FailingSink {
    pushes: u64,
    ends: u64,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> InbetweenResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> InbetweenResult<()> {
        self.pushes += 1;
        if self.pushes > 2 {
            return Err(InbetweenError::encoder_process("broken pipe"));
        }
        Ok(())
    }

    fn end(&mut self) -> InbetweenResult<()> {
        self.ends += 1;
        Err(InbetweenError::encoder_process("exit status 1"))
    }
}

fn res() -> Resolution {
    Resolution::new(4, 2).unwrap()
}

#[test]
fn eta_extrapolates_linearly() {
    assert_eq!(
        eta_remaining(100, Duration::from_secs(5), 10),
        Duration::from_secs(45)
    );
    assert_eq!(eta_remaining(100, Duration::from_secs(5), 0), Duration::ZERO);
    assert_eq!(eta_remaining(5, Duration::from_secs(5), 10), Duration::ZERO);
}

#[test]
fn frames_are_pushed_with_progress_every_tenth() {
    let clock = ManualClock::new();
    let mut sink = InMemorySink::new();
    let mut view = HeadlessViewport::new();
    {
        let mut r = VideoRenderer::new(&mut sink, &clock, res(), Background::White, 24);
        r.begin().unwrap();
        for _ in 0..9 {
            r.add_frame(&mut view, 100).unwrap();
        }
        clock.advance(Duration::from_secs(5));
        r.add_frame(&mut view, 100).unwrap();

        let summary = r.end();
        assert!(summary.is_success());
        assert_eq!(summary.frames, 10);
        assert_eq!(summary.elapsed, Duration::from_secs(5));
        assert_eq!(summary.fps, 2.0);
        assert_eq!(summary.last_eta, Some(Duration::from_secs(45)));
    }
    assert_eq!(view.events_processed, 1);
    assert_eq!(sink.frames().len(), 10);
    assert_eq!(sink.frames()[9].0, FrameIndex(9));
    assert_eq!(sink.frames()[0].1.data[..4], [255u8, 255, 255, 255]);
    assert_eq!(sink.end_calls(), 1);
}

#[test]
fn end_is_idempotent_and_reports_first_failure() {
    let clock = ManualClock::new();
    let mut sink = FailingSink { pushes: 0, ends: 0 };
    let mut view = HeadlessViewport::new();
    {
        let mut r = VideoRenderer::new(&mut sink, &clock, res(), Background::Black, 24);
        r.begin().unwrap();
        r.add_frame(&mut view, 10).unwrap();
        r.add_frame(&mut view, 10).unwrap();
        assert!(r.add_frame(&mut view, 10).is_err());

        let first = r.end();
        assert_eq!(first.frames, 2);
        assert!(first.failure.as_deref().unwrap().contains("broken pipe"));
        assert_eq!(r.end(), first);
        assert!(r.add_frame(&mut view, 10).is_err());
    }
    assert_eq!(sink.ends, 1);
}

#[test]
fn still_frame_is_written_as_png() {
    let dir = std::env::temp_dir().join(format!("inbetween-still-{}", std::process::id()));
    let path = dir.join("frame.png");
    let mut view = HeadlessViewport::new();
    render_still(&mut view, res(), Background::Transparent, &path).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    let _ = std::fs::remove_dir_all(&dir);
}
