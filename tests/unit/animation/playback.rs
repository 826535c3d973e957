use super::*;

#[test]
fn samples_cover_half_open_interval() {
    assert_eq!(progress_samples(4.0, false), vec![0.0, 0.25, 0.5, 0.75]);
    assert_eq!(progress_samples(2.5, false), vec![0.0, 0.4, 0.8]);
}

#[test]
fn last_pair_reaches_exact_endpoint() {
    let s = progress_samples(4.0, true);
    assert_eq!(s.len(), 5);
    assert_eq!(*s.last().unwrap(), 1.0);
}

#[test]
fn degenerate_density_still_yields_a_sample() {
    assert_eq!(progress_samples(0.0, false), vec![0.0]);
    assert_eq!(progress_samples(f64::NAN, true), vec![0.0, 1.0]);
}

#[test]
fn float_noise_does_not_add_a_sample() {
    let frames = 24.0 + 1e-12;
    assert_eq!(progress_samples(frames, false).len(), 24);
}

#[test]
fn cursor_walks_pairs_in_order() {
    let ticks: Vec<_> = FrameCursor::new(vec![2, 1, 1], 24.0).collect();
    assert_eq!(ticks.len(), 48 + 24 + 25);
    assert_eq!(ticks.iter().filter(|t| t.step == 1).count(), 48);
    assert_eq!(ticks.iter().filter(|t| t.pair_start).count(), 3);
    assert!(ticks[0].pair_start);
    assert_eq!(ticks[0].t, 0.0);
    let last = ticks.last().unwrap();
    assert_eq!((last.step, last.t), (2, 1.0));
}

#[test]
fn density_change_applies_from_next_pair() {
    let mut cursor = FrameCursor::new(vec![1, 1, 1], 4.0);
    let first = cursor.next().unwrap();
    assert_eq!(first.step, 1);
    cursor.set_density(2.0);

    let rest: Vec<_> = cursor.by_ref().collect();
    assert_eq!(rest.iter().filter(|t| t.step == 1).count(), 3);
    assert_eq!(rest.iter().filter(|t| t.step == 2).count(), 3);
    assert_eq!(cursor.density(), 2.0);
}

#[test]
fn single_step_yields_nothing() {
    assert_eq!(FrameCursor::new(vec![1], 24.0).count(), 0);
    assert_eq!(FrameCursor::new(Vec::new(), 24.0).count(), 0);
}

#[test]
fn pair_frames_is_none_outside_the_pairs() {
    let cursor = FrameCursor::new(vec![2, 1], 24.0);
    assert_eq!(cursor.pair_frames(0, 24.0), None);
    assert_eq!(cursor.pair_frames(1, 24.0), Some(48.0));
    assert_eq!(cursor.pair_frames(2, 24.0), Some(24.0));
    assert_eq!(cursor.pair_frames(3, 24.0), None);
}

#[test]
fn cancel_token_is_shared_between_clones() {
    let token = CancelToken::new();
    let ui = token.clone();
    assert!(!token.is_cancelled());
    ui.cancel();
    assert!(token.is_cancelled());
    token.reset();
    assert!(!ui.is_cancelled());
}

#[test]
fn playback_mode_prefers_rendering() {
    let mut state = PlaybackState::new(24.0);
    assert_eq!(state.mode(), PlaybackMode::Idle);
    state.playing = true;
    assert_eq!(state.mode(), PlaybackMode::Playing);
    state.rendering = true;
    assert_eq!(state.mode(), PlaybackMode::Rendering);
    state.reset(12.0);
    assert!(state.is_idle());
    assert_eq!(state.adaptive_fps, 12.0);
}
