use tui_scrolly::effects::{stage_params, text_position, REVEAL_INTERACTIVE_OPACITY};
use tui_scrolly::timeline::{Phase, PhaseProgress};

const DUR: f32 = 12.0;
const OFFSET: f32 = 0.8;

fn at(phase: Phase, local: f32) -> PhaseProgress {
    PhaseProgress { phase, local }
}

// ── overlay / reveal crossfade ──────────────────────────────────────────────

#[test]
fn overlay_leads_reveal_during_exit() {
    let s = stage_params(at(Phase::TextExit, 0.25), 0.25, DUR, OFFSET);
    assert!((s.overlay_opacity - 0.5).abs() < 1e-6);
    assert_eq!(s.reveal_opacity, 0.0);

    let s = stage_params(at(Phase::TextExit, 0.75), 0.75, DUR, OFFSET);
    assert!((s.overlay_opacity - 1.0).abs() < 1e-6);
    assert!((s.reveal_opacity - 0.5).abs() < 1e-6);
}

#[test]
fn video_fades_as_exit_advances() {
    let s = stage_params(at(Phase::TextExit, 0.4), 0.4, DUR, OFFSET);
    assert!((s.video_opacity - 0.6).abs() < 1e-6);

    let s = stage_params(at(Phase::SecondaryScrub, 0.0), 1.0, DUR, OFFSET);
    assert_eq!(s.video_opacity, 0.0);
    assert_eq!(s.reveal_opacity, 1.0);
}

#[test]
fn reveal_interactive_requires_passing_the_threshold() {
    // reveal = (exit - 0.5) * 2, so exit 0.75 gives exactly the threshold.
    let s = stage_params(at(Phase::TextExit, 0.75), 0.75, DUR, OFFSET);
    assert!((s.reveal_opacity - REVEAL_INTERACTIVE_OPACITY).abs() < 1e-6);
    assert!(!s.reveal_interactive, "exact threshold must not be live");

    let s = stage_params(at(Phase::TextExit, 0.8), 0.8, DUR, OFFSET);
    assert!(s.reveal_interactive);
}

// ── video scrub target ──────────────────────────────────────────────────────

#[test]
fn video_target_spans_offset_to_duration() {
    let s = stage_params(at(Phase::VideoScroll, 0.0), 0.0, DUR, OFFSET);
    assert!((s.video_target - OFFSET).abs() < 1e-6);

    let s = stage_params(at(Phase::VideoScroll, 0.5), 0.0, DUR, OFFSET);
    assert!((s.video_target - (OFFSET + (DUR - OFFSET) * 0.5)).abs() < 1e-4);

    let s = stage_params(at(Phase::VideoScroll, 1.0), 0.0, DUR, OFFSET);
    assert!((s.video_target - DUR).abs() < 1e-6);
}

#[test]
fn video_target_pins_past_the_first_phase() {
    let s = stage_params(at(Phase::TitleSlideUp, 0.3), 1.0, DUR, OFFSET);
    assert_eq!(s.video_target, DUR);
}

#[test]
fn secondary_progress_only_in_its_phase() {
    let s = stage_params(at(Phase::SecondaryScrub, 0.7), 1.0, DUR, OFFSET);
    assert!((s.secondary_progress - 0.7).abs() < 1e-6);

    let s = stage_params(at(Phase::TitleSlideRight, 0.7), 1.0, DUR, OFFSET);
    assert_eq!(s.secondary_progress, 0.0);
}

// ── welcome text trajectory ─────────────────────────────────────────────────

#[test]
fn text_enters_from_below_and_settles() {
    let (off, a) = text_position(at(Phase::VideoScroll, 0.0), 0.0);
    assert_eq!(off, 20.0);
    assert_eq!(a, 0.0);

    let (off, a) = text_position(at(Phase::VideoScroll, 0.175), 0.0);
    assert!((off - 10.0).abs() < 1e-4);
    assert!((a - 0.5).abs() < 1e-4);

    let (off, a) = text_position(at(Phase::VideoScroll, 0.5), 0.0);
    assert_eq!(off, 0.0);
    assert_eq!(a, 1.0);
}

#[test]
fn text_reentry_mirrors_the_exit_curve() {
    // Entering the exit phase at zero progress the text is still settled.
    let (off, a) = text_position(at(Phase::TextExit, 0.0), 0.0);
    assert_eq!(off, 0.0);
    assert_eq!(a, 1.0);

    let (off, a) = text_position(at(Phase::TextExit, 0.15), 0.15);
    assert!((off - 10.0).abs() < 1e-4);
    assert!((a - 0.5).abs() < 1e-4);
}

#[test]
fn text_hides_past_the_reentry_window() {
    let (off, a) = text_position(at(Phase::TextExit, 0.3), 0.3);
    assert_eq!(off, 20.0);
    assert_eq!(a, 0.0);

    let (off, a) = text_position(at(Phase::SecondaryScrub, 0.5), 1.0);
    assert_eq!(off, 20.0);
    assert_eq!(a, 0.0);
}

#[test]
fn same_sample_forward_and_backward() {
    // The mapping has no direction state: identical inputs give identical
    // outputs regardless of scroll history.
    let a = stage_params(at(Phase::TextExit, 0.6), 0.6, DUR, OFFSET);
    let b = stage_params(at(Phase::TextExit, 0.6), 0.6, DUR, OFFSET);
    assert_eq!(a, b);
}
