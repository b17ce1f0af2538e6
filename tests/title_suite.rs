use std::time::{Duration, Instant};

use tui_scrolly::timeline::TitleSignal;
use tui_scrolly::title::{TitleMachine, TitleState, SETTLE_DELAY, SLIDE_RIGHT_DURATION};

fn t0() -> Instant {
    Instant::now()
}

// ── slide-up and settle ─────────────────────────────────────────────────────

#[test]
fn centered_signal_starts_the_slide_up() {
    let start = t0();
    let mut m = TitleMachine::new();
    m.apply_signal(TitleSignal::Centered, start);
    assert_eq!(m.state(), TitleState::SlidingUp);

    m.tick(start + Duration::from_millis(300));
    assert_eq!(m.state(), TitleState::SlidingUp, "settle must take the full delay");

    m.tick(start + SETTLE_DELAY);
    assert_eq!(m.state(), TitleState::Centered);
    assert!(m.text_reveal_armed());
}

#[test]
fn slide_up_progress_runs_zero_to_one() {
    let start = t0();
    let mut m = TitleMachine::new();
    assert_eq!(m.slide_up_progress(start), 0.0);

    m.apply_signal(TitleSignal::Centered, start);
    let mid = m.slide_up_progress(start + Duration::from_millis(500));
    assert!((mid - 0.5).abs() < 0.05);

    m.tick(start + SETTLE_DELAY);
    assert_eq!(m.slide_up_progress(start + SETTLE_DELAY), 1.0);
}

// ── deferred slide-right ────────────────────────────────────────────────────

#[test]
fn exit_request_during_slide_up_is_queued_not_superimposed() {
    let start = t0();
    let mut m = TitleMachine::new();
    m.apply_signal(TitleSignal::Centered, start);
    m.apply_signal(TitleSignal::ExitRight, start + Duration::from_millis(200));
    assert_eq!(m.state(), TitleState::SlidingUp);
    assert!(m.pending_slide_right());

    // Settling consumes the queued request immediately.
    m.tick(start + SETTLE_DELAY);
    assert_eq!(m.state(), TitleState::SlidingRight);
    assert!(!m.pending_slide_right());
}

#[test]
fn exit_from_centered_slides_right_then_exits() {
    let start = t0();
    let mut m = TitleMachine::new();
    m.apply_signal(TitleSignal::Centered, start);
    m.tick(start + SETTLE_DELAY);

    let slide_start = start + SETTLE_DELAY + Duration::from_millis(10);
    m.apply_signal(TitleSignal::ExitRight, slide_start);
    assert_eq!(m.state(), TitleState::SlidingRight);

    let half = m.slide_right_progress(slide_start + Duration::from_millis(500));
    assert!((half - 0.5).abs() < 0.05);

    m.tick(slide_start + SLIDE_RIGHT_DURATION);
    assert_eq!(m.state(), TitleState::Exited);
    assert_eq!(m.slide_right_progress(slide_start + SLIDE_RIGHT_DURATION), 1.0);
}

#[test]
fn exit_signal_from_hidden_still_passes_through_centered() {
    // One large scroll jump can skip the centered band entirely; the card
    // must still enter and queue the exit instead of teleporting away.
    let start = t0();
    let mut m = TitleMachine::new();
    m.apply_signal(TitleSignal::ExitRight, start);
    assert_eq!(m.state(), TitleState::SlidingUp);
    assert!(m.pending_slide_right());

    m.tick(start + SETTLE_DELAY);
    assert_eq!(m.state(), TitleState::SlidingRight);
}

// ── reset and snap-back ─────────────────────────────────────────────────────

#[test]
fn below_signal_cancels_a_pending_settle() {
    let start = t0();
    let mut m = TitleMachine::new();
    m.apply_signal(TitleSignal::Centered, start);
    m.apply_signal(TitleSignal::Below, start + Duration::from_millis(400));
    assert_eq!(m.state(), TitleState::Hidden);

    // The old deadline must not fire after the reset.
    m.tick(start + SETTLE_DELAY + Duration::from_millis(100));
    assert_eq!(m.state(), TitleState::Hidden);
    assert!(!m.text_reveal_armed());
}

#[test]
fn scrolling_back_from_exited_snaps_to_centered() {
    let start = t0();
    let mut m = TitleMachine::new();
    m.apply_signal(TitleSignal::Centered, start);
    m.tick(start + SETTLE_DELAY);
    m.apply_signal(TitleSignal::ExitRight, start + SETTLE_DELAY);
    m.tick(start + SETTLE_DELAY + SLIDE_RIGHT_DURATION);
    assert_eq!(m.state(), TitleState::Exited);

    m.apply_signal(TitleSignal::Centered, start + SETTLE_DELAY + SLIDE_RIGHT_DURATION);
    assert_eq!(m.state(), TitleState::Centered, "slide is not replayed in reverse");
}

#[test]
fn snap_back_mid_slide_clears_everything() {
    let start = t0();
    let mut m = TitleMachine::new();
    m.apply_signal(TitleSignal::Centered, start);
    m.tick(start + SETTLE_DELAY);
    m.apply_signal(TitleSignal::ExitRight, start + SETTLE_DELAY);
    assert_eq!(m.state(), TitleState::SlidingRight);

    let back = start + SETTLE_DELAY + Duration::from_millis(300);
    m.apply_signal(TitleSignal::Centered, back);
    assert_eq!(m.state(), TitleState::Centered);
    assert_eq!(m.slide_right_progress(back), 0.0);

    // The abandoned slide timer must not complete later.
    m.tick(start + SETTLE_DELAY + SLIDE_RIGHT_DURATION + Duration::from_secs(1));
    assert_eq!(m.state(), TitleState::Centered);
}

#[test]
fn rapid_oscillation_settles_on_the_last_signal() {
    let start = t0();
    let mut m = TitleMachine::new();
    for i in 0..12 {
        let now = start + Duration::from_millis(i * 40);
        let sig = if i % 2 == 0 {
            TitleSignal::Centered
        } else {
            TitleSignal::Below
        };
        m.apply_signal(sig, now);
        m.tick(now);
    }
    // Last applied was Below (i = 11).
    assert_eq!(m.state(), TitleState::Hidden);

    let now = start + Duration::from_secs(2);
    m.apply_signal(TitleSignal::Centered, now);
    m.tick(now + SETTLE_DELAY);
    assert_eq!(m.state(), TitleState::Centered);
}
