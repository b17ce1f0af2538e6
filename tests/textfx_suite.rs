use std::time::{Duration, Instant};

use tui_scrolly::textfx::{Easing, RevealStyle, SplitGranularity, TextReveal};

fn style(stagger_ms: u64, duration_ms: u64) -> RevealStyle {
    RevealStyle {
        stagger: Duration::from_millis(stagger_ms),
        duration: Duration::from_millis(duration_ms),
        easing: Easing::Linear,
        ..RevealStyle::default()
    }
}

#[test]
fn word_split_preserves_source_order() {
    let r = TextReveal::new("one  two three", SplitGranularity::Word, style(50, 400));
    let glyphs = r.glyphs(Instant::now());
    let words: Vec<&str> = glyphs.iter().map(|g| g.text.as_str()).collect();
    assert_eq!(words, vec!["one", "two", "three"]);
}

#[test]
fn character_split_keeps_every_char() {
    let r = TextReveal::new("abc", SplitGranularity::Character, style(50, 400));
    let glyphs = r.glyphs(Instant::now());
    assert_eq!(glyphs.len(), 3);
    assert_eq!(glyphs[2].text, "c");
    assert_eq!(glyphs[2].index, 2);
}

#[test]
fn untriggered_elements_hold_their_from_state() {
    let r = TextReveal::new("hold", SplitGranularity::Word, style(50, 400));
    let g = &r.glyphs(Instant::now())[0];
    assert_eq!(g.opacity, 0.0);
    assert_eq!(g.offset, 1.0);
}

#[test]
fn stagger_delays_later_elements() {
    let start = Instant::now();
    let mut r = TextReveal::new("a b c", SplitGranularity::Word, style(100, 200));
    r.trigger(start);

    // 150ms in: first element 75% done, second 25%, third untouched.
    let now = start + Duration::from_millis(150);
    let glyphs = r.glyphs(now);
    assert!((glyphs[0].opacity - 0.75).abs() < 1e-3);
    assert!((glyphs[1].opacity - 0.25).abs() < 1e-3);
    assert_eq!(glyphs[2].opacity, 0.0);
}

#[test]
fn completion_waits_for_the_last_element() {
    let start = Instant::now();
    let mut r = TextReveal::new("a b c", SplitGranularity::Word, style(100, 200));
    r.trigger(start);

    assert!(!r.is_complete(start + Duration::from_millis(350)));
    // Last element starts at 200ms and runs 200ms.
    assert!(r.is_complete(start + Duration::from_millis(400)));

    let done = r.glyphs(start + Duration::from_secs(1));
    assert!(done.iter().all(|g| (g.opacity - 1.0).abs() < 1e-6));
    assert!(done.iter().all(|g| g.offset.abs() < 1e-6));
}

#[test]
fn clearing_the_trigger_snaps_back_to_the_from_state() {
    let start = Instant::now();
    let mut r = TextReveal::new("snap back", SplitGranularity::Word, style(50, 200));
    r.set_trigger(true, start);
    assert!(r.is_triggered());

    // Re-setting while running must not restart the clock.
    let later = start + Duration::from_millis(150);
    r.set_trigger(true, later);
    let g = &r.glyphs(later)[0];
    assert!((g.opacity - 0.75).abs() < 1e-3);

    r.set_trigger(false, later);
    assert!(!r.is_triggered());
    let g = &r.glyphs(later)[0];
    assert_eq!(g.opacity, 0.0);
}

#[test]
fn easing_endpoints_are_exact() {
    for e in [Easing::Linear, Easing::EaseOutCubic, Easing::EaseInOutQuad] {
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(1.0), 1.0);
        assert_eq!(e.apply(-0.5), 0.0, "input must clamp below");
        assert_eq!(e.apply(1.5), 1.0, "input must clamp above");
    }
    // Ease-out starts fast.
    assert!(Easing::EaseOutCubic.apply(0.25) > 0.25);
    // Ease-in-out starts slow.
    assert!(Easing::EaseInOutQuad.apply(0.25) < 0.25);
}

#[test]
fn empty_text_is_immediately_complete() {
    let start = Instant::now();
    let mut r = TextReveal::new("", SplitGranularity::Word, style(50, 200));
    r.trigger(start);
    assert!(r.is_complete(start));
    assert!(r.glyphs(start).is_empty());
}
