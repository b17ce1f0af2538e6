/// Discrete controller for the title card. The interesting part is the
/// deferred slide-right: a request arriving while the card is still sliding
/// up is queued (depth one) and fires the moment the card settles, instead
/// of superimposing two animations.
use std::time::{Duration, Instant};

use crate::timeline::TitleSignal;

/// Settle delay after slide-up before the card counts as centered, and the
/// wall-clock length of the slide-right exit. Tuned constants.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);
pub const SLIDE_RIGHT_DURATION: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleState {
    Hidden,
    SlidingUp,
    Centered,
    SlidingRight,
    Exited,
}

impl TitleState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::SlidingUp => "sliding-up",
            Self::Centered => "centered",
            Self::SlidingRight => "sliding-right",
            Self::Exited => "exited",
        }
    }
}

#[derive(Clone, Debug)]
pub struct TitleMachine {
    state: TitleState,
    pending_slide_right: bool,
    /// Cancellable settle timer: cleared on reset, so a stale deadline can
    /// never fire after the machine left the sliding-up state.
    settle_deadline: Option<Instant>,
    slide_started: Option<Instant>,
    /// Set when the card reaches centered; the text stagger-reveal keys off
    /// this and is reset together with the machine.
    text_reveal_armed: bool,
}

impl TitleMachine {
    pub fn new() -> Self {
        Self {
            state: TitleState::Hidden,
            pending_slide_right: false,
            settle_deadline: None,
            slide_started: None,
            text_reveal_armed: false,
        }
    }

    pub fn state(&self) -> TitleState {
        self.state
    }

    pub fn pending_slide_right(&self) -> bool {
        self.pending_slide_right
    }

    pub fn text_reveal_armed(&self) -> bool {
        self.text_reveal_armed
    }

    /// Fraction of the slide-up settle completed, 1.0 once centered or past.
    pub fn slide_up_progress(&self, now: Instant) -> f32 {
        match self.state {
            TitleState::Hidden => 0.0,
            TitleState::SlidingUp => self
                .settle_deadline
                .map(|deadline| {
                    let remaining = deadline.saturating_duration_since(now).as_secs_f32();
                    (1.0 - remaining / SETTLE_DELAY.as_secs_f32()).clamp(0.0, 1.0)
                })
                .unwrap_or(0.0),
            TitleState::Centered | TitleState::SlidingRight | TitleState::Exited => 1.0,
        }
    }

    /// Fraction of the slide-right exit completed, 1.0 once exited.
    pub fn slide_right_progress(&self, now: Instant) -> f32 {
        match self.state {
            TitleState::SlidingRight => self
                .slide_started
                .map(|s| {
                    (now.duration_since(s).as_secs_f32()
                        / SLIDE_RIGHT_DURATION.as_secs_f32())
                    .clamp(0.0, 1.0)
                })
                .unwrap_or(0.0),
            TitleState::Exited => 1.0,
            _ => 0.0,
        }
    }

    /// Applies the discrete phase signal. Must be followed by `tick` each
    /// frame so time-gated transitions resolve.
    pub fn apply_signal(&mut self, signal: TitleSignal, now: Instant) {
        match signal {
            TitleSignal::Below => self.reset(),
            TitleSignal::Centered => match self.state {
                TitleState::Hidden => {
                    self.state = TitleState::SlidingUp;
                    self.settle_deadline = Some(now + SETTLE_DELAY);
                }
                // Snap straight back to centered; the slide is deliberately
                // not replayed in reverse.
                TitleState::SlidingRight | TitleState::Exited => {
                    self.state = TitleState::Centered;
                    self.slide_started = None;
                    self.pending_slide_right = false;
                }
                TitleState::SlidingUp | TitleState::Centered => {}
            },
            TitleSignal::ExitRight => match self.state {
                TitleState::Centered => self.start_slide_right(now),
                TitleState::SlidingUp => {
                    self.pending_slide_right = true;
                }
                TitleState::Hidden => {
                    // Jumped phases in one large delta: enter and queue the
                    // exit so the card still passes through centered.
                    self.state = TitleState::SlidingUp;
                    self.settle_deadline = Some(now + SETTLE_DELAY);
                    self.pending_slide_right = true;
                }
                TitleState::SlidingRight | TitleState::Exited => {}
            },
        }
    }

    /// Resolves timer-gated transitions. Safe to call every frame.
    pub fn tick(&mut self, now: Instant) {
        if self.state == TitleState::SlidingUp {
            if let Some(deadline) = self.settle_deadline {
                if now >= deadline {
                    self.settle_deadline = None;
                    self.state = TitleState::Centered;
                    self.text_reveal_armed = true;
                    if self.pending_slide_right {
                        self.pending_slide_right = false;
                        self.start_slide_right(now);
                    }
                }
            }
        }

        if self.state == TitleState::SlidingRight {
            if let Some(started) = self.slide_started {
                if now.duration_since(started) >= SLIDE_RIGHT_DURATION {
                    self.state = TitleState::Exited;
                    self.slide_started = None;
                }
            }
        }
    }

    fn start_slide_right(&mut self, now: Instant) {
        self.state = TitleState::SlidingRight;
        self.slide_started = Some(now);
    }

    fn reset(&mut self) {
        self.state = TitleState::Hidden;
        self.pending_slide_right = false;
        self.settle_deadline = None;
        self.slide_started = None;
        self.text_reveal_armed = false;
    }
}

impl Default for TitleMachine {
    fn default() -> Self {
        Self::new()
    }
}
