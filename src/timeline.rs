/// Virtual scroll timeline: accumulates wheel/key input into a clamped scalar
/// and maps it onto the five choreographed phases of the narrative.
///
/// Phase extents are fixed once at setup as multiples of the viewport height
/// observed at that moment. They are deliberately NOT re-derived on resize:
/// the pacing of the story is decided when the session starts.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    VideoScroll,
    TextExit,
    TitleSlideUp,
    TitleSlideRight,
    SecondaryScrub,
}

impl Phase {
    pub const fn all() -> [Self; 5] {
        [
            Self::VideoScroll,
            Self::TextExit,
            Self::TitleSlideUp,
            Self::TitleSlideRight,
            Self::SecondaryScrub,
        ]
    }

    /// Pacing multipliers, in viewport heights. These are the tuned "feel"
    /// constants of the experience; treat them as configuration, not math.
    pub const fn extent_multiplier(self) -> f32 {
        match self {
            Self::VideoScroll => 4.0,
            Self::TextExit => 2.0,
            Self::TitleSlideUp => 1.0,
            Self::TitleSlideRight => 1.0,
            Self::SecondaryScrub => 4.0,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::VideoScroll => 0,
            Self::TextExit => 1,
            Self::TitleSlideUp => 2,
            Self::TitleSlideRight => 3,
            Self::SecondaryScrub => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VideoScroll => "video-scroll",
            Self::TextExit => "text-exit",
            Self::TitleSlideUp => "title-up",
            Self::TitleSlideRight => "title-right",
            Self::SecondaryScrub => "secondary-scrub",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseProgress {
    pub phase: Phase,
    /// Fractional position inside the phase, in [0, 1].
    pub local: f32,
}

/// Discrete signal for the title state machine, derived from the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleSignal {
    Below,
    Centered,
    ExitRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

#[derive(Clone, Debug)]
pub struct ScrollTimeline {
    position: f32,
    extents: [f32; 5],
    max_scroll: f32,
}

impl ScrollTimeline {
    /// Freezes phase extents from the viewport height observed now.
    pub fn new(viewport_height: f32) -> Self {
        let vh = viewport_height.max(1.0);
        let mut extents = [0.0f32; 5];
        for (slot, phase) in extents.iter_mut().zip(Phase::all()) {
            *slot = vh * phase.extent_multiplier();
        }
        let max_scroll = extents.iter().sum();
        Self {
            position: 0.0,
            extents,
            max_scroll,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn max_scroll(&self) -> f32 {
        self.max_scroll
    }

    pub fn extent(&self, phase: Phase) -> f32 {
        self.extents[phase.index()]
    }

    pub fn apply_delta(&mut self, delta: f32) {
        self.position = (self.position + delta).clamp(0.0, self.max_scroll);
    }

    pub fn apply_step(&mut self, direction: StepDirection, magnitude: f32) {
        let signed = match direction {
            StepDirection::Forward => magnitude.abs(),
            StepDirection::Backward => -magnitude.abs(),
        };
        self.apply_delta(signed);
    }

    pub fn jump_to(&mut self, position: f32) {
        self.position = position.clamp(0.0, self.max_scroll);
    }

    /// Locates the containing phase and normalizes. An exact boundary value
    /// belongs to the earliest phase whose cumulative upper bound reaches it.
    pub fn current_phase(&self) -> PhaseProgress {
        self.phase_at(self.position)
    }

    pub fn phase_at(&self, position: f32) -> PhaseProgress {
        let pos = position.clamp(0.0, self.max_scroll);
        let mut start = 0.0f32;
        for phase in Phase::all() {
            let extent = self.extents[phase.index()];
            let end = start + extent;
            if pos <= end {
                let local = if extent > 0.0 {
                    ((pos - start) / extent).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                return PhaseProgress { phase, local };
            }
            start = end;
        }
        // Clamp guarantees we land inside the last phase.
        PhaseProgress {
            phase: Phase::SecondaryScrub,
            local: 1.0,
        }
    }

    /// Progress through the text-exit phase: 0 before it, local progress
    /// inside it, pinned at 1 once past it.
    pub fn exit_progress(&self) -> f32 {
        let p = self.current_phase();
        match p.phase {
            Phase::VideoScroll => 0.0,
            Phase::TextExit => p.local,
            _ => 1.0,
        }
    }

    pub fn title_signal(&self) -> TitleSignal {
        match self.current_phase().phase {
            Phase::VideoScroll | Phase::TextExit => TitleSignal::Below,
            Phase::TitleSlideUp => TitleSignal::Centered,
            Phase::TitleSlideRight | Phase::SecondaryScrub => TitleSignal::ExitRight,
        }
    }
}
