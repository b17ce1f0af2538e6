/// Staggered text reveal: splits a string into characters or words and
/// animates each element from its `from` params to its `to` params with a
/// per-element delay. Driven either declaratively (`set_trigger`) or
/// imperatively (`trigger`/`reset`); clearing the trigger snaps every
/// element back to its initial state.
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitGranularity {
    Character,
    Word,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOutCubic,
    EaseInOutQuad,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Per-element endpoints. Offsets are in cell rows (positive = below the
/// resting position), scale is a glyph emphasis hint for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealStyle {
    pub from_opacity: f32,
    pub to_opacity: f32,
    pub from_offset: f32,
    pub to_offset: f32,
    pub from_scale: f32,
    pub to_scale: f32,
    pub stagger: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self {
            from_opacity: 0.0,
            to_opacity: 1.0,
            from_offset: 1.0,
            to_offset: 0.0,
            from_scale: 1.0,
            to_scale: 1.0,
            stagger: Duration::from_millis(45),
            duration: Duration::from_millis(420),
            easing: Easing::EaseOutCubic,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlyphState {
    pub text: String,
    /// Element index within the split sequence.
    pub index: usize,
    pub opacity: f32,
    pub offset: f32,
    pub scale: f32,
}

#[derive(Clone, Debug)]
pub struct TextReveal {
    text: String,
    granularity: SplitGranularity,
    style: RevealStyle,
    triggered_at: Option<Instant>,
}

impl TextReveal {
    pub fn new(text: impl Into<String>, granularity: SplitGranularity, style: RevealStyle) -> Self {
        Self {
            text: text.into(),
            granularity,
            style,
            triggered_at: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered_at.is_some()
    }

    /// Declarative trigger: setting starts the reveal (idempotent while
    /// already running), clearing resets to the initial state.
    pub fn set_trigger(&mut self, on: bool, now: Instant) {
        if on {
            if self.triggered_at.is_none() {
                self.triggered_at = Some(now);
            }
        } else {
            self.triggered_at = None;
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.triggered_at = Some(now);
    }

    pub fn reset(&mut self) {
        self.triggered_at = None;
    }

    /// True once every element has finished animating.
    pub fn is_complete(&self, now: Instant) -> bool {
        let Some(start) = self.triggered_at else {
            return false;
        };
        let n = self.split().len();
        if n == 0 {
            return true;
        }
        let total = self.style.stagger * (n as u32 - 1) + self.style.duration;
        now.duration_since(start) >= total
    }

    /// Current state of every element, in source order.
    pub fn glyphs(&self, now: Instant) -> Vec<GlyphState> {
        let segments = self.split();
        let style = &self.style;

        segments
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let raw = match self.triggered_at {
                    None => 0.0,
                    Some(start) => {
                        let delay = style.stagger.as_secs_f32() * index as f32;
                        let elapsed = now.duration_since(start).as_secs_f32() - delay;
                        let dur = style.duration.as_secs_f32().max(1e-6);
                        (elapsed / dur).clamp(0.0, 1.0)
                    }
                };
                let t = style.easing.apply(raw);
                GlyphState {
                    text,
                    index,
                    opacity: style.from_opacity + (style.to_opacity - style.from_opacity) * t,
                    offset: style.from_offset + (style.to_offset - style.from_offset) * t,
                    scale: style.from_scale + (style.to_scale - style.from_scale) * t,
                }
            })
            .collect()
    }

    fn split(&self) -> Vec<String> {
        match self.granularity {
            SplitGranularity::Character => {
                self.text.chars().map(|c| c.to_string()).collect()
            }
            SplitGranularity::Word => self
                .text
                .split_whitespace()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}
