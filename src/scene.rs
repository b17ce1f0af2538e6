/// Orchestrator tying the scroll timeline to everything it drives: clip
/// scrubbing, the overlay/reveal crossfade, the title state machine, and
/// the staggered text reveals. Owns the pixel compositing for one frame.
///
/// Scroll input is ignored until the primary clip is ready (or has failed
/// to load, which unlocks input fail-open with the clip held invisible),
/// so the first scroll gesture always lands on a scrubbable clip.
use std::time::{Duration, Instant};

use crate::effects::{self, StageParams};
use crate::media::{ClipLook, MediaSource, ProceduralClip, ReadyState, ScrubOutcome, VideoScrubSync};
use crate::render::Label;
use crate::reveal::RevealEngine;
use crate::textfx::{Easing, RevealStyle, SplitGranularity, TextReveal};
use crate::timeline::{Phase, ScrollTimeline, StepDirection};
use crate::title::{TitleMachine, TitleState};

const TITLE_TEXT: &str = "THE DRIFT LINE";
const WELCOME_LINES: [&str; 2] = ["a descent in five movements", "scroll to begin"];

/// Fraction of full brightness removed by the overlay at full strength.
const OVERLAY_DARKEN: f32 = 0.72;

pub struct SceneConfig {
    pub clip_duration: f32,
    pub clip_start_offset: f32,
    pub secondary_duration: f32,
    pub seed: u32,
    /// Viewport height in pixel-buffer units at startup; freezes pacing.
    pub viewport_height: f32,
}

pub struct Scene {
    timeline: ScrollTimeline,
    title: TitleMachine,
    scrub: VideoScrubSync,
    primary: ProceduralClip,
    secondary: ProceduralClip,
    reveal: RevealEngine,
    title_reveal: TextReveal,
    clip_start_offset: f32,

    pointer_ndc: Option<(f32, f32)>,
    stage: StageParams,
    last_scrub: ScrubOutcome,
    engaged: bool,

    w: usize,
    h: usize,
    pixels: Vec<u8>,
    scratch: Vec<u8>,
}

impl Scene {
    pub fn new(cfg: SceneConfig) -> Self {
        let title_reveal = TextReveal::new(
            TITLE_TEXT,
            SplitGranularity::Word,
            RevealStyle {
                stagger: Duration::from_millis(90),
                duration: Duration::from_millis(520),
                easing: Easing::EaseOutCubic,
                ..RevealStyle::default()
            },
        );

        let timeline = ScrollTimeline::new(cfg.viewport_height);
        let stage = effects::stage_params(
            timeline.current_phase(),
            timeline.exit_progress(),
            cfg.clip_duration,
            cfg.clip_start_offset,
        );

        Self {
            timeline,
            title: TitleMachine::new(),
            scrub: VideoScrubSync::new(),
            primary: ProceduralClip::new(ClipLook::InkDrift, cfg.clip_duration)
                .with_seed(cfg.seed),
            secondary: ProceduralClip::new(ClipLook::SignalSweep, cfg.secondary_duration)
                .with_seed(cfg.seed.wrapping_mul(0x9e37_79b9)),
            reveal: RevealEngine::new(cfg.seed.wrapping_add(1)),
            title_reveal,
            clip_start_offset: cfg.clip_start_offset,
            pointer_ndc: None,
            stage,
            last_scrub: ScrubOutcome::NotReady,
            engaged: false,
            w: 0,
            h: 0,
            pixels: Vec::new(),
            scratch: Vec::new(),
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        let w = w.max(1);
        let h = h.max(1);
        if w == self.w && h == self.h {
            return;
        }
        self.w = w;
        self.h = h;
        self.pixels = vec![0u8; w * h * 4];
        self.scratch = vec![0u8; w * h * 4];
    }

    /// Scroll input is discarded until the clip can actually be scrubbed.
    pub fn input_unlocked(&self) -> bool {
        self.primary.load_failed() || self.primary.ready_state() >= ReadyState::EnoughData
    }

    pub fn handle_wheel(&mut self, delta: f32) {
        if self.input_unlocked() {
            self.timeline.apply_delta(delta);
        }
    }

    pub fn handle_step(&mut self, direction: StepDirection, magnitude: f32) {
        if self.input_unlocked() {
            self.timeline.apply_step(direction, magnitude);
        }
    }

    pub fn jump_to_start(&mut self) {
        if self.input_unlocked() {
            self.timeline.jump_to(0.0);
        }
    }

    pub fn jump_to_end(&mut self) {
        if self.input_unlocked() {
            let end = self.timeline.max_scroll();
            self.timeline.jump_to(end);
        }
    }

    /// Pointer position in normalized device coordinates, or None when the
    /// pointer left the viewport.
    pub fn set_pointer(&mut self, ndc: Option<(f32, f32)>) {
        self.pointer_ndc = ndc;
    }

    /// One simulation step: buffering, scrubbing, the title machine, the
    /// reveal uniforms, and finally the composited pixel buffer.
    pub fn update(&mut self, now: Instant, dt: f32, scale: usize) {
        self.primary.poll_buffered(now);
        self.secondary.poll_buffered(now);

        // Prime the decoder once buffering completes; a refusal (autoplay
        // policy) is swallowed since scrubbing works without it.
        if !self.engaged && self.primary.ready_state() >= ReadyState::EnoughData {
            self.engaged = true;
            let _ = self.primary.engage();
        }

        self.stage = effects::stage_params(
            self.timeline.current_phase(),
            self.timeline.exit_progress(),
            self.primary.duration(),
            self.clip_start_offset,
        );

        self.last_scrub = self.scrub.scrub(&mut self.primary, self.stage.video_target);
        if self.stage.secondary_progress > 0.0 {
            let target = self.stage.secondary_progress * self.secondary.duration();
            self.scrub.scrub(&mut self.secondary, target);
        }

        self.title.apply_signal(self.timeline.title_signal(), now);
        self.title.tick(now);
        self.title_reveal
            .set_trigger(self.title.text_reveal_armed(), now);

        let viewport_aspect = self.w.max(1) as f32 / self.h.max(1) as f32;
        let pointer = if self.stage.reveal_interactive {
            self.pointer_ndc
        } else {
            None
        };
        self.reveal.tick(dt, pointer, viewport_aspect);

        self.compose(scale);
    }

    fn compose(&mut self, scale: usize) {
        let (w, h) = (self.w, self.h);
        if w == 0 || h == 0 {
            return;
        }

        let in_secondary = self.timeline.current_phase().phase == Phase::SecondaryScrub;
        if in_secondary {
            self.secondary
                .frame(self.secondary.current_time(), w, h, scale, &mut self.pixels);
        } else {
            self.primary
                .frame(self.primary.current_time(), w, h, scale, &mut self.pixels);
        }

        // A clip that failed to load stays black; the narrative still runs.
        let clip_gain = if in_secondary {
            if self.secondary.load_failed() { 0.0 } else { 1.0 }
        } else if self.primary.load_failed() {
            0.0
        } else {
            self.stage.video_opacity
        };
        // The overlay darkens whatever clip is underneath.
        let darken = 1.0 - OVERLAY_DARKEN * self.stage.overlay_opacity;
        let gain = (clip_gain * darken).clamp(0.0, 1.0);
        if gain < 1.0 {
            for px in self.pixels.chunks_exact_mut(4) {
                px[0] = (px[0] as f32 * gain) as u8;
                px[1] = (px[1] as f32 * gain) as u8;
                px[2] = (px[2] as f32 * gain) as u8;
            }
        }

        let alpha = self.stage.reveal_opacity.clamp(0.0, 1.0);
        if alpha > 0.0 {
            self.reveal.render(&mut self.scratch, w, h, scale);
            for (dst, src) in self
                .pixels
                .chunks_exact_mut(4)
                .zip(self.scratch.chunks_exact(4))
            {
                for c in 0..3 {
                    dst[c] =
                        (dst[c] as f32 * (1.0 - alpha) + src[c] as f32 * alpha) as u8;
                }
            }
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Text runs for this frame: the welcome lines riding the entrance and
    /// exit curves, and the title card words with their staggered reveal
    /// plus the slide-up/slide-right translations.
    pub fn labels(&self, now: Instant, cols: usize, visual_rows: usize) -> Vec<Label> {
        let mut labels = Vec::new();
        if cols == 0 || visual_rows == 0 {
            return labels;
        }
        let center_row = visual_rows as i32 / 2;

        // Welcome text: opacity premultiplied into the color, offset in vh
        // mapped onto cell rows.
        if self.stage.text_opacity > 0.01 {
            let offset_rows =
                (self.stage.text_offset_vh / 100.0 * visual_rows as f32).round() as i32;
            let a = self.stage.text_opacity.clamp(0.0, 1.0);
            for (i, line) in WELCOME_LINES.iter().enumerate() {
                let col = (cols as i32 - line.chars().count() as i32) / 2;
                let row = center_row + offset_rows + i as i32 * 2 - 1;
                let base = if i == 0 { 235.0 } else { 160.0 };
                let v = (base * a) as u8;
                labels.push(Label {
                    col,
                    row,
                    text: (*line).to_string(),
                    rgb: (v, v, (v as f32 * 1.06).min(255.0) as u8),
                    bold: i == 0,
                });
            }
        }

        // Title card.
        let state = self.title.state();
        if state != TitleState::Hidden && state != TitleState::Exited {
            let up = self.title.slide_up_progress(now);
            let eased_up = Easing::EaseOutCubic.apply(up);
            let rise_rows = ((1.0 - eased_up) * visual_rows as f32 * 0.4) as i32;

            let right = self.title.slide_right_progress(now);
            let eased_right = Easing::EaseInOutQuad.apply(right);
            let slide_cols = (eased_right * cols as f32 * 1.2) as i32;

            let glyphs = self.title_reveal.glyphs(now);
            let total_width: i32 = glyphs
                .iter()
                .map(|g| g.text.chars().count() as i32 + 1)
                .sum::<i32>()
                - 1;
            let mut col = (cols as i32 - total_width.max(0)) / 2 + slide_cols;
            let row = center_row - 2 + rise_rows;

            // Before the stagger fires, the words ride the slide-up at the
            // style's from-opacity (invisible); the reveal then fades each
            // word in place.
            for g in &glyphs {
                let a = if self.title_reveal.is_triggered() {
                    g.opacity
                } else {
                    // While sliding up the card silhouette is shown dim.
                    0.35
                };
                let v = (255.0 * a.clamp(0.0, 1.0)) as u8;
                labels.push(Label {
                    col,
                    row: row + g.offset.round() as i32,
                    text: g.text.clone(),
                    rgb: (v, v, v),
                    bold: true,
                });
                col += g.text.chars().count() as i32 + 1;
            }
        }

        labels
    }

    // HUD accessors.

    pub fn phase_label(&self) -> &'static str {
        self.timeline.current_phase().phase.label()
    }

    pub fn phase_local(&self) -> f32 {
        self.timeline.current_phase().local
    }

    pub fn position(&self) -> f32 {
        self.timeline.position()
    }

    pub fn max_scroll(&self) -> f32 {
        self.timeline.max_scroll()
    }

    pub fn title_label(&self) -> &'static str {
        self.title.state().label()
    }

    pub fn stage(&self) -> &StageParams {
        &self.stage
    }

    pub fn last_scrub(&self) -> ScrubOutcome {
        self.last_scrub
    }

    pub fn buffered_fraction(&self) -> f32 {
        if self.primary.load_failed() {
            return 0.0;
        }
        (self.primary.buffered_seconds() / self.primary.duration()).clamp(0.0, 1.0)
    }

    pub fn clip_time(&self) -> f32 {
        self.primary.current_time()
    }

    pub fn mouse_active(&self) -> f32 {
        self.reveal.uniforms.mouse_active
    }
}
