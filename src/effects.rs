/// Pure mapping from phase progress to the continuous visual parameters of
/// the scene. Everything here is recomputed from scratch on every update so
/// that scrolling backward replays the exact same trajectory in reverse;
/// no direction state is kept anywhere in this module.
use crate::timeline::{Phase, PhaseProgress};

/// Welcome-text vertical offset at entrance start, in viewport-height
/// percentage units (a 20vh translate in the layout sense).
pub const TEXT_START_OFFSET_VH: f32 = 20.0;

/// Fraction of the first phase after which the welcome text has fully
/// arrived and holds in place.
pub const TEXT_ARRIVAL: f32 = 0.35;

/// Below this exit progress the text replays its re-entry sub-path when
/// scrolling backward; above it the text stays fully hidden. Tuned by feel.
pub const TEXT_REENTRY_THRESHOLD: f32 = 0.3;

/// Reveal image accepts pointer interaction once its opacity passes this.
pub const REVEAL_INTERACTIVE_OPACITY: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageParams {
    /// Target timestamp for the primary clip, in seconds.
    pub video_target: f32,
    /// Welcome text translate-down offset in vh units (0 = settled).
    pub text_offset_vh: f32,
    pub text_opacity: f32,
    pub overlay_opacity: f32,
    pub reveal_opacity: f32,
    pub video_opacity: f32,
    /// Local progress of the secondary scrub phase, 0 outside it.
    pub secondary_progress: f32,
    pub reveal_interactive: bool,
}

/// Evaluates all continuous outputs for one timeline sample.
pub fn stage_params(
    progress: PhaseProgress,
    exit_progress: f32,
    video_duration: f32,
    video_start_offset: f32,
) -> StageParams {
    let exit = exit_progress.clamp(0.0, 1.0);
    let (text_offset_vh, text_opacity) = text_position(progress, exit);

    let video_target = match progress.phase {
        Phase::VideoScroll => {
            let span = (video_duration - video_start_offset).max(0.0);
            video_start_offset + span * progress.local
        }
        _ => video_duration,
    };

    let overlay_opacity = (exit * 2.0).min(1.0);
    let reveal_opacity = ((exit - 0.5) * 2.0).max(0.0);
    let video_opacity = 1.0 - exit;

    let secondary_progress = match progress.phase {
        Phase::SecondaryScrub => progress.local,
        _ => 0.0,
    };

    StageParams {
        video_target,
        text_offset_vh,
        text_opacity,
        overlay_opacity,
        reveal_opacity,
        video_opacity,
        secondary_progress,
        reveal_interactive: reveal_opacity > REVEAL_INTERACTIVE_OPACITY,
    }
}

/// Welcome-text trajectory: entrance during the first phase, hold, then an
/// exit/re-entry path driven purely by `exit`. One reversible curve.
pub fn text_position(progress: PhaseProgress, exit: f32) -> (f32, f32) {
    if progress.phase == Phase::VideoScroll {
        // Entrance: slide up from 20vh while fading in, then hold.
        let entrance = (progress.local / TEXT_ARRIVAL).clamp(0.0, 1.0);
        return (TEXT_START_OFFSET_VH * (1.0 - entrance), entrance);
    }

    if exit < TEXT_REENTRY_THRESHOLD {
        // Mirrors the exit path exactly, so backward scrolling re-enters
        // along the same curve the text left on.
        let reentry = 1.0 - exit / TEXT_REENTRY_THRESHOLD;
        (TEXT_START_OFFSET_VH * (1.0 - reentry), reentry)
    } else {
        (TEXT_START_OFFSET_VH, 0.0)
    }
}
