/// Media source contract plus the procedural clip implementation and the
/// re-seek gate used for scroll-driven scrubbing.
///
/// The scene never talks to a concrete decoder: it depends only on the
/// `MediaSource` trait (readiness, duration, time, play/pause, buffering).
/// `ProceduralClip` synthesizes frames from a timestamp and simulates
/// progressive buffering so the not-ready paths are exercised for real.
use anyhow::anyhow;
use std::time::Instant;

/// Seeks closer than this to the current time are dropped to avoid jitter.
pub const SCRUB_EPSILON: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Nothing,
    Metadata,
    CurrentData,
    FutureData,
    EnoughData,
}

pub trait MediaSource {
    fn ready_state(&self) -> ReadyState;
    fn duration(&self) -> f32;
    fn current_time(&self) -> f32;
    fn set_current_time(&mut self, t: f32);
    fn play(&mut self) -> anyhow::Result<()>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    /// Advances the buffering simulation; true once fully buffered.
    fn poll_buffered(&mut self, now: Instant) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrubOutcome {
    NotReady,
    Skipped,
    Seeked,
}

/// Applies target timestamps to a media source with thresholding.
#[derive(Clone, Copy, Debug)]
pub struct VideoScrubSync {
    epsilon: f32,
}

impl VideoScrubSync {
    pub fn new() -> Self {
        Self {
            epsilon: SCRUB_EPSILON,
        }
    }

    pub fn with_epsilon(epsilon: f32) -> Self {
        Self { epsilon }
    }

    /// Seeks only when the target is meaningfully away from the current
    /// time, and never while playing: the clip is paused first so a seek is
    /// the only way the timestamp moves.
    pub fn scrub(&self, media: &mut dyn MediaSource, target: f32) -> ScrubOutcome {
        if media.ready_state() < ReadyState::EnoughData {
            return ScrubOutcome::NotReady;
        }
        if !media.is_paused() {
            media.pause();
        }
        let target = target.clamp(0.0, media.duration());
        if (media.current_time() - target).abs() > self.epsilon {
            media.set_current_time(target);
            ScrubOutcome::Seeked
        } else {
            ScrubOutcome::Skipped
        }
    }
}

impl Default for VideoScrubSync {
    fn default() -> Self {
        Self::new()
    }
}

/// Visual character of a procedural clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipLook {
    /// Slow drifting ink plumes; the primary establishing shot.
    InkDrift,
    /// Harder geometric sweep used for the secondary scrub.
    SignalSweep,
}

/// A "video" whose frames are a pure function of the timestamp. Buffering
/// is simulated at a fixed multiple of real time from construction, so the
/// scene's not-ready handling runs against genuine state changes.
pub struct ProceduralClip {
    look: ClipLook,
    duration: f32,
    current_time: f32,
    paused: bool,
    seed: u32,
    created: Option<Instant>,
    buffered: f32,
    buffer_rate: f32,
    load_failed: bool,
    autoplay_blocked: bool,
}

impl ProceduralClip {
    pub fn new(look: ClipLook, duration: f32) -> Self {
        Self {
            look,
            duration: duration.max(0.1),
            current_time: 0.0,
            paused: true,
            seed: fastrand::u32(..),
            created: None,
            buffered: 0.0,
            buffer_rate: 8.0,
            load_failed: false,
            autoplay_blocked: false,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Test/assets hook: simulate a clip whose source failed to load. The
    /// scene treats this fail-open (ready, but held at zero opacity).
    pub fn with_load_failure(mut self) -> Self {
        self.load_failed = true;
        self
    }

    /// Test hook: make the playback-engagement probe fail like a blocked
    /// autoplay policy would.
    pub fn with_autoplay_blocked(mut self) -> Self {
        self.autoplay_blocked = true;
        self
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Seconds of media buffered so far.
    pub fn buffered_seconds(&self) -> f32 {
        self.buffered
    }

    /// Decoder priming probe (play then immediately pause). May fail; the
    /// caller is expected to swallow that and proceed without the probe.
    pub fn engage(&mut self) -> anyhow::Result<()> {
        self.play()?;
        self.pause();
        Ok(())
    }

    /// Renders the frame for timestamp `t` into an RGBA buffer.
    pub fn frame(&self, t: f32, w: usize, h: usize, scale: usize, out: &mut [u8]) {
        let w = w.max(1);
        let h = h.max(1);
        let scale = scale.max(1);
        if out.len() < w * h * 4 {
            return;
        }
        let t = t.clamp(0.0, self.duration);

        for by in (0..h).step_by(scale) {
            for bx in (0..w).step_by(scale) {
                let nx = bx as f32 / w as f32 * 2.0 - 1.0;
                let ny = by as f32 / h as f32 * 2.0 - 1.0;
                let (r, g, b) = match self.look {
                    ClipLook::InkDrift => ink_drift(nx, ny, t, self.seed),
                    ClipLook::SignalSweep => signal_sweep(nx, ny, t, self.seed),
                };
                for dy in 0..scale {
                    for dx in 0..scale {
                        let x2 = bx + dx;
                        let y2 = by + dy;
                        if x2 >= w || y2 >= h {
                            continue;
                        }
                        let i = (y2 * w + x2) * 4;
                        out[i] = r;
                        out[i + 1] = g;
                        out[i + 2] = b;
                        out[i + 3] = 255;
                    }
                }
            }
        }
    }
}

impl MediaSource for ProceduralClip {
    fn ready_state(&self) -> ReadyState {
        if self.load_failed {
            return ReadyState::Nothing;
        }
        if self.created.is_none() {
            return ReadyState::Nothing;
        }
        let frac = self.buffered / self.duration;
        if frac >= 1.0 {
            ReadyState::EnoughData
        } else if frac >= 0.5 {
            ReadyState::FutureData
        } else if frac > 0.0 {
            ReadyState::CurrentData
        } else {
            ReadyState::Metadata
        }
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn current_time(&self) -> f32 {
        self.current_time
    }

    fn set_current_time(&mut self, t: f32) {
        self.current_time = t.clamp(0.0, self.duration);
    }

    fn play(&mut self) -> anyhow::Result<()> {
        if self.autoplay_blocked {
            return Err(anyhow!("playback engagement rejected by policy"));
        }
        if self.load_failed {
            return Err(anyhow!("media source failed to load"));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn poll_buffered(&mut self, now: Instant) -> bool {
        if self.load_failed {
            return false;
        }
        let created = *self.created.get_or_insert(now);
        let elapsed = now.duration_since(created).as_secs_f32();
        self.buffered = (elapsed * self.buffer_rate).min(self.duration);
        self.buffered >= self.duration
    }
}

fn ink_drift(nx: f32, ny: f32, t: f32, seed: u32) -> (u8, u8, u8) {
    let s = (seed & 0xffff) as f32 * 1e-4;
    let drift = t * 0.35;
    let a = ((nx * 2.1 + drift + s).sin() + (ny * 1.7 - drift * 0.8).cos()) * 0.5;
    let b = ((nx * 3.4 - ny * 2.2 + drift * 1.3).sin()
        + ((nx + ny) * 1.9 + drift * 0.6 + s).cos())
        * 0.5;
    let v = ((a + b) * 0.5 + 1.0) * 0.5;
    let depth = 1.0 - (nx * nx + ny * ny) * 0.35;

    let r = (v * 70.0 + 18.0) * depth;
    let g = (v * 96.0 + 30.0) * depth;
    let bch = (v * 150.0 + 58.0) * depth;
    (
        r.clamp(0.0, 255.0) as u8,
        g.clamp(0.0, 255.0) as u8,
        bch.clamp(0.0, 255.0) as u8,
    )
}

fn signal_sweep(nx: f32, ny: f32, t: f32, seed: u32) -> (u8, u8, u8) {
    let s = (seed >> 16) as f32 * 1e-5;
    let sweep = ((nx + 1.0) * 3.0 - t * 1.4 + s).sin() * 0.5 + 0.5;
    let bands = ((ny * 18.0 + t * 0.9).sin() * 0.5 + 0.5).powf(3.0);
    let ring = ((nx * nx + ny * ny).sqrt() * 9.0 - t * 2.0).sin() * 0.5 + 0.5;
    let v = (sweep * 0.55 + bands * 0.2 + ring * 0.25).clamp(0.0, 1.0);

    let r = v * 205.0 + 20.0;
    let g = v * 120.0 + 26.0;
    let b = v * 60.0 + 32.0;
    (
        r.clamp(0.0, 255.0) as u8,
        g.clamp(0.0, 255.0) as u8,
        b.clamp(0.0, 255.0) as u8,
    )
}
