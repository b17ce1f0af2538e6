use crate::config::{Config, Quality, RendererMode};
use crate::render::{pixel_multipliers, BrailleRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::scene::{Scene, SceneConfig};
use crate::terminal::TerminalGuard;
use crate::timeline::StepDirection;
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use std::io::BufWriter;
use std::time::{Duration, Instant};

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Braille => Box::new(BrailleRenderer::new()),
    };
    let (px_w_mul, px_h_mul) = pixel_multipliers(renderer.name());

    let mut last_size = crossterm::terminal::size().context("get terminal size")?;
    if last_size.1 < 2 || last_size.0 < 4 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x2, got {}x{})",
            last_size.0,
            last_size.1
        ));
    }

    let mut show_hud = true;
    let mut show_help = false;
    let mut hud_rows = hud_rows_for_size(last_size, show_hud);

    let seed = cfg.seed.unwrap_or_else(|| fastrand::u32(..));
    let start_visual_rows = last_size.1.saturating_sub(hud_rows).max(1);
    let mut scene = Scene::new(SceneConfig {
        clip_duration: cfg.clip_duration,
        clip_start_offset: cfg.clip_start_offset,
        secondary_duration: cfg.secondary_duration,
        seed,
        viewport_height: (start_visual_rows as usize * px_h_mul) as f32,
    });
    resize_scene(&mut scene, last_size, px_w_mul, px_h_mul, hud_rows);

    let mut runtime = RuntimeTuning::new(cfg.quality, cfg.adaptive_quality);
    let mut last_frame = Instant::now();
    let mut fps = FpsCounter::new();
    let mut last_render_ms = 0.0f32;
    let mut last_total_ms = 0.0f32;

    loop {
        let now = Instant::now();

        // Drain input events (non-blocking).
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    let old_hud = show_hud;
                    if handle_key(
                        k.code,
                        k.modifiers,
                        &mut scene,
                        &cfg,
                        &mut show_hud,
                        &mut show_help,
                    ) {
                        return Ok(());
                    }
                    if show_hud != old_hud {
                        hud_rows = hud_rows_for_size(last_size, show_hud);
                        resize_scene(&mut scene, last_size, px_w_mul, px_h_mul, hud_rows);
                    }
                }
                Event::Mouse(m) => {
                    let visual_rows = last_size.1.saturating_sub(hud_rows).max(1);
                    match m.kind {
                        MouseEventKind::ScrollDown => scene.handle_wheel(cfg.wheel_step),
                        MouseEventKind::ScrollUp => scene.handle_wheel(-cfg.wheel_step),
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                            if m.row < visual_rows {
                                let nx = ((m.column as f32 + 0.5)
                                    / last_size.0.max(1) as f32)
                                    * 2.0
                                    - 1.0;
                                let ny = ((m.row as f32 + 0.5) / visual_rows as f32) * 2.0
                                    - 1.0;
                                scene.set_pointer(Some((nx, ny)));
                            } else {
                                // Pointer over the HUD counts as leaving.
                                scene.set_pointer(None);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resize(c, r) => {
                    last_size = (c, r);
                    hud_rows = hud_rows_for_size(last_size, show_hud);
                    resize_scene(&mut scene, last_size, px_w_mul, px_h_mul, hud_rows);
                }
                _ => {}
            }
        }

        // Size check once per frame (resize events can be missed in some terminals).
        let sz = crossterm::terminal::size()?;
        if sz != last_size {
            last_size = sz;
            hud_rows = hud_rows_for_size(last_size, show_hud);
            resize_scene(&mut scene, last_size, px_w_mul, px_h_mul, hud_rows);
        }

        let dt = now.duration_since(last_frame).as_secs_f32().max(1e-6);
        last_frame = now;

        let (term_cols, term_rows) = last_size;
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        let w = (term_cols as usize).saturating_mul(px_w_mul);
        let h = (visual_rows as usize).saturating_mul(px_h_mul);

        let scene_start = Instant::now();
        scene.update(now, dt, runtime.scale_for(runtime.quality));
        let scene_ms = scene_start.elapsed().as_secs_f32() * 1000.0;

        let hud = if show_hud {
            build_wrapped_hud(
                term_cols as usize,
                &scene,
                renderer.name(),
                fps.fps(),
                scene_ms,
                last_render_ms,
                last_total_ms,
                runtime.quality,
                runtime.scale,
            )
        } else {
            String::new()
        };

        let target_hud_rows = hud_rows_for_text(term_rows, show_hud, &hud);
        if target_hud_rows != hud_rows {
            hud_rows = target_hud_rows;
            resize_scene(&mut scene, last_size, px_w_mul, px_h_mul, hud_rows);
        }

        let labels = scene.labels(now, term_cols as usize, visual_rows as usize);
        let overlay = show_help.then(help_popup_text);

        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: scene.pixels(),
            labels: &labels,
            hud: &hud,
            hud_rows,
            overlay,
            sync_updates: cfg.sync_updates,
        };

        let frame_start = Instant::now();
        renderer.render(&frame, &mut out)?;
        last_render_ms = frame_start.elapsed().as_secs_f32() * 1000.0;
        last_total_ms = now.elapsed().as_secs_f32() * 1000.0;

        fps.tick();
        runtime.update(last_total_ms, 1000.0 / cfg.fps.max(1) as f32);

        // Frame pacing.
        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

fn resize_scene(
    scene: &mut Scene,
    size: (u16, u16),
    px_w_mul: usize,
    px_h_mul: usize,
    hud_rows: u16,
) {
    let (cols, rows) = size;
    let visual_rows = rows.saturating_sub(hud_rows).max(1);
    let w = (cols as usize).saturating_mul(px_w_mul);
    let h = (visual_rows as usize).saturating_mul(px_h_mul);
    scene.resize(w, h);
}

fn handle_key(
    code: KeyCode,
    mods: KeyModifiers,
    scene: &mut Scene,
    cfg: &Config,
    show_hud: &mut bool,
    show_help: &mut bool,
) -> bool {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return true;
    }

    match code {
        KeyCode::Esc => true,
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Down | KeyCode::Char('j') => {
            scene.handle_step(StepDirection::Forward, cfg.key_step);
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            scene.handle_step(StepDirection::Backward, cfg.key_step);
            false
        }
        KeyCode::PageDown | KeyCode::Char(' ') => {
            scene.handle_step(StepDirection::Forward, cfg.key_step * 4.0);
            false
        }
        KeyCode::PageUp => {
            scene.handle_step(StepDirection::Backward, cfg.key_step * 4.0);
            false
        }
        KeyCode::Home => {
            scene.jump_to_start();
            false
        }
        KeyCode::End => {
            scene.jump_to_end();
            false
        }
        KeyCode::Char('i') | KeyCode::Char('I') => {
            *show_hud = !*show_hud;
            false
        }
        KeyCode::Char('?') | KeyCode::Char('/') | KeyCode::Char('h') | KeyCode::F(1) => {
            *show_help = !*show_help;
            false
        }
        _ => false,
    }
}

fn hud_rows_for_size(size: (u16, u16), show_hud: bool) -> u16 {
    if !show_hud {
        return 0;
    }
    let rows = size.1;
    if rows <= 1 {
        return 0;
    }
    (rows - 1).min(4)
}

fn hud_rows_for_text(term_rows: u16, show_hud: bool, hud: &str) -> u16 {
    if !show_hud {
        return 0;
    }
    let max_rows = term_rows.saturating_sub(1);
    let wanted = hud.lines().count() as u16;
    wanted.min(max_rows)
}

#[allow(clippy::too_many_arguments)]
fn build_wrapped_hud(
    cols: usize,
    scene: &Scene,
    renderer_name: &str,
    fps: f32,
    scene_ms: f32,
    render_ms: f32,
    total_ms: f32,
    quality: Quality,
    scale: usize,
) -> String {
    let stage = scene.stage();
    let ready = if scene.buffered_fraction() >= 1.0 {
        "ready".to_string()
    } else {
        format!("buffering {:>3.0}%", scene.buffered_fraction() * 100.0)
    };

    let logical_lines = vec![
        format!(
            "Phase: {} ({:>4.0}%) | Scroll: {:>6.0}/{:>6.0} | Title: {} | Clip: {:>5.2}s ({}) | Scrub: {:?}",
            scene.phase_label(),
            scene.phase_local() * 100.0,
            scene.position(),
            scene.max_scroll(),
            scene.title_label(),
            scene.clip_time(),
            ready,
            scene.last_scrub(),
        ),
        format!(
            "Overlay: {:>4.2} | Reveal: {:>4.2}{} | Video: {:>4.2} | MouseActive: {:>4.2} | Quality: {:?}/x{} | FPS: {:>4.1} | ms(S/R/T): {:>4.1}/{:>4.1}/{:>4.1}",
            stage.overlay_opacity,
            stage.reveal_opacity,
            if stage.reveal_interactive { " (live)" } else { "" },
            stage.video_opacity,
            scene.mouse_active(),
            quality,
            scale,
            fps,
            scene_ms,
            render_ms,
            total_ms,
        ),
        format!(
            "Renderer: {} | Keys: wheel/j/k scroll | space/pgup/pgdn page | home/end jump | mouse = reveal | i HUD | ?/h help | q quit",
            renderer_name
        ),
    ];

    wrap_hud_lines(cols, &logical_lines).join("\n")
}

fn wrap_hud_lines(cols: usize, lines: &[String]) -> Vec<String> {
    let width = cols.max(1);
    let mut out = Vec::new();
    for line in lines {
        out.extend(hard_wrap_line(line, width));
    }
    out
}

fn hard_wrap_line(line: &str, width: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }

    let mut out = Vec::new();
    let mut cur = String::new();
    let mut cur_len = 0usize;
    for ch in line.chars() {
        cur.push(ch);
        cur_len += 1;
        if cur_len >= width {
            out.push(cur);
            cur = String::new();
            cur_len = 0;
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn help_popup_text() -> &'static str {
    "Scrolly Hotkeys\n\
wheel / j / k  scroll the story forward/backward\n\
space / pgdn  page forward\n\
pgup  page backward\n\
home / end  jump to the start / the end\n\
mouse move  drive the reveal flashlight (late phases)\n\
i  show/hide HUD\n\
? or / or h or F1  toggle this help\n\
q or esc  quit\n\
\n\
The story: scrub the clip, let the text exit, watch the title\n\
settle and slide away, then scrub the second movement."
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = (self.frames as f32) / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

struct RuntimeTuning {
    base_quality: Quality,
    quality: Quality,
    scale: usize,
    adaptive: bool,
    ema_ms: f32,
}

impl RuntimeTuning {
    fn new(base_quality: Quality, adaptive: bool) -> Self {
        Self {
            base_quality,
            quality: base_quality,
            scale: 1,
            adaptive,
            ema_ms: 0.0,
        }
    }

    /// Effective block-fill scale: quality sets a floor, load raises it.
    fn scale_for(&self, quality: Quality) -> usize {
        let floor = match quality {
            Quality::Ultra | Quality::High => 1,
            Quality::Balanced => 2,
            Quality::Fast => 3,
        };
        floor.max(self.scale)
    }

    fn update(&mut self, frame_ms: f32, target_ms: f32) {
        if !self.adaptive {
            return;
        }
        self.ema_ms = if self.ema_ms == 0.0 {
            frame_ms
        } else {
            self.ema_ms * 0.95 + frame_ms * 0.05
        };

        if self.ema_ms > target_ms * 1.22 {
            if self.scale == 1 {
                self.scale = 2;
            } else {
                self.quality = self.quality.lower();
            }
            return;
        }

        if self.ema_ms < target_ms * 0.72 {
            if quality_rank(self.quality) < quality_rank(self.base_quality) {
                self.quality = self.quality.higher();
                if quality_rank(self.quality) > quality_rank(self.base_quality) {
                    self.quality = self.base_quality;
                }
            } else if self.scale > 1 {
                self.scale = 1;
            }
        }
    }
}

fn quality_rank(q: Quality) -> u8 {
    match q {
        Quality::Fast => 0,
        Quality::Balanced => 1,
        Quality::High => 2,
        Quality::Ultra => 3,
    }
}
