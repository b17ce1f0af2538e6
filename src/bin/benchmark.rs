use std::time::{Duration, Instant};

use anyhow::Result;
use tui_scrolly::config::Quality;
use tui_scrolly::media::{ClipLook, ProceduralClip};
use tui_scrolly::reveal::RevealEngine;
use tui_scrolly::scene::{Scene, SceneConfig};

struct Args {
    frames: usize,
    w: usize,
    h: usize,
    quality: Quality,
    scale: usize,
    ci_smoke: bool,
    quick: bool,
    max_ms: f64,
}

fn parse_args() -> Args {
    let mut args = Args {
        frames: 180,
        w: 160,
        h: 88,
        quality: Quality::Balanced,
        scale: 1,
        ci_smoke: false,
        quick: false,
        max_ms: 20.0,
    };

    let argv = std::env::args().skip(1).collect::<Vec<_>>();
    let mut i = 0usize;
    while i < argv.len() {
        let k = argv[i].as_str();
        let v = argv.get(i + 1).map(|s| s.as_str());
        match (k, v) {
            ("--frames", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.frames = n.max(1);
                }
                i += 2;
            }
            ("--w", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.w = n.max(1);
                }
                i += 2;
            }
            ("--h", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.h = n.max(1);
                }
                i += 2;
            }
            ("--scale", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.scale = n.max(1);
                }
                i += 2;
            }
            ("--quality", Some("fast")) => {
                args.quality = Quality::Fast;
                i += 2;
            }
            ("--quality", Some("balanced")) => {
                args.quality = Quality::Balanced;
                i += 2;
            }
            ("--quality", Some("high")) => {
                args.quality = Quality::High;
                i += 2;
            }
            ("--quality", Some("ultra")) => {
                args.quality = Quality::Ultra;
                i += 2;
            }
            ("--ci-smoke", Some(x)) if !x.starts_with("--") => {
                args.ci_smoke = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--ci-smoke", _) => {
                args.ci_smoke = true;
                i += 1;
            }
            ("--quick", Some(x)) if !x.starts_with("--") => {
                args.quick = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--quick", _) => {
                args.quick = true;
                i += 1;
            }
            ("--max-ms", Some(x)) => {
                if let Ok(v) = x.parse::<f64>() {
                    args.max_ms = v.max(0.1);
                }
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    if args.quick {
        args.frames = args.frames.min(60);
    }

    args
}

fn parse_bool(s: &str) -> Option<bool> {
    let v = s.trim().to_ascii_lowercase();
    match v.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn lit(px: &[u8]) -> bool {
    px.chunks_exact(4).any(|p| p[0] != 0 || p[1] != 0 || p[2] != 0)
}

fn bench_clips(args: &Args) -> f64 {
    let n = args.w * args.h * 4;
    let mut out = vec![0u8; n];
    let mut worst = 0.0f64;

    for (name, look) in [("ink-drift", ClipLook::InkDrift), ("signal-sweep", ClipLook::SignalSweep)] {
        let clip = ProceduralClip::new(look, 12.0).with_seed(7);
        let start = Instant::now();
        let mut lit_frames = 0usize;
        for f in 0..args.frames {
            let t = f as f32 / 60.0;
            clip.frame(t, args.w, args.h, args.scale, &mut out);
            if lit(&out) {
                lit_frames += 1;
            }
        }
        let ms = start.elapsed().as_secs_f64() * 1000.0 / args.frames as f64;
        worst = worst.max(ms);
        println!(
            "clip {:<13} {:>8.3} ms/frame  lit={:>3}/{}",
            name, ms, lit_frames, args.frames
        );
    }

    worst
}

fn bench_reveal(args: &Args) -> f64 {
    let n = args.w * args.h * 4;
    let mut out = vec![0u8; n];
    let mut engine = RevealEngine::new(7);
    let aspect = args.w as f32 / args.h as f32;

    let start = Instant::now();
    let mut lit_frames = 0usize;
    for f in 0..args.frames {
        // Sweep the pointer so the ripple and flashlight paths stay hot.
        let nx = ((f as f32 / 40.0).sin()) * 0.8;
        let ny = ((f as f32 / 53.0).cos()) * 0.8;
        engine.tick(1.0 / 60.0, Some((nx, ny)), aspect);
        engine.render(&mut out, args.w, args.h, args.scale);
        if lit(&out) {
            lit_frames += 1;
        }
    }
    let ms = start.elapsed().as_secs_f64() * 1000.0 / args.frames as f64;
    println!(
        "reveal shader   {:>8.3} ms/frame  lit={:>3}/{}",
        ms, lit_frames, args.frames
    );
    ms
}

fn bench_scene(args: &Args) -> f64 {
    let mut scene = Scene::new(SceneConfig {
        clip_duration: 12.0,
        clip_start_offset: 0.8,
        secondary_duration: 8.0,
        seed: 7,
        viewport_height: args.h as f32,
    });
    scene.resize(args.w, args.h);

    // Let buffering complete before timing so input is live.
    let mut now = Instant::now();
    for _ in 0..10 {
        now += Duration::from_millis(250);
        scene.update(now, 0.25, args.scale);
    }

    let step = scene.max_scroll() / args.frames as f32;
    let start = Instant::now();
    let mut lit_frames = 0usize;
    for _ in 0..args.frames {
        now += Duration::from_millis(16);
        scene.handle_wheel(step);
        scene.set_pointer(Some((0.3, -0.2)));
        scene.update(now, 1.0 / 60.0, args.scale);
        if lit(scene.pixels()) {
            lit_frames += 1;
        }
    }
    let ms = start.elapsed().as_secs_f64() * 1000.0 / args.frames as f64;
    println!(
        "full scene      {:>8.3} ms/frame  lit={:>3}/{}  final-phase={}",
        ms,
        lit_frames,
        args.frames,
        scene.phase_label()
    );
    ms
}

fn main() -> Result<()> {
    let args = parse_args();

    println!(
        "benchmark: frames={} size={}x{} quality={:?} scale={} quick={}",
        args.frames, args.w, args.h, args.quality, args.scale, args.quick
    );

    let clip_ms = bench_clips(&args);
    let reveal_ms = bench_reveal(&args);
    let scene_ms = bench_scene(&args);

    if args.ci_smoke {
        let worst = clip_ms.max(reveal_ms).max(scene_ms);
        if worst > args.max_ms {
            eprintln!(
                "CI smoke: FAIL ({:.3} ms/frame > {:.3})",
                worst, args.max_ms
            );
            anyhow::bail!("ci smoke failed");
        }
        println!("CI smoke: PASS (max_ms={:.3})", args.max_ms);
    }

    Ok(())
}
