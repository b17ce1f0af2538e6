use tui_scrolly::reveal::{
    bayer_threshold, dither_offset, flashlight_factor, quantize_3, ripple_offset, shade,
    smoothstep, wave_offset, CoverTransform, RevealEngine, RevealUniforms, SourceTexture,
    DITHER_SPREAD, MOUSE_ACTIVE_EPSILON, MOUSE_EASE, TEXTURE_HEIGHT, TEXTURE_WIDTH,
};

// ── cover-fit transform ─────────────────────────────────────────────────────

#[test]
fn wide_image_in_square_viewport_crops_the_sides() {
    let c = CoverTransform::new(2.0, 1.0);
    assert!((c.uv_scale.0 - 0.5).abs() < 1e-6);
    assert_eq!(c.uv_scale.1, 1.0);
    assert!((c.uv_offset.0 - 0.25).abs() < 1e-6);
    assert_eq!(c.uv_offset.1, 0.0);

    // Screen left edge lands a quarter of the way into the image.
    let (u, v) = c.apply((0.0, 0.0));
    assert!((u - 0.25).abs() < 1e-6);
    assert_eq!(v, 0.0);
}

#[test]
fn tall_image_crops_top_and_bottom_symmetrically() {
    let c = CoverTransform::new(1.0, 2.0);
    assert_eq!(c.uv_scale.0, 1.0);
    assert!((c.uv_scale.1 - 0.5).abs() < 1e-6);
    assert!((c.uv_offset.1 - 0.25).abs() < 1e-6);
}

#[test]
fn pointer_and_sampling_share_one_transform() {
    let c = CoverTransform::new(2.0, 1.0);
    // NDC center maps to image center.
    let (u, v) = c.pointer_to_uv((0.0, 0.0));
    assert!((u - 0.5).abs() < 1e-6);
    assert!((v - 0.5).abs() < 1e-6);

    // NDC left edge equals the sample taken at screen x = 0.
    let p = c.pointer_to_uv((-1.0, -1.0));
    let s = c.apply((0.0, 0.0));
    assert!((p.0 - s.0).abs() < 1e-6);
    assert!((p.1 - s.1).abs() < 1e-6);
}

// ── fragment stages ─────────────────────────────────────────────────────────

#[test]
fn quantize_has_exactly_three_levels() {
    assert_eq!(quantize_3(0.0), 0.0);
    assert_eq!(quantize_3(0.32), 0.0);
    assert_eq!(quantize_3(0.33), 0.5);
    assert_eq!(quantize_3(0.65), 0.5);
    assert_eq!(quantize_3(0.66), 1.0);
    assert_eq!(quantize_3(1.0), 1.0);
}

#[test]
fn bayer_thresholds_are_distinct_and_centered() {
    let mut seen = Vec::new();
    let mut sum = 0.0f32;
    for iy in 0..4 {
        for ix in 0..4 {
            let t = bayer_threshold(ix, iy);
            assert!(t > 0.0 && t < 1.0);
            assert!(!seen.contains(&t.to_bits()), "duplicate threshold at ({ix},{iy})");
            seen.push(t.to_bits());
            sum += t;
        }
    }
    assert!((sum / 16.0 - 0.5).abs() < 1e-6, "thresholds must average to 0.5");
}

#[test]
fn dither_offsets_cancel_over_a_full_tile() {
    let mut sum = 0.0f32;
    for py in 0..4 {
        for px in 0..4 {
            sum += dither_offset(px as f32, py as f32, 1.0);
        }
    }
    assert!(sum.abs() < 1e-5, "tile-summed dither must be unbiased, got {sum}");
}

#[test]
fn pixel_size_groups_screen_pixels_into_cells() {
    let a = dither_offset(0.0, 0.0, 4.0);
    for px in 0..4 {
        for py in 0..4 {
            assert_eq!(dither_offset(px as f32, py as f32, 4.0), a);
        }
    }
    assert_ne!(dither_offset(4.0, 0.0, 4.0), a);
}

#[test]
fn mid_gray_stays_on_the_middle_level_in_every_slot() {
    // The dither spread is tuned to perturb band boundaries, not to push a
    // true mid-gray off the middle level in any of the 16 slots.
    for iy in 0..4 {
        for ix in 0..4 {
            let lum = 0.5 + (bayer_threshold(ix, iy) - 0.5) * DITHER_SPREAD;
            assert_eq!(quantize_3(lum.clamp(0.0, 1.0)), 0.5, "slot ({ix},{iy})");
        }
    }
}

#[test]
fn wave_offset_is_bounded_by_the_amplitude() {
    let u = RevealUniforms {
        time: 3.7,
        ..RevealUniforms::default()
    };
    for i in 0..50 {
        let uv = (i as f32 / 50.0, 1.0 - i as f32 / 50.0);
        let (dx, dy) = wave_offset(uv, &u);
        assert!(dx.abs() <= u.wave_amplitude + 1e-6);
        assert!(dy.abs() <= u.wave_amplitude * 0.6 + 1e-6);
    }
}

#[test]
fn ripple_is_skipped_without_a_pointer() {
    let u = RevealUniforms {
        mouse_active: MOUSE_ACTIVE_EPSILON / 2.0,
        ..RevealUniforms::default()
    };
    assert_eq!(ripple_offset((0.5, 0.5), &u), 0.0);

    let u = RevealUniforms {
        mouse_active: 1.0,
        ..RevealUniforms::default()
    };
    // Outside the interaction radius the window zeroes the term.
    assert_eq!(ripple_offset((0.5 + u.mouse_radius + 0.01, 0.5), &u), 0.0);
}

#[test]
fn flashlight_is_full_at_the_pointer_and_zero_far_away() {
    let u = RevealUniforms {
        mouse_active: 1.0,
        ..RevealUniforms::default()
    };
    assert!((flashlight_factor(u.mouse, &u) - 1.0).abs() < 1e-6);
    assert_eq!(flashlight_factor((u.mouse.0 + u.reveal_radius + 0.1, u.mouse.1), &u), 0.0);

    // The factor scales with presence.
    let dim = RevealUniforms {
        mouse_active: 0.4,
        ..u
    };
    assert!((flashlight_factor(dim.mouse, &dim) - 0.4).abs() < 1e-6);
}

#[test]
fn smoothstep_clamps_and_interpolates() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    // Reversed edges (as used by the ripple window) invert the ramp.
    assert_eq!(smoothstep(1.0, 0.0, 2.0), 0.0);
    assert_eq!(smoothstep(1.0, 0.0, -1.0), 1.0);
}

#[test]
fn shade_preserves_source_alpha() {
    let u = RevealUniforms::default();
    let out = shade((0.5, 0.5), 0.0, 0.0, &u, |_, _| [120, 120, 120, 77]);
    assert_eq!(out[3], 77);
}

#[test]
fn shade_without_pointer_emits_quantized_monochrome() {
    let u = RevealUniforms {
        mouse_active: 0.0,
        ..RevealUniforms::default()
    };
    let out = shade((0.5, 0.5), 0.0, 0.0, &u, |_, _| [200, 200, 200, 255]);
    assert_eq!(out[0], out[1]);
    assert_eq!(out[1], out[2]);
    // Must be one of the three quantization levels.
    assert!(matches!(out[0], 0 | 127 | 255));
}

// ── engine easing and rendering ─────────────────────────────────────────────

#[test]
fn mouse_active_eases_in_and_never_overshoots() {
    let mut engine = RevealEngine::new(1);
    engine.tick(1.0 / 60.0, Some((0.0, 0.0)), 1.0);
    assert!((engine.uniforms.mouse_active - MOUSE_EASE).abs() < 1e-6);

    let mut prev = engine.uniforms.mouse_active;
    for _ in 0..500 {
        engine.tick(1.0 / 60.0, Some((0.0, 0.0)), 1.0);
        let cur = engine.uniforms.mouse_active;
        assert!(cur >= prev, "approach must be monotonic");
        assert!(cur <= 1.0);
        prev = cur;
    }
    assert!(prev > 0.99, "should converge near 1, got {prev}");
}

#[test]
fn mouse_active_fades_out_and_freezes_the_uv() {
    let mut engine = RevealEngine::new(1);
    for _ in 0..100 {
        engine.tick(1.0 / 60.0, Some((0.5, -0.3)), 1.0);
    }
    let held = engine.uniforms.mouse;

    for _ in 0..100 {
        engine.tick(1.0 / 60.0, None, 1.0);
    }
    assert!(engine.uniforms.mouse_active < 0.01);
    assert_eq!(engine.uniforms.mouse, held, "uv must hold while fading out");
}

#[test]
fn render_produces_structured_output() {
    let engine = RevealEngine::new(3);
    let (w, h) = (64usize, 36usize);
    let mut out = vec![0u8; w * h * 4];
    engine.render(&mut out, w, h, 1);

    let first = out[0..4].to_vec();
    let varied = out.chunks_exact(4).any(|px| px != &first[..]);
    assert!(varied, "shaded output must not be a flat field");
    assert!(out.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn texture_matches_the_declared_aspect() {
    let tex = SourceTexture::generate(11);
    let expect = TEXTURE_WIDTH as f32 / TEXTURE_HEIGHT as f32;
    assert!((tex.aspect() - expect).abs() < 1e-6);

    // Clamp-to-edge addressing never panics out of range.
    let _ = tex.sample(-0.5, 1.5);
    let _ = tex.sample(1.5, -0.5);
}
