/// The fragment program for the declassify effect, expressed as pure
/// per-pixel math over the uniform block. Kept free of engine state so the
/// individual stages (waves, ripple, dither, quantize, flashlight) can be
/// exercised directly.
use super::RevealUniforms;

/// Amplitude of the ordered-dither perturbation applied to luminance
/// before quantization.
pub const DITHER_SPREAD: f32 = 0.22;

/// Below this the pointer is treated as fully absent and the ripple term
/// is skipped entirely.
pub const MOUSE_ACTIVE_EPSILON: f32 = 1e-3;

/// Classic 4x4 Bayer matrix, row-major.
const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if (edge0 - edge1).abs() < 1e-12 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Normalized threshold for one Bayer slot, in (0, 1).
#[inline]
pub fn bayer_threshold(ix: usize, iy: usize) -> f32 {
    (BAYER_4X4[iy & 3][ix & 3] as f32 + 0.5) / 16.0
}

/// Signed luminance perturbation for a screen pixel, indexed through the
/// virtual pixel-size grid.
#[inline]
pub fn dither_offset(px: f32, py: f32, pixel_size: f32) -> f32 {
    let cell = pixel_size.max(1.0);
    let ix = (px / cell).floor() as i64 & 3;
    let iy = (py / cell).floor() as i64 & 3;
    (bayer_threshold(ix as usize, iy as usize) - 0.5) * DITHER_SPREAD
}

/// Three-level quantization of a luminance value.
#[inline]
pub fn quantize_3(v: f32) -> f32 {
    if v < 0.33 {
        0.0
    } else if v < 0.66 {
        0.5
    } else {
        1.0
    }
}

/// Decorative dual sinusoidal distortion, always active. One term rides the
/// vertical UV axis, the second rides the horizontal axis at a fixed phase
/// and amplitude scale relative to the first.
#[inline]
pub fn wave_offset(uv: (f32, f32), u: &RevealUniforms) -> (f32, f32) {
    let dx = (uv.1 * u.wave_frequency + u.time * u.wave_speed).sin() * u.wave_amplitude;
    let dy = (uv.0 * u.wave_frequency * 1.3 + u.time * u.wave_speed * 0.8 + 1.7).sin()
        * u.wave_amplitude
        * 0.6;
    (dx, dy)
}

/// Pointer-centered ripple, scaled by the eased mouse-active scalar and
/// windowed to the interaction radius. Added to both UV axes.
#[inline]
pub fn ripple_offset(uv: (f32, f32), u: &RevealUniforms) -> f32 {
    if u.mouse_active <= MOUSE_ACTIVE_EPSILON {
        return 0.0;
    }
    let dx = uv.0 - u.mouse.0;
    let dy = uv.1 - u.mouse.1;
    let d = (dx * dx + dy * dy).sqrt();
    (d * u.ripple_frequency - u.time * u.ripple_speed).sin()
        * u.ripple_strength
        * smoothstep(u.mouse_radius, 0.0, d)
        * u.mouse_active
}

/// Radial flashlight factor in [0, 1] from the undistorted UV distance to
/// the pointer. Inner/outer radii derive from radius and softness.
#[inline]
pub fn flashlight_factor(uv: (f32, f32), u: &RevealUniforms) -> f32 {
    let dx = uv.0 - u.mouse.0;
    let dy = uv.1 - u.mouse.1;
    let d = (dx * dx + dy * dy).sqrt();
    let inner = u.reveal_radius * (1.0 - u.reveal_softness);
    let outer = u.reveal_radius;
    (1.0 - smoothstep(inner, outer, d)) * u.mouse_active
}

/// Full fragment evaluation for one pixel: `uv` is the cover-fit image UV,
/// `(px, py)` the screen pixel, `sample` the clamped texture fetch.
pub fn shade(
    uv: (f32, f32),
    px: f32,
    py: f32,
    u: &RevealUniforms,
    sample: impl Fn(f32, f32) -> [u8; 4],
) -> [u8; 4] {
    let (wx, wy) = wave_offset(uv, u);
    let mut distorted = (uv.0 + wx, uv.1 + wy);
    let ripple = ripple_offset(distorted, u);
    distorted.0 += ripple;
    distorted.1 += ripple;

    let src = sample(distorted.0, distorted.1);
    let r = src[0] as f32 / 255.0;
    let g = src[1] as f32 / 255.0;
    let b = src[2] as f32 / 255.0;

    let lum = luminance(r, g, b) + dither_offset(px, py, u.pixel_size);
    let mono = quantize_3(lum.clamp(0.0, 1.0));

    // Flashlight distance is measured against the undistorted UV so the
    // revealed circle tracks the pointer, not the waves.
    let reveal = flashlight_factor(uv, u);

    let out_r = mono * (1.0 - reveal) + r * reveal;
    let out_g = mono * (1.0 - reveal) + g * reveal;
    let out_b = mono * (1.0 - reveal) + b * reveal;

    [
        (out_r * 255.0).clamp(0.0, 255.0) as u8,
        (out_g * 255.0).clamp(0.0, 255.0) as u8,
        (out_b * 255.0).clamp(0.0, 255.0) as u8,
        src[3],
    ]
}
