/// Interactive reveal engine: a CPU fragment program over a procedural
/// source image, plus the per-frame uniform updater and the cover-fit UV
/// transform shared by rendering and pointer remapping.
///
/// Two update sources feed this engine and never call across each other:
/// input events change pointer presence/position, the render tick advances
/// time and easing. They meet only in the uniform block.
mod fragment;
mod texture;

pub use fragment::{
    bayer_threshold, dither_offset, flashlight_factor, luminance, quantize_3, ripple_offset,
    shade, smoothstep, wave_offset, DITHER_SPREAD, MOUSE_ACTIVE_EPSILON,
};
pub use texture::{SourceTexture, TEXTURE_HEIGHT, TEXTURE_WIDTH};

/// Per-frame exponential blend toward pointer presence. Frame-rate
/// dependent by construction; reproduced as tuned.
pub const MOUSE_EASE: f32 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealUniforms {
    pub time: f32,
    /// Pointer position in image-texture UV space.
    pub mouse: (f32, f32),
    pub reveal_radius: f32,
    pub reveal_softness: f32,
    pub pixel_size: f32,
    /// Eased pointer-presence scalar in [0, 1]; never set to its target
    /// directly.
    pub mouse_active: f32,
    pub wave_speed: f32,
    pub wave_frequency: f32,
    pub wave_amplitude: f32,
    pub ripple_frequency: f32,
    pub ripple_speed: f32,
    pub ripple_strength: f32,
    pub mouse_radius: f32,
}

impl Default for RevealUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            mouse: (0.5, 0.5),
            reveal_radius: 0.22,
            reveal_softness: 0.45,
            pixel_size: 3.0,
            mouse_active: 0.0,
            wave_speed: 0.9,
            wave_frequency: 5.0,
            wave_amplitude: 0.012,
            ripple_frequency: 28.0,
            ripple_speed: 5.0,
            ripple_strength: 0.010,
            mouse_radius: 0.35,
        }
    }
}

/// Cover-fit UV mapping: scales and offsets screen-normalized coordinates
/// into the visible window of the source image. The same transform is used
/// for fragment sampling and for pointer remapping, so the reveal circle
/// and the pointer can never drift apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverTransform {
    pub uv_scale: (f32, f32),
    pub uv_offset: (f32, f32),
}

impl CoverTransform {
    pub fn new(image_aspect: f32, viewport_aspect: f32) -> Self {
        let a = image_aspect.max(1e-6);
        let c = viewport_aspect.max(1e-6);
        if a > c {
            // Image wider than viewport: crop left/right.
            let visible = c / a;
            Self {
                uv_scale: (visible, 1.0),
                uv_offset: ((1.0 - visible) / 2.0, 0.0),
            }
        } else {
            // Crop top/bottom.
            let visible = a / c;
            Self {
                uv_scale: (1.0, visible),
                uv_offset: (0.0, (1.0 - visible) / 2.0),
            }
        }
    }

    /// Screen-normalized [0,1] coordinates to image UV.
    pub fn apply(&self, uv: (f32, f32)) -> (f32, f32) {
        (
            self.uv_offset.0 + uv.0 * self.uv_scale.0,
            self.uv_offset.1 + uv.1 * self.uv_scale.1,
        )
    }

    /// Normalized device pointer coordinates in [-1,1] to image UV.
    pub fn pointer_to_uv(&self, ndc: (f32, f32)) -> (f32, f32) {
        self.apply(((ndc.0 + 1.0) * 0.5, (ndc.1 + 1.0) * 0.5))
    }
}

pub struct RevealEngine {
    pub uniforms: RevealUniforms,
    texture: SourceTexture,
}

impl RevealEngine {
    pub fn new(seed: u32) -> Self {
        Self {
            uniforms: RevealUniforms::default(),
            texture: SourceTexture::generate(seed),
        }
    }

    pub fn image_aspect(&self) -> f32 {
        self.texture.aspect()
    }

    pub fn cover(&self, viewport_aspect: f32) -> CoverTransform {
        CoverTransform::new(self.texture.aspect(), viewport_aspect)
    }

    /// Render-tick update: advances time, eases the mouse-active scalar
    /// toward pointer presence, and remaps the pointer through the inverse
    /// cover transform. With no pointer the last UV stays frozen so the
    /// effect fades out in place.
    pub fn tick(&mut self, dt: f32, pointer_ndc: Option<(f32, f32)>, viewport_aspect: f32) {
        self.uniforms.time += dt.max(0.0);

        let target = if pointer_ndc.is_some() { 1.0 } else { 0.0 };
        self.uniforms.mouse_active += (target - self.uniforms.mouse_active) * MOUSE_EASE;
        self.uniforms.mouse_active = self.uniforms.mouse_active.clamp(0.0, 1.0);

        if let Some(ndc) = pointer_ndc {
            self.uniforms.mouse = self.cover(viewport_aspect).pointer_to_uv(ndc);
        }
    }

    /// Evaluates the fragment program for every pixel of the output buffer.
    /// `scale` block-fills for adaptive quality, like the clip renderer.
    pub fn render(&self, out: &mut [u8], w: usize, h: usize, scale: usize) {
        let w = w.max(1);
        let h = h.max(1);
        let scale = scale.max(1);
        if out.len() < w * h * 4 {
            return;
        }

        let cover = self.cover(w as f32 / h as f32);
        let u = &self.uniforms;

        for by in (0..h).step_by(scale) {
            for bx in (0..w).step_by(scale) {
                let screen_uv = (bx as f32 / w as f32, by as f32 / h as f32);
                let uv = cover.apply(screen_uv);
                let px = shade(uv, bx as f32, by as f32, u, |su, sv| {
                    self.texture.sample(su, sv)
                });
                for dy in 0..scale {
                    for dx in 0..scale {
                        let x2 = bx + dx;
                        let y2 = by + dy;
                        if x2 >= w || y2 >= h {
                            continue;
                        }
                        let i = (y2 * w + x2) * 4;
                        out[i..i + 4].copy_from_slice(&px);
                    }
                }
            }
        }
    }
}
