/// Procedural source image for the reveal: a fixed-resolution "archival
/// aerial photograph" synthesized once per engine, so the cover-fit math is
/// exercised against a real aspect ratio without shipping assets.

pub const TEXTURE_WIDTH: usize = 480;
pub const TEXTURE_HEIGHT: usize = 270;

pub struct SourceTexture {
    w: usize,
    h: usize,
    rgba: Vec<u8>,
}

impl SourceTexture {
    pub fn generate(seed: u32) -> Self {
        let w = TEXTURE_WIDTH;
        let h = TEXTURE_HEIGHT;
        let mut rgba = vec![0u8; w * h * 4];
        let s = (seed & 0x3fff) as f32 * 1e-3;

        for y in 0..h {
            let v = y as f32 / h as f32;
            for x in 0..w {
                let u = x as f32 / w as f32;
                let (r, g, b) = aerial_pixel(u, v, s);
                let i = (y * w + x) * 4;
                rgba[i] = r;
                rgba[i + 1] = g;
                rgba[i + 2] = b;
                rgba[i + 3] = 255;
            }
        }

        Self { w, h, rgba }
    }

    pub fn aspect(&self) -> f32 {
        self.w as f32 / self.h as f32
    }

    /// Nearest fetch with clamp-to-edge addressing.
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        let x = ((u.clamp(0.0, 1.0)) * (self.w - 1) as f32).round() as usize;
        let y = ((v.clamp(0.0, 1.0)) * (self.h - 1) as f32).round() as usize;
        let i = (y.min(self.h - 1) * self.w + x.min(self.w - 1)) * 4;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }
}

fn aerial_pixel(u: f32, v: f32, s: f32) -> (u8, u8, u8) {
    let nx = u * 2.0 - 1.0;
    let ny = v * 2.0 - 1.0;

    // Terrain relief: a couple of octaves of sine noise.
    let relief = ((nx * 5.3 + s).sin() * 0.5
        + (ny * 4.1 - s * 0.7).cos() * 0.35
        + ((nx * 2.2 + ny * 3.1) * 2.9 + s).sin() * 0.25)
        * 0.5
        + 0.5;

    // River cutting diagonally across, widened where relief is low.
    let river_axis = nx * 0.8 + ny * 0.6 + ((ny * 3.7 + s).sin()) * 0.18;
    let river = (1.0 - (river_axis.abs() * 9.0).min(1.0)) * (1.0 - relief * 0.6);

    // Settlement grid in one quadrant.
    let grid = if nx > 0.1 && ny > -0.2 {
        let gx = ((u * 40.0).fract() - 0.5).abs();
        let gy = ((v * 26.0).fract() - 0.5).abs();
        if gx < 0.08 || gy < 0.1 { 0.65 } else { 0.0 }
    } else {
        0.0
    };

    let vegetation = (relief * 1.2 - 0.25).clamp(0.0, 1.0);

    let mut r = 78.0 + relief * 96.0 + grid * 70.0;
    let mut g = 86.0 + vegetation * 110.0 + grid * 60.0;
    let mut b = 60.0 + relief * 52.0 + grid * 55.0;

    if river > 0.12 {
        r = 30.0 + river * 28.0;
        g = 60.0 + river * 52.0;
        b = 96.0 + river * 120.0;
    }

    // Soft vignette so the photo reads as a single exposure.
    let vig = 1.0 - (nx * nx + ny * ny) * 0.22;
    r *= vig;
    g *= vig;
    b *= vig;

    (
        r.clamp(0.0, 255.0) as u8,
        g.clamp(0.0, 255.0) as u8,
        b.clamp(0.0, 255.0) as u8,
    )
}
