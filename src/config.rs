use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "tui-scrolly", version, about = "Scroll-driven terminal scrollytelling engine (wheel-scrubbed video, title choreography, interactive declassify reveal)")]
pub struct Config {
    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    #[arg(long, value_enum, default_value_t = Quality::Balanced)]
    pub quality: Quality,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub adaptive_quality: bool,

    /// Scroll units added per wheel tick.
    #[arg(long, default_value_t = 36.0)]
    pub wheel_step: f32,

    /// Scroll units added per arrow-key press.
    #[arg(long, default_value_t = 90.0)]
    pub key_step: f32,

    /// Primary clip length in seconds.
    #[arg(long, default_value_t = 12.0)]
    pub clip_duration: f32,

    /// Timestamp the primary scrub starts from.
    #[arg(long, default_value_t = 0.8)]
    pub clip_start_offset: f32,

    /// Secondary clip length in seconds.
    #[arg(long, default_value_t = 8.0)]
    pub secondary_duration: f32,

    /// Seed for the procedural clips and the reveal photograph.
    #[arg(long)]
    pub seed: Option<u32>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
    #[value(alias = "hires", alias = "dots")]
    Braille,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Quality {
    Ultra,
    High,
    Balanced,
    Fast,
}

impl Quality {
    pub fn lower(self) -> Self {
        match self {
            Self::Ultra => Self::High,
            Self::High => Self::Balanced,
            Self::Balanced => Self::Fast,
            Self::Fast => Self::Fast,
        }
    }

    pub fn higher(self) -> Self {
        match self {
            Self::Fast => Self::Balanced,
            Self::Balanced => Self::High,
            Self::High => Self::Ultra,
            Self::Ultra => Self::Ultra,
        }
    }
}
