//! Paperdance animates cut-out character sprites over a background and renders the result to MP4.
//!
//! The engine is a deterministic batch pipeline:
//!
//! - Resolve each sprite's [`SpriteSettings`] into a seeded [`MotionSpec`] with a smooth closed path
//! - Sample a [`SpriteTransform`] per sprite per frame with the [`TransformSynthesizer`]
//! - Depth-sort and composite sprites over the background with a [`FrameCompositor`]
//! - Stream frames into a [`FrameSink`], or encode them with the system `ffmpeg` via
//!   [`RenderJob::render_to_mp4`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod encode;
mod foundation;
pub mod job;
pub mod providers;
pub mod render;
pub mod settings;

pub use crate::foundation::core::{Affine, Canvas, FrameIndex, Point, Vec2};
pub use crate::foundation::error::{PaperdanceError, PaperdanceResult};
pub use crate::foundation::rng::Rng64;

pub use crate::animation::ease::Ease;
pub use crate::animation::motion::MotionSpec;
pub use crate::animation::path::{ControlPointPath, PathParams, PathStyle, generate_path};
pub use crate::animation::sampler::{PathMotion, PathSampler};
pub use crate::animation::transform::{SpriteTransform, TransformSynthesizer, clip_time};
pub use crate::encode::ffmpeg::{Mp4Encoder, Mp4EncoderOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::job::manifest::{BackgroundSource, JobManifest, SpriteEntry};
pub use crate::job::render_job::{
    CancelToken, JobSetup, JobState, RenderJob, RenderJobOpts, RenderStats,
};
pub use crate::job::request::{RenderLimits, RenderRequest};
pub use crate::providers::{
    BackgroundProvider, DecodedCutout, ImageFileBackground, SolidBackground, SpriteProvider,
};
pub use crate::render::compositor::{ComposeStats, FrameCompositor};
pub use crate::render::sprite::Sprite;
pub use crate::settings::enrich::{NoopEnricher, PresetEnricher, PromptEnricher, SettingsEnricher};
pub use crate::settings::sprite::SpriteSettings;
