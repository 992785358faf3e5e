use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::Context as _;
use image::RgbImage;
use image::imageops::FilterType;
use rayon::prelude::*;

use crate::animation::motion::MotionSpec;
use crate::encode::ffmpeg::{Mp4Encoder, Mp4EncoderOpts, is_ffmpeg_on_path};
use crate::encode::sink::{FrameSink, PngSequenceSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{PaperdanceError, PaperdanceResult};
use crate::foundation::rng::Rng64;
use crate::job::request::{RenderLimits, RenderRequest};
use crate::render::compositor::{ComposeStats, FrameCompositor};
use crate::render::sprite::Sprite;
use crate::settings::enrich::{NoopEnricher, SettingsEnricher, enrich_best_effort};
use crate::settings::sprite::SpriteSettings;

/// Shared flag for cooperative cancellation of a running job.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once [`CancelToken::cancel`] has been called.
    pub fn check(&self) -> PaperdanceResult<()> {
        if self.is_cancelled() {
            Err(PaperdanceError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Threading, chunking and output controls for a render.
#[derive(Clone, Debug)]
pub struct RenderJobOpts {
    /// Render each chunk's frames in parallel on a rayon pool.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Frames rendered per scheduling batch.
    pub chunk_size: usize,
    /// Overwrite the MP4 output if it already exists.
    pub overwrite: bool,
    /// Where the temporary frame directory is created; the system temp dir when `None`.
    pub frames_root: Option<PathBuf>,
    pub cancel: CancelToken,
}

impl Default for RenderJobOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 64,
            overwrite: true,
            frames_root: None,
            cancel: CancelToken::default(),
        }
    }
}

/// Optional inputs used while preparing a job.
#[derive(Clone)]
pub struct JobSetup<'s> {
    pub limits: RenderLimits,
    /// Stored per-sprite settings, by sprite index. May be shorter than the sprite list.
    pub stored: &'s [SpriteSettings],
    pub enricher: &'s dyn SettingsEnricher,
}

impl Default for JobSetup<'_> {
    fn default() -> Self {
        Self {
            limits: RenderLimits::default(),
            stored: &[],
            enricher: &NoopEnricher,
        }
    }
}

/// Lifecycle of a [`RenderJob`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Validated,
    PathsBuilt,
    Rendering { next_frame: u64 },
    Encoding,
    Done,
    Failed,
}

/// Aggregated rendering counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
    pub frames_rendered: u64,
    /// Sprite draws omitted across all frames because the sprite scaled too small.
    pub elements_skipped: u64,
}

/// A single animation render: validated request, borrowed sprites and their motion specs.
pub struct RenderJob<'a> {
    request: RenderRequest,
    canvas: Canvas,
    seed: u64,
    background: RgbImage,
    sprites: &'a [Sprite],
    motions: Vec<MotionSpec>,
    state: JobState,
}

impl<'a> RenderJob<'a> {
    /// Validate `request` and build motion specs with default limits, no stored settings and no
    /// enrichment.
    pub fn new(
        request: RenderRequest,
        background: &RgbImage,
        sprites: &'a [Sprite],
    ) -> PaperdanceResult<Self> {
        Self::with_setup(request, background, sprites, JobSetup::default())
    }

    #[tracing::instrument(skip_all, fields(sprites = sprites.len()))]
    pub fn with_setup(
        request: RenderRequest,
        background: &RgbImage,
        sprites: &'a [Sprite],
        setup: JobSetup<'_>,
    ) -> PaperdanceResult<Self> {
        request.validate(&setup.limits, sprites.len())?;
        for stored in setup.stored {
            stored.validate()?;
        }
        let canvas = request.canvas()?;
        if background.width() == 0 || background.height() == 0 {
            return Err(PaperdanceError::validation("background raster is empty"));
        }
        let seed = request.seed.unwrap_or_else(time_seed);
        let mut state = JobState::Validated;
        tracing::info!(
            seed,
            duration_seconds = request.duration_seconds,
            fps = request.fps,
            width = canvas.width,
            height = canvas.height,
            "render job validated"
        );

        let motions = build_motions(&request, canvas, seed, sprites, &setup)?;
        let background = if background.dimensions() == (canvas.width, canvas.height) {
            background.clone()
        } else {
            image::imageops::resize(background, canvas.width, canvas.height, FilterType::Lanczos3)
        };
        transition(&mut state, JobState::PathsBuilt);

        Ok(Self {
            request,
            canvas,
            seed,
            background,
            sprites,
            motions,
            state,
        })
    }

    pub fn request(&self) -> &RenderRequest {
        &self.request
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Seed actually used, whether requested or time-derived.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// One motion spec per sprite, in sprite order.
    pub fn motions(&self) -> &[MotionSpec] {
        &self.motions
    }

    pub fn n_frames(&self) -> u64 {
        self.request.n_frames()
    }

    /// Render a single frame without touching the job state.
    pub fn render_frame(&self, frame: FrameIndex) -> PaperdanceResult<RgbImage> {
        if frame.0 >= self.n_frames() {
            return Err(PaperdanceError::validation(format!(
                "frame {} out of range (job has {} frames)",
                frame.0,
                self.n_frames()
            )));
        }
        let compositor = self.compositor()?;
        compositor.render(frame).map(|(img, _)| img)
    }

    /// Render every frame into `sink`, in strictly increasing index order.
    #[tracing::instrument(skip_all, fields(seed = self.seed))]
    pub fn render_into(
        &mut self,
        sink: &mut dyn FrameSink,
        opts: &RenderJobOpts,
    ) -> PaperdanceResult<RenderStats> {
        let res = self.render_frames(sink, opts);
        match &res {
            Ok(_) => transition(&mut self.state, JobState::Done),
            Err(e) => fail(&mut self.state, e),
        }
        res
    }

    /// Render every frame to PNG in a job-owned temporary directory and encode them to `out_path`.
    ///
    /// The temporary directory is removed on success and on failure.
    #[tracing::instrument(skip_all, fields(seed = self.seed, out = %out_path.as_ref().display()))]
    pub fn render_to_mp4(
        &mut self,
        out_path: impl AsRef<Path>,
        opts: &RenderJobOpts,
    ) -> PaperdanceResult<RenderStats> {
        let encoder = Mp4Encoder::new(Mp4EncoderOpts {
            out_path: out_path.as_ref().to_path_buf(),
            overwrite: opts.overwrite,
        });
        let res = self.render_and_encode(&encoder, opts);
        match &res {
            Ok(_) => transition(&mut self.state, JobState::Done),
            Err(e) => fail(&mut self.state, e),
        }
        res
    }

    fn render_and_encode(
        &mut self,
        encoder: &Mp4Encoder,
        opts: &RenderJobOpts,
    ) -> PaperdanceResult<RenderStats> {
        encoder.check(self.canvas.width, self.canvas.height, self.request.fps)?;
        if !is_ffmpeg_on_path() {
            return Err(PaperdanceError::encoding(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("paperdance_frames_");
        let frames_dir = match &opts.frames_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .context("create temporary frame directory")?;
        let mut sink = PngSequenceSink::new(frames_dir.path());
        let stats = self.render_frames(&mut sink, opts)?;
        if sink.written() != self.n_frames() {
            return Err(PaperdanceError::encoding(format!(
                "frame directory holds {} frames, expected {}",
                sink.written(),
                self.n_frames()
            )));
        }

        opts.cancel.check()?;
        transition(&mut self.state, JobState::Encoding);
        let started = Instant::now();
        encoder.encode_dir(sink.dir(), self.request.fps)?;
        tracing::info!(
            out = %encoder.out_path().display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "encode finished"
        );

        if let Err(e) = frames_dir.close() {
            tracing::warn!(error = %e, "failed to remove temporary frame directory");
        }
        Ok(stats)
    }

    fn compositor(&self) -> PaperdanceResult<FrameCompositor<'_>> {
        FrameCompositor::new(
            self.canvas,
            &self.background,
            self.sprites,
            &self.motions,
            self.n_frames(),
        )
    }

    fn render_frames(
        &mut self,
        sink: &mut dyn FrameSink,
        opts: &RenderJobOpts,
    ) -> PaperdanceResult<RenderStats> {
        let n_frames = self.request.n_frames();
        let chunk_size = normalized_chunk_size(opts.chunk_size);
        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };

        let compositor = FrameCompositor::new(
            self.canvas,
            &self.background,
            self.sprites,
            &self.motions,
            n_frames,
        )?;
        let cancel = &opts.cancel;
        let render_one = |f: u64| -> PaperdanceResult<(RgbImage, ComposeStats)> {
            cancel.check()?;
            compositor.render(FrameIndex(f))
        };

        transition(&mut self.state, JobState::Rendering { next_frame: 0 });
        sink.begin(SinkConfig {
            width: self.canvas.width,
            height: self.canvas.height,
            fps: self.request.fps,
            n_frames,
        })?;

        let started = Instant::now();
        let mut stats = RenderStats::default();
        let mut chunk_start = 0u64;
        while chunk_start < n_frames {
            cancel.check()?;
            let chunk_end = (chunk_start + chunk_size).min(n_frames);
            let frames = match pool.as_ref() {
                Some(pool) => pool.install(|| {
                    (chunk_start..chunk_end)
                        .into_par_iter()
                        .map(&render_one)
                        .collect::<PaperdanceResult<Vec<_>>>()
                })?,
                None => (chunk_start..chunk_end)
                    .map(&render_one)
                    .collect::<PaperdanceResult<Vec<_>>>()?,
            };

            for (f, (img, frame_stats)) in (chunk_start..chunk_end).zip(frames) {
                sink.push_frame(FrameIndex(f), &img)?;
                stats.frames_rendered += 1;
                stats.elements_skipped += u64::from(frame_stats.skipped);
                self.state = JobState::Rendering { next_frame: f + 1 };
            }
            stats.frames_total += chunk_end - chunk_start;
            chunk_start = chunk_end;
        }
        sink.end()?;

        tracing::info!(
            frames = stats.frames_rendered,
            skipped = stats.elements_skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "frames rendered"
        );
        Ok(stats)
    }
}

fn build_motions(
    request: &RenderRequest,
    canvas: Canvas,
    seed: u64,
    sprites: &[Sprite],
    setup: &JobSetup<'_>,
) -> PaperdanceResult<Vec<MotionSpec>> {
    let empty = SpriteSettings::default();
    sprites
        .iter()
        .enumerate()
        .map(|(i, sprite)| {
            let stored = setup
                .stored
                .get(i)
                .cloned()
                .unwrap_or_default()
                .without_neutral_appearance();
            let merged = request.settings.get(&i).unwrap_or(&empty).merge_over(&stored);
            let settings =
                enrich_best_effort(setup.enricher, &merged, sprite, &request.prompt, Some(seed));
            let mut rng = Rng64::for_stream(seed, i as u64);
            MotionSpec::build(&settings, canvas, &mut rng)
        })
        .collect()
}

fn transition(state: &mut JobState, next: JobState) {
    tracing::info!(from = ?state, to = ?next, "render job state");
    *state = next;
}

fn fail(state: &mut JobState, err: &PaperdanceError) {
    tracing::info!(from = ?state, error = %err, "render job failed");
    *state = JobState::Failed;
}

fn time_seed() -> u64 {
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    tracing::info!(seed, "no seed requested; using time-derived seed");
    seed
}

fn build_thread_pool(threads: Option<usize>) -> PaperdanceResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PaperdanceError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .context("build rayon thread pool")
        .map_err(PaperdanceError::from)
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/job/render_job.rs"]
mod tests;
