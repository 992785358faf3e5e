use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use paperdance::{
    FrameIndex, JobManifest, JobSetup, NoopEnricher, PresetEnricher, PromptEnricher, RenderJob,
    RenderJobOpts, SettingsEnricher, Sprite,
};

#[derive(Parser, Debug)]
#[command(name = "paperdance", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the resolved motion specs as JSON.
    Paths(PathsArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EnrichMode {
    None,
    Preset,
    /// Preset, then keyword adjustments from the job's prompt.
    Prompt,
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Job manifest JSON.
    #[arg(long)]
    job: PathBuf,

    /// Settings enrichment applied before motion is built.
    #[arg(long, value_enum, default_value_t = EnrichMode::None)]
    enrich: EnrichMode,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    overwrite: bool,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PathsArgs {
    #[command(flatten)]
    job: JobArgs,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Paths(args) => cmd_paths(args),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct LoadedJob {
    manifest: JobManifest,
    background: image::RgbImage,
    sprites: Vec<Sprite>,
}

fn load(args: &JobArgs) -> anyhow::Result<LoadedJob> {
    let manifest = JobManifest::from_path(&args.job)
        .with_context(|| format!("load job '{}'", args.job.display()))?;
    let background = manifest.load_background()?;
    let sprites = manifest.load_sprites()?;
    Ok(LoadedJob {
        manifest,
        background,
        sprites,
    })
}

fn enricher(mode: EnrichMode) -> Box<dyn SettingsEnricher> {
    match mode {
        EnrichMode::None => Box::new(NoopEnricher),
        EnrichMode::Preset => Box::new(PresetEnricher::default()),
        EnrichMode::Prompt => Box::new(PromptEnricher::with_preset(
            PresetEnricher::default().preset,
        )),
    }
}

fn build_job<'a>(
    loaded: &'a LoadedJob,
    enricher: &dyn SettingsEnricher,
) -> anyhow::Result<RenderJob<'a>> {
    let stored = loaded.manifest.stored_settings();
    let job = RenderJob::with_setup(
        loaded.manifest.request(),
        &loaded.background,
        &loaded.sprites,
        JobSetup {
            stored: &stored,
            enricher,
            ..Default::default()
        },
    )?;
    Ok(job)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let loaded = load(&args.job)?;
    let enricher = enricher(args.job.enrich);
    let mut job = build_job(&loaded, enricher.as_ref())?;

    let opts = RenderJobOpts {
        parallel: args.parallel,
        threads: args.threads,
        chunk_size: args.chunk_size,
        overwrite: args.overwrite,
        ..Default::default()
    };
    let stats = job.render_to_mp4(&args.out, &opts)?;

    eprintln!(
        "wrote {} ({} frames, seed {}, {} sprite draws skipped)",
        args.out.display(),
        stats.frames_rendered,
        job.seed(),
        stats.elements_skipped
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let loaded = load(&args.job)?;
    let enricher = enricher(args.job.enrich);
    let job = build_job(&loaded, enricher.as_ref())?;
    let frame = job.render_frame(FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_paths(args: PathsArgs) -> anyhow::Result<()> {
    let loaded = load(&args.job)?;
    let enricher = enricher(args.job.enrich);
    let job = build_job(&loaded, enricher.as_ref())?;

    let out = serde_json::json!({
        "seed": job.seed(),
        "motions": job.motions(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
