use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use slidewave::{
    EffectRegistry, FfmpegSink, FfmpegSinkOpts, FrameAllocation, FsImageSource, RenderSession,
    RenderSessionOpts, Show,
};

#[derive(Parser, Debug)]
#[command(name = "slidewave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one frame of one slide as a PNG.
    Frame(FrameArgs),
    /// Render the whole show to a video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// List the available effect names.
    Effects,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input show JSON. Image paths resolve relative to its directory.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Slide index (0-based).
    #[arg(long, default_value_t = 0)]
    slide: usize,

    /// Frame index within the slide (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input show JSON. Image paths resolve relative to its directory.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of overwriting an existing output.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Video codec passed to ffmpeg.
    #[arg(long, default_value = "libx264")]
    codec: String,

    /// Constant rate factor.
    #[arg(long, default_value_t = 18)]
    crf: u8,

    /// Encoder preset.
    #[arg(long, default_value = "medium")]
    preset: String,

    /// Output pixel format.
    #[arg(long, default_value = "yuv420p")]
    pix_fmt: String,

    /// Spread rounding across phases so the show length matches its total duration.
    #[arg(long, default_value_t = false)]
    distribute_frames: bool,

    /// Render and encode on the same thread.
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Effects => {
            for name in EffectRegistry::global().names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn load_session(in_path: &Path, opts: RenderSessionOpts) -> anyhow::Result<RenderSession> {
    let show = Show::from_path(in_path)?;
    let images_root = in_path.parent().unwrap_or_else(|| Path::new("."));
    let source = Arc::new(FsImageSource::new(images_root));
    Ok(RenderSession::new(show, source, opts)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let sess = load_session(&args.in_path, RenderSessionOpts::default())?;
    let canvas = sess.render_frame(args.slide, args.frame)?;
    let img = canvas.to_rgb_image()?;

    slidewave::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = RenderSessionOpts {
        threads: args.threads,
        pipelined: !args.sequential,
        frame_allocation: if args.distribute_frames {
            FrameAllocation::Distributed
        } else {
            FrameAllocation::PerPhase
        },
        ..RenderSessionOpts::default()
    };
    let sess = load_session(&args.in_path, opts)?;

    let mut sink_opts = FfmpegSinkOpts::new(&args.out);
    sink_opts.overwrite = !args.no_overwrite;
    sink_opts.codec = args.codec;
    sink_opts.crf = Some(args.crf);
    sink_opts.preset = Some(args.preset);
    sink_opts.pix_fmt = args.pix_fmt;
    let mut sink = FfmpegSink::new(sink_opts);

    let mut last_pct = None;
    let stats = sess.render_with_progress(&mut sink, &mut |done, total| {
        let pct = done * 100 / total.max(1);
        if last_pct != Some(pct) {
            last_pct = Some(pct);
            eprint!("\rrendering {done}/{total} frames ({pct}%)");
            if done == total {
                eprintln!();
            }
        }
    })?;

    eprintln!(
        "wrote {} ({} frames, {:.2}s)",
        args.out.display(),
        stats.frames_total,
        sess.show().fps.frames_to_secs(stats.frames_total)
    );
    Ok(())
}
