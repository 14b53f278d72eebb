use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cyclefade", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the blend schedule as JSON lines.
    Weights(WeightsArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a PNG sequence at the stage frame rate.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct WeightsArgs {
    /// Params JSON. Defaults are used when omitted.
    #[arg(long)]
    params: Option<PathBuf>,

    /// First logical time.
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Last logical time (inclusive).
    #[arg(long, default_value_t = 6.0)]
    to: f64,

    /// Logical time step.
    #[arg(long, default_value_t = 0.1)]
    step: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input stage JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Raw elapsed seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input stage JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_#####.png`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of frames. Defaults to one full cycle.
    #[arg(long)]
    frames: Option<u64>,

    /// Composite worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(serde::Serialize)]
struct WeightsLine<'a> {
    t: f64,
    phase_weights: &'a [f32],
    channels: &'a [cyclefade::ChannelWeight],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Weights(args) => cmd_weights(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_weights(args: WeightsArgs) -> anyhow::Result<()> {
    let params = match &args.params {
        Some(p) => cyclefade::CompositorParams::from_path(p)?,
        None => cyclefade::CompositorParams::default(),
    };
    if !(args.step.is_finite() && args.step > 0.0) {
        anyhow::bail!("--step must be > 0");
    }
    let slots = (0..params.slot_count)
        .map(|i| {
            cyclefade::SceneSlot::new(
                cyclefade::SlotId(i),
                cyclefade::SceneId(i),
                cyclefade::CameraId(0),
            )
        })
        .collect();
    let opts = cyclefade::CompositorOpts::new(cyclefade::TargetSize::new(1, 1)?);
    let compositor = cyclefade::Compositor::new(params, slots, opts)?;

    let steps = ((args.to - args.from) / args.step).floor().max(0.0) as u64;
    for i in 0..=steps {
        let t = args.from + (i as f64) * args.step;
        let phase = compositor.phase_weights_at(t);
        let channels = compositor.weights_at(t);
        let line = WeightsLine {
            t,
            phase_weights: &phase,
            channels: &channels,
        };
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

fn load_stage(path: &Path, threads: Option<usize>) -> anyhow::Result<cyclefade::Stage> {
    let def = cyclefade::StageDef::from_path(path)?;
    let opts = cyclefade::CpuBackendOpts {
        threads,
        ..cyclefade::CpuBackendOpts::default()
    };
    def.build(opts)
        .with_context(|| format!("build stage '{}'", path.display()))
}

fn write_png(path: &Path, frame: &cyclefade::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut stage = load_stage(&args.in_path, None)?;
    let frame = stage.render_at(args.at)?;
    write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut stage = load_stage(&args.in_path, args.threads)?;
    let frames = match args.frames {
        Some(n) => n,
        None => {
            let params = stage.compositor.params();
            if params.time_scale <= 0.0 {
                anyhow::bail!("time_scale is 0; pass --frames explicitly");
            }
            let cycle_secs = params.cycle_length / params.time_scale;
            (cycle_secs * stage.fps.as_f64()).ceil() as u64
        }
    };

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for i in 0..frames {
        let frame = stage.render_at(stage.frame_time(i))?;
        write_png(&args.out_dir.join(format!("frame_{i:05}.png")), &frame)?;
    }
    let stats = stage.compositor.stats();
    eprintln!(
        "wrote {frames} frames to {} ({} slot renders, {} skipped)",
        args.out_dir.display(),
        stats.slot_renders,
        stats.skipped_renders
    );
    Ok(())
}
