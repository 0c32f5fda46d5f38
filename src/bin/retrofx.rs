use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use retrofx::{
    BackendPreference, EffectKind, EffectOptions, EffectStack, Engine, EngineOpts, FrameRGBA,
    FrameRate, PngSequenceSink, RenderOutcome, RenderThreading,
};

#[derive(Parser, Debug)]
#[command(name = "retrofx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a looping effect stack over an image into a PNG sequence.
    Render(RenderArgs),
    /// Print the default options of an effect kind as JSON.
    Defaults {
        /// Effect kind, e.g. `flames` or `tape-glitch`.
        kind: String,
    },
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Base image (any format the `image` crate reads).
    #[arg(long)]
    input: PathBuf,

    /// Effect stack JSON.
    #[arg(long)]
    stack: Option<PathBuf>,

    /// Extra layers with default options, appended after `--stack`.
    #[arg(long = "effect")]
    effects: Vec<String>,

    /// Number of frames in the loop.
    #[arg(long, default_value_t = 24)]
    frames: u32,

    /// Frames per second.
    #[arg(long, default_value_t = 12.0)]
    fps: f32,

    /// Output directory for `frame_0000.png`, ...
    #[arg(long)]
    out: PathBuf,

    /// Never probe the GPU.
    #[arg(long)]
    cpu: bool,

    /// Render frames in parallel on this many threads.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Defaults { kind } => cmd_defaults(&kind),
    }
}

fn cmd_defaults(kind: &str) -> anyhow::Result<()> {
    let kind: EffectKind = kind.parse()?;
    let json = serde_json::to_string_pretty(&EffectOptions::defaults_of(kind))
        .context("serialize default options")?;
    println!("{json}");
    Ok(())
}

fn read_stack(args: &RenderArgs) -> anyhow::Result<EffectStack> {
    let mut stack = match &args.stack {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read stack '{}'", path.display()))?;
            EffectStack::from_json(&json)?
        }
        None => EffectStack::new(),
    };
    for name in &args.effects {
        let kind: EffectKind = name.parse()?;
        stack.append(kind);
    }
    Ok(stack)
}

fn read_base(path: &std::path::Path) -> anyhow::Result<FrameRGBA> {
    let img = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(FrameRGBA::new(width, height, img.into_raw())?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let base = read_base(&args.input)?;
    let stack = read_stack(&args)?;
    let rate = FrameRate::new(args.fps)?;

    let mut opts = EngineOpts::from_env();
    if args.cpu {
        opts.backend = BackendPreference::Cpu;
    }
    if let Some(threads) = args.threads {
        opts.threading = RenderThreading {
            parallel: true,
            threads: Some(threads),
        };
    }
    let mut engine = Engine::new(opts);
    tracing::info!(
        backend = ?engine.backend_kind(),
        layers = stack.len(),
        frames = args.frames,
        "rendering"
    );

    let mut sink = PngSequenceSink::new(&args.out);
    let layers = stack.sorted_layers();
    let outcome = match engine.render_to_sink(&base, layers, args.frames, rate, &mut sink, None) {
        Err(e) if e.is_backend_failure() => {
            tracing::warn!(error = %e, "gpu render failed, retrying on cpu");
            engine.force_cpu();
            engine.render_to_sink(&base, layers, args.frames, rate, &mut sink, None)?
        }
        other => other?,
    };

    match outcome {
        RenderOutcome::Completed(frames) => {
            eprintln!("wrote {} frames to {}", frames.len(), sink.dir().display());
        }
        RenderOutcome::Cancelled => eprintln!("render cancelled"),
    }
    Ok(())
}
