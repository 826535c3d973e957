use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use inbetween::{Animation, AnimationSettings, MemoryScene, ObjectState, Scene};

#[derive(Parser, Debug)]
#[command(name = "inbetween", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the steps of an animation document.
    Info(InArgs),
    /// Print the effective output settings of an animation document.
    Settings(InArgs),
    /// Write every export frame's object states as JSON lines.
    Track(TrackArgs),
    /// Write the demo animation document.
    Example(ExampleArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Input animation document (JSON).
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct TrackArgs {
    /// Input animation document (JSON).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON lines path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second; defaults to the document's setting.
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Parser, Debug)]
struct ExampleArgs {
    /// Output animation document path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(serde::Serialize)]
struct TrackLine<'a> {
    frame: u64,
    step: &'a str,
    t: f64,
    objects: BTreeMap<String, ObjectState>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Settings(args) => cmd_settings(args),
        Command::Track(args) => cmd_track(args),
        Command::Example(args) => cmd_example(args),
    }
}

fn read_animation(path: &Path) -> anyhow::Result<Animation> {
    let f = File::open(path).with_context(|| format!("open animation '{}'", path.display()))?;
    let doc: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| "parse animation JSON")?;
    Ok(Animation::from_document(doc)?)
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_info(args: InArgs) -> anyhow::Result<()> {
    let anim = read_animation(&args.in_path)?;
    let mut out = std::io::stdout().lock();
    for (i, step) in anim.steps().iter().enumerate() {
        writeln!(
            out,
            "{}  {:<10} {:>3}s  {} objects",
            Animation::label(i),
            step.name(),
            step.duration_secs(),
            step.states().len()
        )?;
    }
    writeln!(
        out,
        "{} steps, {} frames at {} fps ({})",
        anim.len(),
        anim.total_frames(),
        anim.settings().fps,
        inbetween::format_mmss(anim.duration())
    )?;
    Ok(())
}

fn cmd_settings(args: InArgs) -> anyhow::Result<()> {
    let anim = read_animation(&args.in_path)?;
    let settings = anim.settings();
    let mut out = std::io::stdout().lock();
    writeln!(out, "output      {}", settings.output_path.display())?;
    match &settings.encoder_path {
        Some(p) => writeln!(out, "encoder     {}", p.display())?,
        None => writeln!(out, "encoder     (not set)")?,
    }
    writeln!(out, "resolution  {}", settings.effective_resolution()?)?;
    writeln!(out, "background  {}", settings.background.as_str())?;
    writeln!(out, "fps         {}", settings.fps)?;
    Ok(())
}

fn cmd_track(args: TrackArgs) -> anyhow::Result<()> {
    let anim = read_animation(&args.in_path)?;
    let fps = args.fps.unwrap_or(anim.settings().fps);
    anyhow::ensure!(fps > 0, "--fps must be > 0");

    // Every object any step knows about, shown as the first step.
    let mut scene = MemoryScene::from_states(anim.steps().iter().flat_map(|s| s.states().values()));
    if let Some(first) = anim.step(0) {
        first.apply_instant(&mut scene);
    }

    create_parent(&args.out)?;
    let f = File::create(&args.out)
        .with_context(|| format!("create track '{}'", args.out.display()))?;
    let mut w = BufWriter::new(f);
    let mut frame = 0u64;
    let frames = anim.sample_track(&mut scene, f64::from(fps), |tick, scene| {
        let mut objects = BTreeMap::new();
        for name in scene.object_names() {
            if let Some(obj) = scene.object(&name) {
                objects.insert(name, ObjectState::capture(obj)?);
            }
        }
        let line = TrackLine {
            frame,
            step: anim.steps()[tick.step].name(),
            t: tick.t,
            objects,
        };
        serde_json::to_writer(&mut w, &line)
            .and_then(|()| writeln!(w).map_err(serde_json::Error::io))
            .map_err(|e| inbetween::InbetweenError::serde(e.to_string()))?;
        frame += 1;
        Ok(())
    })?;
    w.flush().context("flush track")?;

    eprintln!("wrote {} frames to {}", frames, args.out.display());
    Ok(())
}

fn cmd_example(args: ExampleArgs) -> anyhow::Result<()> {
    let (_, anim) = inbetween::example_animation(AnimationSettings::default())?;
    create_parent(&args.out)?;
    let f = File::create(&args.out)
        .with_context(|| format!("create animation '{}'", args.out.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &anim.to_document()?)
        .context("write animation JSON")?;
    w.flush().context("flush animation JSON")?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
