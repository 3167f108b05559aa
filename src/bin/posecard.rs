use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use posecard::{
    Compositor, CpuSurfaceProvider, DirectorySink, ExportOptions, Fetch, FontBook, HttpFetcher,
    ImageLoader, OfflineFetcher, SessionSnapshot, SessionSummary, format_score, lookup_participant,
};

#[derive(Parser, Debug)]
#[command(name = "posecard", version, about = "Render figure-drawing session composites")]
struct Cli {
    /// Extra font directory (repeatable). Also read from `POSECARD_FONT_DIR`.
    #[arg(long = "font-dir", global = true)]
    font_dirs: Vec<PathBuf>,

    /// JSON file overriding the export options.
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    /// Never touch the network; remote images count as failed loads.
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the portrait card of one practiced pose.
    Pose(PoseArgs),
    /// Render the full-session memory.
    Session(SessionArgs),
    /// Print the session summary.
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
struct PoseArgs {
    /// Input session snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Practiced pose number (1-based).
    #[arg(long)]
    pose: usize,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Input session snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Input session snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.cmd {
        Command::Pose(args) => cmd_pose(&cli, args).await,
        Command::Session(args) => cmd_session(&cli, args).await,
        Command::Summary(args) => cmd_summary(&cli, args),
    }
}

async fn cmd_pose(cli: &Cli, args: &PoseArgs) -> anyhow::Result<()> {
    let snapshot = SessionSnapshot::from_path(&args.in_path)?;
    let summary = SessionSummary::build(&snapshot.images, &snapshot.evaluations);
    let group = summary.pose_group(args.pose)?;

    let compositor = build_compositor(cli, &args.in_path)?;
    let mut sink = DirectorySink::new(&args.out_dir);
    let report = compositor
        .export_pose(group, args.pose - 1, &snapshot.participants, &mut sink)
        .await?;

    eprintln!("wrote {}", args.out_dir.join(&report.filename).display());
    Ok(())
}

async fn cmd_session(cli: &Cli, args: &SessionArgs) -> anyhow::Result<()> {
    let snapshot = SessionSnapshot::from_path(&args.in_path)?;
    let summary = SessionSummary::build(&snapshot.images, &snapshot.evaluations);

    let compositor = build_compositor(cli, &args.in_path)?;
    let mut sink = DirectorySink::new(&args.out_dir);
    let report = compositor
        .export_session(&summary, &snapshot.participants, &mut sink)
        .await?;

    eprintln!("wrote {}", args.out_dir.join(&report.filename).display());
    Ok(())
}

fn cmd_summary(cli: &Cli, args: &SummaryArgs) -> anyhow::Result<()> {
    let options = load_options(cli)?;
    let snapshot = SessionSnapshot::from_path(&args.in_path)?;
    let summary = SessionSummary::build(&snapshot.images, &snapshot.evaluations);

    println!(
        "drawings: {}  average: {}/10  poses practiced: {}",
        summary.stats.total_evaluations,
        format_score(summary.stats.average_score),
        summary.pose_count()
    );
    for (i, group) in summary.groups.iter().enumerate() {
        println!("pose {} - {}", i + 1, group.pose.title);
        for drawing in &group.drawings {
            let lookup = lookup_participant(&snapshot.participants, &drawing.participant_id);
            let emoji = match lookup {
                posecard::ParticipantLookup::Found(p) => p.kind.profile().emoji,
                posecard::ParticipantLookup::Missing => "·",
            };
            println!(
                "  {emoji} {}  {}  {}",
                lookup.name_or(&options.labels.session_artist_fallback),
                format_score(drawing.score),
                drawing.feedback
            );
        }
    }
    Ok(())
}

fn load_options(cli: &Cli) -> anyhow::Result<ExportOptions> {
    Ok(match &cli.options {
        Some(path) => ExportOptions::from_path(path)?,
        None => ExportOptions::default(),
    })
}

fn build_compositor(cli: &Cli, snapshot_path: &Path) -> anyhow::Result<Compositor<CpuSurfaceProvider>> {
    let options = load_options(cli)?;

    let mut font_dirs = cli.font_dirs.clone();
    if let Some(env) = std::env::var_os("POSECARD_FONT_DIR") {
        font_dirs.extend(std::env::split_paths(&env));
    }
    let fonts = FontBook::discover(&font_dirs);

    let fetcher: Arc<dyn Fetch> = if cli.offline {
        Arc::new(OfflineFetcher)
    } else {
        Arc::new(HttpFetcher::new(options.fetch_timeout()).context("build http client")?)
    };
    let base_dir = snapshot_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let loader = ImageLoader::new(fetcher).with_base_dir(base_dir);

    Ok(Compositor::new(CpuSurfaceProvider::new(fonts), loader).with_options(options)?)
}
