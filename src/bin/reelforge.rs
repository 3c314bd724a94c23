use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

const IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png", "webp"];
const AUDIO_EXTS: &[&str] = &["mp3", "wav", "m4a", "flac", "ogg", "aac"];

#[derive(Parser, Debug)]
#[command(name = "reelforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute render metadata for a content directory (requires `ffprobe` on PATH).
    Metadata(MetadataArgs),
    /// Normalize a transcript file into the canonical caption list.
    Captions(CaptionsArgs),
}

#[derive(Parser, Debug)]
struct MetadataArgs {
    /// Content directory holding images, audio tracks and optional transcript.
    #[arg(long = "content-dir")]
    content_dir: PathBuf,

    /// Output orientation.
    #[arg(long, value_enum, default_value_t = OrientationChoice::Vertical)]
    orientation: OrientationChoice,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Per-video override config JSON. Defaults to `<content-dir>/config.json`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Transcript JSON. Defaults to `<content-dir>/transcript.json`.
    #[arg(long)]
    transcript: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CaptionsArgs {
    /// Input transcript JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrientationChoice {
    Vertical,
    Horizontal,
}

impl From<OrientationChoice> for reelforge::Orientation {
    fn from(choice: OrientationChoice) -> Self {
        match choice {
            OrientationChoice::Vertical => reelforge::Orientation::Vertical,
            OrientationChoice::Horizontal => reelforge::Orientation::Horizontal,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Metadata(args) => cmd_metadata(args),
        Command::Captions(args) => cmd_captions(args),
    }
}

fn cmd_metadata(args: MetadataArgs) -> anyhow::Result<()> {
    let fps = reelforge::Fps::new(args.fps)?;

    let images = list_sorted_with_ext(&args.content_dir, IMAGE_EXTS)?
        .into_iter()
        .map(|p| p.display().to_string())
        .collect();
    let audio_tracks = list_sorted_with_ext(&args.content_dir, AUDIO_EXTS)?;

    let config_path = args
        .config
        .unwrap_or_else(|| args.content_dir.join("config.json"));
    let transcript_path = args
        .transcript
        .unwrap_or_else(|| args.content_dir.join("transcript.json"));

    let request = reelforge::MetadataRequest {
        content_dir: args.content_dir.display().to_string(),
        orientation: args.orientation.into(),
        fps,
        images,
        audio_tracks,
        transcript: read_json_lenient(&transcript_path),
        override_config: read_json_lenient(&config_path),
        defaults: reelforge::ProjectDefaults::default(),
    };

    let meta = reelforge::MetadataCalculator::compute(&request, &reelforge::FfprobeDurationProbe);
    println!("{}", serde_json::to_string_pretty(&meta)?);
    Ok(())
}

fn cmd_captions(args: CaptionsArgs) -> anyhow::Result<()> {
    let f = File::open(&args.in_path)
        .with_context(|| format!("open transcript '{}'", args.in_path.display()))?;
    let input: serde_json::Value =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse transcript JSON")?;

    let captions = reelforge::normalize(&input);
    println!("{}", serde_json::to_string_pretty(&captions)?);
    eprintln!("{} captions", captions.len());
    Ok(())
}

fn list_sorted_with_ext(dir: &Path, exts: &[&str]) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read content dir '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if exts.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Override/transcript files are optional and may be malformed; either case
/// degrades to None instead of failing the whole computation.
fn read_json_lenient(path: &Path) -> Option<serde_json::Value> {
    let f = File::open(path).ok()?;
    match serde_json::from_reader(BufReader::new(f)) {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("ignoring malformed '{}': {err}", path.display());
            None
        }
    }
}
