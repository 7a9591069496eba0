use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "capclip", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the one-frame still preview as a PNG.
    Preview(PreviewArgs),
    /// Export the full captioned video (requires `ffmpeg` on PATH).
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input render spec JSON.
    #[arg(long = "spec")]
    spec_path: PathBuf,

    /// Directory of .ttf/.otf fonts, registered by file stem.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input render spec JSON.
    #[arg(long = "spec")]
    spec_path: PathBuf,

    /// Directory of .ttf/.otf fonts, registered by file stem.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Output video path; the container is negotiated against the runtime's
    /// encoders, so prefer a matching extension (.mp4 or .webm).
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn load_spec(path: &Path) -> anyhow::Result<capclip::RenderSpec> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read render spec '{}'", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("parse render spec '{}'", path.display()))
}

fn load_fonts(font_dir: Option<&Path>) -> anyhow::Result<capclip::FontLibrary> {
    let mut fonts = capclip::FontLibrary::new();
    if let Some(dir) = font_dir {
        fonts
            .load_dir(dir)
            .with_context(|| format!("load fonts from '{}'", dir.display()))?;
    }
    Ok(fonts)
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let spec = load_spec(&args.spec_path)?;
    let fonts = load_fonts(args.font_dir.as_deref())?;

    let frame = capclip::render_preview(&spec, fonts)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let spec = load_spec(&args.spec_path)?;
    let fonts = load_fonts(args.font_dir.as_deref())?;

    let mut driver = capclip::ExportDriver::new(&spec, fonts)?;
    let blob = driver.export()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &blob.bytes)
        .with_context(|| format!("write video '{}'", args.out.display()))?;

    eprintln!("wrote {} ({})", args.out.display(), blob.mime_type);
    Ok(())
}
