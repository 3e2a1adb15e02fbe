use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colormerge::{ImageFormat, Pix};
use colormerge::region::{
    ConnectivityType, NoProgress, ProgressBar, ProgressObserver, SegmentOptions, recolor,
    segment_with_progress, write_summaries,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "colormerge")]
#[command(about = "Reduce an image to K color regions by merging similar neighbours")]
struct Cli {
    /// Input image (PNG or PNM)
    input: PathBuf,

    /// Number of regions to keep, at least 2
    k: u32,

    /// Output path [default: <input>_seg_<K>.png]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not draw the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Treat only horizontal and vertical neighbours as adjacent
    #[arg(long)]
    four_way: bool,

    /// Merge-loop iterations between progress updates (0 disables)
    #[arg(long, default_value_t = 500)]
    progress_interval: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colormerge=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let connectivity = if cli.four_way {
        ConnectivityType::FourWay
    } else {
        ConnectivityType::EightWay
    };
    let options = SegmentOptions::new(cli.k)
        .with_connectivity(connectivity)
        .with_progress_interval(cli.progress_interval);
    options.validate()?;

    let pix = colormerge::io::read_image(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    tracing::info!(
        input = %cli.input.display(),
        width = pix.width(),
        height = pix.height(),
        pixels = pix.pixel_count(),
        k = cli.k,
        "segmenting"
    );

    let mut observer: Box<dyn ProgressObserver> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressBar::stderr())
    };
    let seg = segment_with_progress(&pix, &options, observer.as_mut())?;

    let mut out = pix.try_into_mut().unwrap_or_else(|pix| pix.to_mut());
    let summaries = recolor(&mut out, &seg)?;
    write_summaries(std::io::stdout().lock(), &summaries)?;

    let output = cli
        .output
        .unwrap_or_else(|| colormerge::default_output_path(&cli.input, cli.k));
    let format = match ImageFormat::from_path(&output) {
        ImageFormat::Unknown => ImageFormat::Png,
        known => known,
    };
    let out: Pix = out.into();
    colormerge::io::write_image(&out, &output, format)
        .with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!("- Saved result to {}", output.display());

    Ok(())
}
