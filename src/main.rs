use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use earthspin::config::GlobeConfig;
use earthspin::palette::Palette;
use earthspin::projection::{Projector, SearchPath};
use earthspin::{input, pipeline};

/// Render a GeoJSON land dataset as a spinning globe GIF
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// GeoJSON FeatureCollection to animate
    input: PathBuf,

    /// Output GIF path
    #[arg(short, long, default_value = "earth.gif")]
    output: PathBuf,

    /// Directories searched for projection init files such as `epsg`
    #[arg(
        long = "proj-lib",
        env = "PROJ_LIB",
        value_delimiter = ':',
        default_value = "/usr/share/proj"
    )]
    proj_lib: Vec<PathBuf>,

    /// JSON file with render settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    log::info!("{}", args.input.display());

    let config = GlobeConfig::load(args.config.as_deref())?;
    let search_path = SearchPath::new(args.proj_lib);
    log::debug!("Projection search path: {:?}", search_path.dirs());

    let features = input::load_features(&args.input)?;
    log::info!("Loaded {} features", features.len());

    let projector = Projector::new(&config.source_crs, search_path)
        .with_context(|| format!("Invalid source system `{}`", config.source_crs))?;
    let palette = Palette::plan9();

    let sequence = pipeline::render_animation(&features, &config, &projector, &palette)?;
    sequence.write_gif(&palette, &args.output)?;
    log::info!(
        "Wrote {} frames to {}",
        sequence.len(),
        args.output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
