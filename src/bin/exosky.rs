//! Project a Gaia CSV export as seen from an exoplanet (or any other point)
//! and write the result as JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use exosky::catalogs::gaia::load_gaia_csv;
use exosky::pipeline::ReferenceStar;
use exosky::projection::Hemisphere;
use exosky::{ObserverFrame, ProjectionConfig, SkyProjector};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// {source_id: [x, y, brightness]}
    Map,
    /// Ordered list of records with metadata
    Records,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Project a star catalog as seen from another vantage point")]
struct Args {
    /// Gaia CSV export (source_id, ra, dec, phot_g_mean_mag, parallax, ...)
    #[arg(long)]
    catalog: PathBuf,

    /// Observer right ascension in degrees
    #[arg(long, requires = "planet_dec", allow_hyphen_values = true)]
    planet_ra: Option<f64>,

    /// Observer declination in degrees
    #[arg(long, requires = "planet_ra", allow_hyphen_values = true)]
    planet_dec: Option<f64>,

    /// Observer distance in parsecs; omit for a direction-only observer
    #[arg(long, requires = "planet_ra")]
    planet_distance: Option<f64>,

    /// JSON projection config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of rows with a valid parallax
    #[arg(long)]
    limit: Option<usize>,

    /// Mean distance of output points from the plane origin
    #[arg(long)]
    scale: Option<f64>,

    /// Keep only stars in front of the observer (z > 0)
    #[arg(long, default_value_t = false)]
    visible_only: bool,

    /// Anchor brightness on this source id instead of the first star
    #[arg(long)]
    reference_source_id: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Map)]
    format: OutputFormat,

    /// Output file; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<ProjectionConfig> {
    let mut config = match &args.config {
        Some(path) => ProjectionConfig::from_json_file(path)?,
        None => ProjectionConfig::default(),
    };
    if let Some(limit) = args.limit {
        config = config.with_limit(limit);
    }
    if let Some(scale) = args.scale {
        config = config.with_scale(scale);
    }
    if args.visible_only {
        config = config.with_hemisphere(Hemisphere::Visible);
    }
    if let Some(id) = args.reference_source_id {
        config = config.with_reference_star(ReferenceStar::SourceId(id));
    }
    Ok(config)
}

fn build_observer(args: &Args) -> Result<ObserverFrame> {
    let observer = match (args.planet_ra, args.planet_dec, args.planet_distance) {
        (Some(ra), Some(dec), Some(distance)) => ObserverFrame::new(ra, dec, distance)
            .context("Invalid observer position")?,
        (Some(ra), Some(dec), None) => ObserverFrame::direction(ra, dec),
        _ => ObserverFrame::barycenter(),
    };
    Ok(observer)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let observer = build_observer(&args)?;

    let stars = load_gaia_csv(&args.catalog)?;
    tracing::info!(
        "loaded {} rows from {}",
        stars.len(),
        args.catalog.display()
    );

    let field = SkyProjector::new(config.clone())
        .project(&stars, &observer)
        .context("Projection failed")?;

    let out = match args.format {
        OutputFormat::Map => serde_json::Value::Object(field.to_id_map()),
        OutputFormat::Records => json!({
            "reference_distance_pc": field.reference_distance_pc,
            "normalization_value": field.normalization_value,
            "config": config,
            "stars": field.stars,
            "rejected": field.rejected.len(),
        }),
    };

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &out).context("Failed to write JSON output")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
