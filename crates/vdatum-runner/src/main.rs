//! vdatum - convert depths between vertical reference surfaces.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use vdatum_metrics::describe_metrics;
use vdatum_runner::logging::{init_logging, DEFAULT_FILTER};
use vdatum_runner::{
    spawn_bulk_job, transform_point, InMemoryRecorder, Result, RunnerError, VdatumConfig,
};
use vdatum_surface::{GeoPoint, Surface, SurfaceManager};
use vdatum_transform::{BulkRequest, TransformOptions, ValueKind};

#[derive(Parser, Debug)]
#[command(name = "vdatum")]
#[command(about = "Convert depths between vertical reference surfaces", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the surface files (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Write recorded metrics as JSON to this file on exit
    #[arg(long, global = true)]
    metrics_output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List surfaces, their data files and the supported value kinds
    Surfaces,

    /// Print the ellipsoidal height of a surface at a point
    Height {
        /// Surface code (MSS, HAT, MHW, MLW, LAT, ISLW, Geoid, EL) or index
        #[arg(long)]
        surface: Surface,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
    },

    /// Transform a single measurement
    Point {
        /// Surface the value is measured against
        #[arg(long)]
        from: Option<Surface>,

        /// Surface to convert to
        #[arg(long)]
        to: Option<Surface>,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Measured value in meters
        #[arg(long, allow_negative_numbers = true)]
        value: f64,

        /// Value kind: DEPTH or ELLI_BED
        #[arg(long)]
        kind: Option<ValueKind>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transform a `lon lat value` file
    File {
        /// Surface the values are measured against
        #[arg(long)]
        from: Option<Surface>,

        /// Surface to convert to
        #[arg(long)]
        to: Option<Surface>,

        /// Input file
        #[arg(long)]
        input: PathBuf,

        /// Output directory (created if missing)
        #[arg(long)]
        output_dir: PathBuf,

        /// Output file name
        #[arg(long)]
        output_name: String,

        /// Value kind: DEPTH or ELLI_BED
        #[arg(long)]
        kind: Option<ValueKind>,
    },
}

const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(DEFAULT_FILTER);

    let recorder = cli.metrics_output.as_ref().map(|_| {
        let recorder = Arc::new(InMemoryRecorder::new());
        if metrics::set_global_recorder(recorder.clone()).is_err() {
            warn!("A metrics recorder is already installed");
        }
        recorder
    });
    describe_metrics();

    let metrics_output = cli.metrics_output.clone();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    };

    if let (Some(recorder), Some(path)) = (recorder, metrics_output) {
        match recorder.snapshot().write_json(&path) {
            Ok(()) => info!(path = %path.display(), "Wrote metrics"),
            Err(e) => {
                eprintln!("Failed to write metrics to {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    code
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => VdatumConfig::load(path)?,
        None => VdatumConfig::default(),
    };
    let catalog = config.catalog(cli.data_dir.as_deref());
    let manager = Arc::new(SurfaceManager::new(catalog));

    match cli.command {
        Commands::Surfaces => {
            let catalog = manager.loader().catalog();
            println!("Data directory: {}", catalog.data_dir().display());
            for surface in Surface::ALL {
                let source = match catalog.path_for(surface) {
                    Some(path) if path.is_file() => path.display().to_string(),
                    Some(path) => format!("{} (missing)", path.display()),
                    None => "(zero surface)".to_string(),
                };
                println!(
                    "{:>2}  {:<6} {:<36} {}",
                    surface.index(),
                    surface.code(),
                    surface.display_name(),
                    source
                );
            }
            println!("Value kinds:");
            for kind in ValueKind::ALL {
                println!("    {:<8} {}", kind.tag(), kind.description());
            }
        }

        Commands::Height { surface, lon, lat } => {
            let envelope = config.transform.envelope;
            if !envelope.contains(lon, lat) {
                return Err(RunnerError::OutsideEnvelope(envelope));
            }
            let heights = manager.height_at(surface, &[GeoPoint::new(lon, lat)])?;
            println!("{:.4}", heights[0]);
        }

        Commands::Point {
            from,
            to,
            lon,
            lat,
            value,
            kind,
            json,
        } => {
            let options = merge_options(config.transform, from, to, kind);
            let result = transform_point(&manager, &options, GeoPoint::new(lon, lat), value)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{:.4}", result.transformed);
            }
        }

        Commands::File {
            from,
            to,
            input,
            output_dir,
            output_name,
            kind,
        } => {
            let options = merge_options(config.transform, from, to, kind);
            info!(
                input = %input.display(),
                from = %options.input_surface,
                to = %options.output_surface,
                kind = %options.value_kind,
                "Running bulk transform"
            );
            let request = BulkRequest::new(input, output_dir, output_name);
            let outcome =
                spawn_bulk_job(Arc::clone(&manager), options, request)?.wait(PROGRESS_INTERVAL)?;

            println!("{}", outcome.message);
            if !outcome.success {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Command-line flags override the configured defaults.
fn merge_options(
    defaults: TransformOptions,
    from: Option<Surface>,
    to: Option<Surface>,
    kind: Option<ValueKind>,
) -> TransformOptions {
    TransformOptions {
        input_surface: from.unwrap_or(defaults.input_surface),
        output_surface: to.unwrap_or(defaults.output_surface),
        value_kind: kind.unwrap_or(defaults.value_kind),
        envelope: defaults.envelope,
    }
}
