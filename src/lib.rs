//! Databuilder: turns detection dataset archives into training JSON.
//!
//! A build stages a dataset archive, reads its annotations, and writes
//! three documents next to it: `TRAIN_images.json` (absolute image
//! paths), `TRAIN_objects.json` (per-image boxes, labels and difficulty
//! flags) and `label_map.json` (class name to label id).
//!
//! # Modules
//!
//! - [`ir`]: Dataset, annotation record, label map and box types
//! - [`source`]: Image id and annotation strategies
//! - [`stage`]: Archive extraction and idempotent staging
//! - [`builder`]: The pipeline and the per-format profiles
//! - [`error`]: Error types for build operations
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use databuilder::DatasetBuilder;
//!
//! let builder = DatasetBuilder::voc(
//!     Path::new("/datasets/VOCtrainval_06-Nov-2007.tar"),
//!     Path::new("/tmp/VOC"),
//! )?;
//! let report = builder.build()?;
//! println!("{report}");
//! # Ok::<(), databuilder::BuilderError>(())
//! ```

pub mod builder;
pub mod error;
pub mod ir;
pub mod source;
pub mod stage;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use builder::{BuildReport, DatasetBuilder, DatasetProfile};
pub use error::BuilderError;

/// The databuilder CLI application.
#[derive(Parser)]
#[command(name = "databuilder")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Build training JSON from a Pascal VOC archive.
    Voc(VocArgs),
    /// Build training JSON from a Dokki invoice archive.
    Dokki(DokkiArgs),
}

/// Arguments for the voc subcommand.
#[derive(clap::Args)]
struct VocArgs {
    /// VOC archive, e.g. VOCtrainval_06-Nov-2007.tar.
    archive: PathBuf,

    /// Directory to extract into and write the JSON files to.
    output_dir: PathBuf,

    /// Dataset year; read from the archive name when omitted.
    #[arg(long)]
    year: Option<String>,

    /// Output format for the build report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

/// Arguments for the dokki subcommand.
#[derive(clap::Args)]
struct DokkiArgs {
    /// Dokki archive containing an `output/` directory of images.
    archive: PathBuf,

    /// Directory to extract into and write the JSON files to.
    output_dir: PathBuf,

    /// Output format for the build report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the databuilder CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BuilderError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Voc(args)) => {
            let builder = match args.year {
                Some(year) => DatasetBuilder::new(
                    &args.archive,
                    &args.output_dir,
                    DatasetProfile::voc(&year),
                )?,
                None => DatasetBuilder::voc(&args.archive, &args.output_dir)?,
            };
            print_report(&builder.build()?, args.output)
        }
        Some(Commands::Dokki(args)) => {
            let builder = DatasetBuilder::dokki(&args.archive, &args.output_dir)?;
            print_report(&builder.build()?, args.output)
        }
        None => {
            println!("databuilder {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Turns detection dataset archives into training JSON.");
            println!();
            println!("Run 'databuilder --help' for usage information.");
            Ok(())
        }
    }
}

fn print_report(report: &BuildReport, format: ReportFormat) -> Result<(), BuilderError> {
    match format {
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).map_err(|source| BuilderError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            println!("{json}");
        }
        ReportFormat::Text => print!("{report}"),
    }
    Ok(())
}
