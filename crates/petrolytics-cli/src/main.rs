//! Command-line front end for the analytics library.
//!
//! Fonts must be present under `assets/fonts` relative to the
//! `petrolytics` crate or provided via the `PETROLYTICS_FONTS_DIR`
//! environment variable before running the `report` command.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use log::warn;

use petrolytics::chart::{render_chart, ChartKind};
use petrolytics::load::load_dataset;
use petrolytics::report::render_report;
use petrolytics::session::AnalysisSession;
use petrolytics::summary::summarize_dataset;

#[derive(Parser)]
#[command(author, version, about = "Dataset summaries, charts, and PDF reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print top-5 value summaries for each column of the given CSV files.
    #[command(name = "summarize")]
    Summarize {
        /// CSV files to summarize.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Render a single chart to a PNG file.
    #[command(name = "chart")]
    Chart {
        /// CSV file to chart.
        file: PathBuf,

        /// Chart kind: line, bar, or area.
        #[arg(long)]
        kind: String,

        /// Column providing X values.
        #[arg(long)]
        x: String,

        /// Column providing Y values (must be numeric).
        #[arg(long)]
        y: String,

        /// Output path.
        #[arg(long, short = 'o', default_value = "chart.png")]
        output: PathBuf,
    },

    /// Assemble a PDF report from CSV files and optional charts.
    #[command(name = "report")]
    Report {
        /// CSV files to include.
        files: Vec<PathBuf>,

        /// Chart to include, as `KIND:X:Y:FILE` (repeatable).  FILE must
        /// be one of the CSV files given above.
        #[arg(long = "chart")]
        charts: Vec<ChartSpec>,

        /// Output path.
        #[arg(long, short = 'o', default_value = "analysis_report.pdf")]
        output: PathBuf,
    },
}

/// A `KIND:X:Y:FILE` chart request from the command line.
#[derive(Clone, Debug)]
struct ChartSpec {
    kind: ChartKind,
    x: String,
    y: String,
    file: String,
}

impl FromStr for ChartSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(4, ':').collect();
        let [kind, x, y, file] = parts.as_slice() else {
            return Err(format!("expected KIND:X:Y:FILE, got '{s}'"));
        };
        let kind = kind.parse::<ChartKind>().map_err(|e| e.to_string())?;
        Ok(ChartSpec {
            kind,
            x: (*x).to_owned(),
            y: (*y).to_owned(),
            file: (*file).to_owned(),
        })
    }
}

fn main() {
    env_logger::Builder::default()
        .parse_env(env_logger::Env::default().filter_or("PETROLYTICS_LOG", "info"))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Summarize { files } => summarize(files),
        Commands::Chart {
            file,
            kind,
            x,
            y,
            output,
        } => chart(file, kind, x, y, output),
        Commands::Report {
            files,
            charts,
            output,
        } => report(files, charts, output),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}

fn summarize(files: Vec<PathBuf>) -> Result<(), Box<dyn Error>> {
    for path in files {
        let dataset = load_dataset(&path)?;
        println!("{}", dataset.name());
        for summary in summarize_dataset(&dataset) {
            println!("  {}: {}", summary.column(), summary.joined_values());
        }
    }
    Ok(())
}

fn chart(
    file: PathBuf,
    kind: String,
    x: String,
    y: String,
    output: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let dataset = load_dataset(&file)?;
    let kind = ChartKind::from_str(&kind)?;
    let artifact = render_chart(&dataset, &x, &y, kind)?;
    fs::write(&output, artifact.png())?;
    println!("Wrote {} ({})", output.display(), artifact.title());
    Ok(())
}

fn report(
    files: Vec<PathBuf>,
    charts: Vec<ChartSpec>,
    output: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let mut session = AnalysisSession::new();

    for path in files {
        match load_dataset(&path) {
            Ok(dataset) => session.insert_dataset(dataset),
            Err(err) => warn!("skipping {}: {}", path.display(), err),
        }
    }

    for spec in charts {
        let Some(dataset) = session.datasets().get(&spec.file) else {
            warn!("skipping chart for unknown file '{}'", spec.file);
            continue;
        };
        match render_chart(dataset, &spec.x, &spec.y, spec.kind) {
            Ok(artifact) => session.insert_chart(artifact),
            Err(err) => warn!("skipping chart for '{}': {}", spec.file, err),
        }
    }

    let pdf = render_report(session.datasets(), session.charts())?;
    fs::write(&output, &pdf)?;
    println!("Wrote {}", output.display());
    Ok(())
}
