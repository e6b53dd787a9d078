use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use urge_bindgen::discovery::{run, RunOptions};
use urge_bindgen::Severity;

/// Generates MRI binding translation units from annotated interface headers.
#[derive(Debug, Parser)]
#[command(name = "urge-bindgen", version, about)]
struct Args {
    /// Directory containing the annotated interface headers.
    input_dir: PathBuf,

    /// Directory the generated binding units are written to.
    output_dir: PathBuf,

    /// Directory for the export_apis.json schema dump.
    #[arg(long)]
    json_dir: Option<PathBuf>,

    /// Regenerate even when the inputs are unchanged.
    #[arg(long)]
    force: bool,

    /// Enable per-header debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let options = RunOptions {
        input_dir: args.input_dir,
        output_dir: args.output_dir,
        json_dir: args.json_dir,
        force: args.force,
    };

    let report = match run(&options) {
        Ok(report) => report,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    for diagnostic in report.diagnostics.iter() {
        match diagnostic.severity {
            Severity::Error => eprintln!("error: {diagnostic}\n  note: {}", diagnostic.guarantee),
            Severity::Warning => eprintln!("warning: {diagnostic}"),
        }
    }

    if report.diagnostics.has_errors() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
