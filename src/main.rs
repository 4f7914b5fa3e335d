use std::path::PathBuf;

use clap::Parser;
use netbuild_tools::io::output::DirectorySink;
use netbuild_tools::pipeline;
use netbuild_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "netbuild_tools=info";

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;

    if !cli.input.exists() {
        return Err(ToolError::MissingInput(cli.input));
    }

    let mut sink = DirectorySink::new(&cli.output_dir)?;
    let summary = pipeline::run(&cli.input, &mut sink)?;
    println!(
        "Generated {} device configuration(s) in {} ({} error(s), {} ignored row(s))",
        summary.devices,
        sink.root().display(),
        summary.errors,
        summary.ignored
    );
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Generate per-device network configuration from a workbook."
)]
struct Cli {
    /// Workbook describing the network (xlsx, xls or ods).
    input: PathBuf,

    /// Directory receiving the device configurations and reports.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}
