use std::fs::File;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use iongen_core::load_schema;
use iongen_eval::{compare_results, load_result};
use iongen_generate::{Format, GenerateOptions, GenerationEngine};

#[derive(Debug, Error)]
enum CliError {
    #[error("schema error: {0}")]
    Schema(#[from] iongen_core::Error),
    #[error("generation error: {0}")]
    Generation(#[from] iongen_generate::GenerationError),
    #[error("comparison error: {0}")]
    Eval(#[from] iongen_eval::EvalError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "iongen", version, about = "Schema-driven Ion data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate random Ion data conforming to a schema type.
    Generate(GenerateArgs),
    /// Compare two benchmark results and report regressions.
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Schema document declaring the type to generate.
    #[arg(long, value_name = "FILE")]
    schema: PathBuf,
    /// Requested approximate output size in bytes.
    #[arg(long, value_name = "BYTES")]
    data_size: u64,
    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatArg::Binary)]
    format: FormatArg,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Benchmark result from the baseline revision.
    #[arg(long, value_name = "FILE")]
    previous: PathBuf,
    /// Benchmark result from the candidate revision.
    #[arg(long = "new", value_name = "FILE")]
    new_result: PathBuf,
    /// Output file for the comparison report.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Binary,
}

impl From<FormatArg> for Format {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => Format::Text,
            FormatArg::Binary => Format::Binary,
        }
    }
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Compare(args) => run_compare(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    if args.data_size == 0 {
        return Err(CliError::InvalidConfig(
            "data size must be a positive number of bytes".to_string(),
        ));
    }

    let definition = load_schema(&args.schema)?;
    let options =
        GenerateOptions::new(args.data_size, args.format.into()).with_seed(args.seed);
    let engine = GenerationEngine::new(options);

    let output = File::create(&args.output)?;
    let report = engine.run(&definition, output)?;

    tracing::info!(
        path = %args.output.display(),
        bytes_written = report.bytes_written,
        values_emitted = report.values_emitted,
        "data written"
    );
    println!(
        "The generated data is saved in {}",
        args.output.display()
    );
    Ok(())
}

fn run_compare(args: CompareArgs) -> Result<(), CliError> {
    let previous = load_result(&args.previous)?;
    let new = load_result(&args.new_result)?;
    let report = compare_results(&previous, &new)?;

    std::fs::write(&args.output, serde_json::to_vec_pretty(&report)?)?;
    tracing::info!(
        path = %args.output.display(),
        regressions = report.regressions.len(),
        "comparison report written"
    );
    Ok(())
}
