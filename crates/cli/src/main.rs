//! Load value prediction simulator CLI.
//!
//! This binary provides a single entry point for all simulation modes. It performs:
//! 1. **Trace run:** Replay a JSON-lines load/store trace through the engine.
//! 2. **Workload run:** Generate a synthetic workload and replay it.
//! 3. **Trace generation:** Write a synthetic workload's events as JSON-lines.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lvpsim_core::common::SimError;
use lvpsim_core::config::{Config, EngineMode};
use lvpsim_core::sim::trace::{load_trace_file, save_trace_file, write_trace};
use lvpsim_core::sim::{Simulator, Workload};
use lvpsim_core::stats::REPORT_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "lvpsim",
    author,
    version,
    about = "Load value prediction simulator",
    long_about = "Replay load/store events through a hybrid load value predictor.\n\nExamples:\n  lvpsim run --workload hybrid\n  lvpsim run --trace app.jsonl --mode context --history-length 8\n  lvpsim gen stride --len 1000 -o stride.jsonl"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace or a synthetic workload and report prediction accuracy.
    Run(RunArgs),

    /// Write a synthetic workload's events as a JSON-lines trace.
    Gen {
        /// Workload name (stride, context, store-to-load, store-array, linear-search, hybrid).
        workload: String,

        /// Problem size (array length, or number of searches).
        #[arg(long, default_value_t = 10_000)]
        len: usize,

        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// JSON-lines trace to replay.
    #[arg(long, conflicts_with = "workload", required_unless_present = "workload")]
    trace: Option<PathBuf>,

    /// Synthetic workload to generate and replay.
    #[arg(long)]
    workload: Option<String>,

    /// Problem size for --workload.
    #[arg(long, default_value_t = 10_000)]
    len: usize,

    /// JSON configuration file; command-line options override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prediction strategy.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Values per context history (K).
    #[arg(long)]
    history_length: Option<usize>,

    /// Capacity of the context prediction table.
    #[arg(long)]
    context_table_size: Option<usize>,

    /// Capacity of the store-to-load table.
    #[arg(long)]
    store_table_size: Option<usize>,

    /// Capacity of the stride table.
    #[arg(long)]
    stride_table_size: Option<usize>,

    /// Confidence counter ceiling.
    #[arg(long)]
    confidence_cap: Option<u8>,

    /// Confidence lost on a misprediction.
    #[arg(long)]
    confidence_penalty: Option<u8>,

    /// Confidence the context and store-to-load predictors must exceed.
    #[arg(long)]
    confidence_threshold: Option<u8>,

    /// Report file.
    #[arg(short, long, default_value = "lvp.out")]
    output: PathBuf,

    /// Write the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Report sections to print (summary, predictors, tables); all when omitted.
    #[arg(long, value_delimiter = ',')]
    sections: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Hybrid,
    Context,
    Stride,
    StoreToLoad,
}

impl From<ModeArg> for EngineMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Hybrid => Self::Hybrid,
            ModeArg::Context => Self::Context,
            ModeArg::Stride => Self::Stride,
            ModeArg::StoreToLoad => Self::StoreToLoad,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Gen {
            workload,
            len,
            output,
        } => cmd_gen(&workload, len, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Installs the stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the configuration from the optional file plus command-line overrides.
fn build_config(args: &RunArgs) -> Result<Config, SimError> {
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    if let Some(mode) = args.mode {
        config.engine.mode = mode.into();
    }
    if let Some(k) = args.history_length {
        config.context.history_length = k;
    }
    if let Some(n) = args.context_table_size {
        config.context.table_size = n;
    }
    if let Some(n) = args.store_table_size {
        config.store_load.table_size = n;
    }
    if let Some(n) = args.stride_table_size {
        config.stride.table_size = n;
    }
    if let Some(cap) = args.confidence_cap {
        config.confidence.cap = cap;
    }
    if let Some(penalty) = args.confidence_penalty {
        config.confidence.penalty = penalty;
    }
    if let Some(threshold) = args.confidence_threshold {
        config.confidence.threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}

/// Replays a trace or workload, prints the report, and writes it to the output file.
fn cmd_run(args: &RunArgs) -> Result<(), SimError> {
    for section in &args.sections {
        if !REPORT_SECTIONS.contains(&section.as_str()) {
            return Err(SimError::InvalidConfig {
                field: "sections",
                reason: format!(
                    "unknown section '{section}' (expected one of {})",
                    REPORT_SECTIONS.join(", ")
                ),
            });
        }
    }

    let config = build_config(args)?;

    let events = match (&args.trace, &args.workload) {
        (Some(path), _) => {
            println!("[*] Trace: {}", path.display());
            load_trace_file(path)?
        }
        (None, Some(name)) => {
            let workload: Workload = name.parse()?;
            println!("[*] Workload: {workload} (len {})", args.len);
            workload.generate(args.len)
        }
        (None, None) => unreachable!("clap requires --trace or --workload"),
    };
    info!("Loaded {} events", events.len());

    println!(
        "Configuration: mode {:?}  K {}  tables ctx/store/stride {}/{}/{}  confidence cap {} penalty {} threshold {}",
        config.engine.mode,
        config.context.history_length,
        config.context.table_size,
        config.store_load.table_size,
        config.stride.table_size,
        config.confidence.cap,
        config.confidence.penalty,
        config.confidence.threshold,
    );

    let mut sim = Simulator::new(&config)?;
    let summary = sim.run(&events);

    summary.print_sections(&args.sections);

    let report = if args.json {
        summary.to_json()?
    } else {
        summary.sections(&args.sections).to_string()
    };
    fs::write(&args.output, report)?;
    println!("[*] Report written to {}", args.output.display());
    Ok(())
}

/// Generates a workload trace and writes it to `output` (or stdout).
fn cmd_gen(name: &str, len: usize, output: Option<&Path>) -> Result<(), SimError> {
    let workload: Workload = name.parse()?;
    let events = workload.generate(len);
    info!("Generated {} events for workload {workload}", events.len());
    match output {
        Some(path) => {
            save_trace_file(path, &events)?;
            eprintln!("[*] Wrote {} events to {}", events.len(), path.display());
        }
        None => write_trace(std::io::stdout().lock(), &events)?,
    }
    Ok(())
}
