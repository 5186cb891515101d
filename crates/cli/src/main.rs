//! Superscalar pipeline simulator CLI.
//!
//! This binary runs one trace through the pipeline model. It performs:
//! 1. **Configuration:** Defaults, optionally overlaid by a JSON file, then the
//!    positional arguments. Logging is set up from the resolved configuration.
//! 2. **Loading:** Reads the requested window of the trace file.
//! 3. **Reporting:** Prints the end-of-run totals, selected detail sections, or JSON.

use std::path::PathBuf;
use std::process;

use clap::builder::PossibleValuesParser;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use pipesim_core::Simulator;
use pipesim_core::common::error::SimError;
use pipesim_core::config::Config;
use pipesim_core::sim::loader;
use pipesim_core::stats::{STATS_SECTIONS, SimStats};

#[derive(Parser, Debug)]
#[command(
    name = "pipesim",
    author,
    version,
    about = "Superscalar in-order pipeline simulator",
    long_about = "Simulate a W-wide, five-stage in-order pipeline on an instruction trace.\n\nTrace lines are `<pc>,<type>[,<dep pc>...]` with hexadecimal pcs and type codes\n1 (integer), 2 (float), 3 (branch), 4 (load), 5 (store); other codes are counted as other.\n\nExamples:\n  pipesim traces/gcc.txt 1 100000 4\n  pipesim traces/gcc.txt 500 1000 2 --stats stalls --trace-pipeline"
)]
struct Cli {
    /// Trace file to simulate.
    trace: PathBuf,

    /// 1-based index of the first trace instruction to simulate.
    start: usize,

    /// Number of trace instructions to simulate.
    count: usize,

    /// Pipeline width (instructions per stage per cycle).
    width: usize,

    /// JSON configuration file; positional arguments override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the statistics as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Log the pipeline grid after every cycle (debug level).
    #[arg(long)]
    trace_pipeline: bool,

    /// Fail if the run has not drained after this many cycles.
    #[arg(long, value_name = "N")]
    max_cycles: Option<u64>,

    /// Detail sections to print after the report (comma-separated).
    #[arg(
        long,
        value_name = "SECTIONS",
        value_delimiter = ',',
        value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied())
    )]
    stats: Vec<String>,
}

impl Cli {
    /// Builds the run configuration: file layer first, command line on top.
    fn to_config(&self) -> Result<Config, SimError> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.pipeline.width = self.width;
        config.trace.start = self.start;
        config.trace.count = self.count;
        config.general.trace_pipeline |= self.trace_pipeline;
        if self.max_cycles.is_some() {
            config.general.max_cycles = self.max_cycles;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            eprintln!("Insufficient arguments provided.");
            eprintln!("{}", Cli::command().render_usage());
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    init_logging(config.general.trace_pipeline);

    let stats = match run(&cli, &config) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if cli.json {
        match stats.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: could not serialize statistics: {e}");
                process::exit(1);
            }
        }
        return;
    }

    stats.print();
    if !cli.stats.is_empty() {
        println!();
        stats.print_sections(&cli.stats);
    }
}

/// Loads the trace window and runs it to completion.
fn run(cli: &Cli, config: &Config) -> Result<SimStats, SimError> {
    tracing::debug!(?config, "configuration resolved");
    let source = loader::load_trace_window(&cli.trace, &config.trace)?;
    Simulator::new(config, source)?.run()
}

/// Installs a stderr `tracing` subscriber honouring `RUST_LOG`.
fn init_logging(trace_pipeline: bool) {
    let default = if trace_pipeline { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
