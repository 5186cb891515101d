//! # Simulation Driver Tests
//!
//! End-to-end runs from a trace on disk through the report.

use std::io::Write;

use pipesim_core::Simulator;
use pipesim_core::common::error::{ConfigError, SimError};
use pipesim_core::config::Config;
use pipesim_core::sim::loader::load_trace;
use pipesim_core::sim::source::TraceSource;
use pretty_assertions::assert_eq;

#[test]
fn run_trace_file_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "0,4").unwrap();
    writeln!(file, "4,1,0").unwrap();
    writeln!(file, "8,2").unwrap();

    let source = load_trace(file.path(), 1, 100).unwrap();
    let stats = Simulator::new(&Config::default(), source).unwrap().run().unwrap();

    // The integer waits one cycle for the load to leave MEMORY
    assert_eq!(stats.cycles, 8);
    assert_eq!(stats.inst_load, 1);
    assert_eq!(stats.inst_int, 1);
    assert_eq!(stats.inst_float, 1);
    assert_eq!(stats.instructions_retired(), 3);
    assert_eq!(stats.stalls_data, 1);
}

#[test]
fn empty_trace_reports_zero_cycles() {
    let stats = Simulator::new(&Config::default(), TraceSource::default())
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(stats.cycles, 0);
    assert_eq!(stats.instructions_retired(), 0);
}

#[test]
fn invalid_config_is_rejected_before_running() {
    let mut config = Config::default();
    config.pipeline.width = 0;
    let err = Simulator::new(&config, TraceSource::default()).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroWidth));
    assert!(matches!(SimError::from(err), SimError::Config(ConfigError::ZeroWidth)));
}

#[test]
fn manual_ticking_matches_run() {
    let trace = "0,1\n4,1\n8,5\nc,4\n";
    let mut config = Config::default();
    config.pipeline.width = 2;

    let source = || TraceSource::from_reader(trace.as_bytes(), 1, 10).unwrap();
    let expected = Simulator::new(&config, source()).unwrap().run().unwrap();

    let mut sim = Simulator::new(&config, source()).unwrap();
    let mut ticks = 0;
    while sim.tick() == pipesim_core::core::TickOutcome::Running {
        ticks += 1;
    }
    assert_eq!(ticks, expected.cycles);
    assert_eq!(sim.pipeline.stats(), &expected);
}
