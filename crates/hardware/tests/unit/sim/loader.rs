//! # Trace Loading Tests
//!
//! Reads trace files from disk and checks window selection and error reporting.

use std::io::Write;

use pipesim_core::common::error::TraceError;
use pipesim_core::config::TraceConfig;
use pipesim_core::isa::InstClass;
use pipesim_core::sim::loader::{load_trace, load_trace_window};
use pipesim_core::sim::source::InstructionSource;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

const TRACE: &str = "\
# pc,type,deps
0x100,1
104,2,100

108,3
10c,4,104,108
110,5
114,9
";

fn trace_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn drain_pcs(mut source: impl InstructionSource) -> Vec<u64> {
    let mut pcs = Vec::new();
    while let Some(inst) = source.next_instruction() {
        pcs.push(inst.pc);
    }
    pcs
}

#[rstest]
#[case(1, usize::MAX, vec![0x100, 0x104, 0x108, 0x10c, 0x110, 0x114])]
#[case(0, 2, vec![0x100, 0x104])]
#[case(3, 2, vec![0x108, 0x10c])]
#[case(5, 100, vec![0x110, 0x114])]
#[case(7, 1, vec![])]
#[case(1, 0, vec![])]
fn window_selection(#[case] start: usize, #[case] count: usize, #[case] expected: Vec<u64>) {
    let file = trace_file(TRACE);
    let source = load_trace(file.path(), start, count).unwrap();
    assert_eq!(drain_pcs(source), expected);
}

#[test]
fn classes_and_dependencies_are_parsed() {
    let file = trace_file(TRACE);
    let mut source = load_trace(file.path(), 3, 3).unwrap();

    let branch = source.next_instruction().unwrap();
    assert_eq!(branch.class, InstClass::Branch);
    assert!(!branch.has_deps());

    let load = source.next_instruction().unwrap();
    assert_eq!(load.class, InstClass::Load);
    assert_eq!(load.deps, vec![0x104, 0x108]);

    assert_eq!(source.next_instruction().unwrap().class, InstClass::Store);
    assert!(!source.has_next());
}

#[test]
fn unknown_type_code_loads_as_other() {
    let file = trace_file(TRACE);
    let mut source = load_trace(file.path(), 6, 1).unwrap();
    assert_eq!(source.next_instruction().unwrap().class, InstClass::Other);
}

#[test]
fn window_from_trace_config() {
    let file = trace_file(TRACE);
    let window = TraceConfig { start: 2, count: 1 };
    let source = load_trace_window(file.path(), &window).unwrap();
    assert_eq!(drain_pcs(source), vec![0x104]);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.trace");
    match load_trace(&path, 1, 10) {
        Err(TraceError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn malformed_line_inside_window() {
    let file = trace_file("0,1\n4,1\nnot-a-pc,1\n");
    match load_trace(file.path(), 1, 10) {
        Err(TraceError::Malformed { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected Malformed error, got {other:?}"),
    }
    // The bad line is outside a two-instruction window
    assert!(load_trace(file.path(), 1, 2).is_ok());
}
