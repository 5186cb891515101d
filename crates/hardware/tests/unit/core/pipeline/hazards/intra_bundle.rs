//! Intra-Bundle Dependency Tests.
//!
//! A consumer decoded in the same bundle as its producer cannot be caught by
//! the EXECUTE/MEMORY scan, so the producer is pushed onto the EXECUTE stall
//! queue. The consumer follows it once the producer's result is available: a
//! cycle later for integer and floating-point producers, after MEMORY for
//! loads and stores.

use pipesim_core::core::pipeline::grid::Stage;
use pipesim_core::isa::InstClass;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::TraceBuilder;
use crate::common::harness::TestContext;

fn pc(index: usize) -> u64 {
    TraceBuilder::pc_of(index)
}

#[test]
fn producer_and_consumer_in_one_bundle() {
    let trace = TraceBuilder::new()
        .push(InstClass::Float)
        .push_dep(InstClass::Integer, &[0])
        .build();
    let mut ctx = TestContext::new(2, trace);

    ctx.ticks(3);
    assert_eq!(ctx.bundle_pcs(Stage::Execute), vec![Some(pc(0)), None]);
    assert_eq!(ctx.ex_queue_pcs(), vec![pc(1)]);

    ctx.ticks(1);
    assert_eq!(ctx.bundle_pcs(Stage::Execute), vec![Some(pc(1)), None]);
    assert_eq!(ctx.stage_of(pc(0)), Some(Stage::Memory));

    let stats = ctx.run_to_completion().clone();
    assert_eq!(stats.cycles, 6);
    assert_eq!(stats.intra_bundle_squashes, 1);
}

#[test]
fn same_bundle_without_dependency_issues_together() {
    let trace = TraceBuilder::new()
        .push(InstClass::Float)
        .push(InstClass::Integer)
        .build();
    let mut ctx = TestContext::new(2, trace);
    let stats = ctx.run_to_completion().clone();
    assert_eq!(stats.cycles, 5);
    assert_eq!(stats.intra_bundle_squashes, 0);
}

#[test]
fn later_lanes_queue_behind_the_squashed_producer() {
    let trace = TraceBuilder::new()
        .push(InstClass::Integer)
        .push(InstClass::Other)
        .push_dep(InstClass::Integer, &[0])
        .build();
    let mut ctx = TestContext::new(3, trace);

    ctx.ticks(3);
    assert_eq!(ctx.bundle_pcs(Stage::Execute), vec![Some(pc(0)), None, None]);
    assert_eq!(ctx.ex_queue_pcs(), vec![pc(1), pc(2)]);

    ctx.ticks(1);
    assert_eq!(ctx.bundle_pcs(Stage::Execute), vec![Some(pc(1)), Some(pc(2)), None]);
    assert_eq!(ctx.cycles(), 6);
}

#[test]
fn squash_runs_while_front_end_is_frozen() {
    // Bundle 1: a load and a filler. Bundle 2: P needs the load, Q needs P.
    let trace = TraceBuilder::new()
        .push(InstClass::Load)
        .push(InstClass::Other)
        .push_dep(InstClass::Integer, &[0])
        .push_dep(InstClass::Integer, &[2])
        .build();
    let mut ctx = TestContext::new(2, trace);

    ctx.ticks(3);
    assert!(ctx.pipeline.data_hazard());
    assert_eq!(ctx.bundle_pcs(Stage::Decode), vec![Some(pc(2)), Some(pc(3))]);

    ctx.ticks(1);
    assert!(ctx.pipeline.data_hazard());
    assert_eq!(ctx.bundle_pcs(Stage::Decode), vec![None, Some(pc(3))]);
    assert_eq!(ctx.ex_queue_pcs(), vec![pc(2)]);

    ctx.ticks(1);
    assert_eq!(ctx.bundle_pcs(Stage::Execute), vec![Some(pc(2)), None]);
    assert_eq!(ctx.ex_queue_pcs(), vec![pc(3)]);

    let stats = ctx.run_to_completion().clone();
    assert_eq!(stats.cycles, 8);
    assert_eq!(stats.stalls_data, 1);
    assert_eq!(stats.intra_bundle_squashes, 1);
}

#[test]
fn load_and_consumer_in_one_bundle_wait_for_memory() {
    let trace = TraceBuilder::new()
        .push(InstClass::Load)
        .push_dep(InstClass::Integer, &[0])
        .build();
    let mut ctx = TestContext::new(2, trace);

    ctx.ticks(3);
    assert_eq!(ctx.stage_of(pc(0)), Some(Stage::Execute));
    assert_eq!(ctx.ex_queue_pcs(), vec![pc(1)]);

    // The load reached EXECUTE after its consumer was decoded
    ctx.ticks(1);
    assert_eq!(ctx.stage_of(pc(0)), Some(Stage::Memory));
    assert_eq!(ctx.ex_queue_pcs(), vec![pc(1)]);
    assert!(ctx.pipeline.data_hazard());

    ctx.ticks(1);
    assert_eq!(ctx.stage_of(pc(0)), Some(Stage::Writeback));
    assert_eq!(ctx.stage_of(pc(1)), Some(Stage::Execute));

    let stats = ctx.run_to_completion().clone();
    assert_eq!(stats.cycles, 7);
    assert_eq!(stats.stalls_data, 1);
    assert_eq!(stats.intra_bundle_squashes, 1);
}

#[test]
fn queued_lanes_wait_behind_a_squashed_load() {
    let trace = TraceBuilder::new()
        .push(InstClass::Load)
        .push(InstClass::Other)
        .push_dep(InstClass::Integer, &[0])
        .build();
    let mut ctx = TestContext::new(3, trace);

    ctx.ticks(4);
    assert_eq!(ctx.stage_of(pc(0)), Some(Stage::Memory));
    assert_eq!(ctx.ex_queue_pcs(), vec![pc(1), pc(2)]);

    ctx.ticks(1);
    assert_eq!(ctx.bundle_pcs(Stage::Execute), vec![Some(pc(1)), Some(pc(2)), None]);

    let stats = ctx.run_to_completion().clone();
    assert_eq!(stats.cycles, 7);
    assert_eq!(stats.stalls_data, 1);
}

#[test]
fn dependent_chain_leaves_the_queue_one_link_per_cycle() {
    let trace = TraceBuilder::new()
        .push(InstClass::Integer)
        .push_dep(InstClass::Float, &[0])
        .push_dep(InstClass::Integer, &[1])
        .build();
    let mut ctx = TestContext::new(3, trace);

    ctx.ticks(3);
    assert_eq!(ctx.bundle_pcs(Stage::Execute), vec![Some(pc(0)), None, None]);
    assert_eq!(ctx.ex_queue_pcs(), vec![pc(1), pc(2)]);

    ctx.ticks(1);
    assert_eq!(ctx.bundle_pcs(Stage::Execute), vec![Some(pc(1)), None, None]);
    assert_eq!(ctx.ex_queue_pcs(), vec![pc(2)]);

    ctx.ticks(1);
    assert_eq!(ctx.bundle_pcs(Stage::Execute), vec![Some(pc(2)), None, None]);
    assert_eq!(ctx.cycles(), 7);
}
