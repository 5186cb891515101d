//! Control Hazard Tests.
//!
//! A fetched branch stops fetch for the rest of its bundle and blocks further
//! fetching until it is accepted into MEMORY. Waiting in the MEMORY stall queue
//! does not count as accepted.

use pipesim_core::core::pipeline::grid::Stage;
use pipesim_core::isa::InstClass;
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::TraceBuilder;
use crate::common::harness::TestContext;

fn pc(index: usize) -> u64 {
    TraceBuilder::pc_of(index)
}

#[test]
fn branch_then_three_integers() {
    let trace = TraceBuilder::new()
        .push(InstClass::Branch)
        .repeat(InstClass::Integer, 3)
        .build();
    let mut ctx = TestContext::new(4, trace);

    ctx.ticks(1);
    assert_eq!(ctx.bundle_pcs(Stage::Fetch), vec![Some(pc(0)), None, None, None]);
    assert!(ctx.pipeline.control_hazard());

    // No fetch while the branch is in DECODE or EXECUTE
    for stage in [Stage::Decode, Stage::Execute] {
        ctx.ticks(1);
        assert_eq!(ctx.stage_of(pc(0)), Some(stage));
        assert!(ctx.pipeline.grid().is_stage_empty(Stage::Fetch));
        assert_eq!(ctx.source.pulls(), 1);
    }

    // Fetch resumes in the cycle the branch enters MEMORY
    ctx.ticks(1);
    assert_eq!(ctx.stage_of(pc(0)), Some(Stage::Memory));
    assert!(!ctx.pipeline.control_hazard());
    assert_eq!(
        ctx.bundle_pcs(Stage::Fetch),
        vec![Some(pc(1)), Some(pc(2)), Some(pc(3)), None]
    );

    let stats = ctx.run_to_completion().clone();
    assert_eq!(stats.cycles, 10);
    assert_eq!(stats.inst_branch, 1);
    assert_eq!(stats.inst_int, 3);
    assert_eq!(stats.stalls_control, 2);
    assert_eq!(stats.ex_deferrals, 2);
}

#[test]
fn branch_then_non_contending_bundle() {
    let trace = TraceBuilder::new()
        .push(InstClass::Branch)
        .repeat(InstClass::Other, 3)
        .build();
    let mut ctx = TestContext::new(4, trace);
    assert_eq!(ctx.cycles(), 8);
}

#[test]
fn fetch_stops_right_after_the_branch() {
    let trace = TraceBuilder::new()
        .push(InstClass::Integer)
        .push(InstClass::Branch)
        .push(InstClass::Integer)
        .push(InstClass::Integer)
        .build();
    let mut ctx = TestContext::new(4, trace);

    ctx.ticks(1);
    assert_eq!(
        ctx.bundle_pcs(Stage::Fetch),
        vec![Some(pc(0)), Some(pc(1)), None, None]
    );
    assert_eq!(ctx.source.pulls(), 2);
    assert_eq!(ctx.source.remaining(), 2);
}

#[test]
fn queued_branch_keeps_fetch_blocked() {
    let trace = TraceBuilder::new()
        .push(InstClass::Load)
        .push(InstClass::Load)
        .push(InstClass::Branch)
        .push(InstClass::Integer)
        .build();
    let mut ctx = TestContext::new(3, trace);

    ctx.ticks(4);
    assert_eq!(ctx.mem_queue_pcs(), vec![pc(1), pc(2)]);
    assert!(ctx.pipeline.control_hazard());
    assert!(ctx.pipeline.grid().is_stage_empty(Stage::Fetch));

    ctx.ticks(1);
    assert_eq!(ctx.bundle_pcs(Stage::Memory), vec![Some(pc(1)), Some(pc(2)), None]);
    assert!(!ctx.pipeline.control_hazard());
    assert_eq!(ctx.pc_at(0, Stage::Fetch), Some(pc(3)));

    let stats = ctx.run_to_completion().clone();
    assert_eq!(stats.cycles, 9);
    assert_eq!(stats.stalls_control, 3);
    assert_eq!(stats.mem_deferrals, 2);
}

#[test]
fn back_to_back_branches_serialize_fetch() {
    let mut ctx = TestContext::new(2, TraceBuilder::new().repeat(InstClass::Branch, 3).build());
    let stats = ctx.run_to_completion().clone();
    // Each branch is fetched three cycles after the previous one
    assert_eq!(stats.cycles, 11);
    assert_eq!(stats.inst_branch, 3);
}

#[test]
fn trailing_branch_does_not_count_control_stalls() {
    let mut ctx = TestContext::new(1, TraceBuilder::new().push(InstClass::Branch).build());
    let stats = ctx.run_to_completion().clone();
    assert_eq!(stats.cycles, 5);
    assert_eq!(stats.stalls_control, 0);
}
