//! End-to-end scenario tests, one per testable property that exercises the
//! full round loop rather than a single module. Corridor-swap deconfliction
//! (S2-adjacent) lives in `stowswap-planner`'s own unit tests alongside the
//! other `PushAndSwap` properties; these drive a complete [`World`] through
//! [`run_push_and_swap_mode`] instead.

use std::collections::HashSet;
use stowswap_config::{AgentSpec, ItemSpec, MapSpec, PickingTaskSpec, RackSpec};
use stowswap_core::{Position, PickDirection};
use stowswap_entities::Action;
use stowswap_policies::NearestTaskAssignment;
use stowswap_sim::{run_push_and_swap_mode, World};
use stowswap_testing::corridor_swap_scenario;

/// S1: a 3x3 empty grid, one agent, one item, one ship target. The whole
/// job should take no more than five steps.
#[test]
fn single_agent_single_item_completes_within_five_steps() {
    let map_spec = MapSpec { width: 3, height: 3, racks: vec![], items: vec![] };
    let items = vec![ItemSpec { name: "x".into(), pos: Position::new(0, 0), volume: 1, amount: 1 }];
    let agents = vec![AgentSpec { name: "a0".into(), pos: Position::new(2, 0), capacity: 5 }];
    let picking = vec![PickingTaskSpec { item_name: "x".into(), target: Position::new(0, 2), amount: 1 }];
    let mut world = World::build(map_spec, items, agents, picking).unwrap();

    let assignment = NearestTaskAssignment::new();
    let log = run_push_and_swap_mode(&mut world, &assignment, None, false).unwrap();

    assert!(log.steps.len() - 1 <= 5, "expected at most 5 steps, got {}", log.steps.len() - 1);
    assert!(log.steps.iter().any(|s| !s.pick_ups.is_empty()));
    assert!(log.steps.iter().any(|s| !s.drop_offs.is_empty()));
}

/// S2: two agents whose pick/drop targets sit on opposite ends of a
/// corridor with a single degree-3 junction must cross without colliding,
/// and both complete their assigned item.
#[test]
fn two_agents_cross_a_corridor_junction_and_both_complete() {
    let mut world = corridor_swap_scenario().unwrap();
    let assignment = NearestTaskAssignment::new();
    let log = run_push_and_swap_mode(&mut world, &assignment, None, false).unwrap();

    let delivered: HashSet<String> =
        log.steps.iter().flat_map(|s| s.drop_offs.values().flatten().cloned()).collect();
    assert_eq!(delivered, HashSet::from(["widget_a".to_string(), "widget_b".to_string()]));

    // No step ever lists the same agent at the same cell twice, and no two
    // agents ever land on each other's cell within a step.
    for step in &log.steps {
        let mut seen = HashSet::new();
        for pos in step.positions.values() {
            assert!(seen.insert(*pos), "two agents collided at {pos:?}");
        }
    }
}

/// S3: an agent with capacity for only one item at a time, given two items
/// to deliver, must alternate pick-up/drop-off rather than carrying both —
/// never exceeding its capacity mid-run.
#[test]
fn capacity_limited_agent_never_carries_two_items_at_once() {
    let map_spec = MapSpec {
        width: 5,
        height: 1,
        racks: vec![
            RackSpec { pos: Position::new(0, 0), width: 1, height: 1, pick_direction: PickDirection::Horizontal },
            RackSpec { pos: Position::new(0, 4), width: 1, height: 1, pick_direction: PickDirection::Horizontal },
        ],
        items: vec![],
    };
    let items = vec![
        ItemSpec { name: "a".into(), pos: Position::new(0, 0), volume: 1, amount: 1 },
        ItemSpec { name: "b".into(), pos: Position::new(0, 4), volume: 1, amount: 1 },
    ];
    let agents = vec![AgentSpec { name: "r0".into(), pos: Position::new(0, 2), capacity: 1 }];
    let picking = vec![
        PickingTaskSpec { item_name: "a".into(), target: Position::new(0, 2), amount: 1 },
        PickingTaskSpec { item_name: "b".into(), target: Position::new(0, 2), amount: 1 },
    ];
    let mut world = World::build(map_spec, items, agents, picking).unwrap();

    let assignment = NearestTaskAssignment::new();
    let log = run_push_and_swap_mode(&mut world, &assignment, None, false).unwrap();

    let mut held = 0i64;
    for step in &log.steps {
        held -= step.drop_offs.values().map(|v| v.len() as i64).sum::<i64>();
        held += step.pick_ups.values().map(|v| v.len() as i64).sum::<i64>();
        assert!(held <= 1, "agent held {held} items at once, capacity is 1");
    }

    let pick_ups: usize = log.steps.iter().map(|s| s.pick_ups.values().map(|v| v.len()).sum::<usize>()).sum();
    let drop_offs: usize = log.steps.iter().map(|s| s.drop_offs.values().map(|v| v.len()).sum::<usize>()).sum();
    assert_eq!(pick_ups, 2);
    assert_eq!(drop_offs, 2);
    assert_eq!(world.agents.values().next().unwrap().current_action.map(|a| a.kind), Some(Action::Dock));
}

/// S6: an item whose end point has no reachable path from any agent must
/// be rejected at world construction, not discovered mid-plan.
#[test]
fn unreachable_end_point_is_rejected_at_build_time() {
    let map_spec = MapSpec {
        width: 3,
        height: 3,
        racks: vec![
            RackSpec { pos: Position::new(0, 1), width: 1, height: 1, pick_direction: PickDirection::On },
            RackSpec { pos: Position::new(1, 1), width: 1, height: 1, pick_direction: PickDirection::On },
            RackSpec { pos: Position::new(2, 1), width: 1, height: 1, pick_direction: PickDirection::Horizontal },
        ],
        items: vec![ItemSpec { name: "sealed".into(), pos: Position::new(2, 2), volume: 1, amount: 1 }],
    };
    let agents = vec![AgentSpec { name: "a0".into(), pos: Position::new(0, 0), capacity: 5 }];
    let picking = vec![PickingTaskSpec { item_name: "sealed".into(), target: Position::new(0, 0), amount: 1 }];

    let result = World::build(map_spec, vec![], agents, picking);
    assert!(result.is_err(), "an unreachable end point must fail world construction");
}
