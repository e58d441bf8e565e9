//! Round Loop & Post-Processor: drive rounds to completion, recording a
//! per-step output row for every agent.
//!
//! Grounded in `a_star/push_and_swap.py`'s outer `run()` loop (dispatch →
//! plan → compress → apply) and its CSV writer, plus the simpler
//! `a_star/a_star.py` driver for the A*-only mode (§4.F's "shares data
//! structures" note).

use crate::dispatch::dispatch_targets;
use crate::error::PlanningError;
use crate::world::World;
use std::collections::HashMap;
use stowswap_core::{AgentId, Position};
use stowswap_entities::Action;
use stowswap_planner::{PlanningBudget, PushAndSwap};
use stowswap_policies::{AssignmentContext, TaskAssignment};

/// One timestep's worth of per-agent position and pick/drop activity.
#[derive(Debug, Clone, Default)]
pub struct StepRecord {
    pub positions: HashMap<AgentId, Position>,
    pub pick_ups: HashMap<AgentId, Vec<String>>,
    pub drop_offs: HashMap<AgentId, Vec<String>>,
}

/// The full per-step history of a completed run, ready for CSV emission.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    pub agent_order: Vec<AgentId>,
    pub steps: Vec<StepRecord>,
}

impl RunLog {
    fn push_positions_only(&mut self, world: &World) {
        let positions = world.agents.iter().map(|(&id, a)| (id, a.pos)).collect();
        self.steps.push(StepRecord { positions, pick_ups: HashMap::new(), drop_offs: HashMap::new() });
    }
}

fn agent_is_finished(world: &World, agent: AgentId) -> bool {
    let a = &world.agents[&agent];
    a.actions.is_empty() && a.current_action.map(|c| c.kind) == Some(Action::Dock) && a.pos == a.goal
}

fn install_assignment(world: &mut World, assignment: &dyn TaskAssignment) {
    let ctx = AssignmentContext {
        agents: &world.agents,
        items: &world.items,
        store_points: &world.store_points,
        tasks: &world.tasks,
    };
    let plans = assignment.assign(&ctx);
    for (agent_id, plan) in plans {
        if let Some(agent) = world.agents.get_mut(&agent_id) {
            agent.tasks = plan.tasks;
            agent.actions = plan.actions;
        }
    }
}

/// Apply a finished agent's current action (PICK_UP/DROP_OFF effects),
/// clear its target, and record the item name for this step's log row.
fn complete_action(world: &mut World, agent: AgentId, record: &mut StepRecord) -> Result<(), PlanningError> {
    let action = world.agents[&agent].current_action;
    if let Some(queued) = action {
        match queued.kind {
            Action::PickUp => {
                let task_id = queued.task.expect("PICK_UP must carry a task");
                let item = world.tasks[&task_id].item;
                world.picking(agent, item)?;
                record.pick_ups.entry(agent).or_default().push(world.items[&item].name.clone());
            }
            Action::DropOff => {
                let task_id = queued.task.expect("DROP_OFF must carry a task");
                let item = world.tasks[&task_id].item;
                world.dropping(agent, item)?;
                record.drop_offs.entry(agent).or_default().push(world.items[&item].name.clone());
            }
            Action::Dock | Action::Start => {}
        }
    }
    world.agents.get_mut(&agent).unwrap().target = None;
    Ok(())
}

/// The primary driver: Push-and-Swap planning every round.
pub fn run_push_and_swap_mode(
    world: &mut World,
    assignment: &dyn TaskAssignment,
    budget: Option<PlanningBudget>,
    verbose: bool,
) -> Result<RunLog, PlanningError> {
    install_assignment(world, assignment);

    let agent_order: Vec<AgentId> = {
        let mut ids: Vec<AgentId> = world.agents.keys().copied().collect();
        ids.sort();
        ids
    };
    let mut log = RunLog { agent_order: agent_order.clone(), steps: Vec::new() };
    log.push_positions_only(world);

    loop {
        let active: Vec<AgentId> = agent_order.iter().copied().filter(|&id| !agent_is_finished(world, id)).collect();
        if active.is_empty() {
            break;
        }

        dispatch_targets(world);

        let planning_agents: Vec<AgentId> =
            active.iter().copied().filter(|id| world.agents[id].target.is_some()).collect();
        if planning_agents.is_empty() {
            break;
        }

        let starts: Vec<Position> = planning_agents.iter().map(|id| world.agents[id].pos).collect();
        let targets: Vec<Position> = planning_agents.iter().map(|id| world.agents[id].target.unwrap()).collect();

        let mut solver = PushAndSwap::new(&world.grid, targets);
        let outcome = solver.run(starts, true, true, budget, verbose)?;

        debug_assert!(stowswap_planner::invariants::single_step_moves(&outcome.plan));
        debug_assert!(stowswap_planner::invariants::vertex_disjoint(&outcome.plan));
        debug_assert!(stowswap_planner::invariants::no_blocked_cells(&outcome.plan, &world.grid));
        debug_assert!(stowswap_planner::invariants::no_edge_swaps(&outcome.plan));

        for t in 1..=outcome.plan.makespan() {
            let config = outcome.plan.config_at(t);
            for (i, &agent_id) in planning_agents.iter().enumerate() {
                world.agents.get_mut(&agent_id).unwrap().move_to(config[i]);
            }
            let mut record = StepRecord::default();
            record.positions = world.agents.iter().map(|(&id, a)| (id, a.pos)).collect();
            log.steps.push(record);
        }

        let mut finish_record = StepRecord::default();
        for (i, &agent_id) in planning_agents.iter().enumerate() {
            if outcome.finished_agents.contains(&i) {
                complete_action(world, agent_id, &mut finish_record)?;
            }
        }
        if !finish_record.pick_ups.is_empty() || !finish_record.drop_offs.is_empty() {
            if let Some(last) = log.steps.last_mut() {
                for (k, v) in finish_record.pick_ups {
                    last.pick_ups.entry(k).or_default().extend(v);
                }
                for (k, v) in finish_record.drop_offs {
                    last.drop_offs.entry(k).or_default().extend(v);
                }
            }
        }
    }

    Ok(log)
}

/// The A*-only driver: every agent takes its own independent shortest path
/// with no Push-and-Swap collision handling, assuming the caller's task
/// assignment is already conflict-free.
pub fn run_single_agent_mode(
    world: &mut World,
    assignment: &dyn TaskAssignment,
) -> Result<RunLog, PlanningError> {
    install_assignment(world, assignment);

    let agent_order: Vec<AgentId> = {
        let mut ids: Vec<AgentId> = world.agents.keys().copied().collect();
        ids.sort();
        ids
    };
    let mut log = RunLog { agent_order: agent_order.clone(), steps: Vec::new() };
    log.push_positions_only(world);

    loop {
        let active: Vec<AgentId> = agent_order.iter().copied().filter(|&id| !agent_is_finished(world, id)).collect();
        if active.is_empty() {
            break;
        }
        dispatch_targets(world);

        for &agent_id in &active {
            let target = match world.agents[&agent_id].target {
                Some(t) => t,
                None => continue,
            };
            let from = world.agents[&agent_id].pos;
            let path = stowswap_planner::astar::shortest_path(&world.grid, from, target)
                .ok_or(stowswap_planner::PlannerError::Disconnected { from, to: target })?;

            for &pos in path.iter().skip(1) {
                world.agents.get_mut(&agent_id).unwrap().move_to(pos);
                let mut record = StepRecord::default();
                record.positions = world.agents.iter().map(|(&id, a)| (id, a.pos)).collect();
                log.steps.push(record);
            }

            let mut finish_record = StepRecord::default();
            complete_action(world, agent_id, &mut finish_record)?;
            if let Some(last) = log.steps.last_mut() {
                for (k, v) in finish_record.pick_ups {
                    last.pick_ups.entry(k).or_default().extend(v);
                }
                for (k, v) in finish_record.drop_offs {
                    last.drop_offs.entry(k).or_default().extend(v);
                }
            } else {
                log.steps.push(finish_record);
            }
        }
    }

    Ok(log)
}
