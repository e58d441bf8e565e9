//! Greedy nearest-task assignment.
//!
//! Grounded in `task_assignment.py`'s `get_nearest_task` (via `Item`'s
//! distance to its own pickup position, `sh_core/item.py`): round-robin
//! over agents in a fixed order, and on each agent's turn give it its
//! nearest remaining task by pickup distance from wherever it would be
//! standing at that point in its queue. A task is only picked up if it
//! fits in whatever capacity the agent has left; otherwise the agent
//! drops off everything it's currently holding first, freeing capacity,
//! and only then picks up the new task. Every agent's queue ends with a
//! DOCK action back to its home goal.

use crate::traits::{AgentPlan, AssignmentContext, TaskAssignment};
use std::collections::HashMap;
use stowswap_core::{AgentId, Position, TaskId};
use stowswap_entities::{Action, QueuedAction};

#[derive(Debug, Clone, Default)]
pub struct NearestTaskAssignment;

impl NearestTaskAssignment {
    pub fn new() -> Self {
        Self
    }
}

impl TaskAssignment for NearestTaskAssignment {
    fn assign(&self, ctx: &AssignmentContext) -> HashMap<AgentId, AgentPlan> {
        let mut plans: HashMap<AgentId, AgentPlan> =
            ctx.agents.keys().map(|&id| (id, AgentPlan::default())).collect();
        // Simulated cursor position and outstanding load per agent, updated
        // as tasks are appended so later assignments see the effect of
        // earlier ones without mutating the real agents.
        let mut cursor: HashMap<AgentId, Position> =
            ctx.agents.iter().map(|(&id, a)| (id, a.pos)).collect();
        let mut load: HashMap<AgentId, u32> =
            ctx.agents.iter().map(|(&id, a)| (id, a.load_volume)).collect();
        let mut held: HashMap<AgentId, Vec<TaskId>> =
            ctx.agents.keys().map(|&id| (id, Vec::new())).collect();

        let mut agent_order: Vec<AgentId> = ctx.agents.keys().copied().collect();
        agent_order.sort_by_key(|id| id.as_u32());

        let mut remaining: Vec<TaskId> = ctx.tasks.keys().copied().collect();

        while !remaining.is_empty() {
            let mut progressed = false;
            for &agent_id in &agent_order {
                if remaining.is_empty() {
                    break;
                }
                let here = cursor[&agent_id];
                let (idx, task_id) = remaining
                    .iter()
                    .enumerate()
                    .map(|(i, &t)| (i, t))
                    .min_by_key(|&(_, t)| {
                        let item = &ctx.items[&ctx.tasks[&t].item];
                        (here.dist(&item.pos), t.as_u32())
                    })
                    .expect("remaining is non-empty");

                let task = ctx.tasks[&task_id];
                let item = &ctx.items[&task.item];
                let capacity = ctx.agents[&agent_id].capacity;

                if item.volume > capacity {
                    // Can never fit on this agent even empty; leave it for
                    // another agent's turn instead of looping forever.
                    continue;
                }

                if load[&agent_id] + item.volume > capacity {
                    // Unload everything currently held to free up capacity,
                    // then fall through to pick up the already-chosen task
                    // in this same turn.
                    let held_tasks = held.get_mut(&agent_id).unwrap();
                    let plan = plans.get_mut(&agent_id).unwrap();
                    let mut last_target = here;
                    for held_task in held_tasks.drain(..) {
                        last_target = ctx.store_points[&ctx.tasks[&held_task].target_store_point].pos;
                        plan.actions.push_back(QueuedAction { kind: Action::DropOff, task: Some(held_task) });
                    }
                    cursor.insert(agent_id, last_target);
                    load.insert(agent_id, 0);
                }

                let plan = plans.get_mut(&agent_id).unwrap();
                plan.tasks.push_back(task_id);
                plan.actions.push_back(QueuedAction { kind: Action::PickUp, task: Some(task_id) });
                *load.get_mut(&agent_id).unwrap() += item.volume;
                held.get_mut(&agent_id).unwrap().push(task_id);
                cursor.insert(agent_id, item.pos);
                remaining.remove(idx);
                progressed = true;
            }
            if !progressed {
                break;
            }
        }

        for (agent_id, held_tasks) in held {
            if held_tasks.is_empty() {
                continue;
            }
            let plan = plans.get_mut(&agent_id).unwrap();
            for held_task in held_tasks {
                plan.actions.push_back(QueuedAction { kind: Action::DropOff, task: Some(held_task) });
            }
        }

        for plan in plans.values_mut() {
            plan.actions.push_back(QueuedAction { kind: Action::Dock, task: None });
        }

        plans
    }

    fn name(&self) -> &'static str {
        "nearest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stowswap_core::{ItemId, StorePointId, TaskId};
    use stowswap_entities::{Agent, Item, Owner, Task};
    use stowswap_storage::StorePoint;

    #[test]
    fn assigns_task_to_nearest_agent_and_ends_with_dock() {
        let mut agents = HashMap::new();
        agents.insert(AgentId(0), Agent::new(AgentId(0), Position::new(0, 0), Position::new(0, 0), 10));
        agents.insert(AgentId(1), Agent::new(AgentId(1), Position::new(5, 5), Position::new(5, 5), 10));

        let mut items = HashMap::new();
        items.insert(
            ItemId(0),
            Item::new(ItemId(0), "widget".into(), 1, Position::new(1, 1), Owner::StorePoint(StorePointId(0))),
        );

        let mut store_points = HashMap::new();
        store_points.insert(StorePointId(0), StorePoint::new(StorePointId(0), Position::new(1, 1)));

        let mut tasks = HashMap::new();
        tasks.insert(TaskId(0), Task::new(TaskId(0), ItemId(0), StorePointId(0)));

        let ctx = AssignmentContext { agents: &agents, items: &items, store_points: &store_points, tasks: &tasks };
        let plans = NearestTaskAssignment::new().assign(&ctx);

        let plan0 = &plans[&AgentId(0)];
        assert_eq!(plan0.tasks.len(), 1);
        assert_eq!(plan0.actions.back().unwrap().kind, Action::Dock);
        assert!(plans[&AgentId(1)].tasks.is_empty());
    }

    #[test]
    fn an_agent_with_spare_capacity_batches_picks_before_dropping_off() {
        let mut agents = HashMap::new();
        agents.insert(AgentId(0), Agent::new(AgentId(0), Position::new(0, 0), Position::new(0, 0), 2));

        let mut items = HashMap::new();
        items.insert(
            ItemId(0),
            Item::new(ItemId(0), "a".into(), 1, Position::new(1, 0), Owner::StorePoint(StorePointId(0))),
        );
        items.insert(
            ItemId(1),
            Item::new(ItemId(1), "b".into(), 1, Position::new(2, 0), Owner::StorePoint(StorePointId(1))),
        );

        let mut store_points = HashMap::new();
        store_points.insert(StorePointId(0), StorePoint::new(StorePointId(0), Position::new(1, 0)));
        store_points.insert(StorePointId(1), StorePoint::new(StorePointId(1), Position::new(2, 0)));

        let mut tasks = HashMap::new();
        tasks.insert(TaskId(0), Task::new(TaskId(0), ItemId(0), StorePointId(0)));
        tasks.insert(TaskId(1), Task::new(TaskId(1), ItemId(1), StorePointId(1)));

        let ctx = AssignmentContext { agents: &agents, items: &items, store_points: &store_points, tasks: &tasks };
        let plan = &NearestTaskAssignment::new().assign(&ctx)[&AgentId(0)];

        let kinds: Vec<_> = plan.actions.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![Action::PickUp, Action::PickUp, Action::DropOff, Action::DropOff, Action::Dock]);
    }
}
