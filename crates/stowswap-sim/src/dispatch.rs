//! Target Dispatcher: pop each idle agent's next queued action into a cell
//! target and a recorded current task/action.
//!
//! Grounded in the original's per-round loop in `a_star/push_and_swap.py`'s
//! `run()` (the part that calls `set_target` before planning) and
//! `task_assignment.py`'s `set_target`.

use crate::world::World;
use stowswap_core::AgentId;
use stowswap_entities::{Action, Owner};

/// For every agent with no active target and a nonempty action queue, pop
/// the head action and compute its cell target.
pub fn dispatch_targets(world: &mut World) {
    let agent_ids: Vec<AgentId> = world.agents.keys().copied().collect();
    for agent_id in agent_ids {
        let has_target = world.agents[&agent_id].target.is_some();
        let queue_empty = world.agents[&agent_id].actions.is_empty();
        if has_target || queue_empty {
            continue;
        }
        let queued = world.agents.get_mut(&agent_id).unwrap().actions.pop_front().unwrap();
        let target = match queued.kind {
            Action::PickUp => {
                let task = world.tasks[&queued.task.expect("PICK_UP action must carry a task")];
                let item = &world.items[&task.item];
                let sp = match item.owner {
                    Owner::StorePoint(id) => id,
                    Owner::Agent(_) => panic!("PICK_UP dispatched for an item not in a store point"),
                };
                let end_point = world.store_points[&sp].end_point.expect("store point has no end point");
                world.end_points[&end_point].pos
            }
            Action::DropOff => {
                let task = world.tasks[&queued.task.expect("DROP_OFF action must carry a task")];
                let end_point = world.store_points[&task.target_store_point]
                    .end_point
                    .expect("store point has no end point");
                world.end_points[&end_point].pos
            }
            Action::Dock => world.agents[&agent_id].goal,
            Action::Start => world.agents[&agent_id].pos,
        };

        let agent = world.agents.get_mut(&agent_id).unwrap();
        agent.target = Some(target);
        agent.current_action = Some(queued);
        agent.current_task = if queued.kind == Action::Dock { None } else { queued.task };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowswap_config::{AgentSpec, ItemSpec, MapSpec, PickingTaskSpec};
    use stowswap_core::{PickDirection, Position};

    fn sample_world() -> World {
        let map_spec = MapSpec { width: 3, height: 3, racks: vec![], items: vec![] };
        let items = vec![ItemSpec { name: "widget".into(), pos: Position::new(0, 0), volume: 1, amount: 1 }];
        let agents = vec![AgentSpec { name: "a0".into(), pos: Position::new(2, 0), capacity: 5 }];
        let picking = vec![PickingTaskSpec { item_name: "widget".into(), target: Position::new(0, 2), amount: 1 }];
        let _ = PickDirection::On;
        World::build(map_spec, items, agents, picking).unwrap()
    }

    #[test]
    fn idle_agent_gets_dispatched_a_pick_up_target() {
        let mut world = sample_world();
        let agent_id = *world.agent_by_name.get("a0").unwrap();
        use stowswap_entities::QueuedAction;
        world.agents.get_mut(&agent_id).unwrap().actions.push_back(QueuedAction {
            kind: Action::PickUp,
            task: Some(*world.tasks.keys().next().unwrap()),
        });
        dispatch_targets(&mut world);
        assert!(world.agents[&agent_id].target.is_some());
    }
}
