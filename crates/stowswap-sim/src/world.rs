//! The grid world: racks, store points, end points, items, agents, tasks.
//!
//! Grounded in `sh_core/world.py`'s `World` class — `reset()`'s pipeline
//! (racks → plain map → items → agents → store points → end points →
//! tasks) becomes [`World::build`]; `picking`/`dropping` are ported
//! directly, with `self.tasks[item]` replaced by the agent's own
//! `current_task` (our task table allows several tasks per item name,
//! disambiguated by whichever task the agent was dispatched against).

use crate::error::InvariantViolation;
use std::collections::{HashMap, HashSet};
use stowswap_config::{AgentSpec, ItemSpec, MapSpec, PickingTaskSpec, RackSpec};
use stowswap_core::{AgentId, EndPointId, IdGenerator, ItemId, PickDirection, Position, RackId, StorePointId, TaskId};
use stowswap_entities::{Agent, Item, Owner, Task};
use stowswap_map::Grid;
use stowswap_storage::{EndPoint, Rack, StorePoint};

pub struct World {
    pub width: i32,
    pub height: i32,
    pub grid: Grid,

    pub racks: HashMap<RackId, Rack>,
    pub store_points: HashMap<StorePointId, StorePoint>,
    pub end_points: HashMap<EndPointId, EndPoint>,
    pub items: HashMap<ItemId, Item>,
    pub agents: HashMap<AgentId, Agent>,
    pub tasks: HashMap<TaskId, Task>,

    pub item_by_name: HashMap<String, ItemId>,
    pub agent_by_name: HashMap<String, AgentId>,

    /// Tasks not yet claimed by `task_for_item`, in creation order — the
    /// pool the external-assignment resolver draws from.
    unassigned_tasks: Vec<TaskId>,

    // Original specs, kept so `rebuild()` can re-derive everything without
    // re-reading any file (mirrors `World.reset()` being callable more than
    // once from the same `__init__` arguments).
    map_spec: MapSpec,
    item_specs: Vec<ItemSpec>,
    agent_specs: Vec<AgentSpec>,
    picking_list: Vec<PickingTaskSpec>,
}

impl World {
    pub fn build(
        map_spec: MapSpec,
        item_specs: Vec<ItemSpec>,
        agent_specs: Vec<AgentSpec>,
        picking_list: Vec<PickingTaskSpec>,
    ) -> Result<Self, InvariantViolation> {
        let mut world = Self {
            width: map_spec.width,
            height: map_spec.height,
            grid: Grid::new(map_spec.width, map_spec.height, HashSet::new()),
            racks: HashMap::new(),
            store_points: HashMap::new(),
            end_points: HashMap::new(),
            items: HashMap::new(),
            agents: HashMap::new(),
            tasks: HashMap::new(),
            item_by_name: HashMap::new(),
            agent_by_name: HashMap::new(),
            unassigned_tasks: Vec::new(),
            map_spec,
            item_specs,
            agent_specs,
            picking_list,
        };
        world.rebuild()?;
        Ok(world)
    }

    /// Full re-derivation from the stored specs. Grounded in `World.reset`,
    /// kept for test harnesses that want to replay a scenario without
    /// re-parsing its source files.
    pub fn rebuild(&mut self) -> Result<(), InvariantViolation> {
        self.racks.clear();
        self.store_points.clear();
        self.end_points.clear();
        self.items.clear();
        self.agents.clear();
        self.tasks.clear();
        self.item_by_name.clear();
        self.agent_by_name.clear();
        self.unassigned_tasks.clear();

        let mut rack_ids = IdGenerator::<RackId>::new();
        let mut sp_ids = IdGenerator::<StorePointId>::new();
        let mut ep_ids = IdGenerator::<EndPointId>::new();
        let mut item_ids = IdGenerator::<ItemId>::new();
        let mut agent_ids = IdGenerator::<AgentId>::new();
        let mut task_ids = IdGenerator::<TaskId>::new();

        let racks: Vec<RackSpec> = self.map_spec.racks.clone();
        let mut blocked = HashSet::new();
        for spec in &racks {
            let id = rack_ids.next();
            let rack = Rack::new(id, spec.pos, spec.width, spec.height, spec.pick_direction);
            blocked.extend(rack.cells());
            self.racks.insert(id, rack);
        }
        self.grid = Grid::new(self.width, self.height, blocked);

        let mut item_specs = self.map_spec.items.clone();
        item_specs.extend(self.item_specs.clone());
        for spec in &item_specs {
            let sp_id = self.find_or_create_store_point(spec.pos, &mut sp_ids);
            let item_id = item_ids.next();
            let item = Item::new(item_id, spec.name.clone(), spec.volume, spec.pos, Owner::StorePoint(sp_id));
            self.item_by_name.insert(spec.name.clone(), item_id);
            self.items.insert(item_id, item);
            self.store_points.get_mut(&sp_id).unwrap().stored(item_id, spec.amount);
        }

        for spec in &self.agent_specs {
            let id = agent_ids.next();
            let agent = Agent::new(id, spec.pos, spec.pos, spec.capacity);
            self.agent_by_name.insert(spec.name.clone(), id);
            self.agents.insert(id, agent);
        }

        // Targets named only by the picking list (a shipping dock with no
        // item of its own) need a store point too, and it must exist before
        // `assign_end_points` runs so it gets an end point like any other.
        let target_sps: Vec<StorePointId> =
            self.picking_list.iter().map(|spec| self.find_or_create_store_point(spec.target, &mut sp_ids)).collect();

        self.assign_end_points(&mut ep_ids)?;
        self.check_connectivity()?;

        for (spec, &target_sp) in self.picking_list.clone().iter().zip(target_sps.iter()) {
            let item_id = *self
                .item_by_name
                .get(&spec.item_name)
                .ok_or_else(|| InvariantViolation::PlanCheck(format!("unknown item in picking list: {}", spec.item_name)))?;
            for _ in 0..spec.amount {
                let task_id = task_ids.next();
                self.tasks.insert(task_id, Task::new(task_id, item_id, target_sp));
                self.unassigned_tasks.push(task_id);
            }
        }

        Ok(())
    }

    fn find_rack_at(&self, pos: Position) -> Option<RackId> {
        self.racks
            .values()
            .find(|r| {
                pos.row >= r.pos.row
                    && pos.row < r.pos.row + r.height
                    && pos.col >= r.pos.col
                    && pos.col < r.pos.col + r.width
            })
            .map(|r| r.id)
    }

    fn find_or_create_store_point(&mut self, pos: Position, sp_ids: &mut IdGenerator<StorePointId>) -> StorePointId {
        if let Some((&id, _)) = self.store_points.iter().find(|(_, sp)| sp.pos == pos) {
            return id;
        }
        let pick_direction = match self.find_rack_at(pos) {
            Some(rack_id) => PickDirection::from(self.racks[&rack_id].pick_direction),
            None => PickDirection::On,
        };
        let id = sp_ids.next();
        let mut sp = StorePoint::new(id, pos);
        sp.pick_direction = Some(pick_direction.into());
        self.store_points.insert(id, sp);
        id
    }

    /// Mirrors `EndPoints.reset`: each store point picks the negative-side
    /// neighbor of its pick direction if free, else the positive side (or
    /// the store point's own cell for `on`); store points whose chosen cell
    /// coincides share one end point. Final ids are assigned in row-major
    /// position order.
    ///
    /// Errors if neither side of a store point is standable — a rack
    /// boxed in on both aisles has no end point a robot could ever occupy.
    fn assign_end_points(&mut self, ep_ids: &mut IdGenerator<EndPointId>) -> Result<(), InvariantViolation> {
        let mut pos_to_ep: HashMap<Position, EndPointId> = HashMap::new();
        let mut sp_ids: Vec<StorePointId> = self.store_points.keys().copied().collect();
        sp_ids.sort();
        for sp_id in sp_ids {
            let (pos, pick_direction) = {
                let sp = &self.store_points[&sp_id];
                (sp.pos, sp.pick_direction)
            };
            let offsets: [(i32, i32); 2] = match PickDirection::from(pick_direction.unwrap_or(stowswap_storage::PickDirectionArchived::On)) {
                PickDirection::Horizontal => [(0, -1), (0, 1)],
                PickDirection::Vertical => [(-1, 0), (1, 0)],
                PickDirection::On => [(0, 0), (0, 0)],
            };
            let candidate = |off: (i32, i32)| Position::new(pos.row + off.0, pos.col + off.1);
            let can_put = |p: Position| self.find_rack_at(p).is_none() && self.in_bounds(p);
            let chosen = if can_put(candidate(offsets[0])) {
                candidate(offsets[0])
            } else if can_put(candidate(offsets[1])) {
                candidate(offsets[1])
            } else {
                return Err(InvariantViolation::PlanCheck(format!(
                    "store point at {pos:?} has no standable end point on either side"
                )));
            };

            let ep_id = *pos_to_ep.entry(chosen).or_insert_with(|| ep_ids.next());
            self.end_points.entry(ep_id).or_insert_with(|| EndPoint::new(ep_id, chosen, sp_id));
            self.store_points.get_mut(&sp_id).unwrap().end_point = Some(ep_id);
        }

        // Renumber in row-major position order, matching `sort_by_pos`.
        let mut ordered: Vec<EndPointId> = self.end_points.keys().copied().collect();
        ordered.sort_by_key(|id| {
            let p = self.end_points[id].pos;
            p.row as i64 * self.width as i64 + p.col as i64
        });
        let remap: HashMap<EndPointId, EndPointId> =
            ordered.iter().enumerate().map(|(i, &old)| (old, EndPointId::new(i as u32))).collect();
        let mut renumbered = HashMap::new();
        for (old_id, mut ep) in self.end_points.drain() {
            let new_id = remap[&old_id];
            ep.id = new_id;
            renumbered.insert(new_id, ep);
        }
        self.end_points = renumbered;
        for sp in self.store_points.values_mut() {
            if let Some(old) = sp.end_point {
                sp.end_point = Some(remap[&old]);
            }
        }
        Ok(())
    }

    /// A robot can only ever reach cells in its own connected component of
    /// the open grid. Checks every agent and every end point against the
    /// component of an arbitrary reference agent, catching a walled-off
    /// item or dock at build time instead of failing deep inside planning.
    fn check_connectivity(&self) -> Result<(), InvariantViolation> {
        let Some(reference) = self.agents.values().next() else {
            return Ok(());
        };
        let reachable = self.grid.bfs_distances(reference.pos);

        for agent in self.agents.values() {
            if !reachable.contains_key(&agent.pos) {
                return Err(InvariantViolation::PlanCheck(format!(
                    "agent at {:?} is unreachable from agent at {:?}",
                    agent.pos, reference.pos
                )));
            }
        }
        for ep in self.end_points.values() {
            if !reachable.contains_key(&ep.pos) {
                return Err(InvariantViolation::PlanCheck(format!(
                    "end point at {:?} is unreachable from agent at {:?}",
                    ep.pos, reference.pos
                )));
            }
        }
        Ok(())
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.height && pos.col >= 0 && pos.col < self.width
    }

    /// Mirrors `World.picking`: requires the agent to stand at the item's
    /// store point's end point, then transfers ownership.
    pub fn picking(&mut self, agent: AgentId, item: ItemId) -> Result<(), InvariantViolation> {
        let sp_id = match self.items[&item].owner {
            Owner::StorePoint(id) => id,
            Owner::Agent(_) => return Err(InvariantViolation::ItemNotInStore(item.as_u32())),
        };
        let end_point = self.store_points[&sp_id].end_point.ok_or(InvariantViolation::MissingEndPoint(sp_id.as_u32()))?;
        let expected = self.end_points[&end_point].pos;
        let actual = self.agents[&agent].pos;
        if expected != actual {
            return Err(InvariantViolation::WrongPosition {
                agent: agent.as_u32(),
                end_point: end_point.as_u32(),
                expected,
                actual,
            });
        }
        let taken = self.store_points.get_mut(&sp_id).unwrap().taken_out(item, 1);
        if taken == 0 {
            return Err(InvariantViolation::ItemNotHeld(item.as_u32()));
        }
        let volume = self.items[&item].volume;
        self.agents.get_mut(&agent).unwrap().pick_up(item, volume);
        self.items.get_mut(&item).unwrap().owner = Owner::Agent(agent);
        Ok(())
    }

    /// Mirrors `World.dropping`: the task the agent is currently executing
    /// names the destination store point.
    pub fn dropping(&mut self, agent: AgentId, item: ItemId) -> Result<(), InvariantViolation> {
        let task_id = self.agents[&agent].current_task.ok_or(InvariantViolation::NoCurrentTask(agent.as_u32()))?;
        let sp_id = self.tasks[&task_id].target_store_point;
        let end_point = self.store_points[&sp_id].end_point.ok_or(InvariantViolation::MissingEndPoint(sp_id.as_u32()))?;
        let expected = self.end_points[&end_point].pos;
        let actual = self.agents[&agent].pos;
        if expected != actual {
            return Err(InvariantViolation::WrongPosition {
                agent: agent.as_u32(),
                end_point: end_point.as_u32(),
                expected,
                actual,
            });
        }
        let volume = self.items[&item].volume;
        self.agents.get_mut(&agent).unwrap().drop_off(item, volume);
        self.store_points.get_mut(&sp_id).unwrap().stored(item, 1);
        self.items.get_mut(&item).unwrap().owner = Owner::StorePoint(sp_id);
        Ok(())
    }

    /// Claim the oldest unresolved task for `item`, used by
    /// `ExternalTaskAssignment` to turn raw `(agent, item, action)` rows
    /// into `(agent, task, action)` ones.
    pub fn task_for_item(&mut self, item: ItemId) -> Option<TaskId> {
        let idx = self.unassigned_tasks.iter().position(|&t| self.tasks[&t].item == item)?;
        Some(self.unassigned_tasks.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowswap_core::PickDirection as PD;

    fn spec_world() -> World {
        let map_spec = MapSpec {
            width: 3,
            height: 3,
            racks: vec![RackSpec { pos: Position::new(0, 0), width: 1, height: 1, pick_direction: PD::Horizontal }],
            items: vec![ItemSpec { name: "widget".into(), pos: Position::new(0, 0), volume: 1, amount: 1 }],
        };
        let agents = vec![AgentSpec { name: "a0".into(), pos: Position::new(2, 0), capacity: 5 }];
        let picking = vec![PickingTaskSpec { item_name: "widget".into(), target: Position::new(0, 2), amount: 1 }];
        World::build(map_spec, vec![], agents, picking).unwrap()
    }

    #[test]
    fn end_point_chosen_on_free_side() {
        let world = spec_world();
        let item_sp = match world.items[&ItemId(0)].owner {
            Owner::StorePoint(id) => id,
            _ => panic!("item should start in a store point"),
        };
        let ep = world.store_points[&item_sp].end_point.unwrap();
        // rack at (0,0) is horizontal, left neighbor (0,-1) is out of bounds,
        // so the right neighbor (0,1) must have been picked.
        assert_eq!(world.end_points[&ep].pos, Position::new(0, 1));
    }

    #[test]
    fn picking_requires_agent_at_end_point() {
        let mut world = spec_world();
        let err = world.picking(AgentId(0), ItemId(0));
        assert!(err.is_err());
    }

    #[test]
    fn picking_succeeds_once_agent_reaches_end_point() {
        let mut world = spec_world();
        world.agents.get_mut(&AgentId(0)).unwrap().pos = Position::new(0, 1);
        world.picking(AgentId(0), ItemId(0)).unwrap();
        assert_eq!(world.agents[&AgentId(0)].load_volume, 1);
        assert_eq!(world.items[&ItemId(0)].owner, Owner::Agent(AgentId(0)));
    }

    #[test]
    fn picking_list_target_gets_its_own_end_point() {
        // The ship target at (0,2) names no item of its own, but it still
        // needs an end point assigned before any agent can dock there.
        let world = spec_world();
        let target_sp = world.store_points.values().find(|sp| sp.pos == Position::new(0, 2)).unwrap();
        assert!(target_sp.end_point.is_some());
    }

    #[test]
    fn a_store_point_boxed_in_on_both_sides_is_rejected() {
        // Rack at (0,1) is horizontal; its only two aisle cells, (0,0) and
        // (0,2), are walled off by racks of their own.
        let map_spec = MapSpec {
            width: 3,
            height: 1,
            racks: vec![
                RackSpec { pos: Position::new(0, 0), width: 1, height: 1, pick_direction: PD::On },
                RackSpec { pos: Position::new(0, 1), width: 1, height: 1, pick_direction: PD::Horizontal },
                RackSpec { pos: Position::new(0, 2), width: 1, height: 1, pick_direction: PD::On },
            ],
            items: vec![ItemSpec { name: "trapped".into(), pos: Position::new(0, 1), volume: 1, amount: 1 }],
        };
        let result = World::build(map_spec, vec![], vec![], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn an_end_point_unreachable_from_every_agent_is_rejected() {
        // A 1-wide wall of racks across column 1 splits the grid in two;
        // the only agent sits on the left, the item's end point on the right.
        let map_spec = MapSpec {
            width: 3,
            height: 3,
            racks: vec![
                RackSpec { pos: Position::new(0, 1), width: 1, height: 1, pick_direction: PD::On },
                RackSpec { pos: Position::new(1, 1), width: 1, height: 1, pick_direction: PD::On },
                RackSpec { pos: Position::new(2, 1), width: 1, height: 1, pick_direction: PD::Horizontal },
            ],
            items: vec![ItemSpec { name: "far_side".into(), pos: Position::new(2, 2), volume: 1, amount: 1 }],
        };
        let agents = vec![AgentSpec { name: "a0".into(), pos: Position::new(0, 0), capacity: 5 }];
        let result = World::build(map_spec, vec![], agents, vec![]);
        assert!(result.is_err());
    }
}
