//! Agent (robot) entity.
//!
//! Grounded in `sh_core/agent.py`'s `Agent` class: a position, a home goal,
//! a capacity, the items currently held, and the per-agent task/action
//! queues the task-assignment layer fills in.

use std::collections::VecDeque;
use stowswap_core::{AgentId, Direction, ItemId, Position, TaskId};

/// What an agent is currently meant to be doing, mirrors `Objective`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Start,
    PickUp,
    DropOff,
    Dock,
}

/// A single queued action: what to do, and (for PickUp/DropOff) which task
/// it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedAction {
    pub kind: Action,
    pub task: Option<TaskId>,
}

/// A robot in the warehouse.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub pos: Position,
    pub initial_pos: Position,
    /// Home/dock cell, the final target once all tasks are done.
    pub goal: Position,
    pub capacity: u32,
    pub load_volume: u32,
    pub having_items: Vec<ItemId>,
    pub direction: Direction,

    /// Per-agent queue built by the task-assignment layer.
    pub tasks: VecDeque<TaskId>,
    pub actions: VecDeque<QueuedAction>,
    pub current_task: Option<TaskId>,
    pub current_action: Option<QueuedAction>,

    /// Current movement target cell, set by the dispatcher each round.
    pub target: Option<Position>,

    pub task_results: Vec<TaskId>,
}

impl Agent {
    pub fn new(id: AgentId, pos: Position, goal: Position, capacity: u32) -> Self {
        Self {
            id,
            pos,
            initial_pos: pos,
            goal,
            capacity,
            load_volume: 0,
            having_items: Vec::new(),
            direction: Direction::Noop,
            tasks: VecDeque::new(),
            actions: VecDeque::new(),
            current_task: None,
            current_action: None,
            target: None,
            task_results: Vec::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.current_action.is_none() && self.actions.is_empty()
    }

    pub fn remaining_capacity(&self, volume_per_item: u32) -> u32 {
        self.capacity.saturating_sub(self.load_volume) / volume_per_item.max(1)
    }

    /// Mirrors `Agent.pick_up`: add an item to the held set and bump load.
    pub fn pick_up(&mut self, item: ItemId, volume: u32) {
        self.having_items.push(item);
        self.load_volume += volume;
    }

    /// Mirrors `Agent.drop_off`: remove a held item and reduce load.
    pub fn drop_off(&mut self, item: ItemId, volume: u32) {
        if let Some(idx) = self.having_items.iter().position(|&i| i == item) {
            self.having_items.remove(idx);
            self.load_volume = self.load_volume.saturating_sub(volume);
        }
    }

    /// Move to an adjacent or equal cell, updating facing direction.
    pub fn move_to(&mut self, pos: Position) {
        self.direction = Direction::between(self.pos, pos);
        self.pos = pos;
    }

    pub fn at_target(&self) -> bool {
        self.target == Some(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_tracks_load() {
        let mut agent = Agent::new(AgentId(0), Position::new(0, 0), Position::new(0, 0), 10);
        agent.pick_up(ItemId(1), 4);
        assert_eq!(agent.load_volume, 4);
        agent.drop_off(ItemId(1), 4);
        assert_eq!(agent.load_volume, 0);
        assert!(agent.having_items.is_empty());
    }

    #[test]
    fn idle_when_no_actions_queued() {
        let agent = Agent::new(AgentId(0), Position::new(0, 0), Position::new(0, 0), 10);
        assert!(agent.is_idle());
    }
}
