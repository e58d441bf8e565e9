//! Task-assignment trait and the shared context it reads from.
//!
//! Mirrors `task_assignment.py`'s `TaskAssignment` base class: given the
//! current items/store points/tasks, produce a per-agent queue of tasks and
//! the PICK_UP/DROP_OFF/DOCK actions needed to execute them.

use std::collections::{HashMap, VecDeque};
use stowswap_core::{AgentId, ItemId, StorePointId, TaskId};
use stowswap_entities::{Agent, Item, QueuedAction, Task};
use stowswap_storage::StorePoint;

/// Read-only view over world state a task-assignment policy needs.
pub struct AssignmentContext<'a> {
    pub agents: &'a HashMap<AgentId, Agent>,
    pub items: &'a HashMap<ItemId, Item>,
    pub store_points: &'a HashMap<StorePointId, StorePoint>,
    pub tasks: &'a HashMap<TaskId, Task>,
}

/// The queues a policy produces for one agent.
#[derive(Debug, Clone, Default)]
pub struct AgentPlan {
    pub tasks: VecDeque<TaskId>,
    pub actions: VecDeque<QueuedAction>,
}

/// Decomposes the pending task list into per-agent action queues.
pub trait TaskAssignment {
    fn assign(&self, ctx: &AssignmentContext) -> HashMap<AgentId, AgentPlan>;

    fn name(&self) -> &'static str;
}
