//! Manual and external task assignment.
//!
//! `ManuallyTaskAssignment` in the original takes a pre-built list of
//! `(agent, task, action)` triples and appends them verbatim, followed by a
//! trailing DOCK per agent. The External variant (named in the planner's
//! polymorphism list) is the same shape but sourced from a row-oriented
//! exchange format (e.g. the manual-assignment CSV in the exchange
//! format); its rows need resolving from item to task before they can be
//! appended, which is done by the caller via `World::task_for_item` and
//! then fed through the same constructor.

use crate::traits::{AgentPlan, AssignmentContext, TaskAssignment};
use std::collections::HashMap;
use stowswap_core::{AgentId, ItemId, TaskId};
use stowswap_entities::{Action, QueuedAction};

/// One pre-resolved assignment row: agent, task, and what to do with it.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentRow {
    pub agent: AgentId,
    pub task: TaskId,
    pub action: Action,
}

#[derive(Debug, Clone, Default)]
pub struct ManualTaskAssignment {
    rows: Vec<AssignmentRow>,
}

impl ManualTaskAssignment {
    pub fn new(rows: Vec<AssignmentRow>) -> Self {
        Self { rows }
    }
}

impl TaskAssignment for ManualTaskAssignment {
    fn assign(&self, ctx: &AssignmentContext) -> HashMap<AgentId, AgentPlan> {
        let mut plans: HashMap<AgentId, AgentPlan> =
            ctx.agents.keys().map(|&id| (id, AgentPlan::default())).collect();

        for row in &self.rows {
            let plan = plans.entry(row.agent).or_default();
            if row.action == Action::PickUp && !plan.tasks.contains(&row.task) {
                plan.tasks.push_back(row.task);
            }
            plan.actions.push_back(QueuedAction { kind: row.action, task: Some(row.task) });
        }

        for plan in plans.values_mut() {
            plan.actions.push_back(QueuedAction { kind: Action::Dock, task: None });
        }

        plans
    }

    fn name(&self) -> &'static str {
        "manual"
    }
}

/// A row from an unresolved exchange format: `(agent, item, objective)`,
/// mirroring `read_task_assignment`'s CSV columns.
#[derive(Debug, Clone, Copy)]
pub struct ExternalRow {
    pub agent: AgentId,
    pub item: ItemId,
    pub action: Action,
}

/// Resolve each item to the task already on record for it (looked up by the
/// caller, typically `World::task_for_item`) and build a [`ManualTaskAssignment`].
/// Rows whose item has no matching task are dropped.
pub fn external_task_assignment(
    rows: &[ExternalRow],
    resolve: impl Fn(ItemId) -> Option<TaskId>,
) -> ManualTaskAssignment {
    let rows = rows
        .iter()
        .filter_map(|r| resolve(r.item).map(|task| AssignmentRow { agent: r.agent, task, action: r.action }))
        .collect();
    ManualTaskAssignment::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stowswap_core::{ItemId, Position, StorePointId};
    use stowswap_entities::{Agent, Task};

    #[test]
    fn replays_rows_and_appends_dock() {
        let mut agents = HashMap::new();
        agents.insert(AgentId(0), Agent::new(AgentId(0), Position::new(0, 0), Position::new(0, 0), 10));
        let items = HashMap::new();
        let store_points = HashMap::new();
        let mut tasks = HashMap::new();
        tasks.insert(TaskId(0), Task::new(TaskId(0), ItemId(0), StorePointId(0)));

        let ctx = AssignmentContext { agents: &agents, items: &items, store_points: &store_points, tasks: &tasks };
        let rows = vec![
            AssignmentRow { agent: AgentId(0), task: TaskId(0), action: Action::PickUp },
            AssignmentRow { agent: AgentId(0), task: TaskId(0), action: Action::DropOff },
        ];
        let plans = ManualTaskAssignment::new(rows).assign(&ctx);
        let plan = &plans[&AgentId(0)];
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.actions.len(), 3);
        assert_eq!(plan.actions.back().unwrap().kind, Action::Dock);
    }
}
