//! Append-only joint plan and the NIL-default occupancy table.
//!
//! Grounded in `push_and_swap.py`'s `Plan` class and the `occupied_now`
//! `defaultdict`. Snapshotting per the world-model design notes is cheap
//! here: a `Plan` snapshot is just its current length (truncate to
//! restore), and an `Occupancy` snapshot is a clone of its map (bounded by
//! the number of touched cells, not the whole world).

use std::collections::HashMap;
use stowswap_core::Position;

/// Every agent's position at one timestep, indexed by agent index.
pub type Configuration = Vec<Position>;

pub const NIL: i64 = -1;

/// An append-only sequence of configurations.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    solution: Vec<Configuration>,
}

impl Plan {
    pub fn new() -> Self {
        Self { solution: Vec::new() }
    }

    pub fn from_single(config: Configuration) -> Self {
        Self { solution: vec![config] }
    }

    pub fn is_empty(&self) -> bool {
        self.solution.is_empty()
    }

    pub fn makespan(&self) -> usize {
        self.solution.len().saturating_sub(1)
    }

    pub fn last_config(&self) -> &Configuration {
        &self.solution[self.makespan()]
    }

    pub fn last_pos(&self, agent: usize) -> Position {
        self.solution[self.makespan()][agent]
    }

    pub fn push(&mut self, config: Configuration) {
        self.solution.push(config);
    }

    pub fn configs(&self) -> &[Configuration] {
        &self.solution
    }

    pub fn config_at(&self, t: usize) -> &Configuration {
        &self.solution[t]
    }

    /// Snapshot point for rollback: just the current length.
    pub fn snapshot(&self) -> usize {
        self.solution.len()
    }

    pub fn restore(&mut self, snapshot: usize) {
        self.solution.truncate(snapshot);
    }

    /// Append every frame of `other` after this plan's frames (mirrors
    /// `Plan.__add__`; `other`'s own first frame, a duplicate of this
    /// plan's last frame at the point the branch was taken, is kept
    /// intentionally).
    pub fn extend(&mut self, other: &Plan) {
        self.solution.extend(other.solution.iter().cloned());
    }
}

/// `Position -> agent index` map defaulting to [`NIL`] for free cells.
#[derive(Debug, Clone, Default)]
pub struct Occupancy(HashMap<Position, i64>);

impl Occupancy {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, pos: Position) -> i64 {
        *self.0.get(&pos).unwrap_or(&NIL)
    }

    pub fn set(&mut self, pos: Position, value: i64) {
        self.0.insert(pos, value);
    }

    pub fn from_config(config: &Configuration) -> Self {
        let mut occ = Self::new();
        for (agent, &pos) in config.iter().enumerate() {
            occ.set(pos, agent as i64);
        }
        occ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_restore_truncates() {
        let mut plan = Plan::from_single(vec![Position::new(0, 0)]);
        let snap = plan.snapshot();
        plan.push(vec![Position::new(0, 1)]);
        plan.push(vec![Position::new(0, 2)]);
        assert_eq!(plan.makespan(), 2);
        plan.restore(snap);
        assert_eq!(plan.makespan(), 0);
    }

    #[test]
    fn occupancy_defaults_to_nil() {
        let occ = Occupancy::new();
        assert_eq!(occ.get(Position::new(0, 0)), NIL);
    }
}
