//! Item and task entities.
//!
//! Grounded in `sh_core/item.py`'s `Item`/`ItemSet` and `sh_core/task.py`'s
//! `Task` named tuple: a task is simply `(item, target_store_point)`.

use stowswap_core::{AgentId, ItemId, Position, StorePointId, TaskId};

/// Where an item currently lives. Replaces the original's cyclic
/// `current_owner: Agent | StorePoint` union with a tagged enum over ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    StorePoint(StorePointId),
    Agent(AgentId),
}

/// An item stocked somewhere in the warehouse.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub volume: u32,
    pub pos: Position,
    pub owner: Owner,
    /// Set once a delivery task targets this item.
    pub ship_target: Option<StorePointId>,
}

impl Item {
    pub fn new(id: ItemId, name: String, volume: u32, pos: Position, owner: Owner) -> Self {
        Self { id, name, volume, pos, owner, ship_target: None }
    }

    pub fn dist_to(&self, pos: Position) -> u32 {
        self.pos.dist(&pos)
    }
}

/// `(item, target_store_point)` — one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub item: ItemId,
    pub target_store_point: StorePointId,
}

impl Task {
    pub fn new(id: TaskId, item: ItemId, target_store_point: StorePointId) -> Self {
        Self { id, item, target_store_point }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_distance() {
        let item = Item::new(
            ItemId(0),
            "widget".into(),
            1,
            Position::new(2, 2),
            Owner::StorePoint(StorePointId(0)),
        );
        assert_eq!(item.dist_to(Position::new(0, 0)), 4);
    }
}
