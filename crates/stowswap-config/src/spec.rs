//! Loader-agnostic world-building inputs.
//!
//! Every concrete format in [`formats`] converts into these plain structs,
//! so `stowswap-sim`'s `World::build` never has to know whether a value
//! came from JSON or CSV.

use stowswap_core::{PickDirection, Position};

#[derive(Debug, Clone)]
pub struct RackSpec {
    pub pos: Position,
    pub width: i32,
    pub height: i32,
    pub pick_direction: PickDirection,
}

#[derive(Debug, Clone)]
pub struct ItemSpec {
    pub name: String,
    pub pos: Position,
    pub volume: u32,
    pub amount: u32,
}

#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub name: String,
    pub pos: Position,
    pub capacity: u32,
}

#[derive(Debug, Clone)]
pub struct PickingTaskSpec {
    pub item_name: String,
    pub target: Position,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualAction {
    PickUp,
    DropOff,
    Dock,
}

#[derive(Debug, Clone)]
pub struct ManualAssignmentSpec {
    pub agent_name: String,
    pub item_name: String,
    pub target: Position,
    pub action: ManualAction,
}

#[derive(Debug, Clone)]
pub struct MapSpec {
    pub width: i32,
    pub height: i32,
    pub racks: Vec<RackSpec>,
    /// Items embedded directly in a JSON map config (optional: CSV item
    /// configs are supplied separately instead).
    pub items: Vec<ItemSpec>,
}
