//! On-disk shapes matching the external interfaces, one struct per format.
//!
//! Grounded in `utils/file_io.py`'s `read_map_config`/`read_agent_config`/
//! `read_item_config`/`read_picking_list`: JSON map config with embedded
//! racks/items, CSV rows for agents/items/picking-lists/manual assignment.

use crate::error::ConfigError;
use crate::spec::{AgentSpec, ItemSpec, ManualAction, ManualAssignmentSpec, MapSpec, PickingTaskSpec, RackSpec};
use serde::Deserialize;
use stowswap_core::{PickDirection, Position};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickDirectionJson {
    Horizontal,
    Vertical,
    On,
}

impl From<PickDirectionJson> for PickDirection {
    fn from(d: PickDirectionJson) -> Self {
        match d {
            PickDirectionJson::Horizontal => PickDirection::Horizontal,
            PickDirectionJson::Vertical => PickDirection::Vertical,
            PickDirectionJson::On => PickDirection::On,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RackConfigJson {
    pub pos: [i32; 2],
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_pick_direction")]
    pub pick_direction: PickDirectionJson,
}

fn default_pick_direction() -> PickDirectionJson {
    PickDirectionJson::Horizontal
}

#[derive(Debug, Deserialize)]
pub struct ItemConfigJson {
    #[serde(default)]
    pub name: String,
    pub pos: [i32; 2],
    #[serde(default = "default_volume")]
    pub volume: u32,
    #[serde(default = "default_amount")]
    pub amount: u32,
}

fn default_volume() -> u32 {
    1
}

fn default_amount() -> u32 {
    1
}

/// `{map_width, map_height, racks:[...], items:[...]}`. `items` is empty
/// when item configuration instead arrives via a separate CSV.
#[derive(Debug, Deserialize)]
pub struct MapConfigJson {
    pub map_width: i32,
    pub map_height: i32,
    pub racks: Vec<RackConfigJson>,
    #[serde(default)]
    pub items: Vec<ItemConfigJson>,
}

impl MapConfigJson {
    pub fn into_spec(self) -> MapSpec {
        MapSpec {
            width: self.map_width,
            height: self.map_height,
            racks: self
                .racks
                .into_iter()
                .map(|r| RackSpec {
                    pos: Position::new(r.pos[0], r.pos[1]),
                    width: r.width,
                    height: r.height,
                    pick_direction: r.pick_direction.into(),
                })
                .collect(),
            items: self
                .items
                .into_iter()
                .map(|i| ItemSpec {
                    name: i.name,
                    pos: Position::new(i.pos[0], i.pos[1]),
                    volume: i.volume,
                    amount: i.amount,
                })
                .collect(),
        }
    }
}

/// `agent_id,amount,initial_place_row,initial_place_col[,name]`.
#[derive(Debug, Deserialize)]
pub struct AgentConfigRow {
    pub agent_id: String,
    pub amount: u32,
    pub initial_place_row: i32,
    pub initial_place_col: i32,
    #[serde(default)]
    pub name: Option<String>,
}

impl AgentConfigRow {
    pub fn into_spec(self) -> AgentSpec {
        AgentSpec {
            name: self.name.unwrap_or(self.agent_id),
            pos: Position::new(self.initial_place_row, self.initial_place_col),
            capacity: self.amount,
        }
    }
}

/// `item_id,stored_amount,weight,store_place_row,store_place_col`. Extra
/// columns present in the source file are ignored by serde.
#[derive(Debug, Deserialize)]
pub struct ItemConfigRow {
    pub item_id: String,
    pub stored_amount: u32,
    pub weight: u32,
    pub store_place_row: i32,
    pub store_place_col: i32,
}

impl ItemConfigRow {
    pub fn into_spec(self) -> ItemSpec {
        ItemSpec {
            name: self.item_id,
            pos: Position::new(self.store_place_row, self.store_place_col),
            volume: self.weight,
            amount: self.stored_amount,
        }
    }
}

/// `item_id,amount,ship_place_row,ship_place_col`.
#[derive(Debug, Deserialize)]
pub struct PickingListRow {
    pub item_id: String,
    pub amount: u32,
    pub ship_place_row: i32,
    pub ship_place_col: i32,
}

impl PickingListRow {
    pub fn into_spec(self) -> PickingTaskSpec {
        PickingTaskSpec {
            item_name: self.item_id,
            target: Position::new(self.ship_place_row, self.ship_place_col),
            amount: self.amount,
        }
    }
}

/// `agent_id,item_name,row,col,action` with `action ∈ {PICK_UP,DROP_OFF,DOCK}`.
#[derive(Debug, Deserialize)]
pub struct ManualAssignmentRow {
    pub agent_id: String,
    pub item_name: String,
    pub row: i32,
    pub col: i32,
    pub action: String,
}

impl ManualAssignmentRow {
    pub fn into_spec(self) -> Result<ManualAssignmentSpec, ConfigError> {
        let action = match self.action.as_str() {
            "PICK_UP" => ManualAction::PickUp,
            "DROP_OFF" => ManualAction::DropOff,
            "DOCK" => ManualAction::Dock,
            other => return Err(ConfigError::UnknownAction(other.to_string())),
        };
        Ok(ManualAssignmentSpec {
            agent_name: self.agent_id,
            item_name: self.item_name,
            target: Position::new(self.row, self.col),
            action,
        })
    }
}
