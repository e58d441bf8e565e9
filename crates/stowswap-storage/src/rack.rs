//! Racks, store points, and end points.
//!
//! Grounded in `sh_core/rack.py`, `sh_core/store_point.py` and
//! `sh_core/end_point.py`. A rack is a rectangular obstacle; each of its
//! cells that faces an aisle is a store point, and each store point has a
//! single end point (the aisle cell a robot stands on to pick/drop).

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};
use std::collections::HashMap;
use stowswap_core::{EndPointId, ItemId, PickDirection, Position, RackId, StorePointId};

/// A rectangular rack obstacle.
#[derive(Archive, Deserialize, Serialize, Clone, Debug)]
pub struct Rack {
    pub id: RackId,
    pub pos: Position,
    pub width: i32,
    pub height: i32,
    pub pick_direction: PickDirectionArchived,
}

/// `rkyv`/`serde`-friendly mirror of [`PickDirection`] (the core enum has
/// no `Archive` derive since it is shared with non-archived crates too).
#[derive(Archive, Deserialize, Serialize, SerdeDeserialize, SerdeSerialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickDirectionArchived {
    Horizontal,
    Vertical,
    On,
}

impl From<PickDirection> for PickDirectionArchived {
    fn from(d: PickDirection) -> Self {
        match d {
            PickDirection::Horizontal => Self::Horizontal,
            PickDirection::Vertical => Self::Vertical,
            PickDirection::On => Self::On,
        }
    }
}

impl From<PickDirectionArchived> for PickDirection {
    fn from(d: PickDirectionArchived) -> Self {
        match d {
            PickDirectionArchived::Horizontal => Self::Horizontal,
            PickDirectionArchived::Vertical => Self::Vertical,
            PickDirectionArchived::On => Self::On,
        }
    }
}

impl Rack {
    pub fn new(id: RackId, pos: Position, width: i32, height: i32, pick_direction: PickDirection) -> Self {
        Self { id, pos, width, height, pick_direction: pick_direction.into() }
    }

    /// All cells occupied by this rack.
    pub fn cells(&self) -> Vec<Position> {
        let mut out = Vec::with_capacity((self.width * self.height) as usize);
        for dr in 0..self.height {
            for dc in 0..self.width {
                out.push(Position::new(self.pos.row + dr, self.pos.col + dc));
            }
        }
        out
    }
}

/// A cell on the face of a rack where items are stored. Holds item/amount
/// pairs (an `ItemSet` multiset in the original).
#[derive(Archive, Deserialize, Serialize, Clone, Debug, Default)]
pub struct StorePoint {
    pub id: StorePointId,
    pub pos: Position,
    pub pick_direction: Option<PickDirectionArchived>,
    pub end_point: Option<EndPointId>,
    pub having_items: HashMap<ItemIdKey, u32>,
}

/// `rkyv` needs a hashable, archive-friendly key; `ItemId` already is, but we
/// alias it here so the intent (item -> amount multiset) reads clearly.
pub type ItemIdKey = ItemId;

impl StorePoint {
    pub fn new(id: StorePointId, pos: Position) -> Self {
        Self { id, pos, pick_direction: None, end_point: None, having_items: HashMap::new() }
    }

    /// Mirrors `StorePoint.stored`: add `amount` units of `item`.
    pub fn stored(&mut self, item: ItemId, amount: u32) {
        *self.having_items.entry(item).or_insert(0) += amount;
    }

    /// Mirrors `StorePoint.taken_out`: remove up to `amount` units, returning
    /// how many were actually removed.
    pub fn taken_out(&mut self, item: ItemId, amount: u32) -> u32 {
        match self.having_items.get_mut(&item) {
            Some(have) => {
                let taken = (*have).min(amount);
                *have -= taken;
                if *have == 0 {
                    self.having_items.remove(&item);
                }
                taken
            }
            None => 0,
        }
    }

    pub fn is_picked(&self) -> bool {
        self.having_items.is_empty()
    }
}

/// An aisle cell a robot occupies while picking/dropping at a store point.
#[derive(Archive, Deserialize, Serialize, Clone, Debug)]
pub struct EndPoint {
    pub id: EndPointId,
    pub pos: Position,
    pub store_point: StorePointId,
}

impl EndPoint {
    pub fn new(id: EndPointId, pos: Position, store_point: StorePointId) -> Self {
        Self { id, pos, store_point }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rack_cells_cover_footprint() {
        let rack = Rack::new(RackId(0), Position::new(1, 1), 2, 3, PickDirection::Horizontal);
        let cells = rack.cells();
        assert_eq!(cells.len(), 6);
        assert!(cells.contains(&Position::new(1, 1)));
        assert!(cells.contains(&Position::new(3, 2)));
    }

    #[test]
    fn store_point_tracks_multiset() {
        let mut sp = StorePoint::new(StorePointId(0), Position::new(0, 0));
        sp.stored(ItemId(1), 5);
        assert_eq!(sp.taken_out(ItemId(1), 3), 3);
        assert_eq!(sp.taken_out(ItemId(1), 3), 2);
        assert!(sp.is_picked());
    }
}
