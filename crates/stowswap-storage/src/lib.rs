//! Racks, store points, and end points.

pub mod rack;

pub use rack::{EndPoint, PickDirectionArchived, Rack, StorePoint};
