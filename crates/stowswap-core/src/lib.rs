//! Core types shared by every crate in the planning pipeline: typed entity
//! ids, grid positions, and the common error type.

pub mod error;
pub mod id;
pub mod position;

pub use error::{CoreError, CoreResult};
pub use id::*;
pub use position::{Direction, PickDirection, Position};
