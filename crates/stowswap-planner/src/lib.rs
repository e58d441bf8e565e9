//! Multi-agent path planning: Push-and-Swap with an A*-only fallback mode.

pub mod astar;
pub mod compress;
pub mod error;
pub mod invariants;
pub mod plan;
pub mod planner;

pub use compress::{compress, FinishFunc};
pub use error::{PlannerError, PlannerResult};
pub use plan::{Configuration, Occupancy, Plan, NIL};
pub use planner::{PlanningBudget, PushAndSwap, PushAndSwapOutcome};
