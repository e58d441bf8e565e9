//! World model, target dispatcher, and round loop: the glue between task
//! assignment and the Push-and-Swap planner.

pub mod dispatch;
pub mod error;
pub mod round;
pub mod world;

pub use dispatch::dispatch_targets;
pub use error::{CapacityError, InvariantViolation, PlanningError};
pub use round::{run_push_and_swap_mode, run_single_agent_mode, RunLog, StepRecord};
pub use world::World;
