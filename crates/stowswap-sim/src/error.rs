//! Errors surfaced above the planner: world construction and post-round
//! invariant checks.

use stowswap_core::Position;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvariantViolation {
    #[error("agent {agent} is not at end point {end_point} ({expected} != {actual})")]
    WrongPosition { agent: u32, end_point: u32, expected: Position, actual: Position },

    #[error("store point {0} has no end point")]
    MissingEndPoint(u32),

    #[error("agent {0} holds no such item to drop")]
    ItemNotHeld(u32),

    #[error("agent {0} has no current task to drop against")]
    NoCurrentTask(u32),

    #[error("item {0}'s owner is not a store point")]
    ItemNotInStore(u32),

    #[error("{0}")]
    PlanCheck(String),
}

/// One error variant per failure kind reachable from the public round-loop
/// entry points, flattened so callers match on a single top-level error.
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error(transparent)]
    Config(#[from] stowswap_config::ConfigError),

    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error(transparent)]
    Planner(#[from] stowswap_planner::PlannerError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

#[derive(Error, Debug)]
#[error("no agent can carry item of volume {volume} (every agent's capacity is below it)")]
pub struct CapacityError {
    pub volume: u32,
}
