//! Planner failure modes.

use stowswap_core::Position;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    /// An agent could neither push nor find a swap candidate toward its target.
    #[error("agent {agent} has no viable push or swap toward its target")]
    NoSwapCandidate { agent: usize },

    /// The grid graph has no path between two cells that must be connected.
    #[error("no path between {from} and {to}")]
    Disconnected { from: Position, to: Position },

    /// The per-round wall-clock budget elapsed before planning completed.
    #[error("planning exceeded its time budget")]
    Timeout,
}

pub type PlannerResult<T> = Result<T, PlannerError>;
