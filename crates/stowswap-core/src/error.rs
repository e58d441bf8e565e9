//! Shared error types for the planning pipeline

use thiserror::Error;

/// Errors common to world-model and id lookups.
///
/// Crate-specific error enums (`ConfigError`, `PlannerError`, `PlanningError`)
/// wrap their own failure modes and convert into this one via `#[from]`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Entity not found by id.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: u32 },

    /// A world invariant was violated while building or mutating state.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// IO error surfaced from a loader.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn agent_not_found(id: u32) -> Self {
        Self::NotFound { entity_type: "Agent", id }
    }

    pub fn item_not_found(id: u32) -> Self {
        Self::NotFound { entity_type: "Item", id }
    }

    pub fn store_point_not_found(id: u32) -> Self {
        Self::NotFound { entity_type: "StorePoint", id }
    }

    pub fn end_point_not_found(id: u32) -> Self {
        Self::NotFound { entity_type: "EndPoint", id }
    }

    pub fn rack_not_found(id: u32) -> Self {
        Self::NotFound { entity_type: "Rack", id }
    }

    pub fn task_not_found(id: u32) -> Self {
        Self::NotFound { entity_type: "Task", id }
    }
}

/// Result alias for core/world operations.
pub type CoreResult<T> = Result<T, CoreError>;
