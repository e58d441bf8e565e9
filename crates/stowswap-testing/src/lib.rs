//! Deterministic scenario presets and a seeded random scenario generator,
//! used by this workspace's unit and end-to-end tests.

pub mod generator;
pub mod presets;

pub use generator::RandomScenarioBuilder;
pub use presets::{corridor_swap_scenario, grid_scenario};
