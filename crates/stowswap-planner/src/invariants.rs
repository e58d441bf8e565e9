//! Debug-time checks for the properties a joint plan must hold.
//!
//! These are assertion helpers rather than a separate verifier pass: they
//! exist so the round loop and tests can call `debug_assert!` on a finished
//! plan without duplicating the traversal logic everywhere.

use crate::plan::Plan;
use std::collections::HashSet;
use stowswap_map::Grid;

/// Every configuration step moves each agent by at most one grid cell.
pub fn single_step_moves(plan: &Plan) -> bool {
    let configs = plan.configs();
    for t in 1..configs.len() {
        for (prev, next) in configs[t - 1].iter().zip(&configs[t]) {
            if prev != next && !prev.is_neighbor(next) {
                return false;
            }
        }
    }
    true
}

/// No two agents ever occupy the same cell at the same timestep.
pub fn vertex_disjoint(plan: &Plan) -> bool {
    for config in plan.configs() {
        let mut seen = HashSet::new();
        for &pos in config {
            if !seen.insert(pos) {
                return false;
            }
        }
    }
    true
}

/// No agent ever steps onto a blocked (rack) cell.
pub fn no_blocked_cells(plan: &Plan, grid: &Grid) -> bool {
    plan.configs().iter().all(|config| config.iter().all(|p| grid.is_free(p)))
}

/// Two agents never swap positions by crossing the same edge in the same
/// timestep (an edge conflict, distinct from the vertex conflict above).
pub fn no_edge_swaps(plan: &Plan) -> bool {
    let configs = plan.configs();
    for t in 1..configs.len() {
        let prev = &configs[t - 1];
        let next = &configs[t];
        for i in 0..prev.len() {
            for j in (i + 1)..prev.len() {
                if prev[i] == next[j] && prev[j] == next[i] && prev[i] != prev[j] {
                    return false;
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowswap_core::Position;

    #[test]
    fn catches_a_teleporting_agent() {
        let plan = Plan::from_single(vec![Position::new(0, 0)]);
        let mut bad = plan;
        bad.push(vec![Position::new(5, 5)]);
        assert!(!single_step_moves(&bad));
    }

    #[test]
    fn catches_a_vertex_conflict() {
        let mut plan = Plan::from_single(vec![Position::new(0, 0), Position::new(1, 1)]);
        plan.push(vec![Position::new(0, 1), Position::new(0, 1)]);
        assert!(!vertex_disjoint(&plan));
    }

    #[test]
    fn catches_an_edge_swap() {
        let mut plan = Plan::from_single(vec![Position::new(0, 0), Position::new(0, 1)]);
        plan.push(vec![Position::new(0, 1), Position::new(0, 0)]);
        assert!(!no_edge_swaps(&plan));
    }
}
