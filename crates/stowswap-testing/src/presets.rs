//! Small deterministic [`World`] builders for unit and scenario tests.
//!
//! Instead of a `ScenarioConfig`, each preset assembles the
//! [`stowswap_config::spec`] structs `World::build` already expects, so a
//! test gets a ready world with no file I/O involved.

use stowswap_config::{AgentSpec, ItemSpec, MapSpec, PickingTaskSpec, RackSpec};
use stowswap_core::{PickDirection, Position};
use stowswap_sim::{InvariantViolation, World};

/// The corridor-swap topology from the testable-properties scenario S2: a
/// 1-row-tall corridor with a single degree-3 junction cell, carrying two
/// agents whose pick/drop targets force them to cross.
pub fn corridor_swap_scenario() -> Result<World, InvariantViolation> {
    let racks = vec![
        RackSpec { pos: Position::new(1, 0), width: 1, height: 1, pick_direction: PickDirection::On },
        RackSpec { pos: Position::new(1, 1), width: 1, height: 1, pick_direction: PickDirection::On },
        RackSpec { pos: Position::new(1, 3), width: 1, height: 1, pick_direction: PickDirection::On },
        RackSpec { pos: Position::new(1, 4), width: 1, height: 1, pick_direction: PickDirection::On },
    ];
    let map_spec = MapSpec { width: 5, height: 2, racks, items: vec![] };

    let items = vec![
        ItemSpec { name: "widget_a".into(), pos: Position::new(0, 0), volume: 1, amount: 1 },
        ItemSpec { name: "widget_b".into(), pos: Position::new(0, 4), volume: 1, amount: 1 },
    ];
    let agents = vec![
        AgentSpec { name: "a0".into(), pos: Position::new(0, 1), capacity: 5 },
        AgentSpec { name: "a1".into(), pos: Position::new(0, 3), capacity: 5 },
    ];
    let picking_list = vec![
        PickingTaskSpec { item_name: "widget_a".into(), target: Position::new(0, 4), amount: 1 },
        PickingTaskSpec { item_name: "widget_b".into(), target: Position::new(0, 0), amount: 1 },
    ];

    World::build(map_spec, items, agents, picking_list)
}

/// An open `width × height` grid with `n_racks` 1×1 racks scattered along
/// the top rows (skipping row 0, which stays clear for agent starts) and
/// `n_agents` agents placed along row 0. Carries no items or tasks — a
/// building block for planner-facing topology tests, not a full pick/drop
/// scenario.
pub fn grid_scenario(width: i32, height: i32, n_racks: u32, n_agents: u32) -> Result<World, InvariantViolation> {
    let mut racks = Vec::new();
    let mut placed = 0u32;
    'outer: for row in 1..height {
        for col in 0..width {
            if placed >= n_racks {
                break 'outer;
            }
            racks.push(RackSpec { pos: Position::new(row, col), width: 1, height: 1, pick_direction: PickDirection::On });
            placed += 1;
        }
    }
    let map_spec = MapSpec { width, height, racks, items: vec![] };

    let mut agents = Vec::new();
    for i in 0..n_agents.min(width.max(0) as u32) {
        agents.push(AgentSpec { name: format!("a{i}"), pos: Position::new(0, i as i32), capacity: 5 });
    }

    World::build(map_spec, vec![], agents, vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corridor_swap_scenario_builds_with_two_agents_and_items() {
        let world = corridor_swap_scenario().unwrap();
        assert_eq!(world.agents.len(), 2);
        assert_eq!(world.items.len(), 2);
        assert_eq!(world.tasks.len(), 2);
    }

    #[test]
    fn grid_scenario_places_requested_racks_and_agents() {
        let world = grid_scenario(6, 4, 5, 3).unwrap();
        assert_eq!(world.racks.len(), 5);
        assert_eq!(world.agents.len(), 3);
    }

    #[test]
    fn grid_scenario_caps_agent_count_at_row_width() {
        let world = grid_scenario(3, 3, 0, 10).unwrap();
        assert_eq!(world.agents.len(), 3);
    }
}
