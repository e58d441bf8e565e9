//! The degenerate single-agent planning mode: every agent takes its own
//! shortest path to its target with no collision avoidance between agents.
//!
//! Grounded in `a_star/a_star.py`'s `planning()`, which calls
//! `nx.shortest_path` per agent per round and never looks at where other
//! agents are. Useful as a cheap baseline and as the fallback mode when a
//! scenario's swap sites make full push-and-swap unnecessary overhead.

use std::collections::VecDeque;
use stowswap_core::Position;
use stowswap_map::Grid;

/// Shortest path from `from` to `to`, ignoring every other agent.
pub fn shortest_path(grid: &Grid, from: Position, to: Position) -> Option<Vec<Position>> {
    if from == to {
        return Some(vec![from]);
    }
    let mut prev = std::collections::HashMap::new();
    let mut visited = std::collections::HashSet::new();
    visited.insert(from);
    let mut queue = VecDeque::new();
    queue.push_back(from);
    while let Some(u) = queue.pop_front() {
        if u == to {
            let mut path = vec![to];
            while *path.last().unwrap() != from {
                path.push(prev[path.last().unwrap()]);
            }
            path.reverse();
            return Some(path);
        }
        for n in grid.neighbors(u) {
            if visited.insert(n) {
                prev.insert(n, u);
                queue.push_back(n);
            }
        }
    }
    None
}

/// Independent per-agent shortest path for every `(start, target)` pair, in
/// the order given. No vertex-disjointness or single-step guarantee: this
/// is the "A*-only" mode, not a valid multi-agent plan.
pub fn plan_independent_paths(
    grid: &Grid,
    starts: &[Position],
    targets: &[Position],
) -> Option<Vec<Vec<Position>>> {
    starts
        .iter()
        .zip(targets)
        .map(|(&s, &t)| shortest_path(grid, s, t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn finds_manhattan_shortest_path_on_open_grid() {
        let grid = Grid::new(5, 5, HashSet::new());
        let path = shortest_path(&grid, Position::new(0, 0), Position::new(2, 2)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(*path.last().unwrap(), Position::new(2, 2));
    }

    #[test]
    fn independent_paths_ignore_each_other() {
        let grid = Grid::new(3, 1, HashSet::new());
        let starts = vec![Position::new(0, 0), Position::new(0, 2)];
        let targets = vec![Position::new(0, 2), Position::new(0, 0)];
        let paths = plan_independent_paths(&grid, &starts, &targets).unwrap();
        assert_eq!(paths[0].first().copied().unwrap(), Position::new(0, 0));
        assert_eq!(paths[1].first().copied().unwrap(), Position::new(0, 2));
    }
}
