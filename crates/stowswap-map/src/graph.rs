//! The 4-connected warehouse grid graph.
//!
//! Grounded in the original's `create_graph` (`a_star/push_and_swap.py`),
//! which builds an `nx.grid_2d_graph` and strips out rack cells. Here the
//! grid is a dense `width * height` bitmap of blocked cells plus a
//! precomputed adjacency/degree table (nodes + adjacency), specialized
//! to a grid instead of a general graph.

use stowswap_core::Position;
use std::collections::HashSet;

/// The plain grid used for planning: only racks are blocked.
#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    blocked: HashSet<Position>,
    /// Precomputed neighbor count per free cell, used by the planner's
    /// `find_nodes_with_many_neighbors` (degree >= 3 nodes are preferred
    /// swap sites).
    degree: std::collections::HashMap<Position, u8>,
}

impl Grid {
    pub fn new(width: i32, height: i32, blocked: HashSet<Position>) -> Self {
        let mut grid = Self { width, height, blocked, degree: Default::default() };
        grid.recompute_degrees();
        grid
    }

    fn recompute_degrees(&mut self) {
        let mut degree = std::collections::HashMap::new();
        for row in 0..self.height {
            for col in 0..self.width {
                let pos = Position::new(row, col);
                if self.blocked.contains(&pos) {
                    continue;
                }
                let count = pos.neighbors().iter().filter(|n| self.in_bounds(n) && !self.blocked.contains(n)).count();
                degree.insert(pos, count as u8);
            }
        }
        self.degree = degree;
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        pos.row >= 0 && pos.row < self.height && pos.col >= 0 && pos.col < self.width
    }

    pub fn is_blocked(&self, pos: &Position) -> bool {
        self.blocked.contains(pos)
    }

    pub fn is_free(&self, pos: &Position) -> bool {
        self.in_bounds(pos) && !self.is_blocked(pos)
    }

    /// Free neighbors of `pos`, in the stable order Up, Down, Left, Right
    /// (the order invariants in §5 require a fixed iteration order, not
    /// hashmap order).
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors().into_iter().filter(move |n| self.is_free(n))
    }

    pub fn degree(&self, pos: &Position) -> u8 {
        self.degree.get(pos).copied().unwrap_or(0)
    }

    /// All free cells with degree >= 3, in row-major order. Grounded in
    /// `find_nodes_with_many_neighbors` in the original planner.
    pub fn nodes_with_many_neighbors(&self) -> Vec<Position> {
        let mut out: Vec<Position> = self
            .degree
            .iter()
            .filter(|(_, &d)| d >= 3)
            .map(|(&p, _)| p)
            .collect();
        out.sort();
        out
    }

    pub fn free_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Position::new(row, col)))
            .filter(move |p| self.is_free(p))
    }

    /// Breadth-first distance from every free cell to `target`, used as the
    /// static heuristic table the priority ordering and greedy descent are
    /// both built on.
    pub fn bfs_distances(&self, target: Position) -> std::collections::HashMap<Position, u32> {
        use std::collections::VecDeque;
        let mut dist = std::collections::HashMap::new();
        if !self.is_free(&target) {
            return dist;
        }
        dist.insert(target, 0);
        let mut queue = VecDeque::new();
        queue.push_back(target);
        while let Some(cur) = queue.pop_front() {
            let d = dist[&cur];
            for n in self.neighbors(cur) {
                if !dist.contains_key(&n) {
                    dist.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_grid(w: i32, h: i32) -> Grid {
        Grid::new(w, h, HashSet::new())
    }

    #[test]
    fn interior_cell_has_degree_four() {
        let grid = empty_grid(5, 5);
        assert_eq!(grid.degree(&Position::new(2, 2)), 4);
        assert_eq!(grid.degree(&Position::new(0, 0)), 2);
    }

    #[test]
    fn bfs_distance_matches_manhattan_in_open_grid() {
        let grid = empty_grid(5, 5);
        let dist = grid.bfs_distances(Position::new(0, 0));
        assert_eq!(dist[&Position::new(3, 4)], 7);
    }

    #[test]
    fn blocked_cell_has_no_neighbors_reported() {
        let mut blocked = HashSet::new();
        blocked.insert(Position::new(1, 1));
        let grid = Grid::new(3, 3, blocked);
        assert!(grid.neighbors(Position::new(1, 0)).all(|n| n != Position::new(1, 1)));
    }
}
