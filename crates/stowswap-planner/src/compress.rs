//! Plan compression: replay the raced joint plan in parallel wherever the
//! per-cell visit order allows it.
//!
//! Grounded in `push_and_swap.py`'s `compress`. For every cell, record the
//! order agents arrive at it during the raced plan. Then replay: each agent
//! advances to its next distinct position as soon as it is that position's
//! next-in-line occupant, all in the same compressed timestep.

use crate::plan::{Configuration, Plan};
use std::collections::{HashMap, VecDeque};
use stowswap_core::Position;

/// When to stop compressing: as soon as any agent reaches its target
/// (the planner's own default), or only once every agent has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishFunc {
    Any,
    All,
}

impl FinishFunc {
    fn done(self, flags: &[bool]) -> bool {
        match self {
            FinishFunc::Any => flags.iter().any(|&f| f),
            FinishFunc::All => flags.iter().all(|&f| f),
        }
    }
}

pub fn compress(plan: &Plan, n_agents: usize, targets: &[Position], finish: FinishFunc) -> Plan {
    let makespan = plan.makespan();
    let mut visit_order: HashMap<Position, VecDeque<usize>> = HashMap::new();
    for t in 0..=makespan {
        let config = plan.config_at(t);
        for agent in 0..n_agents {
            let node_v = config[agent];
            let moved = t == 0 || node_v != plan.config_at(t - 1)[agent];
            let entry = visit_order.entry(node_v).or_default();
            if entry.is_empty() || moved {
                entry.push_back(agent);
            }
        }
    }

    let mut new_plan = Plan::from_single(plan.config_at(0).clone());
    let mut internal_clock = vec![0usize; n_agents];

    loop {
        let last = new_plan.last_config().clone();
        let done: Vec<bool> = last.iter().zip(targets).map(|(p, t)| p == t).collect();
        if finish.done(&done) {
            break;
        }

        let mut frame: Configuration = Vec::with_capacity(n_agents);
        for agent in 0..n_agents {
            let mut t = internal_clock[agent];
            if t == makespan {
                frame.push(new_plan.last_pos(agent));
                continue;
            }
            let v_current = plan.config_at(t)[agent];
            while t < makespan && plan.config_at(t + 1)[agent] == v_current {
                t += 1;
            }
            internal_clock[agent] = t;
            if t == makespan {
                frame.push(new_plan.last_pos(agent));
                continue;
            }

            let v_next = plan.config_at(t + 1)[agent];
            if visit_order[&v_next].front() == Some(&agent) {
                frame.push(v_next);
                visit_order.get_mut(&v_current).unwrap().pop_front();
                internal_clock[agent] = t + 1;
            } else {
                frame.push(new_plan.last_pos(agent));
            }
        }
        new_plan.push(frame);
    }

    new_plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compresses_independent_agents_in_one_step() {
        // Two agents moving on disjoint cells, one step each: the raced
        // plan has 2 timesteps but both moves are independent, so the
        // compressed plan should finish in 1.
        let plan = Plan::from_single(vec![Position::new(0, 0), Position::new(5, 5)])
            .tap_push(vec![Position::new(0, 1), Position::new(5, 5)])
            .tap_push(vec![Position::new(0, 1), Position::new(5, 6)]);
        let targets = vec![Position::new(0, 1), Position::new(5, 6)];
        let compressed = compress(&plan, 2, &targets, FinishFunc::All);
        assert_eq!(compressed.makespan(), 1);
    }

    trait TapPush {
        fn tap_push(self, config: Configuration) -> Self;
    }
    impl TapPush for Plan {
        fn tap_push(mut self, config: Configuration) -> Self {
            self.push(config);
            self
        }
    }
}
