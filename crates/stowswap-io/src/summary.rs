//! Run summary: the numbers the original `a_star.py`/`push_and_swap.py`
//! `__main__` blocks print at the end of a run (elapsed time, makespan,
//! average and per-agent step counts).

use std::collections::HashMap;
use std::time::Duration;
use stowswap_core::AgentId;
use stowswap_sim::RunLog;

/// Per-agent and aggregate statistics for a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub elapsed: Duration,
    pub makespan: usize,
    pub avg_steps: f64,
    pub steps_per_agent: HashMap<AgentId, usize>,
}

/// The step an agent last changed position at, i.e. how long it stayed
/// active before holding its final cell for the rest of the run.
fn agent_step_count(run_log: &RunLog, agent_id: AgentId) -> usize {
    let mut last_change = 0usize;
    let mut prev = run_log.steps.first().and_then(|s| s.positions.get(&agent_id)).copied();
    for (step, record) in run_log.steps.iter().enumerate() {
        if let Some(pos) = record.positions.get(&agent_id) {
            if Some(*pos) != prev {
                last_change = step;
                prev = Some(*pos);
            }
        }
    }
    last_change
}

/// Summarize a completed run: makespan is the number of rows recorded
/// (timesteps including the initial configuration), `elapsed` is the
/// wall-clock time the caller measured around the planning call.
pub fn summarize(run_log: &RunLog, elapsed: Duration) -> RunSummary {
    let makespan = run_log.steps.len().saturating_sub(1);
    let steps_per_agent: HashMap<AgentId, usize> =
        run_log.agent_order.iter().map(|&id| (id, agent_step_count(run_log, id))).collect();
    let avg_steps = if steps_per_agent.is_empty() {
        0.0
    } else {
        steps_per_agent.values().sum::<usize>() as f64 / steps_per_agent.len() as f64
    };
    RunSummary { elapsed, makespan, avg_steps, steps_per_agent }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "elapsed: {:.3}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "makespan: {}", self.makespan)?;
        writeln!(f, "avg steps: {:.2}", self.avg_steps)?;
        let mut ids: Vec<_> = self.steps_per_agent.keys().copied().collect();
        ids.sort();
        for id in ids {
            writeln!(f, "  agent {}: {} steps", id.as_u32(), self.steps_per_agent[&id])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowswap_core::Position;
    use stowswap_sim::StepRecord;

    #[test]
    fn makespan_is_step_count_minus_the_initial_row() {
        let a0 = AgentId::new(0);
        let mut s0 = StepRecord::default();
        s0.positions.insert(a0, Position::new(0, 0));
        let mut s1 = StepRecord::default();
        s1.positions.insert(a0, Position::new(0, 1));
        let mut s2 = StepRecord::default();
        s2.positions.insert(a0, Position::new(0, 1));

        let log = RunLog { agent_order: vec![a0], steps: vec![s0, s1, s2] };
        let summary = summarize(&log, Duration::from_millis(10));
        assert_eq!(summary.makespan, 2);
        assert_eq!(summary.steps_per_agent[&a0], 1);
    }
}
