use std::time::Instant;

use planner::{Blocks, Outcome, Phase, PlanReporter, Problem, Solution};

/// Logs every plan the planner emits.
pub struct TracingReporter {
    blocks: Blocks,
    started: Instant,
    first_length: Option<usize>,
}

impl TracingReporter {
    pub fn new(blocks: Blocks) -> Self {
        Self {
            blocks,
            started: Instant::now(),
            first_length: None,
        }
    }

    //A later plan must never be longer than the first one
    fn is_regression(&mut self, length: usize) -> bool {
        match self.first_length {
            Some(first) => length > first,
            None => {
                self.first_length = Some(length);
                false
            }
        }
    }
}

impl PlanReporter for TracingReporter {
    fn report(&mut self, phase: Phase, solution: &Solution) {
        let length = solution.plan.len();

        tracing::info!(
            %phase,
            length,
            elapsed = ?self.started.elapsed(),
            expanded = solution.stats.expanded,
            generated = solution.stats.generated,
            "Found {}: {}",
            phase,
            solution.plan.labeled(&self.blocks)
        );

        if self.is_regression(length) {
            tracing::error!(
                "{} of length {} is longer than the first plan ({:?})",
                phase,
                length,
                self.first_length
            );
        }
    }
}

pub fn log_problem(problem: &Problem) {
    let stats = problem.stats();
    tracing::info!(
        blocks = stats.blocks,
        initial_towers = stats.initial_towers,
        goal_towers = stats.goal_towers,
        upper_bound = stats.upper_bound,
        "Loaded problem with {} blocks",
        stats.blocks
    );
}

pub fn log_outcome(outcome: &Outcome) {
    match outcome.solution() {
        Some(solution) => tracing::info!(
            "Search finished with {} of length {} ({})",
            outcome.phase(),
            solution.plan.len(),
            solution.stats
        ),
        None => tracing::warn!("Search interrupted before any plan was found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_plans_longer_than_the_first() {
        let mut reporter = TracingReporter::new(Blocks::default());

        assert!(!reporter.is_regression(10));
        assert!(!reporter.is_regression(8));
        assert!(!reporter.is_regression(10));
        assert!(reporter.is_regression(11));
    }
}
