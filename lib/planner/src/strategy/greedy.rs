use crate::error::{PlanningError, Result};
use crate::eval::{Heuristic, HeuristicKind};
use crate::{successors, Preconditions, Problem, Solution, StopSignal};

use super::context::SearchContext;
use super::frontier::Frontier;
use super::{log_progress, SearchOutcome, SearchStrategy};

/// Greedy best-first search: always expands the node that looks closest to the goal, ignoring
/// the cost of getting there. Returns the first plan it reaches.
#[derive(Debug, Clone, Copy)]
pub struct GreedyBestFirst {
    heuristic: HeuristicKind,
}

impl GreedyBestFirst {
    pub fn new(heuristic: HeuristicKind) -> Self {
        Self { heuristic }
    }
}

impl SearchStrategy for GreedyBestFirst {
    fn name(&self) -> &'static str {
        "greedy best-first"
    }

    #[tracing::instrument(skip_all, fields(heuristic = %self.heuristic))]
    fn search(&self, problem: &Problem, stop: &StopSignal) -> Result<SearchOutcome> {
        let goal = problem.goal();
        let initial = problem.initial().clone();
        let estimate = self.heuristic.estimate(&initial, goal);

        let mut context = SearchContext::new(initial, estimate);
        let mut frontier = Frontier::new();
        frontier.push(estimate, context.root());

        // A state is pushed at most once: the node table doubles as the visited set.
        while let Some((_, id)) = frontier.pop() {
            if stop.is_stop_requested() {
                tracing::debug!("Search interrupted after {}", context.stats);
                return Ok(SearchOutcome::Interrupted(context.stats));
            }

            let node = context.node(id);
            if goal.is_fulfilled(&node.state) {
                tracing::debug!("Found plan of length {} ({})", node.cost, context.stats);
                return Ok(SearchOutcome::Found(Solution::new(context.plan_to(id), context.stats)));
            }

            let cost = node.cost + 1;
            let next = successors(&node.state);
            context.stats.expanded += 1;

            for (action, state) in next {
                if context.lookup(&state).is_some() {
                    continue;
                }

                let estimate = self.heuristic.estimate(&state, goal);
                let child = context.insert(state, action, id, cost, estimate);
                frontier.push(estimate, child);
            }

            log_progress(self.name(), &context.stats, frontier.len());
        }

        Err(PlanningError::NoPlanFound {
            expanded: context.stats.expanded,
        })
    }
}
