use crate::error::{PlanningError, Result};
use crate::eval::{Heuristic, HeuristicKind};
use crate::{successors, Preconditions, Problem, Solution, StopSignal};

use super::context::SearchContext;
use super::frontier::Frontier;
use super::{log_progress, SearchOutcome, SearchStrategy};

/// A* search. Every action costs one, so the path cost of a node is its plan length.
///
/// The returned plan is a shortest one if the heuristic is admissible. Nodes reached again on a
/// cheaper path are re-queued, so an admissible but inconsistent estimate is fine.
#[derive(Debug, Clone, Copy)]
pub struct AStar {
    heuristic: HeuristicKind,
    upper_bound: Option<usize>,
}

impl AStar {
    pub fn new(heuristic: HeuristicKind) -> Self {
        Self {
            heuristic,
            upper_bound: None,
        }
    }

    /// Skips nodes whose estimated plan length exceeds `bound`. With an admissible heuristic no
    /// plan of length `bound` or shorter is lost.
    #[must_use]
    pub fn with_upper_bound(mut self, bound: Option<usize>) -> Self {
        self.upper_bound = bound;
        self
    }

    pub fn heuristic(&self) -> HeuristicKind {
        self.heuristic
    }

    fn within_bound(&self, priority: usize) -> bool {
        self.upper_bound.map_or(true, |bound| priority <= bound)
    }
}

impl SearchStrategy for AStar {
    fn name(&self) -> &'static str {
        "A*"
    }

    #[tracing::instrument(skip_all, fields(heuristic = %self.heuristic, upper_bound = ?self.upper_bound))]
    fn search(&self, problem: &Problem, stop: &StopSignal) -> Result<SearchOutcome> {
        let goal = problem.goal();
        let initial = problem.initial().clone();
        let estimate = self.heuristic.estimate(&initial, goal);

        let mut context = SearchContext::new(initial, estimate);
        let mut frontier = Frontier::new();
        frontier.push((estimate, 0), context.root());

        while let Some(((_, cost), id)) = frontier.pop() {
            if stop.is_stop_requested() {
                tracing::debug!("Search interrupted after {}", context.stats);
                return Ok(SearchOutcome::Interrupted(context.stats));
            }

            let node = context.node(id);

            //stale entry, a cheaper path to this node was queued later
            if cost > node.cost {
                continue;
            }

            if goal.is_fulfilled(&node.state) {
                tracing::debug!("Found plan of length {} ({})", node.cost, context.stats);
                return Ok(SearchOutcome::Found(Solution::new(context.plan_to(id), context.stats)));
            }

            let next = successors(&node.state);
            context.stats.expanded += 1;
            let cost = cost + 1;

            for (action, state) in next {
                match context.lookup(&state) {
                    Some(known) if context.node(known).cost <= cost => {}

                    Some(known) => {
                        let priority = cost + context.node(known).estimate;
                        if self.within_bound(priority) {
                            context.relink(known, action, id, cost);
                            frontier.push((priority, cost), known);
                        }
                    }

                    None => {
                        let estimate = self.heuristic.estimate(&state, goal);
                        let priority = cost + estimate;
                        if self.within_bound(priority) {
                            let child = context.insert(state, action, id, cost, estimate);
                            frontier.push((priority, cost), child);
                        }
                    }
                }
            }

            log_progress(self.name(), &context.stats, frontier.len());
        }

        Err(PlanningError::NoPlanFound {
            expanded: context.stats.expanded,
        })
    }
}
