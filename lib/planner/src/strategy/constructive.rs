use crate::error::{PlanningError, Result};
use crate::{Action, Block, Goal, Plan, Preconditions, Problem, Solution, State, StopSignal, Support};

use super::{SearchOutcome, SearchStats, SearchStrategy};

/// Builds the goal towers bottom up without searching. A block whose goal support is finished
/// and clear is moved there; if no block can be placed, the top of the lowest unfinished tower
/// goes to the table.
///
/// Stats count block moves as expansions and single actions as generated nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Constructive;

impl SearchStrategy for Constructive {
    fn name(&self) -> &'static str {
        "constructive"
    }

    #[tracing::instrument(skip_all)]
    fn search(&self, problem: &Problem, stop: &StopSignal) -> Result<SearchOutcome> {
        let goal = problem.goal();
        let wanted = wanted_supports(goal);
        let mut builder = Builder::new(problem.initial().clone());

        if let Some(held) = builder.state.held() {
            builder.apply(Action::PutDown(held))?;
        }

        while !goal.is_fulfilled(&builder.state) {
            if stop.is_stop_requested() {
                tracing::debug!("Search interrupted after {}", builder.stats);
                return Ok(SearchOutcome::Interrupted(builder.stats));
            }

            let settled = settled(&builder.state, goal, &wanted);
            let (block, destination) = next_placement(&builder.state, goal, &settled)
                .or_else(|| next_clearance(&builder.state, &settled))
                .ok_or(PlanningError::NoPlanFound {
                    expanded: builder.stats.expanded,
                })?;

            builder.move_block(block, destination)?;
        }

        tracing::debug!("Built plan of length {} ({})", builder.actions.len(), builder.stats);
        Ok(SearchOutcome::Found(Solution::new(Plan::new(builder.actions), builder.stats)))
    }
}

struct Builder {
    state: State,
    actions: Vec<Action>,
    stats: SearchStats,
}

impl Builder {
    fn new(state: State) -> Self {
        Self {
            state,
            actions: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    fn move_block(&mut self, block: Block, destination: Support) -> Result<()> {
        let lift = match self.state.support(block) {
            Some(Support::On(below)) => Action::Unstack(block, below),
            _ => Action::PickUp(block),
        };
        let place = match destination {
            Support::On(target) => Action::Stack(block, target),
            _ => Action::PutDown(block),
        };

        self.apply(lift)?;
        self.apply(place)?;
        self.stats.expanded += 1;
        Ok(())
    }

    fn apply(&mut self, action: Action) -> Result<()> {
        self.state = self.state.apply(action)?;
        self.actions.push(action);
        self.stats.generated += 1;
        Ok(())
    }
}

//Blocks some other block has to be stacked on
fn wanted_supports(goal: &Goal) -> Vec<bool> {
    let mut wanted = vec![false; goal.block_count()];
    for (_, target) in goal.constrained() {
        if let Support::On(below) = target {
            wanted[below.index()] = true;
        }
    }
    wanted
}

/// A block is settled if it and everything below it are in their final place. Unlike plain goal
/// stability, an unconstrained block sitting on a block that is wanted by another one is not
/// settled: it has to make room.
fn settled(state: &State, goal: &Goal, wanted: &[bool]) -> Vec<bool> {
    let in_place = |block: Block| match (state.support(block), goal.target(block)) {
        (Some(Support::Held) | None, _) => false,
        (Some(support), Some(target)) => support == target,
        (Some(Support::On(below)), None) => !wanted[below.index()],
        (Some(_), None) => true,
    };

    let mut settled = vec![false; state.block_count()];
    for tower in state.towers() {
        let mut base = true;
        for block in tower {
            base = base && in_place(block);
            settled[block.index()] = base;
        }
    }
    settled
}

fn next_placement(state: &State, goal: &Goal, settled: &[bool]) -> Option<(Block, Support)> {
    state
        .blocks()
        .filter(|b| !settled[b.index()] && state.is_clear(*b))
        .find_map(|b| match goal.target(b)? {
            Support::On(below) if below != b && settled[below.index()] && state.is_clear(below) => {
                Some((b, Support::On(below)))
            }
            Support::Table => Some((b, Support::Table)),
            _ => None,
        })
}

fn next_clearance(state: &State, settled: &[bool]) -> Option<(Block, Support)> {
    state
        .blocks()
        .filter(|b| !settled[b.index()] && state.is_clear(*b))
        .filter(|b| matches!(state.support(*b), Some(Support::On(_))))
        .min_by_key(|b| (state.height(*b), *b))
        .map(|b| (b, Support::Table))
}
