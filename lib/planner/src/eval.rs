//! Remaining-cost estimates used to order the search frontier.
//!
//! A block is *stable* when neither it nor anything below it has to move again: it is on the
//! table or on a stable block, and its support is the one the goal asks for (if any). Every block
//! that is not stable must be moved at least once, which takes two actions.

use serde::Deserialize;

use crate::{Block, Goal, State, Support};

pub trait Heuristic {
    fn estimate(&self, state: &State, goal: &Goal) -> usize;

    /// An admissible estimate never exceeds the true number of remaining actions.
    fn is_admissible(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    /// Strong guidance for greedy search. Charges a held block a full move and penalises every
    /// misplaced block resting above a block of its own goal tower, so it can overestimate.
    #[display("domain-tuned")]
    DomainTuned,
    /// Lower bound on the plan length, safe for A*.
    #[display("admissible")]
    Admissible,
}

impl Heuristic for HeuristicKind {
    fn estimate(&self, state: &State, goal: &Goal) -> usize {
        match self {
            HeuristicKind::DomainTuned => domain_tuned(state, goal),
            HeuristicKind::Admissible => admissible(state, goal),
        }
    }

    fn is_admissible(&self) -> bool {
        matches!(self, HeuristicKind::Admissible)
    }
}

fn domain_tuned(state: &State, goal: &Goal) -> usize {
    let stable = stability(state, goal);

    state
        .blocks()
        .filter(|b| goal.target(*b).is_some() && !stable[b.index()])
        .map(|b| {
            let deadlocked = matches!(goal.target(b), Some(Support::On(_)))
                && blocks_below(state, b).any(|below| goal.is_below(below, b));
            if deadlocked {
                4
            } else {
                2
            }
        })
        .sum()
}

fn admissible(state: &State, goal: &Goal) -> usize {
    let stable = stability(state, goal);

    state
        .blocks()
        .map(|b| match state.support(b) {
            // putting it down or stacking it is a single action
            Some(Support::Held) => usize::from(goal.target(b).is_some()),
            _ if stable[b.index()] => 0,
            _ => {
                // It has to leave its current tower before a goal tower block below it can move,
                // and it can only be placed for good once that block has been placed.
                let moves_twice = matches!(goal.target(b), Some(Support::On(_)))
                    && blocks_below(state, b).any(|below| !stable[below.index()] && goal.is_below(below, b));
                if moves_twice {
                    4
                } else {
                    2
                }
            }
        })
        .sum()
}

/// Stability of every block, indexed by block.
pub fn stability(state: &State, goal: &Goal) -> Vec<bool> {
    let mut stable: Vec<Option<bool>> = vec![None; state.block_count()];

    for block in state.blocks() {
        let mut chain = Vec::new();
        let mut current = block;

        let mut base = loop {
            if let Some(resolved) = stable[current.index()] {
                break resolved;
            }
            chain.push(current);
            match state.support(current) {
                Some(Support::On(below)) => current = below,
                _ => break true,
            }
        };

        for b in chain.into_iter().rev() {
            let in_place = match state.support(b) {
                Some(Support::Held) | None => false,
                Some(support) => goal.target(b).map_or(true, |target| target == support),
            };
            base = base && in_place;
            stable[b.index()] = Some(base);
        }
    }

    stable.into_iter().map(|s| s.unwrap_or(false)).collect()
}

fn blocks_below(state: &State, block: Block) -> impl Iterator<Item = Block> + '_ {
    std::iter::successors(Some(block), move |current| match state.support(*current) {
        Some(Support::On(below)) => Some(below),
        _ => None,
    })
    .skip(1)
}
