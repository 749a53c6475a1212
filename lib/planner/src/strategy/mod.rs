mod astar;
mod constructive;
mod context;
mod frontier;
mod greedy;

pub use astar::AStar;
pub use constructive::Constructive;
pub use greedy::GreedyBestFirst;

use crate::error::Result;
use crate::{Problem, Solution, StopSignal};

pub trait SearchStrategy {
    fn name(&self) -> &'static str;

    /// Runs one search over `problem`. Polls `stop` once per expansion.
    fn search(&self, problem: &Problem, stop: &StopSignal) -> Result<SearchOutcome>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Solution),
    Interrupted(SearchStats),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display)]
#[display("{} expanded, {} generated", expanded, generated)]
pub struct SearchStats {
    pub expanded: usize,
    pub generated: usize,
}

//Progress is logged every this many expansions
const PROGRESS_INTERVAL: usize = 100_000;

fn log_progress(strategy: &str, stats: &SearchStats, frontier: usize) {
    if stats.expanded > 0 && stats.expanded % PROGRESS_INTERVAL == 0 {
        tracing::debug!(
            strategy,
            expanded = stats.expanded,
            generated = stats.generated,
            frontier,
            "Search in progress"
        );
    }
}
