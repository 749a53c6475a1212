use serde::Deserialize;

use crate::error::{PlanningError, Result};
use crate::eval::{Heuristic, HeuristicKind};
use crate::strategy::{AStar, Constructive, GreedyBestFirst, SearchOutcome, SearchStrategy};
use crate::{Problem, Solution, StopSignal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// First valid plan only
    #[default]
    #[display("fast")]
    Fast,
    /// Shortest plan only
    #[display("optimal")]
    Optimal,
    /// Valid plan first, then keep searching for a shorter one
    #[display("anytime")]
    Anytime,
}

impl SearchMode {
    /// Mode requested by the fast/optimal command line switches. `None` if neither is set.
    pub fn from_flags(fast: bool, optimal: bool) -> Option<Self> {
        match (fast, optimal) {
            (true, true) => Some(SearchMode::Anytime),
            (true, false) => Some(SearchMode::Fast),
            (false, true) => Some(SearchMode::Optimal),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum FastStrategy {
    #[default]
    #[display("greedy")]
    Greedy,
    #[display("constructive")]
    Constructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Phase {
    #[display("idle")]
    Idle,
    #[display("running fast search")]
    RunningFast,
    #[display("valid plan")]
    HaveValidPlan,
    #[display("running optimal search")]
    RunningOptimal,
    #[display("improved plan")]
    Improved,
    #[display("optimal plan")]
    Optimal,
    #[display("best plan found")]
    BestFound,
    #[display("interrupted")]
    Interrupted,
}

pub trait PlanReporter {
    /// Called for every plan the planner emits, in order of discovery.
    fn report(&mut self, phase: Phase, solution: &Solution);
}

impl<F> PlanReporter for F
where
    F: FnMut(Phase, &Solution),
{
    fn report(&mut self, phase: Phase, solution: &Solution) {
        self(phase, solution)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Fast mode result, no optimality claim
    Valid(Solution),
    /// No shorter plan exists
    Optimal(Solution),
    /// Result of an optimal search driven by an inadmissible heuristic
    BestFound(Solution),
    /// Stopped from outside, with the best plan known at that point
    Interrupted(Option<Solution>),
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Valid(solution) | Outcome::Optimal(solution) | Outcome::BestFound(solution) => Some(solution),
            Outcome::Interrupted(solution) => solution.as_ref(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Outcome::Valid(_) => Phase::HaveValidPlan,
            Outcome::Optimal(_) => Phase::Optimal,
            Outcome::BestFound(_) => Phase::BestFound,
            Outcome::Interrupted(_) => Phase::Interrupted,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub mode: SearchMode,
    pub fast_strategy: FastStrategy,
    pub fast_heuristic: HeuristicKind,
    pub optimal_heuristic: HeuristicKind,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::Fast,
            fast_strategy: FastStrategy::Greedy,
            fast_heuristic: HeuristicKind::DomainTuned,
            optimal_heuristic: HeuristicKind::Admissible,
        }
    }
}

impl PlannerConfig {
    pub fn new_planner(&self, stop: StopSignal) -> AnytimePlanner {
        let fast: Box<dyn SearchStrategy + Send + Sync> = match self.fast_strategy {
            FastStrategy::Greedy => Box::new(GreedyBestFirst::new(self.fast_heuristic)),
            FastStrategy::Constructive => Box::new(Constructive),
        };

        AnytimePlanner::new(self.mode, fast, AStar::new(self.optimal_heuristic), stop)
    }
}

/// Runs the fast and the optimal search according to the mode and reports every plan on the way.
///
/// ```text
/// Idle -> RunningFast -> HaveValidPlan -> RunningOptimal -> Improved -> Optimal
///                                                        -> Optimal | BestFound
///                                                        -> Interrupted
/// ```
///
/// Fast mode ends in `HaveValidPlan`, optimal mode starts at `RunningOptimal`.
pub struct AnytimePlanner {
    mode: SearchMode,
    fast: Box<dyn SearchStrategy + Send + Sync>,
    optimal: AStar,
    stop: StopSignal,
}

impl AnytimePlanner {
    pub fn new(mode: SearchMode, fast: Box<dyn SearchStrategy + Send + Sync>, optimal: AStar, stop: StopSignal) -> Self {
        Self {
            mode,
            fast,
            optimal,
            stop,
        }
    }

    #[tracing::instrument(skip_all, fields(mode = %self.mode, fast = self.fast.name()))]
    pub fn run(&self, problem: &Problem, reporter: &mut impl PlanReporter) -> Result<Outcome> {
        let mut phase = Phase::Idle;

        let incumbent = if self.mode == SearchMode::Optimal {
            None
        } else {
            enter(&mut phase, Phase::RunningFast);

            match self.fast.search(problem, &self.stop)? {
                SearchOutcome::Found(solution) => {
                    enter(&mut phase, Phase::HaveValidPlan);
                    reporter.report(Phase::HaveValidPlan, &solution);

                    if self.mode == SearchMode::Fast {
                        return Ok(Outcome::Valid(solution));
                    }
                    Some(solution)
                }

                SearchOutcome::Interrupted(stats) => {
                    tracing::info!("Fast search interrupted before a plan was found ({})", stats);
                    enter(&mut phase, Phase::Interrupted);
                    return Ok(Outcome::Interrupted(None));
                }
            }
        };

        enter(&mut phase, Phase::RunningOptimal);
        self.run_optimal(problem, incumbent, reporter, &mut phase)
    }

    fn run_optimal(
        &self,
        problem: &Problem,
        incumbent: Option<Solution>,
        reporter: &mut impl PlanReporter,
        phase: &mut Phase,
    ) -> Result<Outcome> {
        let bound = incumbent.as_ref().map(|s| s.plan.len());
        let admissible = self.optimal.heuristic().is_admissible();
        let astar = self.optimal.with_upper_bound(bound);

        let best = match (astar.search(problem, &self.stop), incumbent) {
            (Ok(SearchOutcome::Found(solution)), Some(incumbent)) if solution.plan.len() < incumbent.plan.len() => {
                enter(phase, Phase::Improved);
                reporter.report(Phase::Improved, &solution);
                solution
            }

            //not shorter than what we already have
            (Ok(SearchOutcome::Found(_)), Some(incumbent)) => incumbent,

            (Ok(SearchOutcome::Found(solution)), None) => solution,

            (Ok(SearchOutcome::Interrupted(stats)), incumbent) => {
                tracing::info!("Optimal search interrupted ({})", stats);
                enter(phase, Phase::Interrupted);
                if let Some(incumbent) = &incumbent {
                    reporter.report(Phase::Interrupted, incumbent);
                }
                return Ok(Outcome::Interrupted(incumbent));
            }

            //nothing within the bound, so the incumbent already is the shortest plan
            (Err(PlanningError::NoPlanFound { expanded }), Some(incumbent)) => {
                tracing::debug!("No plan shorter than {:?} after {} expansions", bound, expanded);
                incumbent
            }

            (Err(e), _) => return Err(e),
        };

        if admissible {
            enter(phase, Phase::Optimal);
            reporter.report(Phase::Optimal, &best);
            Ok(Outcome::Optimal(best))
        } else {
            enter(phase, Phase::BestFound);
            reporter.report(Phase::BestFound, &best);
            Ok(Outcome::BestFound(best))
        }
    }
}

fn enter(phase: &mut Phase, next: Phase) {
    tracing::debug!("Planner {} -> {}", phase, next);
    *phase = next;
}
