mod domain;
mod error;
pub mod eval;
mod graph;
mod plan;
mod planner;
mod problem;
mod stop;
pub mod strategy;

pub use domain::{Action, Block, Blocks, Fact, Goal, LabeledAction, State, Support};
pub use error::{PlanningError, Result};
pub use graph::successors;
pub use plan::{LabeledPlan, Plan, Solution};
pub use planner::{AnytimePlanner, FastStrategy, Outcome, Phase, PlanReporter, PlannerConfig, SearchMode};
pub use problem::{Problem, ProblemStats};
pub use stop::StopSignal;

pub trait Preconditions<S> {
    fn is_fulfilled(&self, state: &S) -> bool;
}

//Callers are expected to check preconditions first, see State::apply
pub trait Effects<S> {
    fn apply_to(&self, state: &S) -> S;
}
