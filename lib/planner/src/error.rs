use derive_more::{Display, Error};

use crate::domain::Action;

pub type Result<T, E = PlanningError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PlanningError {
    #[display("No plan found after expanding {} nodes", expanded)]
    NoPlanFound { expanded: usize },

    #[display("Action {} is not applicable", _0)]
    IllegalActionApplication(#[error(not(source))] Action),

    #[display("Invalid goal: {}", _0)]
    InvalidGoal(#[error(not(source))] String),

    #[display("Invalid state: {}", _0)]
    InvalidState(#[error(not(source))] String),
}
