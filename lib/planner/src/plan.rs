use std::fmt::{self, Display, Formatter};

use crate::error::Result;
use crate::strategy::SearchStats;
use crate::{Action, Blocks, State};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    actions: Vec<Action>,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Applies every step to `initial`, failing on the first one whose preconditions do not hold.
    pub fn replay(&self, initial: &State) -> Result<State> {
        self.actions
            .iter()
            .try_fold(initial.clone(), |state, action| state.apply(*action))
    }

    pub fn labeled<'a>(&'a self, blocks: &'a Blocks) -> LabeledPlan<'a> {
        LabeledPlan { plan: self, blocks }
    }
}

impl FromIterator<Action> for Plan {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

pub struct LabeledPlan<'a> {
    plan: &'a Plan,
    blocks: &'a Blocks,
}

impl Display for LabeledPlan<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, action) in self.plan.actions.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", action.labeled(self.blocks))?;
        }
        Ok(())
    }
}

/// A plan together with the effort it took to find it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub plan: Plan,
    pub stats: SearchStats,
}

impl Solution {
    pub fn new(plan: Plan, stats: SearchStats) -> Self {
        Self { plan, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlanningError;

    #[test]
    fn replay_stops_at_illegal_step() {
        let blocks = Blocks::new(["a", "b"]);
        let a = blocks.get("a").unwrap();
        let b = blocks.get("b").unwrap();
        let start = State::from_towers(2, &[vec![a], vec![b]]).unwrap();

        let plan: Plan = [Action::PickUp(a), Action::PickUp(b)].into_iter().collect();

        assert_eq!(
            plan.replay(&start),
            Err(PlanningError::IllegalActionApplication(Action::PickUp(b)))
        );
    }

    #[test]
    fn renders_in_pddl_syntax() {
        let blocks = Blocks::new(["a", "b"]);
        let a = blocks.get("a").unwrap();
        let b = blocks.get("b").unwrap();
        let plan = Plan::new(vec![Action::PickUp(a), Action::Stack(a, b)]);

        assert_eq!(plan.labeled(&blocks).to_string(), "(pick-up a) (stack a b)");
        assert_eq!(Plan::default().labeled(&blocks).to_string(), "");
    }
}
