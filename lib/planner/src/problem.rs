use crate::error::{PlanningError, Result};
use crate::{Blocks, Goal, State};

#[derive(Debug, Clone)]
pub struct Problem {
    blocks: Blocks,
    initial: State,
    goal: Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemStats {
    pub blocks: usize,
    pub initial_towers: usize,
    pub goal_towers: usize,
    /// Length of the plan that puts every block on the table and then builds the goal towers.
    pub upper_bound: usize,
}

impl Problem {
    pub fn new(blocks: Blocks, initial: State, goal: Goal) -> Result<Self> {
        if initial.block_count() != blocks.len() {
            return Err(PlanningError::InvalidState(format!(
                "state describes {} blocks, problem has {}",
                initial.block_count(),
                blocks.len()
            )));
        }

        if goal.block_count() != blocks.len() {
            return Err(PlanningError::InvalidGoal(format!(
                "goal describes {} blocks, problem has {}",
                goal.block_count(),
                blocks.len()
            )));
        }

        Ok(Self { blocks, initial, goal })
    }

    pub fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    pub fn initial(&self) -> &State {
        &self.initial
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn stats(&self) -> ProblemStats {
        let blocks = self.blocks.len();
        let initial_towers = self.initial.towers().len();
        let goal_towers = self.goal.tower_count();
        let held = usize::from(self.initial.held().is_some());

        ProblemStats {
            blocks,
            initial_towers,
            goal_towers,
            upper_bound: (4 * blocks).saturating_sub(2 * initial_towers + 2 * goal_towers + held),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fact;

    #[test]
    fn upper_bound_of_reversed_towers() {
        let blocks = Blocks::new(["b1", "b2", "b3", "b4", "b5", "b6"]);
        let tower = |names: [&str; 3]| names.map(|n| blocks.get(n).unwrap()).to_vec();
        let initial = State::from_towers(6, &[tower(["b1", "b2", "b3"]), tower(["b4", "b5", "b6"])]).unwrap();
        let goal = Goal::resolve(
            &blocks,
            [
                Fact::OnTable("b3"),
                Fact::On("b2", "b3"),
                Fact::On("b1", "b2"),
                Fact::OnTable("b6"),
                Fact::On("b5", "b6"),
                Fact::On("b4", "b5"),
            ],
        )
        .unwrap();

        let stats = Problem::new(blocks, initial, goal).unwrap().stats();

        assert_eq!(
            stats,
            ProblemStats {
                blocks: 6,
                initial_towers: 2,
                goal_towers: 2,
                upper_bound: 16,
            }
        );
    }

    #[test]
    fn rejects_mismatched_sizes() {
        let blocks = Blocks::new(["a", "b"]);
        let initial = State::from_towers(1, &[]).unwrap();
        let goal = Goal::new(2, []).unwrap();

        assert!(matches!(
            Problem::new(blocks, initial, goal),
            Err(PlanningError::InvalidState(_))
        ));
    }
}
