use crate::error::{PlanningError, Result};
use crate::Preconditions;

use super::{Block, Blocks, State, Support};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fact<B = Block> {
    On(B, B),
    OnTable(B),
}

/// Partial target configuration. Blocks without a target are unconstrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    targets: Box<[Option<Support>]>,
    towers: Box<[GoalPosition]>,
}

// Goal towers are chains: each block has at most one target and carries at most one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GoalPosition {
    root: Block,
    height: usize,
}

impl Goal {
    /// Resolves named facts against the problem's blocks.
    pub fn resolve<I, S>(blocks: &Blocks, facts: I) -> Result<Self>
    where
        I: IntoIterator<Item = Fact<S>>,
        S: AsRef<str>,
    {
        let lookup = |name: &S| {
            blocks
                .get(name.as_ref())
                .ok_or_else(|| PlanningError::InvalidGoal(format!("unknown block {}", name.as_ref())))
        };

        let facts = facts
            .into_iter()
            .map(|fact| match fact {
                Fact::On(block, target) => Ok(Fact::On(lookup(&block)?, lookup(&target)?)),
                Fact::OnTable(block) => Ok(Fact::OnTable(lookup(&block)?)),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(blocks.len(), facts)
    }

    pub fn new(block_count: usize, facts: impl IntoIterator<Item = Fact>) -> Result<Self> {
        let mut targets: Vec<Option<Support>> = vec![None; block_count];
        let mut carries: Vec<Option<Block>> = vec![None; block_count];

        for fact in facts {
            let (block, target) = match fact {
                Fact::On(block, target) => (block, Support::On(target)),
                Fact::OnTable(block) => (block, Support::Table),
            };

            if block.index() >= block_count {
                return Err(PlanningError::InvalidGoal(format!("unknown block {block}")));
            }

            if let Support::On(below) = target {
                if below.index() >= block_count {
                    return Err(PlanningError::InvalidGoal(format!("unknown block {below}")));
                }
                if below == block {
                    return Err(PlanningError::InvalidGoal(format!("block {block} cannot be on itself")));
                }
                match carries[below.index()] {
                    Some(other) if other != block => {
                        return Err(PlanningError::InvalidGoal(format!(
                            "blocks {other} and {block} cannot both be on {below}"
                        )));
                    }
                    _ => carries[below.index()] = Some(block),
                }
            }

            match targets[block.index()] {
                Some(existing) if existing != target => {
                    return Err(PlanningError::InvalidGoal(format!("conflicting facts for block {block}")));
                }
                _ => targets[block.index()] = Some(target),
            }
        }

        let towers = goal_towers(&targets)?;

        Ok(Self {
            targets: targets.into_boxed_slice(),
            towers,
        })
    }

    pub fn target(&self, block: Block) -> Option<Support> {
        self.targets.get(block.index()).copied().flatten()
    }

    pub fn block_count(&self) -> usize {
        self.targets.len()
    }

    pub fn constrained(&self) -> impl Iterator<Item = (Block, Support)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(index, target)| target.map(|t| (Block::from_index(index), t)))
    }

    /// Whether `lower` sits somewhere below `upper` in the same goal tower.
    pub fn is_below(&self, lower: Block, upper: Block) -> bool {
        match (self.towers.get(lower.index()), self.towers.get(upper.index())) {
            (Some(l), Some(u)) => l.root == u.root && l.height < u.height,
            _ => false,
        }
    }

    /// Number of towers in a state satisfying this goal, counting unconstrained blocks as their own tower.
    pub fn tower_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| !matches!(t, Some(Support::On(_))))
            .count()
    }
}

impl Preconditions<State> for Goal {
    fn is_fulfilled(&self, state: &State) -> bool {
        self.constrained().all(|(block, target)| state.support(block) == Some(target))
    }
}

fn goal_towers(targets: &[Option<Support>]) -> Result<Box<[GoalPosition]>> {
    targets
        .iter()
        .enumerate()
        .map(|(index, _)| {
            let block = Block::from_index(index);
            let mut current = block;
            let mut height = 0;

            while let Some(Support::On(below)) = targets[current.index()] {
                height += 1;
                current = below;
                if height > targets.len() {
                    return Err(PlanningError::InvalidGoal(format!(
                        "block {block} is part of a cyclic tower"
                    )));
                }
            }

            Ok(GoalPosition { root: current, height })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> Blocks {
        Blocks::new(["a", "b", "c"])
    }

    #[test]
    fn resolves_named_facts() {
        let blocks = blocks();
        let goal = Goal::resolve(&blocks, [Fact::On("a", "b"), Fact::On("b", "c")]).unwrap();

        let a = blocks.get("a").unwrap();
        let b = blocks.get("b").unwrap();
        let c = blocks.get("c").unwrap();

        assert_eq!(goal.target(a), Some(Support::On(b)));
        assert_eq!(goal.target(c), None);
        assert!(goal.is_below(c, a));
        assert!(goal.is_below(b, a));
        assert!(!goal.is_below(a, b));
        assert_eq!(goal.tower_count(), 1);
    }

    #[test]
    fn checks_only_constrained_blocks() {
        let blocks = blocks();
        let a = blocks.get("a").unwrap();
        let b = blocks.get("b").unwrap();
        let c = blocks.get("c").unwrap();
        let goal = Goal::resolve(&blocks, [Fact::On("a", "b")]).unwrap();

        assert!(State::from_towers(3, &[vec![b, a], vec![c]]).unwrap().satisfies(&goal));
        assert!(State::from_towers(3, &[vec![c, b, a]]).unwrap().satisfies(&goal));
        assert!(!State::from_towers(3, &[vec![a, b], vec![c]]).unwrap().satisfies(&goal));
    }

    #[test]
    fn duplicate_facts_are_accepted() {
        assert!(Goal::resolve(&blocks(), [Fact::On("a", "b"), Fact::On("a", "b")]).is_ok());
    }

    #[test]
    fn rejects_invalid_goals() {
        let blocks = blocks();
        let invalid = [
            vec![Fact::On("a", "x")],
            vec![Fact::OnTable("x")],
            vec![Fact::On("a", "a")],
            vec![Fact::On("a", "b"), Fact::OnTable("a")],
            vec![Fact::On("a", "b"), Fact::On("a", "c")],
            vec![Fact::On("a", "c"), Fact::On("b", "c")],
            vec![Fact::On("a", "b"), Fact::On("b", "a")],
            vec![Fact::On("a", "b"), Fact::On("b", "c"), Fact::On("c", "a")],
        ];

        for facts in invalid {
            let result = Goal::resolve(&blocks, facts.clone());
            assert!(
                matches!(result, Err(PlanningError::InvalidGoal(_))),
                "expected {facts:?} to be rejected"
            );
        }
    }
}
