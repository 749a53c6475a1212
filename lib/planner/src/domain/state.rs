use std::hash::{Hash, Hasher};

use crate::error::{PlanningError, Result};
use crate::{Effects, Preconditions};

use super::{Action, Block, Goal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Support {
    Table,
    On(Block),
    Held,
}

/// Snapshot of the world. `above` and `held` are derived from `supports` and kept in sync by every transition.
#[derive(Debug, Clone)]
pub struct State {
    supports: Box<[Support]>,
    above: Box<[Option<Block>]>,
    held: Option<Block>,
}

impl State {
    /// Builds a state from towers listed bottom to top. Blocks that appear in no tower stand alone on the table.
    pub fn from_towers(block_count: usize, towers: &[Vec<Block>]) -> Result<Self> {
        let mut supports: Vec<Option<Support>> = vec![None; block_count];

        for tower in towers {
            let mut below: Option<Block> = None;
            for block in tower {
                let slot = supports
                    .get_mut(block.index())
                    .ok_or_else(|| PlanningError::InvalidState(format!("unknown block {block}")))?;

                if slot.is_some() {
                    return Err(PlanningError::InvalidState(format!("block {block} appears twice")));
                }

                *slot = Some(below.map_or(Support::Table, Support::On));
                below = Some(*block);
            }
        }

        Self::from_supports(supports.into_iter().map(|s| s.unwrap_or(Support::Table)).collect())
    }

    pub fn from_supports(supports: Vec<Support>) -> Result<Self> {
        let mut above = vec![None; supports.len()];
        let mut held = None;

        for (index, support) in supports.iter().enumerate() {
            let block = Block::from_index(index);
            match *support {
                Support::Table => {}
                Support::Held => {
                    if let Some(other) = held.replace(block) {
                        return Err(PlanningError::InvalidState(format!(
                            "blocks {other} and {block} are both held"
                        )));
                    }
                }
                Support::On(below) => {
                    if below == block {
                        return Err(PlanningError::InvalidState(format!("block {block} is on itself")));
                    }
                    let slot = above
                        .get_mut(below.index())
                        .ok_or_else(|| PlanningError::InvalidState(format!("unknown block {below}")))?;
                    if let Some(other) = slot.replace(block) {
                        return Err(PlanningError::InvalidState(format!(
                            "blocks {other} and {block} are both on {below}"
                        )));
                    }
                    if supports[below.index()] == Support::Held {
                        return Err(PlanningError::InvalidState(format!("block {block} is on held block {below}")));
                    }
                }
            }
        }

        let state = Self {
            supports: supports.into_boxed_slice(),
            above: above.into_boxed_slice(),
            held,
        };

        if let Some(block) = state.blocks().find(|b| state.is_in_cycle(*b)) {
            return Err(PlanningError::InvalidState(format!("block {block} rests on itself through a cycle")));
        }

        Ok(state)
    }

    pub fn block_count(&self) -> usize {
        self.supports.len()
    }

    pub fn blocks(&self) -> impl Iterator<Item = Block> {
        (0..self.supports.len()).map(Block::from_index)
    }

    pub fn support(&self, block: Block) -> Option<Support> {
        self.supports.get(block.index()).copied()
    }

    pub fn block_on(&self, block: Block) -> Option<Block> {
        self.above.get(block.index()).copied().flatten()
    }

    pub fn held(&self) -> Option<Block> {
        self.held
    }

    pub fn is_hand_empty(&self) -> bool {
        self.held.is_none()
    }

    pub fn is_on_table(&self, block: Block) -> bool {
        self.support(block) == Some(Support::Table)
    }

    pub fn is_clear(&self, block: Block) -> bool {
        match self.support(block) {
            Some(Support::Held) | None => false,
            Some(_) => self.block_on(block).is_none(),
        }
    }

    /// Towers bottom to top, ordered by their bottom block. The held block is not part of any tower.
    pub fn towers(&self) -> Vec<Vec<Block>> {
        self.blocks()
            .filter(|b| self.is_on_table(*b))
            .map(|bottom| {
                let mut tower = vec![bottom];
                let mut current = bottom;
                while let Some(next) = self.block_on(current) {
                    tower.push(next);
                    current = next;
                }
                tower
            })
            .collect()
    }

    /// Number of blocks below the given one.
    pub fn height(&self, block: Block) -> usize {
        let mut height = 0;
        let mut current = block;
        while let Some(Support::On(below)) = self.support(current) {
            height += 1;
            current = below;
        }
        height
    }

    pub fn legal_actions(&self) -> Vec<Action> {
        if let Some(held) = self.held {
            let mut actions = vec![Action::PutDown(held)];
            actions.extend(
                self.blocks()
                    .filter(|target| *target != held && self.is_clear(*target))
                    .map(|target| Action::Stack(held, target)),
            );
            return actions;
        }

        self.blocks()
            .filter(|b| self.is_clear(*b))
            .filter_map(|b| match self.supports[b.index()] {
                Support::Table => Some(Action::PickUp(b)),
                Support::On(below) => Some(Action::Unstack(b, below)),
                Support::Held => None,
            })
            .collect()
    }

    pub fn apply(&self, action: Action) -> Result<State> {
        if !action.is_fulfilled(self) {
            return Err(PlanningError::IllegalActionApplication(action));
        }

        Ok(action.apply_to(self))
    }

    pub fn satisfies(&self, goal: &Goal) -> bool {
        goal.is_fulfilled(self)
    }

    //Preconditions must have been checked by the caller
    pub(super) fn transition(&self, action: Action) -> State {
        let mut next = self.clone();

        match action {
            Action::PickUp(block) => {
                next.supports[block.index()] = Support::Held;
                next.held = Some(block);
            }
            Action::PutDown(block) => {
                next.supports[block.index()] = Support::Table;
                next.held = None;
            }
            Action::Stack(block, target) => {
                next.supports[block.index()] = Support::On(target);
                next.above[target.index()] = Some(block);
                next.held = None;
            }
            Action::Unstack(block, target) => {
                next.supports[block.index()] = Support::Held;
                next.above[target.index()] = None;
                next.held = Some(block);
            }
        }

        next
    }

    fn is_in_cycle(&self, block: Block) -> bool {
        let mut current = block;
        for _ in 0..self.supports.len() {
            match self.support(current) {
                Some(Support::On(below)) if below == block => return true,
                Some(Support::On(below)) => current = below,
                _ => return false,
            }
        }
        false
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.supports == other.supports
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.supports.hash(state);
    }
}
