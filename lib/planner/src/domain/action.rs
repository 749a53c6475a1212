use std::fmt::{self, Display, Formatter};

use crate::{Effects, Preconditions};

use super::{Block, Blocks, State, Support};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Action {
    #[display("(pick-up {})", _0)]
    PickUp(Block),
    #[display("(put-down {})", _0)]
    PutDown(Block),
    #[display("(stack {} {})", _0, _1)]
    Stack(Block, Block),
    #[display("(unstack {} {})", _0, _1)]
    Unstack(Block, Block),
}

impl Action {
    pub fn inverse(&self) -> Action {
        match *self {
            Action::PickUp(block) => Action::PutDown(block),
            Action::PutDown(block) => Action::PickUp(block),
            Action::Stack(block, target) => Action::Unstack(block, target),
            Action::Unstack(block, target) => Action::Stack(block, target),
        }
    }

    pub fn labeled<'a>(&self, blocks: &'a Blocks) -> LabeledAction<'a> {
        LabeledAction { action: *self, blocks }
    }
}

impl Preconditions<State> for Action {
    fn is_fulfilled(&self, state: &State) -> bool {
        match *self {
            Action::PickUp(block) => state.is_hand_empty() && state.is_on_table(block) && state.is_clear(block),
            Action::PutDown(block) => state.held() == Some(block),
            Action::Stack(block, target) => state.held() == Some(block) && block != target && state.is_clear(target),
            Action::Unstack(block, target) => {
                state.is_hand_empty() && state.support(block) == Some(Support::On(target)) && state.is_clear(block)
            }
        }
    }
}

impl Effects<State> for Action {
    fn apply_to(&self, state: &State) -> State {
        state.transition(*self)
    }
}

/// Action rendered with block names, in PDDL syntax.
pub struct LabeledAction<'a> {
    action: Action,
    blocks: &'a Blocks,
}

impl Display for LabeledAction<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = |block| self.blocks.name(block);

        match self.action {
            Action::PickUp(block) => write!(f, "(pick-up {})", name(block)),
            Action::PutDown(block) => write!(f, "(put-down {})", name(block)),
            Action::Stack(block, target) => write!(f, "(stack {} {})", name(block), name(target)),
            Action::Unstack(block, target) => write!(f, "(unstack {} {})", name(block), name(target)),
        }
    }
}
