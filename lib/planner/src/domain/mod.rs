mod action;
mod goal;
mod state;

use std::collections::HashMap;

pub use action::{Action, LabeledAction};
pub use goal::{Fact, Goal};
pub use state::{State, Support};

/// Interned block identifier. Only meaningful together with the [`Blocks`] registry it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("#{}", _0)]
pub struct Block(u32);

impl Block {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

/// Names of all blocks of a problem, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocks {
    names: Vec<String>,
    index: HashMap<String, Block>,
}

impl Blocks {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut blocks = Self::default();
        for name in names {
            blocks.insert(name);
        }
        blocks
    }

    /// Returns the existing block if the name is already known.
    pub fn insert(&mut self, name: impl Into<String>) -> Block {
        let name = name.into();
        if let Some(block) = self.index.get(&name) {
            return *block;
        }

        let block = Block::from_index(self.names.len());
        self.index.insert(name.clone(), block);
        self.names.push(name);
        block
    }

    pub fn get(&self, name: &str) -> Option<Block> {
        self.index.get(name).copied()
    }

    pub fn name(&self, block: Block) -> &str {
        self.names.get(block.index()).map(String::as_str).unwrap_or("?")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Block> {
        (0..self.names.len()).map(Block::from_index)
    }
}
