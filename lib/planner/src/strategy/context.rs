use std::collections::HashMap;

use crate::{Action, Plan, State};

use super::SearchStats;

pub(super) type NodeId = usize;

pub(super) struct SearchNode {
    pub state: State,
    pub action: Option<Action>,
    pub parent: Option<NodeId>,
    pub cost: usize,
    pub estimate: usize,
}

/// Node table of a single search invocation. Parents are indices into the table, so
/// reconstruction walks back from the goal node without any shared ownership.
pub(super) struct SearchContext {
    nodes: Vec<SearchNode>,
    index: HashMap<State, NodeId>,
    pub stats: SearchStats,
}

impl SearchContext {
    pub fn new(root: State, estimate: usize) -> Self {
        let mut context = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            stats: SearchStats::default(),
        };
        context.push(SearchNode {
            state: root,
            action: None,
            parent: None,
            cost: 0,
            estimate,
        });
        context
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    pub fn lookup(&self, state: &State) -> Option<NodeId> {
        self.index.get(state).copied()
    }

    pub fn insert(&mut self, state: State, action: Action, parent: NodeId, cost: usize, estimate: usize) -> NodeId {
        self.push(SearchNode {
            state,
            action: Some(action),
            parent: Some(parent),
            cost,
            estimate,
        })
    }

    /// Records a cheaper path to an already known node.
    pub fn relink(&mut self, id: NodeId, action: Action, parent: NodeId, cost: usize) {
        let node = &mut self.nodes[id];
        node.action = Some(action);
        node.parent = Some(parent);
        node.cost = cost;
    }

    pub fn plan_to(&self, id: NodeId) -> Plan {
        let mut actions = Vec::new();
        let mut current = Some(id);

        while let Some(node) = current.map(|id| &self.nodes[id]) {
            actions.extend(node.action);
            current = node.parent;
        }

        actions.reverse();
        Plan::new(actions)
    }

    fn push(&mut self, node: SearchNode) -> NodeId {
        let id = self.nodes.len();
        self.index.insert(node.state.clone(), id);
        self.nodes.push(node);
        self.stats.generated += 1;
        id
    }
}
