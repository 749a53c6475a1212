use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::context::NodeId;

/// Min-priority queue over search nodes. Equal keys pop in insertion order.
pub(super) struct Frontier<K> {
    heap: BinaryHeap<Entry<K>>,
    next_seq: u64,
}

struct Entry<K> {
    key: K,
    seq: u64,
    node: NodeId,
}

impl<K: Ord + Copy> Frontier<K> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, key: K, node: NodeId) {
        self.heap.push(Entry {
            key,
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
    }

    pub fn pop(&mut self) -> Option<(K, NodeId)> {
        self.heap.pop().map(|entry| (entry.key, entry.node))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl<K: Ord> PartialEq for Entry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord> Eq for Entry<K> {}

impl<K: Ord> PartialOrd for Entry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the smallest key, then the oldest entry
impl<K: Ord> Ord for Entry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key.cmp(&self.key).then_with(|| other.seq.cmp(&self.seq))
    }
}
