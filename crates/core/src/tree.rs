//! Huffman tree construction.
//!
//! Nodes live in a flat arena. Leaves are created first, one per distinct
//! symbol in ascending symbol order, and internal nodes are appended as they
//! are merged. A node's arena index is therefore its creation sequence
//! number, and the priority queue orders by `(weight, index)`: equal weights
//! always resolve the same way regardless of heap internals.
//!
//! # Algorithm
//!
//! 1. Push every leaf into a min-heap keyed by `(weight, index)`.
//! 2. Pop the two smallest nodes `a` then `b`.
//! 3. Append an internal node with weight `a + b`, left = `a`, right = `b`.
//! 4. Push it back and repeat until one node remains; that node is the root.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

/// Index of a node inside a [`HuffmanTree`].
pub type NodeId = usize;

/// A node in the Huffman tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// A symbol and its frequency
    Leaf { symbol: u8, weight: u64 },
    /// Sum of two subtrees; always has exactly two children
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A strict binary Huffman tree stored as an arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Count `input` and build its tree.
    ///
    /// # Errors
    /// `Error::EmptyInput` if `input` is empty.
    pub fn from_bytes(input: &[u8]) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(input))
    }

    /// Build the tree for a frequency table.
    ///
    /// A table with a single distinct symbol yields a tree whose root is
    /// that symbol's leaf.
    ///
    /// # Errors
    /// `Error::EmptyInput` if no symbol has a non-zero count.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Self> {
        let leaves = freqs.distinct();
        if leaves == 0 {
            return Err(Error::EmptyInput);
        }

        // A strict binary tree with n leaves has 2n - 1 nodes
        let mut nodes = Vec::with_capacity(2 * leaves - 1);
        let mut heap = BinaryHeap::with_capacity(leaves);

        for (symbol, weight) in freqs.iter() {
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::Leaf { symbol, weight });
        }

        while heap.len() > 1 {
            let (Some(Reverse((wa, a))), Some(Reverse((wb, b)))) = (heap.pop(), heap.pop()) else {
                break;
            };
            let weight = wa.saturating_add(wb);
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::Internal {
                weight,
                left: a,
                right: b,
            });
        }

        // The last node created is the only one left in the heap
        let root = nodes.len() - 1;
        let tree = HuffmanTree { nodes, root };
        debug!(
            symbols = leaves,
            nodes = tree.nodes.len(),
            depth = tree.depth(),
            "built huffman tree"
        );
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node by id.
    ///
    /// Ids handed out by this tree are always in range.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Total number of nodes (leaves plus internal nodes).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaves, i.e. distinct symbols.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Weight of the root, equal to the total symbol count.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].weight()
    }

    /// Length of the longest root-to-leaf path in edges.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { .. } => max = max.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(HuffmanTree::from_bytes(b""), Err(Error::EmptyInput)));
        assert!(matches!(
            HuffmanTree::from_frequencies(&FrequencyTable::new()),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_single_symbol_is_leaf_root() {
        let tree = HuffmanTree::from_bytes(b"ZZZZZ").unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(
            *tree.node(tree.root()),
            Node::Leaf {
                symbol: b'Z',
                weight: 5
            }
        );
    }

    #[test]
    fn test_two_symbol_tie_uses_creation_order() {
        let tree = HuffmanTree::from_bytes(b"BABABABA").unwrap();
        let Node::Internal { weight, left, right } = *tree.node(tree.root()) else {
            panic!("root should be internal");
        };
        assert_eq!(weight, 8);
        // 'A' is created first, so it is popped first and becomes the left child
        assert_eq!(*tree.node(left), Node::Leaf { symbol: b'A', weight: 4 });
        assert_eq!(*tree.node(right), Node::Leaf { symbol: b'B', weight: 4 });
    }

    #[test]
    fn test_strict_binary_structure() {
        let tree = HuffmanTree::from_bytes(b"the quick brown fox jumps over the lazy dog").unwrap();
        let leaves = tree.leaf_count();
        assert_eq!(tree.len(), 2 * leaves - 1);
        assert_eq!(tree.weight(), 43);

        for id in 0..tree.len() {
            if let Node::Internal { weight, left, right } = *tree.node(id) {
                assert_ne!(left, right);
                assert_eq!(weight, tree.node(left).weight() + tree.node(right).weight());
            }
        }
    }

    #[test]
    fn test_internal_node_ties_prefer_older_nodes() {
        // Weights 1,1,1,1: leaves merge pairwise, then the two internal nodes
        let freqs = FrequencyTable::from_counts([(0, 1), (1, 1), (2, 1), (3, 1)]);
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap();
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.depth(), 2);
        assert_eq!(
            tree.node(4),
            &Node::Internal {
                weight: 2,
                left: 0,
                right: 1
            }
        );
        assert_eq!(
            tree.node(5),
            &Node::Internal {
                weight: 2,
                left: 2,
                right: 3
            }
        );
        assert_eq!(
            tree.node(6),
            &Node::Internal {
                weight: 4,
                left: 4,
                right: 5
            }
        );
    }

    #[test]
    fn test_skewed_frequencies_make_deep_tree() {
        // Fibonacci weights produce a maximally unbalanced tree
        let fib = [1u64, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        let freqs = FrequencyTable::from_counts(fib.iter().enumerate().map(|(i, &w)| (i as u8, w)));
        let tree = HuffmanTree::from_frequencies(&freqs).unwrap();
        assert_eq!(tree.depth(), fib.len() - 1);
    }

    #[test]
    fn test_build_is_deterministic() {
        let data = b"mississippi river banks";
        let a = HuffmanTree::from_bytes(data).unwrap();
        let b = HuffmanTree::from_bytes(data).unwrap();
        assert_eq!(a, b);
    }
}
