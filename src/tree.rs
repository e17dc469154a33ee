//! Huffman tree construction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn merge(lower: HuffmanNode, second: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            weight: lower.weight() + second.weight(),
            left: Box::new(lower),
            right: Box::new(second),
        }
    }
}

// Heap entry keyed on (weight, insertion order) so ties pop in a fixed order.
#[derive(Debug)]
struct Pending {
    order: u64,
    node: HuffmanNode,
}

impl Eq for Pending {}
impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the lightest node first.
        other
            .node
            .weight()
            .cmp(&self.node.weight())
            .then_with(|| other.order.cmp(&self.order))
    }
}
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Builds the tree by repeatedly merging the two lightest nodes.
///
/// Leaves are queued in ascending symbol order and every parent is queued
/// after them, so equal weights always resolve the same way. Returns `None`
/// for an empty table and a bare leaf for a single-symbol table.
pub fn build_tree(table: FrequencyTable) -> Option<HuffmanNode> {
    let mut heap: BinaryHeap<Pending> = table
        .iter()
        .enumerate()
        .map(|(order, (symbol, weight))| Pending {
            order: order as u64,
            node: HuffmanNode::Leaf { symbol, weight },
        })
        .collect();
    let mut next_order = heap.len() as u64;

    while heap.len() > 1 {
        let (Some(lower), Some(second)) = (heap.pop(), heap.pop()) else {
            break;
        };
        tracing::trace!(
            lower = lower.node.weight(),
            second = second.node.weight(),
            "merging nodes"
        );
        heap.push(Pending {
            order: next_order,
            node: HuffmanNode::merge(lower.node, second.node),
        });
        next_order += 1;
    }

    heap.pop().map(|pending| pending.node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyModel;

    #[test]
    fn test_empty_table() {
        assert_eq!(build_tree(FrequencyTable::default()), None);
    }

    #[test]
    fn test_single_symbol_is_leaf() {
        let table = FrequencyModel::scan(b"zzzz").into_table();
        assert_eq!(
            build_tree(table),
            Some(HuffmanNode::Leaf {
                symbol: b'z',
                weight: 4
            })
        );
    }

    #[test]
    fn test_weights_sum_and_leaf_count() {
        let model = FrequencyModel::scan(b"this is an example of a huffman tree");
        let distinct = model.distinct();
        let root = build_tree(model.into_table()).unwrap();
        assert_eq!(root.weight(), 36);
        assert_eq!(root.leaf_count(), distinct);

        fn check(node: &HuffmanNode) {
            if let HuffmanNode::Internal {
                weight,
                left,
                right,
            } = node
            {
                assert_eq!(*weight, left.weight() + right.weight());
                check(left);
                check(right);
            }
        }
        check(&root);
    }

    #[test]
    fn test_lighter_child_goes_left() {
        let table: FrequencyTable = [(b'a', 5), (b'b', 1)].into_iter().collect();
        match build_tree(table).unwrap() {
            HuffmanNode::Internal { left, right, .. } => {
                assert_eq!(left.weight(), 1);
                assert_eq!(right.weight(), 5);
            }
            leaf => panic!("expected internal root, got {leaf:?}"),
        }
    }

    #[test]
    fn test_ties_are_deterministic() {
        let table: FrequencyTable = (0u8..16).map(|s| (s, 3)).collect();
        assert_eq!(build_tree(table.clone()), build_tree(table));
    }
}
