use std::{cmp::Ordering, collections::BinaryHeap};

use crate::{error::DecodeError, frequency::FrequencyTable};

pub const INTERNAL_TAG: u8 = 0x00;
pub const LEAF_TAG: u8 = 0x01;

// A full binary tree with 256 leaves is at most 255 edges deep.
const MAX_DEPTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(u8),
    Internal { left: Box<Node>, right: Box<Node> },
}

/// Prefix-code tree. Built per call and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    root: Node,
}

/// Min-heap entry. Ordered by weight, then by creation sequence: leaves are numbered in
/// ascending symbol order, merged nodes continue the numbering as they are created.
struct Pending {
    weight: u64,
    sequence: usize,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the lightest, oldest node first
        (other.weight, other.sequence).cmp(&(self.weight, self.sequence))
    }
}

impl Tree {
    /// Greedy Huffman construction. The first node extracted becomes the left child.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        let mut heap: BinaryHeap<Pending> = frequencies
            .iter()
            .enumerate()
            .map(|(sequence, (symbol, weight))| Pending {
                weight,
                sequence,
                node: Node::Leaf(symbol),
            })
            .collect();
        let mut next_sequence = heap.len();

        let root = loop {
            match (heap.pop(), heap.pop()) {
                (Some(left), Some(right)) => {
                    heap.push(Pending {
                        weight: left.weight + right.weight,
                        sequence: next_sequence,
                        node: Node::Internal {
                            left: Box::new(left.node),
                            right: Box::new(right.node),
                        },
                    });
                    next_sequence += 1;
                }
                (Some(last), None) => break last.node,
                (None, _) => unreachable!("a FrequencyTable always holds at least one symbol"),
            }
        };
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf(_) => 1,
                Node::Internal { left, right } => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    /// Pre-order description: `0x00` for an internal node, `0x01 <symbol>` for a leaf.
    pub fn serialize(&self) -> Vec<u8> {
        fn write(node: &Node, out: &mut Vec<u8>) {
            match node {
                Node::Leaf(symbol) => out.extend([LEAF_TAG, *symbol]),
                Node::Internal { left, right } => {
                    out.push(INTERNAL_TAG);
                    write(left, out);
                    write(right, out);
                }
            }
        }
        let mut out = vec![];
        write(&self.root, &mut out);
        out
    }

    /// Parses a tree description from the start of `bytes`.
    /// Returns the tree and the number of bytes it occupied.
    pub fn deserialize(bytes: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut parser = TreeParser {
            bytes,
            byte_cursor: 0,
            seen: [false; 256],
        };
        let root = parser.parse_node(0)?;
        Ok((Self { root }, parser.byte_cursor))
    }
}

struct TreeParser<'a> {
    bytes: &'a [u8],
    byte_cursor: usize,
    seen: [bool; 256],
}

impl TreeParser<'_> {
    fn pop_byte(&mut self) -> Result<u8, DecodeError> {
        let byte = *self
            .bytes
            .get(self.byte_cursor)
            .ok_or_else(|| DecodeError::malformed("tree description is truncated"))?;
        self.byte_cursor += 1;
        Ok(byte)
    }

    fn parse_node(&mut self, depth: usize) -> Result<Node, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::malformed(format!(
                "tree description is deeper than {MAX_DEPTH} levels"
            )));
        }
        match self.pop_byte()? {
            INTERNAL_TAG => {
                let left = self.parse_node(depth + 1)?;
                let right = self.parse_node(depth + 1)?;
                Ok(Node::Internal {
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            LEAF_TAG => {
                let symbol = self.pop_byte()?;
                if std::mem::replace(&mut self.seen[symbol as usize], true) {
                    return Err(DecodeError::malformed(format!(
                        "symbol {symbol:#04x} appears in more than one leaf"
                    )));
                }
                Ok(Node::Leaf(symbol))
            }
            tag => Err(DecodeError::malformed(format!(
                "invalid tree node tag: {tag:#04x}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(bytes: &[u8]) -> Tree {
        Tree::from_frequencies(&FrequencyTable::from_bytes(bytes).unwrap())
    }

    fn leaf(symbol: u8) -> Box<Node> {
        Box::new(Node::Leaf(symbol))
    }

    #[test]
    fn single_symbol_is_a_lone_leaf() {
        let tree = tree_of(b"aaaa");
        assert_eq!(tree.root(), &Node::Leaf(b'a'));
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.serialize(), vec![LEAF_TAG, b'a']);
    }

    #[test]
    fn ties_break_on_symbol_then_creation_order() {
        // a, b, c, d all weigh 1: (a,b) merge first, then (c,d), then the two pairs
        let tree = tree_of(b"dcba");
        assert_eq!(
            tree.root(),
            &Node::Internal {
                left: Box::new(Node::Internal {
                    left: leaf(b'a'),
                    right: leaf(b'b'),
                }),
                right: Box::new(Node::Internal {
                    left: leaf(b'c'),
                    right: leaf(b'd'),
                }),
            }
        );
    }

    #[test]
    fn heavier_symbols_sit_closer_to_the_root() {
        // c:1 b:2 a:4 -> (c,b) weighs 3, merges with a
        let tree = tree_of(b"aaaabbc");
        assert_eq!(
            tree.root(),
            &Node::Internal {
                left: Box::new(Node::Internal {
                    left: leaf(b'c'),
                    right: leaf(b'b'),
                }),
                right: leaf(b'a'),
            }
        );
    }

    #[test]
    fn description_round_trips() {
        let tree = tree_of(b"the quick brown fox jumps over the lazy dog");
        let mut description = tree.serialize();
        let described_len = description.len();
        description.extend(b"trailing payload");
        let (parsed, consumed) = Tree::deserialize(&description).unwrap();
        assert_eq!(parsed, tree);
        assert_eq!(consumed, described_len);
    }

    #[test]
    fn full_alphabet_fits() {
        let all: Vec<u8> = (0..=255).collect();
        let tree = tree_of(&all);
        assert_eq!(tree.leaf_count(), 256);
        assert_eq!(tree.serialize().len(), 256 * 2 + 255);
    }

    #[test]
    fn rejects_truncated_description() {
        assert!(matches!(
            Tree::deserialize(&[INTERNAL_TAG, LEAF_TAG, b'a', LEAF_TAG]),
            Err(DecodeError::MalformedContainer(_))
        ));
        assert!(matches!(
            Tree::deserialize(&[]),
            Err(DecodeError::MalformedContainer(_))
        ));
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(
            Tree::deserialize(&[0x02, b'a']),
            Err(DecodeError::malformed("invalid tree node tag: 0x02"))
        );
    }

    #[test]
    fn rejects_duplicate_leaves() {
        assert!(matches!(
            Tree::deserialize(&[INTERNAL_TAG, LEAF_TAG, b'a', LEAF_TAG, b'a']),
            Err(DecodeError::MalformedContainer(_))
        ));
    }

    #[test]
    fn rejects_degenerate_depth() {
        let description = vec![INTERNAL_TAG; 1024];
        assert!(matches!(
            Tree::deserialize(&description),
            Err(DecodeError::MalformedContainer(_))
        ));
    }
}
