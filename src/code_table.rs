use crate::{
    frequency::FrequencyTable,
    tree::{Node, Tree},
};

/// Symbol to code mapping, `false` for a left edge and `true` for a right edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Vec<bool>>>,
}

impl CodeTable {
    pub fn from_tree(tree: &Tree) -> Self {
        let mut codes = vec![None; 256];
        match tree.root() {
            // A lone leaf has no edges to walk, so it gets the one bit code 0
            Node::Leaf(symbol) => codes[*symbol as usize] = Some(vec![false]),
            root => collect_codes(root, &mut vec![], &mut codes),
        }
        Self { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&[bool]> {
        self.codes[symbol as usize].as_deref()
    }

    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.iter().flatten().map(Vec::len).max().unwrap_or(0)
    }

    /// Exact number of bits the packed stream needs for a buffer with these frequencies.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .map(|(symbol, count)| count * self.get(symbol).map_or(0, |code| code.len() as u64))
            .sum()
    }
}

fn collect_codes(node: &Node, path: &mut Vec<bool>, codes: &mut [Option<Vec<bool>>]) {
    match node {
        Node::Leaf(symbol) => codes[*symbol as usize] = Some(path.clone()),
        Node::Internal { left, right } => {
            path.push(false);
            collect_codes(left, path, codes);
            path.pop();
            path.push(true);
            collect_codes(right, path, codes);
            path.pop();
        }
    }
}
