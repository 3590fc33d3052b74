use std::fmt::Display;

use crate::{
    bits::{BitReader, BitWriter},
    code_table::CodeTable,
    error::{DecodeError, EncodeError},
    frequency::FrequencyTable,
    tree::{Node, Tree},
};

/// original_length (4) + last_byte_valid_bits (1)
pub const HEADER_LEN: usize = 5;
/// Header followed by the smallest tree description, a single leaf.
pub const MIN_CONTAINER_LEN: usize = HEADER_LEN + 2;

/// Self-describing encoded buffer.
///
/// Layout, big-endian:
/// ```text
/// original_length: u32 | last_byte_valid_bits: u8 | tree description | packed bits
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    original_length: u32,
    last_byte_valid_bits: u8,
    tree: Tree,
    tree_description_len: usize,
    packed_bits: Vec<u8>,
}

impl Container {
    pub fn encode(input: &[u8]) -> Result<Self, EncodeError> {
        let original_length = u32::try_from(input.len())
            .map_err(|_| EncodeError::InputTooLarge { len: input.len() })?;
        let frequencies = FrequencyTable::from_bytes(input)?;
        let tree = Tree::from_frequencies(&frequencies);
        let code_table = CodeTable::from_tree(&tree);

        let mut writer =
            BitWriter::with_capacity(code_table.encoded_bit_len(&frequencies) as usize);
        for &byte in input {
            // Every input byte has a leaf, hence a code
            if let Some(code) = code_table.get(byte) {
                writer.push_bits(code);
            }
        }
        let (packed_bits, last_byte_valid_bits) = writer.finish();

        Ok(Self {
            original_length,
            last_byte_valid_bits,
            tree_description_len: tree.serialize().len(),
            tree,
            packed_bits,
        })
    }

    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        let expected = self.original_length as usize;
        let mut reader = BitReader::new(&self.packed_bits, self.last_byte_valid_bits);
        // Each symbol costs at least one bit, so the header cannot force a huge allocation
        let mut output = Vec::with_capacity(expected.min(self.payload_bit_len()));
        while output.len() < expected {
            match decode_symbol(self.tree.root(), &mut reader)? {
                Some(symbol) => output.push(symbol),
                None => {
                    return Err(DecodeError::TruncatedStream {
                        expected,
                        decoded: output.len(),
                    })
                }
            }
        }
        Ok(output)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.serialization_len());
        bytes.extend(self.original_length.to_be_bytes());
        bytes.push(self.last_byte_valid_bits);
        bytes.extend(self.tree.serialize());
        bytes.extend(&self.packed_bits);
        bytes
    }

    pub fn original_length(&self) -> usize {
        self.original_length as usize
    }

    pub fn last_byte_valid_bits(&self) -> u8 {
        self.last_byte_valid_bits
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn packed_bits(&self) -> &[u8] {
        &self.packed_bits
    }

    /// Number of meaningful bits in the packed stream.
    pub fn payload_bit_len(&self) -> usize {
        match self.packed_bits.len() {
            0 => 0,
            n => (n - 1) * 8 + self.last_byte_valid_bits as usize,
        }
    }

    pub fn serialization_len(&self) -> usize {
        HEADER_LEN + self.tree_description_len + self.packed_bits.len()
    }
}

/// Walks from the root to a leaf. `Ok(None)` means the stream ran out of bits.
fn decode_symbol(root: &Node, reader: &mut BitReader<'_>) -> Result<Option<u8>, DecodeError> {
    let mut node = root;
    loop {
        let Some(bit) = reader.pop_bit() else {
            return Ok(None);
        };
        node = match (node, bit) {
            (Node::Internal { left, .. }, false) => left,
            (Node::Internal { right, .. }, true) => right,
            // Only a single-leaf tree is walked from a leaf: its code is 0 and it has no
            // child for 1
            (Node::Leaf(symbol), false) => return Ok(Some(*symbol)),
            (Node::Leaf(_), true) => {
                return Err(DecodeError::CorruptCode {
                    bit_offset: reader.bit_cursor() - 1,
                })
            }
        };
        if let Node::Leaf(symbol) = node {
            return Ok(Some(*symbol));
        }
    }
}

impl TryFrom<&[u8]> for Container {
    type Error = DecodeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() < MIN_CONTAINER_LEN {
            return Err(DecodeError::malformed(format!(
                "not enough bytes: got {}, need at least {MIN_CONTAINER_LEN}",
                bytes.len()
            )));
        }
        let original_length = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if original_length == 0 {
            return Err(DecodeError::malformed("original length is zero"));
        }
        let last_byte_valid_bits = bytes[4];

        let (tree, tree_description_len) = Tree::deserialize(&bytes[HEADER_LEN..])?;
        let packed_bits = bytes[HEADER_LEN + tree_description_len..].to_vec();
        if !packed_bits.is_empty() && !(1..=8).contains(&last_byte_valid_bits) {
            return Err(DecodeError::malformed(format!(
                "last byte valid bit count out of range: {last_byte_valid_bits}"
            )));
        }

        Ok(Self {
            original_length,
            last_byte_valid_bits,
            tree,
            tree_description_len,
            packed_bits,
        })
    }
}

impl Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Original length: {}", self.original_length)?;
        writeln!(f, "Distinct symbols: {}", self.tree.leaf_count())?;
        writeln!(f, "Tree description length: {}", self.tree_description_len)?;
        writeln!(f, "Packed data length: {}", self.packed_bits.len())?;
        writeln!(f, "Payload bits: {}", self.payload_bit_len())?;
        writeln!(f, "Valid bits in last byte: {}", self.last_byte_valid_bits)?;
        writeln!(f, "Container length: {}", self.serialization_len())?;
        writeln!(
            f,
            "Compression ratio: {:.2}%",
            self.serialization_len() as f64 * 100.0 / self.original_length as f64
        )
    }
}
