use crate::error::EncodeError;

const ALPHABET_SIZE: usize = 256;

/// Occurrence count of every byte value in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodeError> {
        if bytes.is_empty() {
            return Err(EncodeError::EmptyInput);
        }
        let mut counts = [0u64; ALPHABET_SIZE];
        for &byte in bytes {
            counts[byte as usize] += 1;
        }
        Ok(Self { counts })
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Present symbols and their counts, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }
}
