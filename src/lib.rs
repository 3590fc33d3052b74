//! Static Huffman coding of byte buffers into self-describing containers.
//!
//! ```
//! let encoded = huffpack::encode(b"abracadabra")?;
//! assert_eq!(huffpack::decode(&encoded)?, b"abracadabra");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Every container carries its own tree description, so any container can be decoded
//! on its own and calls never share state.

pub mod bits;
pub mod code_table;
pub mod container;
pub mod error;
pub mod frequency;
pub mod tree;

pub use container::Container;
pub use error::{DecodeError, EncodeError};

/// Encodes a non-empty buffer into a container.
pub fn encode(input: &[u8]) -> Result<Vec<u8>, EncodeError> {
    Ok(Container::encode(input)?.to_bytes())
}

/// Decodes a container produced by [`encode`].
pub fn decode(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    Container::try_from(input)?.decode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let input = b"she sells sea shells by the sea shore";
        assert_eq!(decode(&encode(input).unwrap()).unwrap(), input);
    }

    #[test]
    fn encode_is_deterministic() {
        let input = b"deterministic output, byte for byte";
        assert_eq!(encode(input).unwrap(), encode(input).unwrap());
    }

    #[test]
    fn single_symbol() {
        let encoded = encode(b"aaaa").unwrap();
        let container = Container::try_from(encoded.as_slice()).unwrap();
        assert_eq!(container.tree().leaf_count(), 1);
        assert_eq!(decode(&encoded).unwrap(), b"aaaa");
    }

    #[test]
    fn empty_input_rejected() {
        assert_eq!(encode(b""), Err(EncodeError::EmptyInput));
    }

    #[test]
    fn truncated_header_rejected() {
        let encoded = encode(b"truncate me").unwrap();
        assert!(matches!(
            decode(&encoded[..4]),
            Err(DecodeError::MalformedContainer(_))
        ));
    }

    #[test]
    fn skewed_input_compresses() {
        let mut input = vec![b'x'; 990];
        input.extend(b"0123456789");
        let encoded = encode(&input).unwrap();
        assert!(encoded.len() < input.len(), "{} bytes", encoded.len());
        assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn decodes_are_independent() {
        let first = encode(b"first buffer").unwrap();
        let second = encode(&[0u8, 1, 2, 3, 255, 254, 0, 0]).unwrap();
        assert_eq!(decode(&first).unwrap(), b"first buffer");
        assert_eq!(decode(&second).unwrap(), [0u8, 1, 2, 3, 255, 254, 0, 0]);
        assert_eq!(decode(&first).unwrap(), b"first buffer");
    }

    #[test]
    fn decode_without_prior_encode() {
        // 'a' -> 0, 'b' -> 1
        let handmade = [0, 0, 0, 3, 3, 0x00, 0x01, b'a', 0x01, b'b', 0b0100_0000];
        assert_eq!(decode(&handmade).unwrap(), b"aba");
    }
}
