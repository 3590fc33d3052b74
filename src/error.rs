/// Errors returned by [`crate::encode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// There is nothing to build a code from.
    #[error("cannot encode an empty buffer")]
    EmptyInput,

    /// The container stores the original length as a u32.
    #[error("input too large: {len} bytes does not fit the 32 bit length field")]
    InputTooLarge { len: usize },
}

/// Errors returned by [`crate::decode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// The packed bits ran out before `expected` symbols were produced.
    #[error("truncated stream: decoded {decoded} of {expected} bytes")]
    TruncatedStream { expected: usize, decoded: usize },

    /// The tree walk asked for a child that does not exist.
    #[error("corrupt code at bit {bit_offset}")]
    CorruptCode { bit_offset: usize },
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedContainer(reason.into())
    }
}
