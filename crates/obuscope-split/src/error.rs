//! Error types for obuscope-split

/// Reason an OBU header could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeaderFault {
    #[error("no bytes available")]
    Empty,

    #[error("obu_forbidden_bit is set")]
    ForbiddenBit,

    #[error("extension byte missing")]
    MissingExtension,

    #[error("obu_size field truncated")]
    TruncatedSize,

    #[error("obu_size field longer than 8 bytes")]
    SizeTooLong,

    #[error("declared OBU length overflows")]
    LengthOverflow,
}

/// Errors that can occur while splitting a packet into OBUs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// Malformed fixed, extension or size field. Fatal to the whole split.
    #[error("Invalid OBU header: {0}")]
    InvalidHeader(#[from] HeaderFault),

    /// The de-escaping buffer could not be grown
    #[error("Out of memory: cannot reserve {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Bit-length arithmetic does not fit in `usize`
    #[error("Range overflow: {bytes} byte payload is too large to measure in bits")]
    RangeOverflow { bytes: usize },
}

impl SplitError {
    /// Whether this error aborts a split call, as opposed to dropping one unit
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SplitError::RangeOverflow { .. })
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SplitError>;
