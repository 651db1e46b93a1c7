use thiserror::Error;

/// Errors that may occur when reading or writing bit fields.
///
/// All of these are raised before the failing operation touches the
/// stream, so a rejected call leaves no partially written or consumed
/// field behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The bit width of a field is zero or exceeds the capacity of its
    /// type.
    ///
    /// For floating point fields, `max` is the capacity of the exponent
    /// or mantissa part that was exceeded.
    #[error("invalid field width {width}; at most {max} bits are allowed")]
    InvalidFieldWidth { width: u32, max: u32 },

    /// The group size of a variable-length integer is out of range.
    #[error("invalid group size {0}; must be in range 1..=64")]
    InvalidGroupSize(u32),

    /// A positive-only field was given a negative value.
    #[error("value {0} must not be negative")]
    NegativeValue(i64),

    /// Parameters describing the range of a value are unusable.
    #[error("invalid value range: {0}")]
    InvalidRange(&'static str),

    /// A strict reader was asked for more bits than remain in its buffer.
    #[error("attempted to read {requested} bits with only {remaining} remaining")]
    UnexpectedEof { requested: usize, remaining: usize },

    /// A sealed writer was written to after being finished.
    #[error("attempted to write to a finished stream")]
    Finalized,
}

/// A result type with [`Error`] as its error.
pub type Result<T> = std::result::Result<T, Error>;
