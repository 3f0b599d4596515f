//! Error types.

/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All error variants that this crate can emit.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A raw byte representation was not exactly 16 bytes long.
    #[error("invalid length: expected 16 bytes, got {len}")]
    InvalidLength {
        /// The length of the rejected input.
        len: usize,
    },

    /// A string representation did not hold exactly 32 hexadecimal digits after all dashes were
    /// removed.
    #[error("invalid string representation")]
    InvalidFormat,

    /// The instance id passed had non-zero bits above the 30 usable ones.
    ///
    /// This is informational: the low 30 bits have been applied regardless.
    #[error("discarded non-zero most significant 2 bits from instance id {value:#010x}")]
    TruncatedInstanceId {
        /// The value as passed by the caller.
        value: u32,
    },

    /// The entropy source could not supply the initial random state of a generator.
    #[error("could not obtain initial random bytes from the entropy source")]
    EntropyInitFailure,
}
