//! Error types for packet operations.

use std::fmt;

/// Result type for packet operations.
pub type PacketResult<T> = Result<T, PacketError>;

/// Errors that can occur while building or parsing a packet.
///
/// Every variant is raised before the buffer, cursor or size is touched, so a
/// packet that returned an error can be reset or dropped safely.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PacketError {
    /// A write would run into the reserved tail margin.
    WriteOverflow {
        /// Number of bytes requested.
        requested: usize,
        /// Cursor position at the time of the write.
        cursor: usize,
        /// Total buffer capacity in bytes.
        capacity: usize,
    },

    /// A read would run past the end of the buffer.
    ReadOverflow {
        /// Number of bytes requested.
        requested: usize,
        /// Cursor position at the time of the read.
        cursor: usize,
        /// Total buffer capacity in bytes.
        capacity: usize,
    },

    /// Requested buffer capacity is outside the supported range.
    InvalidCapacity {
        /// The capacity that was requested.
        capacity: usize,
        /// Smallest supported capacity.
        min: usize,
        /// Largest supported capacity.
        max: usize,
    },

    /// The length header announces more payload than the buffer can hold.
    HeaderOutOfRange {
        /// Payload size read from the header.
        size: usize,
        /// Largest payload the buffer can hold.
        max: usize,
    },

    /// String is too long for its 16-bit length prefix.
    StringTooLong {
        /// Encoded byte length of the string.
        len: usize,
        /// Largest length the prefix can express.
        max: usize,
    },

    /// String field bytes are not valid UTF-8.
    InvalidUtf8 {
        /// Cursor position where the string bytes start.
        position: usize,
    },
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteOverflow {
                requested,
                cursor,
                capacity,
            } => {
                write!(
                    f,
                    "unable to write {requested} bytes (cursor={cursor}, capacity={capacity})"
                )
            }
            Self::ReadOverflow {
                requested,
                cursor,
                capacity,
            } => {
                write!(
                    f,
                    "unable to read {requested} bytes (cursor={cursor}, capacity={capacity})"
                )
            }
            Self::InvalidCapacity { capacity, min, max } => {
                write!(
                    f,
                    "invalid packet capacity {capacity}, expected {min}..={max}"
                )
            }
            Self::HeaderOutOfRange { size, max } => {
                write!(f, "header announces {size} payload bytes, maximum is {max}")
            }
            Self::StringTooLong { len, max } => {
                write!(f, "string of {len} bytes exceeds length prefix maximum {max}")
            }
            Self::InvalidUtf8 { position } => {
                write!(f, "invalid UTF-8 in string field at offset {position}")
            }
        }
    }
}

impl std::error::Error for PacketError {}
