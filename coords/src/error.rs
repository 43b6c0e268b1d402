//! Error types for coordinate operations.

use std::fmt;

/// Result type for coordinate operations.
pub type CoordResult<T> = Result<T, CoordError>;

/// Coordinate axis, used to report which component was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis, signed 16-bit magnitude in the key.
    X,
    /// Vertical axis, signed 16-bit magnitude in the key.
    Y,
    /// Layer axis, unsigned 17-bit field in the key.
    Z,
}

/// Errors that can occur when building positions or keys.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoordError {
    /// Z was set below zero.
    NegativeZ {
        /// The rejected value.
        value: i32,
    },

    /// A component does not fit its field in the packed key.
    OutOfRange {
        /// Axis of the rejected component.
        axis: Axis,
        /// The rejected value.
        value: i32,
        /// Largest magnitude the field can hold.
        max: i32,
    },
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeZ { value } => {
                write!(f, "z must be equal to or greater than 0, got {value}")
            }
            Self::OutOfRange { axis, value, max } => {
                write!(f, "{axis} value {value} exceeds key magnitude {max}")
            }
        }
    }
}

impl std::error::Error for CoordError {}
